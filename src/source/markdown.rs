use std::collections::BTreeMap;

use super::gc_articles::{Language, Post};

/// Entities decoded in front matter titles. `&amp;` goes last so it
/// cannot manufacture a new entity.
const TITLE_ENTITIES: &[(&str, &str)] = &[("&#8217;", "'"), ("&amp;", "&")];

pub fn decode_title(rendered: &str) -> String {
    TITLE_ENTITIES
        .iter()
        .fold(rendered.to_string(), |title, (entity, text)| title.replace(entity, text))
}

/// YAML single-quoted scalar.
fn quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render a post as a markdown file with alphabetised front matter.
///
/// Empty fields are left out. `description` is written as a folded block
/// so long excerpts stay readable in diffs.
pub fn render_post(post: &Post, lang: Language) -> String {
    let title = decode_title(&post.title.rendered);
    let translation_key = post
        .translation_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .unwrap_or(&post.slug)
        .to_string();

    let mut fields: BTreeMap<&str, String> = BTreeMap::new();
    fields.insert("author", post.author().to_string());
    fields.insert("date", post.date.clone());
    fields.insert("description", post.excerpt().to_string());
    fields.insert("lang", lang.code().to_string());
    fields.insert("title", title);
    fields.insert("translationKey", translation_key);

    if let Some(media) = post.featured_media() {
        if let Some(url) = media.full_size_url() {
            fields.insert("image", url.to_string());
            fields.insert("thumb", url.to_string());
        }
        fields.insert("imageAlt", media.alt_text.clone());
    }

    let mut output = String::from("---\n");
    for (key, value) in fields.iter().filter(|(_, v)| !v.is_empty()) {
        if *key == "description" {
            output.push_str(&format!("{key}: >-\n  {}\n", quoted(value)));
        } else {
            output.push_str(&format!("{key}: {}\n", quoted(value)));
        }
    }
    output.push_str("---\n");
    output.push_str(&post.content.rendered);
    output.push('\n');
    output
}

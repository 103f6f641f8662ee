pub mod gc_articles;
pub mod markdown;
pub mod slug;

use async_trait::async_trait;

use crate::config::SourceConfig;
use crate::content::ContentItem;
use crate::error::{AppError, Result};

use gc_articles::{GcArticlesClient, Language, Post};

/// Produces the content items for one run, paths relative to the content directory.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<ContentItem>>;
}

/// English and French posts from two GC Articles endpoints.
pub struct BilingualSource {
    client: GcArticlesClient,
    endpoint_en: String,
    endpoint_fr: String,
}

impl BilingualSource {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            client: GcArticlesClient::new(config.per_page),
            endpoint_en: config.endpoint_en.clone(),
            endpoint_fr: config.endpoint_fr.clone(),
        }
    }
}

fn to_item(post: &Post, lang: Language) -> ContentItem {
    // File names come from the title as rendered, entities included, so
    // existing articles keep their paths.
    let file_name = slug::title_to_filename(&post.title.rendered);
    ContentItem::new(
        format!("{}/{file_name}.md", lang.code()),
        markdown::render_post(post, lang),
    )
}

#[async_trait]
impl ContentSource for BilingualSource {
    async fn fetch_items(&self) -> Result<Vec<ContentItem>> {
        let (en, fr) = tokio::try_join!(
            self.client.request_posts(&self.endpoint_en),
            self.client.request_posts(&self.endpoint_fr),
        )?;

        if !en.status().is_success() || !fr.status().is_success() {
            return Err(AppError::Source(format!(
                "HTTP error: EN status {}, FR status {}",
                en.status(),
                fr.status()
            )));
        }

        let en_posts = gc_articles::parse_posts(en, Language::En).await?;
        let fr_posts = gc_articles::parse_posts(fr, Language::Fr).await?;

        tracing::info!(
            en = en_posts.len(),
            fr = fr_posts.len(),
            "Fetched posts"
        );

        let items = en_posts
            .iter()
            .map(|post| to_item(post, Language::En))
            .chain(fr_posts.iter().map(|post| to_item(post, Language::Fr)))
            .collect();
        Ok(items)
    }
}

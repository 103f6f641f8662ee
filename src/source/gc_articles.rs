use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

// --- Response types ---

#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub slug: String,
    pub date: String,
    pub title: Rendered,
    pub content: Rendered,
    /// Registered post meta; WordPress sends `[]` when there is none.
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub markdown: Option<MarkdownFields>,
    #[serde(default, rename = "translationKey")]
    pub translation_key: Option<String>,
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<Embedded>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rendered {
    pub rendered: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownFields {
    #[serde(default)]
    pub excerpt: Option<Rendered>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Embedded {
    #[serde(default, rename = "wp:featuredmedia")]
    pub featured_media: Vec<Media>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub media_details: Option<serde_json::Value>,
}

impl Media {
    pub fn full_size_url(&self) -> Option<&str> {
        self.media_details.as_ref()?["sizes"]["full"]["source_url"].as_str()
    }
}

impl Post {
    pub fn author(&self) -> &str {
        self.meta
            .as_ref()
            .and_then(|m| m["gc_author_name"].as_str())
            .unwrap_or_default()
    }

    pub fn excerpt(&self) -> &str {
        self.markdown
            .as_ref()
            .and_then(|m| m.excerpt.as_ref())
            .map(|e| e.rendered.as_str())
            .unwrap_or_default()
    }

    pub fn featured_media(&self) -> Option<&Media> {
        self.embedded.as_ref()?.featured_media.first()
    }
}

/// Client for the WordPress-based GC Articles REST endpoints.
pub struct GcArticlesClient {
    client: Client,
    per_page: Option<u32>,
}

impl GcArticlesClient {
    pub fn new(per_page: Option<u32>) -> Self {
        Self {
            client: Client::new(),
            per_page,
        }
    }

    /// `GET {endpoint}posts?markdown=true&_embed`.
    pub async fn request_posts(&self, endpoint: &str) -> Result<reqwest::Response> {
        let url = format!("{endpoint}posts");
        let mut query = vec![("markdown", "true".to_string()), ("_embed", String::new())];
        if let Some(per_page) = self.per_page {
            query.push(("per_page", per_page.to_string()));
        }

        tracing::debug!(url = %url, "Fetching posts");
        let response = self.client.get(&url).query(&query).send().await?;
        Ok(response)
    }
}

/// Decode a posts payload, insisting on a JSON array.
pub async fn parse_posts(response: reqwest::Response, lang: Language) -> Result<Vec<Post>> {
    let payload: serde_json::Value = response.json().await?;
    if !payload.is_array() {
        return Err(AppError::Source(format!(
            "Expected array of posts from the {} endpoint",
            lang.code()
        )));
    }
    Ok(serde_json::from_value(payload)?)
}

//! Knowledge items - the persisted unit of the library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Variant discriminator for a [`KnowledgeItem`].
///
/// Serializes as the plain string the rest of the application stores:
/// a `video/*` mime type, `external/url`, or `web/scrape`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// A local video file; carries the full mime type (e.g. `video/mp4`).
    Video(String),

    /// An external URL ingested without scraping (social media, etc.).
    ExternalUrl,

    /// A web page scraped and analyzed by the pipeline.
    WebScrape,
}

impl ItemKind {
    /// The stored string form.
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Video(mime) => mime,
            ItemKind::ExternalUrl => "external/url",
            ItemKind::WebScrape => "web/scrape",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "external/url" => Ok(ItemKind::ExternalUrl),
            "web/scrape" => Ok(ItemKind::WebScrape),
            other if other.starts_with("video/") => Ok(ItemKind::Video(s)),
            other => Err(serde::de::Error::custom(format!(
                "unknown item kind: {other}"
            ))),
        }
    }
}

/// A fully-formed entry in the knowledge library.
///
/// Created exactly once per successfully ingested URL or file and never
/// mutated after persistence. Re-ingesting the same URL creates a new item
/// with a fresh id rather than updating the old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Globally unique id (UUID v4), immutable after creation.
    pub id: String,

    /// Owner of this item.
    pub user_id: String,

    /// Display title.
    pub title: String,

    /// Display handle; for web items this is the normalized URL.
    pub file_name: String,

    /// Content size; for scraped pages, extracted text length in characters.
    pub size: usize,

    /// Variant discriminator.
    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Set once at creation time.
    pub uploaded_at: DateTime<Utc>,

    /// Readable text produced by analysis.
    pub transcription: String,

    /// Short summary produced by analysis.
    pub summary: String,

    /// Search keywords produced by analysis.
    pub keywords: Vec<String>,

    /// Source URL for external and scraped items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,

    /// True when the content lives outside the library (URL-backed items).
    #[serde(default)]
    pub is_external: bool,

    /// Scraped payload: the model's structured data when it produced any,
    /// otherwise the extracted page text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_content: Option<String>,
}

impl KnowledgeItem {
    /// Create a new item with a fresh id and creation timestamp.
    pub fn new(user_id: impl Into<String>, title: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: title.into(),
            file_name: String::new(),
            size: 0,
            kind,
            uploaded_at: Utc::now(),
            transcription: String::new(),
            summary: String::new(),
            keywords: Vec::new(),
            external_url: None,
            is_external: false,
            scraped_content: None,
        }
    }

    /// Set the display handle.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Set the content size.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the source URL and mark the item external.
    pub fn with_external_url(mut self, url: impl Into<String>) -> Self {
        self.external_url = Some(url.into());
        self.is_external = true;
        self
    }

    /// Set the transcription.
    pub fn with_transcription(mut self, transcription: impl Into<String>) -> Self {
        self.transcription = transcription.into();
        self
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the keywords.
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Set the scraped payload.
    pub fn with_scraped_content(mut self, content: impl Into<String>) -> Self {
        self.scraped_content = Some(content.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_serde_strings() {
        let json = serde_json::to_string(&ItemKind::WebScrape).unwrap();
        assert_eq!(json, r#""web/scrape""#);

        let kind: ItemKind = serde_json::from_str(r#""external/url""#).unwrap();
        assert_eq!(kind, ItemKind::ExternalUrl);

        let kind: ItemKind = serde_json::from_str(r#""video/mp4""#).unwrap();
        assert_eq!(kind, ItemKind::Video("video/mp4".to_string()));

        assert!(serde_json::from_str::<ItemKind>(r#""audio/mp3""#).is_err());
    }

    #[test]
    fn test_new_items_get_unique_ids() {
        let a = KnowledgeItem::new("user-1", "First", ItemKind::WebScrape);
        let b = KnowledgeItem::new("user-1", "Second", ItemKind::WebScrape);
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn test_external_url_marks_external() {
        let item = KnowledgeItem::new("user-1", "Docs", ItemKind::WebScrape)
            .with_external_url("https://example.com/docs");
        assert!(item.is_external);
        assert_eq!(
            item.external_url.as_deref(),
            Some("https://example.com/docs")
        );
    }

    #[test]
    fn test_item_roundtrip_uses_type_field() {
        let item = KnowledgeItem::new("user-1", "Page", ItemKind::WebScrape)
            .with_file_name("example.com/page")
            .with_size(1234)
            .with_external_url("https://example.com/page")
            .with_summary("A page.");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "web/scrape");

        let back: KnowledgeItem = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, item.id);
        assert_eq!(back.kind, ItemKind::WebScrape);
        assert_eq!(back.size, 1234);
    }
}

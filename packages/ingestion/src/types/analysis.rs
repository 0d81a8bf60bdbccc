//! Analysis results returned by the AI collaborator.

use serde::{Deserialize, Serialize};

/// Metadata the analysis collaborator produces for a piece of content.
///
/// The pipeline treats this as opaque output: no retry or validation beyond
/// "did the call return a well-formed value".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebAnalysis {
    /// Suggested display title, when the model produced one.
    #[serde(default)]
    pub title: Option<String>,

    /// Cleaned readable text of the content.
    #[serde(default)]
    pub transcription: String,

    /// Short summary.
    #[serde(default)]
    pub summary: String,

    /// Search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Structured data the model chose to pull out, if any.
    #[serde(default)]
    pub scraped_data: Option<serde_json::Value>,
}

impl WebAnalysis {
    /// Create an analysis with just a summary (useful in tests).
    pub fn summary_only(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let analysis: WebAnalysis =
            serde_json::from_str(r#"{"summary": "Short.", "keywords": ["a", "b"]}"#).unwrap();
        assert_eq!(analysis.summary, "Short.");
        assert_eq!(analysis.keywords.len(), 2);
        assert!(analysis.title.is_none());
        assert!(analysis.transcription.is_empty());
        assert!(analysis.scraped_data.is_none());
    }
}

//! Gemini implementation of the Analyzer trait.
//!
//! A reference implementation over the Gemini `generateContent` REST API.
//! Structured calls (analysis, curation, prediction) use JSON response
//! mode; search-grounded discovery enables the `google_search` tool and
//! merges the model's JSON output with the grounding citation URLs.
//!
//! # Example
//!
//! ```rust,ignore
//! use ingestion::ai::GeminiAnalyzer;
//!
//! let analyzer = GeminiAnalyzer::new("AIza...").with_model("gemini-2.0-flash");
//! let links = analyzer.discover_site_links("example.com").await?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AnalysisError, AnalysisResult};
use crate::security::SecretString;
use crate::traits::Analyzer;
use crate::types::{DiscoveredLink, WebAnalysis};
use crate::urls::{dedup_links, is_on_host, title_from_url};

/// Character budget for content sent to the model.
const MAX_CONTENT_CHARS: usize = 12_000;

/// Gemini-based analyzer.
pub struct GeminiAnalyzer {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    max_links: usize,
}

impl GeminiAnalyzer {
    /// Create a new analyzer with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::new(api_key),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            max_links: 25,
        }
    }

    /// Create from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> AnalysisResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AnalysisError::Config("GEMINI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set the model (default: gemini-2.0-flash).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for proxies and tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the cap on links returned by discovery/curation calls.
    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.max_links = max_links;
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// One `generateContent` call.
    ///
    /// Returns the first candidate's text plus any grounding citation
    /// links the response carried.
    async fn generate(
        &self,
        prompt: &str,
        request_json: bool,
        with_search: bool,
    ) -> AnalysisResult<(String, Vec<DiscoveredLink>)> {
        let generation_config = if request_json {
            Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
            })
        } else {
            None
        };

        let tools = if with_search {
            Some(vec![Tool {
                google_search: serde_json::Map::new(),
            }])
        } else {
            None
        };

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
            tools,
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Request(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Malformed(format!(
                "Gemini API error {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Request(Box::new(e)))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::Malformed("no candidates in response".into()))?;

        let text = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        let citations = candidate
            .grounding_metadata
            .map(|meta| {
                meta.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .map(|web| {
                        let title = if web.title.is_empty() {
                            title_from_url(&web.uri)
                        } else {
                            web.title
                        };
                        DiscoveredLink::new(web.uri, title)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok((text, citations))
    }

    /// Parse JSON out of a model response, tolerating markdown fences.
    fn parse_json<T: serde::de::DeserializeOwned>(response: &str) -> AnalysisResult<T> {
        serde_json::from_str(response)
            .or_else(|_| {
                let stripped = response
                    .trim()
                    .trim_start_matches("```json")
                    .trim_start_matches("```")
                    .trim_end_matches("```")
                    .trim();
                serde_json::from_str(stripped)
            })
            .map_err(|e| AnalysisError::Malformed(format!("unparseable model JSON: {e}")))
    }

    /// Truncate content to the model's character budget.
    fn truncate(text: &str) -> &str {
        match text.char_indices().nth(MAX_CONTENT_CHARS) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze_web_content(
        &self,
        text: &str,
        instruction: &str,
        url: &str,
    ) -> AnalysisResult<WebAnalysis> {
        let prompt = format!(
            r#"You are a knowledge-library assistant. Analyze scraped web content and produce metadata.

Output JSON with this structure:
{{
  "title": "concise display title for the page",
  "transcription": "cleaned readable text of the content",
  "summary": "2-3 sentence summary",
  "keywords": ["search", "keywords"],
  "scraped_data": {{ "optional": "structured data you extracted, or null" }}
}}

Be factual. Only include what the content states.

Source URL: {url}
User instruction: {instruction}

Content:
{content}"#,
            url = url,
            instruction = if instruction.is_empty() { "none" } else { instruction },
            content = Self::truncate(text),
        );

        let (response, _) = self.generate(&prompt, true, false).await?;
        Self::parse_json(&response)
    }

    async fn analyze_external_url(
        &self,
        url: &str,
        instruction: &str,
    ) -> AnalysisResult<WebAnalysis> {
        let prompt = format!(
            r#"Describe the content at this URL for a personal knowledge library. Use what the URL itself and your knowledge of the platform imply; do not invent specifics.

Output JSON:
{{
  "title": "display title",
  "transcription": "best-effort description of the linked content",
  "summary": "2-3 sentence summary",
  "keywords": ["keywords"]
}}

URL: {url}
User instruction: {instruction}"#,
            url = url,
            instruction = if instruction.is_empty() { "none" } else { instruction },
        );

        let (response, _) = self.generate(&prompt, true, false).await?;
        Self::parse_json(&response)
    }

    async fn discover_site_links(&self, domain: &str) -> AnalysisResult<Vec<DiscoveredLink>> {
        let prompt = format!(
            r#"Find up to {max} deep content pages on the website {domain}.
Search for: site:{domain}, "{domain} articles", "{domain} index", "{domain} documentation".

Return ONLY a JSON array of objects: [{{"url": "https://{domain}/...", "title": "Page title"}}]
Include only pages hosted on {domain}. Prefer articles, docs, and guides over navigation pages."#,
            max = self.max_links,
            domain = domain,
        );

        // JSON response mode cannot be combined with the search tool, so
        // this call relies on fence-tolerant parsing instead.
        let (response, citations) = self.generate(&prompt, false, true).await?;

        let mut links: Vec<DiscoveredLink> =
            Self::parse_json(&response).unwrap_or_else(|_| {
                debug!(domain = %domain, "model output unparseable, using citations only");
                Vec::new()
            });

        // Cross-reference raw grounding citations; the model's prose can
        // omit URLs the search actually surfaced.
        links.extend(citations);

        let mut links: Vec<DiscoveredLink> = dedup_links(links)
            .into_iter()
            .filter(|l| is_on_host(&l.url, domain))
            .collect();
        links.truncate(self.max_links);

        debug!(domain = %domain, links = links.len(), "search-grounded discovery returned");
        Ok(links)
    }

    async fn predict_common_links(&self, domain: &str) -> AnalysisResult<Vec<DiscoveredLink>> {
        let prompt = format!(
            r#"Without any web access, predict likely content paths for the website {domain} from naming conventions alone (such as /blog, /docs, /about, /articles, /news).

Return ONLY a JSON array: [{{"url": "https://{domain}/blog", "title": "Blog"}}]
At most 10 entries. These are guesses; prefer broadly common paths."#,
            domain = domain,
        );

        let (response, _) = self.generate(&prompt, true, false).await?;
        let links: Vec<DiscoveredLink> = Self::parse_json(&response)?;
        Ok(dedup_links(links))
    }

    async fn filter_and_title_links(
        &self,
        urls: &[String],
        domain: &str,
    ) -> AnalysisResult<Vec<DiscoveredLink>> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let url_list = urls.join("\n");
        let prompt = format!(
            r#"These URLs were collected from {domain}. Keep only real content pages: discard external domains, social widgets, login/signup/legal pages, and fragment anchors. Give each kept page a human-readable title.

Return ONLY a JSON array of at most {max} objects: [{{"url": "...", "title": "..."}}]

URLs:
{url_list}"#,
            domain = domain,
            max = self.max_links,
            url_list = url_list,
        );

        let (response, _) = self.generate(&prompt, true, false).await?;
        let links: Vec<DiscoveredLink> = Self::parse_json(&response)?;

        if links.is_empty() {
            warn!(domain = %domain, input = urls.len(), "curation kept no links");
        }
        Ok(dedup_links(links))
    }
}

// Request/Response types for the generateContent API.

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Serialize)]
struct Tool {
    google_search: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Deserialize)]
struct WebChunk {
    uri: String,
    #[serde(default)]
    title: String,
}

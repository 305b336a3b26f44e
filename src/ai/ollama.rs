use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::ai::analyzer::{AiFailure, ElementAnalyzer};
use crate::page::page_model::{Category, PageDescription, Suggestion, SuggestionOptions};

const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
const DEFAULT_MODEL: &str = "qwen2.5:1.5b";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Ollama-backed element analyzer. Sends the page description as a
/// structured prompt, expects strict JSON back, and classifies every
/// upstream problem into an `AiFailure` kind. Raw upstream bodies never
/// leave this adapter.
pub struct OllamaAnalyzer {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for OllamaAnalyzer {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

/// One candidate element as returned by the model.
#[derive(Deserialize)]
struct CandidateElement {
    xpath: String,
    category: String,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    reason: Option<String>,
}

/// Some models wrap the array in an object; accept both shapes.
#[derive(Deserialize)]
struct CandidateList {
    suggestions: Vec<CandidateElement>,
}

impl OllamaAnalyzer {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_prompt(page: &PageDescription, options: &SuggestionOptions) -> String {
        let categories = options
            .include_categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("|");

        let elements_summary = page
            .elements
            .iter()
            .enumerate()
            .map(|(i, el)| {
                let mut attrs: Vec<String> = el
                    .attributes
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                attrs.sort();

                format!(
                    "  {}. tag={} xpath={} attrs=[{}] text={}",
                    i,
                    el.tag,
                    el.xpath,
                    attrs.join(", "),
                    el.label_text().as_deref().unwrap_or("(none)")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are analyzing a web page for test automation. Identify the elements
most useful to automate (login fields, navigation links, action buttons, form
fields) and score each one.

PAGE:
- URL: {url}
- Title: {title}
- Elements:
{elements}

Return ONLY a valid JSON array, one entry per interesting element:
[
  {{
    "xpath": "the element's xpath exactly as listed above",
    "category": "{categories}",
    "confidence": 0.0,
    "reason": "one short sentence"
  }}
]

Only use xpaths from the list. Respond with ONLY valid JSON, no explanation."#,
            url = page.url,
            title = page.title,
            elements = elements_summary,
            categories = categories,
        )
    }

    fn parse_candidates(raw: &str) -> Result<Vec<Suggestion>, AiFailure> {
        let candidates = serde_json::from_str::<Vec<CandidateElement>>(raw)
            .or_else(|_| {
                serde_json::from_str::<CandidateList>(raw).map(|list| list.suggestions)
            })
            .map_err(|_| AiFailure::Upstream("model response was not valid JSON".to_string()))?;

        let suggestions = candidates
            .into_iter()
            .filter_map(|c| {
                // Unknown category → skip the candidate, keep the rest
                let category = Category::parse(&c.category)?;
                Some(Suggestion {
                    element_ref: c.xpath,
                    category,
                    confidence: c.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
                    rationale: c.reason,
                })
            })
            .collect();

        Ok(suggestions)
    }
}

impl ElementAnalyzer for OllamaAnalyzer {
    fn analyze(
        &self,
        page: &PageDescription,
        options: &SuggestionOptions,
    ) -> Result<Vec<Suggestion>, AiFailure> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: Self::build_prompt(page, options),
            stream: false,
            format: "json",
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|_| AiFailure::Upstream("http client init failed".to_string()))?;

        let mut call = client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = match call.send() {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                return Err(AiFailure::Timeout {
                    budget_ms: self.timeout.as_millis() as u64,
                });
            }
            Err(_) => return Err(AiFailure::Upstream("model endpoint unreachable".to_string())),
        };

        let status = response.status().as_u16();
        match status {
            401 | 403 => Err(AiFailure::Authentication(
                "model endpoint rejected credentials".to_string(),
            )),
            429 => Err(AiFailure::RateLimited {
                retry_after_secs: retry_after_hint(response.headers()),
            }),
            s if s >= 400 => Err(AiFailure::Upstream(format!(
                "model endpoint returned status {}",
                s
            ))),
            _ => {
                let body: OllamaResponse = response
                    .json()
                    .map_err(|_| AiFailure::Upstream("model returned a non-JSON body".to_string()))?;
                Self::parse_candidates(&body.response)
            }
        }
    }

    fn model_name(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

fn retry_after_hint(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::page::page_model::AnalysisMethod;

/// Epoch milliseconds; used for trace events and response timestamps.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Stable fingerprint of a page url, so trace lines correlate without
/// writing full urls into the log.
pub fn page_fingerprint(url: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// One request-lifecycle event, serialized as a JSONL line.
#[derive(Debug, Serialize)]
pub struct RequestTrace {
    pub timestamp_ms: u64,
    pub stage: String,

    pub page: Option<String>,

    pub method: Option<String>,
    pub suggestions: Option<usize>,

    pub detail: Option<String>,
}

impl RequestTrace {
    pub fn stage(stage: impl ToString) -> Self {
        Self {
            timestamp_ms: now_ms(),
            stage: stage.to_string(),
            page: None,
            method: None,
            suggestions: None,
            detail: None,
        }
    }

    pub fn for_page(mut self, url: &str) -> Self {
        self.page = Some(page_fingerprint(url));
        self
    }

    pub fn with_method(mut self, method: AnalysisMethod) -> Self {
        self.method = Some(method.as_str().to_string());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.suggestions = Some(count);
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

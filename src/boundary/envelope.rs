use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::boundary::error::SuggestError;
use crate::page::page_model::{AnalysisResult, PageDescription, SuggestionOptions};
use crate::page::validator::StructureValidation;
use crate::trace::trace::now_ms;

/// Fallback retry hint when the upstream throttle sent none.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Deployment mode. Production responses carry generic detail strings only;
/// development responses include the internal message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// A shaped response: status code plus JSON body, ready for whatever
/// transport fronts the service.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub status: u16,
    pub body: serde_json::Value,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub fn success(
    result: &AnalysisResult,
    page: &PageDescription,
    options: &SuggestionOptions,
) -> Envelope {
    Envelope {
        status: 200,
        body: json!({
            "success": true,
            "suggestions": result.suggestions,
            "metadata": {
                "pageTitle": page.title,
                "pageUrl": page.url,
                "analysisTimestamp": now_ms(),
                "totalSuggestions": result.suggestions.len(),
                "method": result.method,
                "model": result.model,
                "confidenceThreshold": options.confidence_threshold,
                "processingTimeMs": result.processing_time_ms,
            },
        }),
    }
}

pub fn failure(err: &SuggestError, environment: Environment) -> Envelope {
    let mut body = json!({
        "success": false,
        "error": err.message(),
        "code": err.code(),
        "timestamp": now_ms(),
    });

    match err {
        // Validation issues are caller-fixable; always included
        SuggestError::Validation(issues) => {
            body["details"] = json!(issues);
        }
        SuggestError::RateLimited { retry_after_secs } => {
            body["retryAfter"] = json!(retry_after_secs.unwrap_or(DEFAULT_RETRY_AFTER_SECS));
        }
        _ => {}
    }

    if !environment.is_production() && !matches!(err, SuggestError::Validation(_)) {
        body["details"] = json!(err.to_string());
    }

    Envelope {
        status: err.status(),
        body,
    }
}

pub fn structure_report(validation: &StructureValidation) -> Envelope {
    Envelope {
        status: 200,
        body: json!({
            "success": true,
            "validation": validation,
            "timestamp": now_ms(),
        }),
    }
}

pub fn not_found(path: &str, available_endpoints: &[&str]) -> Envelope {
    Envelope {
        status: 404,
        body: json!({
            "success": false,
            "error": format!("unknown endpoint '{}'", path),
            "availableEndpoints": available_endpoints,
            "timestamp": now_ms(),
        }),
    }
}

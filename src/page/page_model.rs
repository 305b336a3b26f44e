use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Serialized snapshot of a page's DOM, as submitted by the extension.
/// Field names follow the extension's JSON payload (camelCase).
#[derive(Debug, Clone, Deserialize)]
pub struct PageDescription {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub elements: Vec<ElementDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementDescriptor {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub xpath: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "ariaLabel", default)]
    pub aria_label: Option<String>,
}

impl ElementDescriptor {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_str())
    }

    /// Visible text for the element: inner text, then aria-label, then the
    /// `value` attribute (covers `<input type="submit" value="...">`).
    pub fn label_text(&self) -> Option<String> {
        self.text
            .clone()
            .or_else(|| self.aria_label.clone())
            .or_else(|| self.attr("value").map(|v| v.to_string()))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Authentication,
    Navigation,
    Form,
    Action,
    General,
}

impl Category {
    pub fn all() -> Vec<Category> {
        vec![
            Category::Authentication,
            Category::Navigation,
            Category::Form,
            Category::Action,
            Category::General,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Authentication => "authentication",
            Category::Navigation => "navigation",
            Category::Form => "form",
            Category::Action => "action",
            Category::General => "general",
        }
    }

    /// Lenient parse for model output ("Navigation", " navigation " etc.).
    pub fn parse(raw: &str) -> Option<Category> {
        match raw.trim().to_lowercase().as_str() {
            "authentication" => Some(Category::Authentication),
            "navigation" => Some(Category::Navigation),
            "form" => Some(Category::Form),
            "action" => Some(Category::Action),
            "general" => Some(Category::General),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request knobs. Every field has a serde default so the extension can
/// send a partial (or absent) options object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionOptions {
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    #[serde(default = "default_categories")]
    pub include_categories: Vec<Category>,

    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    #[serde(default = "default_true")]
    pub use_heuristic_fallback: bool,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            include_categories: default_categories(),
            confidence_threshold: default_confidence_threshold(),
            use_heuristic_fallback: true,
        }
    }
}

// Serde default helpers
fn default_max_suggestions() -> usize { 50 }
fn default_categories() -> Vec<Category> { Category::all() }
fn default_confidence_threshold() -> f32 { 0.6 }
fn default_true() -> bool { true }

/// A scored element/category pairing proposed as relevant for automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub element_ref: String,
    pub category: Category,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMethod {
    Ai,
    Heuristic,
}

impl AnalysisMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMethod::Ai => "ai",
            AnalysisMethod::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analysis outcome, built fresh per request and handed to the
/// request boundary for shaping.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub suggestions: Vec<Suggestion>,
    pub method: AnalysisMethod,
    pub model: Option<String>,
    pub processing_time_ms: u64,
}

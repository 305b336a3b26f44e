use std::fmt;
use std::thread;
use std::time::Duration;

use crate::heuristic::classifier::classify;
use crate::page::page_model::{PageDescription, Suggestion, SuggestionOptions};

/// How an AI analysis attempt failed. Every upstream problem is classified
/// into one of these four kinds so the pipeline and the request boundary can
/// react uniformly regardless of provider.
#[derive(Debug, Clone, PartialEq)]
pub enum AiFailure {
    /// Credentials missing or rejected by the model endpoint.
    Authentication(String),

    /// Provider throttled the call; carries its reset hint when one was sent.
    RateLimited { retry_after_secs: Option<u64> },

    /// The adapter's own per-call budget elapsed.
    Timeout { budget_ms: u64 },

    /// Anything else: transport errors, 5xx, unparseable output.
    Upstream(String),
}

impl fmt::Display for AiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiFailure::Authentication(msg) => {
                write!(f, "model authentication failed: {}", msg)
            }
            AiFailure::RateLimited { retry_after_secs } => match retry_after_secs {
                Some(secs) => write!(f, "model rate limited (retry in ~{}s)", secs),
                None => write!(f, "model rate limited"),
            },
            AiFailure::Timeout { budget_ms } => {
                write!(f, "model call exceeded {}ms budget", budget_ms)
            }
            AiFailure::Upstream(msg) => write!(f, "model call failed: {}", msg),
        }
    }
}

/// An external capability that proposes element suggestions. May fail; never
/// retries. Degradation policy lives in the pipeline, not here.
pub trait ElementAnalyzer: Send + Sync {
    fn analyze(
        &self,
        page: &PageDescription,
        options: &SuggestionOptions,
    ) -> Result<Vec<Suggestion>, AiFailure>;

    fn model_name(&self) -> Option<String> {
        None
    }
}

// ============================================================================
// Mock analyzer (tests and offline runs)
// ============================================================================

enum MockBehavior {
    Canned(Result<Vec<Suggestion>, AiFailure>),
    /// Mirror the heuristic rules, reported as an AI result.
    EchoRules,
}

pub struct MockAnalyzer {
    behavior: MockBehavior,
    delay: Option<Duration>,
    model: String,
}

impl MockAnalyzer {
    pub fn returning(suggestions: Vec<Suggestion>) -> Self {
        Self {
            behavior: MockBehavior::Canned(Ok(suggestions)),
            delay: None,
            model: "mock".to_string(),
        }
    }

    pub fn failing(failure: AiFailure) -> Self {
        Self {
            behavior: MockBehavior::Canned(Err(failure)),
            delay: None,
            model: "mock".to_string(),
        }
    }

    pub fn echo_rules() -> Self {
        Self {
            behavior: MockBehavior::EchoRules,
            delay: None,
            model: "mock".to_string(),
        }
    }

    /// Sleep before answering; used to exercise the request boundary.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl ElementAnalyzer for MockAnalyzer {
    fn analyze(
        &self,
        page: &PageDescription,
        _options: &SuggestionOptions,
    ) -> Result<Vec<Suggestion>, AiFailure> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        match &self.behavior {
            MockBehavior::Canned(outcome) => outcome.clone(),
            MockBehavior::EchoRules => Ok(classify(&page.elements)),
        }
    }

    fn model_name(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::boundary::admission::AdmissionController;
use crate::boundary::boundary::RequestBoundary;
use crate::boundary::envelope::{self, Envelope, Environment};
use crate::boundary::error::SuggestError;
use crate::page::page_model::{PageDescription, SuggestionOptions};
use crate::page::validator;
use crate::pipeline::pipeline::SuggestionPipeline;
use crate::trace::{logger::TraceLogger, trace::now_ms, trace::RequestTrace};

/// Operations the service answers; echoed in 404 responses.
pub const ENDPOINTS: &[&str] = &[
    "/suggest-elements",
    "/validate-structure",
    "/models",
    "/health",
];

/// Body of `POST /suggest-elements`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub dom_data: PageDescription,
    #[serde(default)]
    pub options: Option<SuggestionOptions>,
}

/// Body of `POST /validate-structure`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub dom_data: PageDescription,
}

/// Request-level facade over admission control, the request boundary, and
/// the suggestion pipeline. The HTTP framework in front of it only routes
/// and serializes; every decision is made here or below.
pub struct ElementSuggestService {
    pipeline: Arc<SuggestionPipeline>,
    boundary: RequestBoundary,
    admission: AdmissionController,
    environment: Environment,
    tracer: Arc<TraceLogger>,
}

impl ElementSuggestService {
    pub fn new(
        pipeline: SuggestionPipeline,
        boundary: RequestBoundary,
        admission: AdmissionController,
        environment: Environment,
        tracer: TraceLogger,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            boundary,
            admission,
            environment,
            tracer: Arc::new(tracer),
        }
    }

    pub fn suggest_elements(&self, request: SuggestRequest) -> Envelope {
        if let Err(retry_after) = self.admission.admit() {
            self.tracer.log(
                &RequestTrace::stage("admission_rejected")
                    .with_detail(format!("retry in {}s", retry_after)),
            );
            let err = SuggestError::RateLimited {
                retry_after_secs: Some(retry_after),
            };
            return envelope::failure(&err, self.environment);
        }

        let page = request.dom_data;
        let options = request.options.unwrap_or_default();

        // The worker owns its copies; the originals shape the envelope
        let pipeline = self.pipeline.clone();
        let tracer = self.tracer.clone();
        let job_page = page.clone();
        let job_options = options.clone();

        let outcome = self.boundary.execute(
            move || pipeline.run(&job_page, &job_options, &tracer),
            self.tracer.clone(),
        );

        match outcome {
            Ok(result) => envelope::success(&result, &page, &options),
            Err(err) => envelope::failure(&err, self.environment),
        }
    }

    pub fn validate_structure(&self, request: ValidateRequest) -> Envelope {
        self.tracer
            .log(&RequestTrace::stage("structure_validation").for_page(&request.dom_data.url));
        envelope::structure_report(&validator::validate_structure(&request.dom_data))
    }

    /// Static descriptor of the primary (AI) and fallback (heuristic)
    /// capabilities.
    pub fn models(&self) -> Envelope {
        Envelope {
            status: 200,
            body: json!({
                "success": true,
                "models": {
                    "primary": {
                        "name": self.pipeline.analyzer_model(),
                        "type": "ai",
                        "available": self.pipeline.ai_enabled(),
                    },
                    "fallback": {
                        "name": "heuristic-rules",
                        "type": "heuristic",
                        "available": true,
                    },
                },
                "timestamp": now_ms(),
            }),
        }
    }

    pub fn health(&self) -> Envelope {
        Envelope {
            status: 200,
            body: json!({
                "success": true,
                "status": "ok",
                "service": "element-suggest",
                "version": env!("CARGO_PKG_VERSION"),
                "environment": self.environment.as_str(),
                "timestamp": now_ms(),
            }),
        }
    }

    pub fn not_found(&self, path: &str) -> Envelope {
        envelope::not_found(path, ENDPOINTS)
    }
}

//! Request-scoped element suggestion engine for web automation.
//!
//! A browser-extension client submits a serialized page description; the
//! pipeline validates it, asks an AI backend for interesting elements
//! (login fields, navigation links, action buttons), falls back to the
//! always-available heuristic rules when the backend fails, filters by
//! category and confidence, and shapes the result behind a hard wall-clock
//! request boundary. Transport (routing, CORS, headers) is left to whatever
//! HTTP layer fronts [`service::api::ElementSuggestService`].

use crate::boundary::error::SuggestError;
use crate::page::page_model::{AnalysisResult, PageDescription, SuggestionOptions};
use crate::pipeline::pipeline::SuggestionPipeline;
use crate::trace::logger::TraceLogger;

pub mod ai;
pub mod boundary;
pub mod cli;
pub mod heuristic;
pub mod page;
pub mod pipeline;
pub mod service;
pub mod trace;

/// Classify a page with the heuristic rules only: no AI call, no trace
/// file. Handy for library callers and offline tooling.
pub fn suggest_heuristic(
    page: &PageDescription,
    options: &SuggestionOptions,
) -> Result<AnalysisResult, SuggestError> {
    SuggestionPipeline::heuristic_only().run(page, options, &TraceLogger::disabled())
}

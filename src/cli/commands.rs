use std::fs;
use std::time::Duration;

use crate::ai::analyzer::{ElementAnalyzer, MockAnalyzer};
use crate::ai::ollama::OllamaAnalyzer;
use crate::boundary::admission::AdmissionController;
use crate::boundary::boundary::RequestBoundary;
use crate::boundary::envelope::Envelope;
use crate::cli::config::AppConfig;
use crate::page::page_model::PageDescription;
use crate::pipeline::pipeline::SuggestionPipeline;
use crate::service::api::{ElementSuggestService, SuggestRequest, ValidateRequest};
use crate::trace::logger::TraceLogger;

// ============================================================================
// Service construction
// ============================================================================

/// Resolve the analyzer backend by name. `none` (and a disabled AI config)
/// yields the heuristic-only pipeline.
fn build_analyzer(
    name: &str,
    config: &AppConfig,
    endpoint: Option<&str>,
    model: Option<&str>,
) -> Result<Option<Box<dyn ElementAnalyzer>>, Box<dyn std::error::Error>> {
    if !config.ai.enabled || name == "none" {
        return Ok(None);
    }

    match name {
        "mock" => Ok(Some(Box::new(MockAnalyzer::echo_rules()))),
        "ollama" => {
            let defaults = OllamaAnalyzer::default();
            let endpoint = endpoint.unwrap_or(&defaults.endpoint);
            let model = model.unwrap_or(&defaults.model);

            let api_key = config
                .ai
                .api_key_env
                .as_deref()
                .and_then(|var| std::env::var(var).ok());

            Ok(Some(Box::new(
                OllamaAnalyzer::new(endpoint, model)
                    .with_api_key(api_key)
                    .with_timeout(Duration::from_millis(config.ai.timeout_ms)),
            )))
        }
        other => Err(format!("unknown analyzer '{}' (expected ollama, mock, or none)", other).into()),
    }
}

pub fn build_service(
    config: &AppConfig,
    endpoint: Option<&str>,
    model: Option<&str>,
    analyzer_name: &str,
) -> Result<ElementSuggestService, Box<dyn std::error::Error>> {
    let pipeline = match build_analyzer(analyzer_name, config, endpoint, model)? {
        Some(analyzer) => SuggestionPipeline::with_analyzer(analyzer),
        None => SuggestionPipeline::heuristic_only(),
    };

    Ok(ElementSuggestService::new(
        pipeline,
        RequestBoundary::new(Duration::from_millis(config.service.request_budget_ms)),
        AdmissionController::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
        ),
        config.service.environment,
        TraceLogger::new(&config.service.trace_file),
    ))
}

// ============================================================================
// suggest subcommand
// ============================================================================

/// Run one page description through the full request path. Returns whether
/// the response was a success.
pub fn cmd_suggest(
    input: &str,
    options_path: Option<&str>,
    analyzer_name: &str,
    config: &AppConfig,
    endpoint: Option<&str>,
    model: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let page: PageDescription = serde_json::from_str(&fs::read_to_string(input)?)?;

    let options = match options_path {
        Some(path) => Some(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => None,
    };

    if verbose > 0 {
        eprintln!(
            "Analyzing {} elements from {} (analyzer: {})...",
            page.elements.len(),
            input,
            analyzer_name
        );
    }

    let service = build_service(config, endpoint, model, analyzer_name)?;
    let envelope = service.suggest_elements(SuggestRequest {
        dom_data: page,
        options,
    });

    print_envelope(&envelope)?;
    Ok(envelope.is_success())
}

// ============================================================================
// validate subcommand
// ============================================================================

pub fn cmd_validate(
    input: &str,
    config: &AppConfig,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let page: PageDescription = serde_json::from_str(&fs::read_to_string(input)?)?;

    if verbose > 0 {
        eprintln!("Validating structure of {} ({} elements)...", input, page.elements.len());
    }

    let service = build_service(config, None, None, "none")?;
    let envelope = service.validate_structure(ValidateRequest { dom_data: page });

    print_envelope(&envelope)?;
    Ok(envelope.is_success())
}

// ============================================================================
// models / health subcommands
// ============================================================================

pub fn cmd_models(
    config: &AppConfig,
    endpoint: Option<&str>,
    model: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = build_service(config, endpoint, model, "ollama")?;
    print_envelope(&service.models())
}

pub fn cmd_health(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service = build_service(config, None, None, "none")?;
    print_envelope(&service.health())
}

fn print_envelope(envelope: &Envelope) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&envelope.body)?);
    Ok(())
}

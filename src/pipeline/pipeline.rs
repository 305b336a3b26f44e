use std::time::Instant;

use crate::ai::analyzer::ElementAnalyzer;
use crate::boundary::error::SuggestError;
use crate::heuristic::classifier::classify;
use crate::page::page_model::{
    AnalysisMethod, AnalysisResult, PageDescription, Suggestion, SuggestionOptions,
};
use crate::page::validator::validate;
use crate::pipeline::filter::apply_filters;
use crate::trace::{logger::TraceLogger, trace::RequestTrace};

/// The suggestion orchestrator. One request flows through validation, the
/// AI-or-heuristic branch, and the filter stage; this is the only place the
/// degradation policy lives.
pub struct SuggestionPipeline {
    analyzer: Option<Box<dyn ElementAnalyzer>>,
}

impl SuggestionPipeline {
    /// Pipeline with the AI path disabled; every request classifies
    /// heuristically.
    pub fn heuristic_only() -> Self {
        Self { analyzer: None }
    }

    pub fn with_analyzer(analyzer: Box<dyn ElementAnalyzer>) -> Self {
        Self {
            analyzer: Some(analyzer),
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.analyzer.is_some()
    }

    pub fn analyzer_model(&self) -> Option<String> {
        self.analyzer.as_ref().and_then(|a| a.model_name())
    }

    pub fn run(
        &self,
        page: &PageDescription,
        options: &SuggestionOptions,
        tracer: &TraceLogger,
    ) -> Result<AnalysisResult, SuggestError> {
        let started = Instant::now();
        tracer.log(&RequestTrace::stage("validating").for_page(&page.url));

        let mut issues = validate_options(options);
        issues.extend(validate(page));
        if !issues.is_empty() {
            tracer.log(
                &RequestTrace::stage("failed")
                    .for_page(&page.url)
                    .with_detail(format!("validation ({} issues)", issues.len())),
            );
            return Err(SuggestError::Validation(issues));
        }

        let (candidates, method, model) = match self.analyze(page, options, tracer) {
            Ok(branch) => branch,
            Err(err) => {
                tracer.log(
                    &RequestTrace::stage("failed")
                        .for_page(&page.url)
                        .with_detail(err.code()),
                );
                return Err(err);
            }
        };

        tracer.log(
            &RequestTrace::stage("filtering")
                .for_page(&page.url)
                .with_count(candidates.len()),
        );
        let suggestions = apply_filters(candidates, page, options);

        let result = AnalysisResult {
            processing_time_ms: started.elapsed().as_millis() as u64,
            suggestions,
            method,
            model,
        };

        tracer.log(
            &RequestTrace::stage("done")
                .for_page(&page.url)
                .with_method(result.method)
                .with_count(result.suggestions.len()),
        );
        Ok(result)
    }

    /// The AI-vs-heuristic branch. An AI failure is swallowed and downgraded
    /// to the heuristic path when fallback is enabled; otherwise it surfaces
    /// with its original kind intact.
    fn analyze(
        &self,
        page: &PageDescription,
        options: &SuggestionOptions,
        tracer: &TraceLogger,
    ) -> Result<(Vec<Suggestion>, AnalysisMethod, Option<String>), SuggestError> {
        let analyzer = match &self.analyzer {
            Some(analyzer) => analyzer,
            None => {
                tracer.log(&RequestTrace::stage("heuristic_only").for_page(&page.url));
                return Ok((classify(&page.elements), AnalysisMethod::Heuristic, None));
            }
        };

        tracer.log(&RequestTrace::stage("ai_attempt").for_page(&page.url));
        match analyzer.analyze(page, options) {
            Ok(candidates) => Ok((candidates, AnalysisMethod::Ai, analyzer.model_name())),
            Err(failure) if options.use_heuristic_fallback => {
                tracer.log(
                    &RequestTrace::stage("heuristic_fallback")
                        .for_page(&page.url)
                        .with_detail(failure.to_string()),
                );
                Ok((classify(&page.elements), AnalysisMethod::Heuristic, None))
            }
            Err(failure) => Err(SuggestError::from_ai(failure)),
        }
    }
}

fn validate_options(options: &SuggestionOptions) -> Vec<String> {
    let mut issues = Vec::new();

    if options.max_suggestions == 0 {
        issues.push("maxSuggestions must be at least 1".to_string());
    }
    if !(0.0..=1.0).contains(&options.confidence_threshold) {
        issues.push("confidenceThreshold must be between 0 and 1".to_string());
    }
    if options.include_categories.is_empty() {
        issues.push("includeCategories must not be empty".to_string());
    }

    issues
}

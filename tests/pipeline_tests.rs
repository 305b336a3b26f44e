use element_suggest::ai::analyzer::{AiFailure, MockAnalyzer};
use element_suggest::boundary::error::SuggestError;
use element_suggest::page::page_model::{AnalysisMethod, Category, SuggestionOptions};
use element_suggest::pipeline::pipeline::SuggestionPipeline;
use element_suggest::trace::logger::TraceLogger;

use crate::common::utils::{
    element, element_with_attrs, options, options_with_threshold, page, password_page, suggestion,
};

mod common;

// =========================================================================
// Heuristic-only scenarios
// =========================================================================

/// One password input with default options must yield one authentication
/// suggestion that survives the 0.6 default threshold.
#[test]
fn password_field_is_suggested_with_defaults() {
    let result = SuggestionPipeline::heuristic_only()
        .run(&password_page(), &options(), &TraceLogger::disabled())
        .unwrap();

    assert_eq!(result.method, AnalysisMethod::Heuristic);
    assert_eq!(result.model, None);
    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].category, Category::Authentication);
    assert!(result.suggestions[0].confidence >= 0.6);
    assert_eq!(result.suggestions[0].element_ref, "/f/input[1]");
}

/// Same page, threshold 0.95: the 0.9 password suggestion is filtered out.
#[test]
fn high_threshold_filters_everything_out() {
    let result = SuggestionPipeline::heuristic_only()
        .run(&password_page(), &options_with_threshold(0.95), &TraceLogger::disabled())
        .unwrap();

    assert!(result.suggestions.is_empty(), "0.9 < 0.95 must be dropped");
}

#[test]
fn library_helper_runs_the_heuristic_pipeline() {
    let result = element_suggest::suggest_heuristic(&password_page(), &options()).unwrap();

    assert_eq!(result.method, AnalysisMethod::Heuristic);
    assert_eq!(result.suggestions.len(), 1);
}

#[test]
fn general_entries_survive_only_a_lowered_threshold() {
    let plain = page(vec![element("p", "/p1")]);

    let default_run = SuggestionPipeline::heuristic_only()
        .run(&plain, &options(), &TraceLogger::disabled())
        .unwrap();
    assert!(default_run.suggestions.is_empty(), "general 0.3 < default 0.6");

    let lowered = SuggestionPipeline::heuristic_only()
        .run(&plain, &options_with_threshold(0.2), &TraceLogger::disabled())
        .unwrap();
    assert_eq!(lowered.suggestions.len(), 1);
    assert_eq!(lowered.suggestions[0].category, Category::General);
}

// =========================================================================
// Validation stage
// =========================================================================

#[test]
fn empty_element_list_never_reaches_classification() {
    let result = SuggestionPipeline::heuristic_only().run(
        &page(vec![]),
        &options(),
        &TraceLogger::disabled(),
    );

    match result {
        Err(SuggestError::Validation(issues)) => {
            assert!(issues.iter().any(|i| i.contains("no elements provided")), "Issues: {:?}", issues);
        }
        other => panic!("Expected ValidationError, got {:?}", other.map(|r| r.method)),
    }
}

#[test]
fn duplicate_xpath_fails_validation() {
    let dup = page(vec![element("div", "/d1"), element("div", "/d1")]);

    let result = SuggestionPipeline::heuristic_only().run(&dup, &options(), &TraceLogger::disabled());
    let err = result.err().expect("duplicate xpath must fail");
    assert_eq!(err.status(), 400);
    assert!(err.to_string().contains("duplicate xpath '/d1'"));
}

#[test]
fn out_of_range_options_fail_validation() {
    let zero_max = SuggestionOptions {
        max_suggestions: 0,
        ..options()
    };
    let result = SuggestionPipeline::heuristic_only().run(
        &password_page(),
        &zero_max,
        &TraceLogger::disabled(),
    );
    assert!(matches!(result, Err(SuggestError::Validation(_))));

    let bad_threshold = SuggestionOptions {
        confidence_threshold: 1.5,
        ..options()
    };
    let result = SuggestionPipeline::heuristic_only().run(
        &password_page(),
        &bad_threshold,
        &TraceLogger::disabled(),
    );
    assert!(matches!(result, Err(SuggestError::Validation(_))));

    let no_categories = SuggestionOptions {
        include_categories: vec![],
        ..options()
    };
    let result = SuggestionPipeline::heuristic_only().run(
        &password_page(),
        &no_categories,
        &TraceLogger::disabled(),
    );
    assert!(matches!(result, Err(SuggestError::Validation(_))));
}

// =========================================================================
// AI branch: degradation and strictness
// =========================================================================

fn failures() -> Vec<AiFailure> {
    vec![
        AiFailure::Authentication("bad key".to_string()),
        AiFailure::RateLimited { retry_after_secs: Some(30) },
        AiFailure::Timeout { budget_ms: 5_000 },
        AiFailure::Upstream("boom".to_string()),
    ]
}

/// With fallback enabled, no AI failure kind may surface; the result is
/// heuristic instead.
#[test]
fn fallback_swallows_every_failure_kind() {
    for failure in failures() {
        let pipeline = SuggestionPipeline::with_analyzer(Box::new(MockAnalyzer::failing(
            failure.clone(),
        )));

        let result = pipeline
            .run(&password_page(), &options(), &TraceLogger::disabled())
            .unwrap_or_else(|e| panic!("{:?} must be swallowed, got {}", failure, e));

        assert_eq!(result.method, AnalysisMethod::Heuristic);
        assert_eq!(result.suggestions.len(), 1, "Heuristic safety net still answers");
    }
}

/// With fallback disabled, each failure kind keeps its original semantics.
#[test]
fn strict_mode_preserves_failure_kinds() {
    let strict = SuggestionOptions {
        use_heuristic_fallback: false,
        ..options()
    };

    let expected_statuses = [401, 429, 408, 500];
    for (failure, expected) in failures().into_iter().zip(expected_statuses) {
        let pipeline = SuggestionPipeline::with_analyzer(Box::new(MockAnalyzer::failing(failure)));
        let err = pipeline
            .run(&password_page(), &strict, &TraceLogger::disabled())
            .err()
            .expect("strict mode must surface the failure");
        assert_eq!(err.status(), expected);
    }
}

#[test]
fn rate_limit_hint_survives_strict_mode() {
    let strict = SuggestionOptions {
        use_heuristic_fallback: false,
        ..options()
    };
    let pipeline = SuggestionPipeline::with_analyzer(Box::new(MockAnalyzer::failing(
        AiFailure::RateLimited { retry_after_secs: Some(30) },
    )));

    match pipeline.run(&password_page(), &strict, &TraceLogger::disabled()) {
        Err(SuggestError::RateLimited { retry_after_secs }) => {
            assert_eq!(retry_after_secs, Some(30));
        }
        other => panic!("Expected RateLimited, got {:?}", other.map(|r| r.method)),
    }
}

#[test]
fn ai_success_reports_method_and_model() {
    let pipeline = SuggestionPipeline::with_analyzer(Box::new(MockAnalyzer::returning(vec![
        suggestion("/f/input[1]", Category::Authentication, 0.95),
    ])));

    let result = pipeline
        .run(&password_page(), &options(), &TraceLogger::disabled())
        .unwrap();

    assert_eq!(result.method, AnalysisMethod::Ai);
    assert_eq!(result.model.as_deref(), Some("mock"));
    assert_eq!(result.suggestions.len(), 1);
}

// =========================================================================
// Filter stage invariants
// =========================================================================

#[test]
fn unknown_refs_and_duplicates_are_dropped() {
    let pipeline = SuggestionPipeline::with_analyzer(Box::new(MockAnalyzer::returning(vec![
        suggestion("/f/input[1]", Category::Authentication, 0.9),
        suggestion("/nowhere", Category::Action, 0.99), // hallucinated xpath
        suggestion("/f/input[1]", Category::Form, 0.7), // duplicate ref
    ])));

    let result = pipeline
        .run(&password_page(), &options(), &TraceLogger::disabled())
        .unwrap();

    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].category, Category::Authentication);
}

#[test]
fn include_categories_restricts_output() {
    let elements = vec![
        element_with_attrs("input", "/i1", &[("type", "password")]),
        element_with_attrs("a", "/a1", &[("href", "/home")]),
    ];
    let nav_only = SuggestionOptions {
        include_categories: vec![Category::Navigation],
        ..options()
    };

    let result = SuggestionPipeline::heuristic_only()
        .run(&page(elements), &nav_only, &TraceLogger::disabled())
        .unwrap();

    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].category, Category::Navigation);
}

#[test]
fn output_is_capped_at_max_suggestions() {
    let elements: Vec<_> = (0..5)
        .map(|i| element_with_attrs("a", &format!("/a[{}]", i), &[("href", "/x")]))
        .collect();
    let capped = SuggestionOptions {
        max_suggestions: 2,
        ..options()
    };

    let result = SuggestionPipeline::heuristic_only()
        .run(&page(elements), &capped, &TraceLogger::disabled())
        .unwrap();

    assert_eq!(result.suggestions.len(), 2);
}

#[test]
fn results_sorted_by_confidence_with_stable_ties() {
    // nav link (0.75) first in the page, then password (0.9), then a form
    // container (also 0.75)
    let elements = vec![
        element_with_attrs("a", "/a1", &[("href", "/home")]),
        element_with_attrs("input", "/i1", &[("type", "password")]),
        element("form", "/f1"),
    ];

    let result = SuggestionPipeline::heuristic_only()
        .run(&page(elements), &options(), &TraceLogger::disabled())
        .unwrap();

    let refs: Vec<&str> = result.suggestions.iter().map(|s| s.element_ref.as_str()).collect();
    assert_eq!(
        refs,
        vec!["/i1", "/a1", "/f1"],
        "Descending confidence; the 0.75 tie keeps original element order"
    );
}

/// Every entry of every result satisfies the filter contract.
#[test]
fn filter_invariants_hold_for_arbitrary_configurations() {
    let elements = vec![
        element_with_attrs("input", "/i1", &[("type", "password")]),
        element_with_attrs("a", "/a1", &[("href", "/home")]),
        element("form", "/f1"),
        element("button", "/b1"),
        element("p", "/p1"),
    ];
    let configs = vec![
        options(),
        options_with_threshold(0.0),
        options_with_threshold(0.8),
        SuggestionOptions {
            max_suggestions: 1,
            ..options()
        },
        SuggestionOptions {
            include_categories: vec![Category::Action, Category::Form],
            confidence_threshold: 0.5,
            ..options()
        },
    ];

    for opts in configs {
        let result = SuggestionPipeline::heuristic_only()
            .run(&page(elements.clone()), &opts, &TraceLogger::disabled())
            .unwrap();

        assert!(result.suggestions.len() <= opts.max_suggestions);
        for s in &result.suggestions {
            assert!(opts.include_categories.contains(&s.category));
            assert!(s.confidence >= opts.confidence_threshold);
        }
    }
}

use std::collections::{HashMap, HashSet};

use crate::page::page_model::{PageDescription, Suggestion, SuggestionOptions};

/// Filter stage of the pipeline. Applied to both AI and heuristic output,
/// in order: reference sanitation (unknown xpaths dropped, duplicates keep
/// their first candidate), category filter, confidence threshold, stable
/// sort by confidence descending (ties keep original element order), then
/// truncation to `max_suggestions`.
pub fn apply_filters(
    candidates: Vec<Suggestion>,
    page: &PageDescription,
    options: &SuggestionOptions,
) -> Vec<Suggestion> {
    let positions: HashMap<&str, usize> = page
        .elements
        .iter()
        .enumerate()
        .map(|(i, el)| (el.xpath.as_str(), i))
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<(usize, Suggestion)> = Vec::new();

    for mut suggestion in candidates {
        // The model may reference xpaths that were never in the page
        let Some(&position) = positions.get(suggestion.element_ref.as_str()) else {
            continue;
        };

        if !seen.insert(suggestion.element_ref.clone()) {
            continue;
        }

        suggestion.confidence = suggestion.confidence.clamp(0.0, 1.0);
        kept.push((position, suggestion));
    }

    // Page order first, so the stable confidence sort breaks ties
    // first-seen-first.
    kept.sort_by_key(|(position, _)| *position);

    let mut suggestions: Vec<Suggestion> = kept.into_iter().map(|(_, s)| s).collect();

    suggestions.retain(|s| options.include_categories.contains(&s.category));
    suggestions.retain(|s| s.confidence >= options.confidence_threshold);
    suggestions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    suggestions.truncate(options.max_suggestions);

    suggestions
}

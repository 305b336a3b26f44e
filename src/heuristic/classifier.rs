use crate::heuristic::rules::{GENERAL_CONFIDENCE, RULES};
use crate::page::page_model::{Category, ElementDescriptor, Suggestion};

/// Rule-based classification over the page's elements. Total and
/// deterministic: every element yields exactly one suggestion, with no I/O.
/// Elements no rule claims fall through to `general` at low confidence so
/// downstream filtering decides whether they survive.
pub fn classify(elements: &[ElementDescriptor]) -> Vec<Suggestion> {
    elements.iter().map(classify_one).collect()
}

fn classify_one(el: &ElementDescriptor) -> Suggestion {
    for rule in RULES {
        if (rule.matches)(el) {
            return Suggestion {
                element_ref: el.xpath.clone(),
                category: rule.category,
                confidence: rule.confidence,
                rationale: Some(rule.rationale.to_string()),
            };
        }
    }

    Suggestion {
        element_ref: el.xpath.clone(),
        category: Category::General,
        confidence: GENERAL_CONFIDENCE,
        rationale: None,
    }
}

use std::collections::HashMap;

use element_suggest::page::page_model::{
    Category, ElementDescriptor, PageDescription, Suggestion, SuggestionOptions,
};

pub fn element(tag: &str, xpath: &str) -> ElementDescriptor {
    ElementDescriptor {
        tag: tag.to_string(),
        xpath: xpath.to_string(),
        attributes: HashMap::new(),
        text: None,
        aria_label: None,
    }
}

pub fn element_with_attrs(tag: &str, xpath: &str, attrs: &[(&str, &str)]) -> ElementDescriptor {
    let mut el = element(tag, xpath);
    el.attributes = attrs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    el
}

pub fn element_with_text(tag: &str, xpath: &str, text: &str) -> ElementDescriptor {
    let mut el = element(tag, xpath);
    el.text = Some(text.to_string());
    el
}

pub fn page(elements: Vec<ElementDescriptor>) -> PageDescription {
    PageDescription {
        title: "Test Page".to_string(),
        url: "https://example.com/login".to_string(),
        elements,
    }
}

/// The one-password-field page from the extension's login flow.
pub fn password_page() -> PageDescription {
    page(vec![element_with_attrs(
        "input",
        "/f/input[1]",
        &[("type", "password")],
    )])
}

pub fn options() -> SuggestionOptions {
    SuggestionOptions::default()
}

pub fn options_with_threshold(threshold: f32) -> SuggestionOptions {
    SuggestionOptions {
        confidence_threshold: threshold,
        ..SuggestionOptions::default()
    }
}

pub fn suggestion(xpath: &str, category: Category, confidence: f32) -> Suggestion {
    Suggestion {
        element_ref: xpath.to_string(),
        category,
        confidence,
        rationale: None,
    }
}

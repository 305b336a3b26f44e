use std::collections::HashMap;

use serde::Serialize;

use crate::page::page_model::{ElementDescriptor, PageDescription};

/// Standalone structure-validation report (the `/validate-structure` body).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureValidation {
    pub is_valid: bool,
    pub element_count: usize,
    pub interactive_elements: usize,
    pub issues: Vec<String>,
}

/// Pure structural check of an inbound page description. Returns the list of
/// issues; an empty list means the page is valid. Element indices in issue
/// strings are zero-based, matching the order the elements arrived in.
pub fn validate(page: &PageDescription) -> Vec<String> {
    let mut issues = Vec::new();

    if page.title.trim().is_empty() {
        issues.push("missing page title".to_string());
    }
    if page.url.trim().is_empty() {
        issues.push("missing page url".to_string());
    }
    if page.elements.is_empty() {
        issues.push("no elements provided".to_string());
        return issues;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (i, el) in page.elements.iter().enumerate() {
        if el.tag.trim().is_empty() {
            issues.push(format!("missing tag on element {}", i));
        }

        if el.xpath.trim().is_empty() {
            issues.push(format!("missing xpath on element {}", i));
            continue;
        }

        match seen.get(el.xpath.as_str()).copied() {
            Some(first) => issues.push(format!(
                "duplicate xpath '{}' on element {} (first seen on element {})",
                el.xpath, i, first
            )),
            None => {
                seen.insert(el.xpath.as_str(), i);
            }
        }
    }

    issues
}

/// Structure-validation mode: same checks as `validate`, plus element counts.
/// Never invokes a classifier.
pub fn validate_structure(page: &PageDescription) -> StructureValidation {
    let issues = validate(page);

    StructureValidation {
        is_valid: issues.is_empty(),
        element_count: page.elements.len(),
        interactive_elements: page.elements.iter().filter(|el| is_interactive(el)).count(),
        issues,
    }
}

/// Interactive-role heuristic: inputs, buttons, links, and elements carrying
/// click-handler attributes or interactive ARIA roles.
pub fn is_interactive(el: &ElementDescriptor) -> bool {
    let tag = el.tag.to_ascii_lowercase();

    matches!(tag.as_str(), "input" | "button" | "select" | "textarea")
        || (tag == "a" && el.attr("href").is_some())
        || matches!(el.attr("role"), Some("button") | Some("link"))
        || matches!(el.attr("type"), Some("submit") | Some("button"))
        || el.attr("onclick").is_some()
}

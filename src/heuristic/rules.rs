use crate::page::page_model::{Category, ElementDescriptor};

/// One classification rule. Rules are evaluated in the order they appear in
/// `RULES`; the first match wins, so priority is fixed and reproducible.
pub struct Rule {
    pub name: &'static str,
    pub category: Category,
    pub confidence: f32,
    pub rationale: &'static str,
    pub matches: fn(&ElementDescriptor) -> bool,
}

/// Confidence assigned to elements no rule claims.
pub const GENERAL_CONFIDENCE: f32 = 0.3;

pub static RULES: &[Rule] = &[
    Rule {
        name: "password_input",
        category: Category::Authentication,
        confidence: 0.9,
        rationale: "password input field",
        matches: is_password_input,
    },
    Rule {
        name: "credential_input",
        category: Category::Authentication,
        confidence: 0.85,
        rationale: "credential input (username/email)",
        matches: is_credential_input,
    },
    Rule {
        name: "submit_action",
        category: Category::Action,
        confidence: 0.8,
        rationale: "submit control with action text",
        matches: is_submit_with_action_text,
    },
    Rule {
        name: "form_container",
        category: Category::Form,
        confidence: 0.75,
        rationale: "form container",
        matches: is_form_container,
    },
    Rule {
        name: "nav_link",
        category: Category::Navigation,
        confidence: 0.75,
        rationale: "link with href",
        matches: is_nav_link,
    },
    Rule {
        name: "button",
        category: Category::Action,
        confidence: 0.7,
        rationale: "button element",
        matches: is_button,
    },
    Rule {
        name: "form_field",
        category: Category::Form,
        confidence: 0.65,
        rationale: "form input field",
        matches: is_form_field,
    },
    Rule {
        name: "click_handler",
        category: Category::Action,
        confidence: 0.6,
        rationale: "element with click handler",
        matches: has_click_handler,
    },
];

const ACTION_KEYWORDS: &[&str] = &[
    "submit", "save", "sign", "login", "continue", "next", "search",
];

const CREDENTIAL_HINTS: &[&str] = &["user", "email", "login"];

fn is_password_input(el: &ElementDescriptor) -> bool {
    el.tag.eq_ignore_ascii_case("input") && el.attr("type") == Some("password")
}

fn is_credential_input(el: &ElementDescriptor) -> bool {
    if !el.tag.eq_ignore_ascii_case("input") {
        return false;
    }

    if el.attr("type") == Some("email") {
        return true;
    }

    ["name", "id", "autocomplete", "placeholder"].iter().any(|key| {
        el.attr(key)
            .map(|v| {
                let v = v.to_lowercase();
                CREDENTIAL_HINTS.iter().any(|hint| v.contains(hint))
            })
            .unwrap_or(false)
    })
}

fn is_submit_with_action_text(el: &ElementDescriptor) -> bool {
    let submit_like = matches!(el.attr("type"), Some("submit") | Some("button"))
        || el.tag.eq_ignore_ascii_case("button");

    if !submit_like {
        return false;
    }

    el.label_text()
        .map(|label| {
            let lower = label.to_lowercase();
            ACTION_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .unwrap_or(false)
}

fn is_form_container(el: &ElementDescriptor) -> bool {
    el.tag.eq_ignore_ascii_case("form")
}

fn is_nav_link(el: &ElementDescriptor) -> bool {
    el.tag.eq_ignore_ascii_case("a") && el.attr("href").is_some()
}

fn is_button(el: &ElementDescriptor) -> bool {
    el.tag.eq_ignore_ascii_case("button") || el.attr("role") == Some("button")
}

fn is_form_field(el: &ElementDescriptor) -> bool {
    matches!(
        el.tag.to_ascii_lowercase().as_str(),
        "input" | "textarea" | "select"
    )
}

fn has_click_handler(el: &ElementDescriptor) -> bool {
    el.attr("onclick").is_some() || el.attr("role") == Some("link")
}

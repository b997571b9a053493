//! Single-rule evaluation
//!
//! Each rule looks at one value and either passes or yields a message.
//! A rule with a non-empty custom message always reports that message
//! instead of its built-in one.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::{FieldValue, RuleKind, ValidationRule};

/// Built-in message for a failed required rule
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Built-in message for a failed email rule
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// Characters that satisfy the password symbol requirement
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

const PASSWORD_MIN_CHARS: usize = 8;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Evaluates one rule against a value.
///
/// `None` for the value means the field has no entry at all.
/// Returns the failure message, or `None` when the rule passes.
pub fn evaluate_rule(rule: &ValidationRule, value: Option<&FieldValue>) -> Option<String> {
    match rule.kind {
        RuleKind::Required => {
            let missing = value.map_or(true, FieldValue::is_empty);
            missing.then(|| message_or(rule, REQUIRED_MESSAGE))
        }

        // Length limits only apply to text. A missing threshold means no limit.
        RuleKind::MinLength => {
            let (text, min) = (value?.as_text()?, rule.threshold?);
            (text.chars().count() < min)
                .then(|| message_or(rule, &format!("Minimum {} characters required", min)))
        }

        RuleKind::MaxLength => {
            let (text, max) = (value?.as_text()?, rule.threshold?);
            (text.chars().count() > max)
                .then(|| message_or(rule, &format!("Maximum {} characters allowed", max)))
        }

        RuleKind::Email => {
            let text = present_text(value)?;
            (!EMAIL_REGEX.is_match(&text)).then(|| message_or(rule, EMAIL_MESSAGE))
        }

        RuleKind::Password => {
            let text = present_text(value)?;
            let unmet = unmet_password_requirements(&text);
            if unmet.is_empty() {
                return None;
            }
            Some(message_or(
                rule,
                &format!("Password must contain {}", unmet.join(", ")),
            ))
        }
    }
}

/// Lists the password requirements `password` does not meet, in a fixed order.
pub fn unmet_password_requirements(password: &str) -> Vec<&'static str> {
    let mut unmet = Vec::new();

    if password.chars().count() < PASSWORD_MIN_CHARS {
        unmet.push("at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        unmet.push("one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        unmet.push("one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        unmet.push("one number");
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        unmet.push("one symbol");
    }

    unmet
}

/// Text form of a value that has actually been entered
fn present_text(value: Option<&FieldValue>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(ToString::to_string)
}

fn message_or(rule: &ValidationRule, fallback: &str) -> String {
    if rule.message.is_empty() {
        fallback.to_string()
    } else {
        rule.message.clone()
    }
}

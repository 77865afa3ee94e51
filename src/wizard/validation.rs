// Validation engine
// Single rule evaluator over the declarative field schema. Pure and
// deterministic so every rule is table-testable on its own.

use regex::Regex;
use std::collections::BTreeMap;

use crate::models::schema::{self, ValidationRule};

/// Result of validating one wizard step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepValidation {
    /// A step is valid when no *required* field produced an error. Optional
    /// fields with failures are surfaced in `errors` but do not block.
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

/// Validate one field's value against its schema rule.
///
/// Constraints are checked in a fixed order (required, min length, pattern,
/// numeric) and only the first failure is reported. Unknown field names
/// validate clean.
pub fn validate_field(name: &str, value: &str) -> Option<String> {
    let rule = match schema::field(name) {
        Some(def) => &def.rule,
        None => return None,
    };
    evaluate_rule(rule, value)
}

fn evaluate_rule(rule: &ValidationRule, value: &str) -> Option<String> {
    let trimmed = value.trim();

    if rule.required && trimmed.is_empty() {
        return Some("This field is required".to_string());
    }

    // Remaining constraints only apply to non-empty values.
    if value.is_empty() {
        return None;
    }

    if let Some(min) = rule.min_length {
        if value.chars().count() < min {
            return Some(format!("Minimum {} characters required", min));
        }
    }

    if let Some(pattern) = rule.pattern {
        // Patterns come from the static schema table; a pattern that fails to
        // compile is treated as unconstrained rather than blocking the user.
        if let Ok(re) = Regex::new(pattern) {
            if !re.is_match(value) {
                return Some("Invalid format".to_string());
            }
        }
    }

    if rule.is_number {
        // `f64::from_str` accepts "NaN" and "inf"; the form does not.
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => {}
            _ => return Some("Must be a valid number".to_string()),
        }
    }

    None
}

/// Validate every field belonging to one step.
pub fn validate_step(step: u8, field_values: &BTreeMap<String, String>) -> StepValidation {
    let mut errors = BTreeMap::new();
    let mut is_valid = true;

    for field in schema::step_fields(step) {
        let value = field_values.get(field.name).map(String::as_str).unwrap_or("");
        if let Some(message) = evaluate_rule(&field.rule, value) {
            if field.rule.required {
                is_valid = false;
            }
            errors.insert(field.name.to_string(), message);
        }
    }

    StepValidation { is_valid, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::empty_field_values;

    #[test]
    fn validate_is_pure() {
        let first = validate_field("startupName", "");
        let second = validate_field("startupName", "");
        assert_eq!(first, second);
        assert_eq!(first, Some("This field is required".to_string()));
    }

    #[test]
    fn required_rule_rejects_whitespace_only_values() {
        assert_eq!(
            validate_field("industry", "   "),
            Some("This field is required".to_string())
        );
        assert_eq!(validate_field("industry", "FinTech"), None);
    }

    #[test]
    fn min_length_boundary_is_exact() {
        // tagline requires at least 10 characters
        let nine = "a".repeat(9);
        let ten = "a".repeat(10);
        assert_eq!(
            validate_field("tagline", &nine),
            Some("Minimum 10 characters required".to_string())
        );
        assert_eq!(validate_field("tagline", &ten), None);
    }

    #[test]
    fn required_wins_over_min_length() {
        // Empty value reports the required message, not the length message.
        assert_eq!(
            validate_field("tagline", ""),
            Some("This field is required".to_string())
        );
    }

    #[test]
    fn website_pattern_accepts_common_urls() {
        for url in ["https://example.com", "http://example.co/path", "example.io"] {
            assert_eq!(validate_field("website", url), None, "rejected '{}'", url);
        }
    }

    #[test]
    fn website_pattern_rejects_garbage_but_never_blocks_when_empty() {
        assert_eq!(
            validate_field("website", "not a url"),
            Some("Invalid format".to_string())
        );
        // Optional field: empty passes.
        assert_eq!(validate_field("website", ""), None);
    }

    #[test]
    fn numeric_rule_parses_integers_and_decimals() {
        assert_eq!(validate_field("revenue", "42"), None);
        assert_eq!(validate_field("revenue", "42.5"), None);
        assert_eq!(
            validate_field("revenue", "abc"),
            Some("Must be a valid number".to_string())
        );
    }

    #[test]
    fn numeric_rule_rejects_non_finite_values() {
        for value in ["NaN", "nan", "inf", "-inf", "infinity"] {
            assert_eq!(
                validate_field("revenue", value),
                Some("Must be a valid number".to_string()),
                "'{}' must not count as a valid number",
                value
            );
        }
    }

    #[test]
    fn unknown_fields_validate_clean() {
        assert_eq!(validate_field("noSuchField", "anything"), None);
    }

    #[test]
    fn step_is_invalid_only_for_required_field_errors() {
        let mut values = empty_field_values();
        // Fill step 1's required fields with minimally valid values...
        values.insert("startupName".into(), "Acme".into());
        values.insert("tagline".into(), "We do things".into());
        values.insert("industry".into(), "B2B SaaS".into());
        values.insert("stage".into(), "Seed".into());
        // ...and break the optional website field.
        values.insert("website".into(), "not a url".into());

        let result = validate_step(1, &values);
        assert!(result.is_valid, "optional failures must not block the step");
        assert_eq!(
            result.errors.get("website"),
            Some(&"Invalid format".to_string()),
            "optional failures are still surfaced"
        );
    }

    #[test]
    fn step_with_missing_required_numeric_field_reports_required_message() {
        let mut values = empty_field_values();
        values.insert("periodStart".into(), "2024-01-01".into());
        values.insert("periodEnd".into(), "2024-12-31".into());
        values.insert("revenue".into(), "250000".into());
        values.insert("cogs".into(), "75000".into());
        values.insert("operatingExpenses".into(), "120000".into());
        values.insert("monthlyBurnRate".into(), "40000".into());
        // cashBalance left empty

        let result = validate_step(3, &values);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors.get("cashBalance"),
            Some(&"This field is required".to_string())
        );
    }
}

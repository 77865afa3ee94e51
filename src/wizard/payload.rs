// Payload builder
// Pure transform from the flat field-value map into the nested submission
// payload expected by the analysis service. Numeric fields fall back to 0
// when unparseable; blank optional strings become null on the wire.

use chrono::Utc;
use std::collections::BTreeMap;

use crate::models::payload::{
    FinancialRawInput, Qualitative, StartupContext, SubmissionMetadata, SubmissionPayload,
    PAYLOAD_VERSION,
};

pub fn build_payload(field_values: &BTreeMap<String, String>) -> SubmissionPayload {
    SubmissionPayload {
        startup_context: StartupContext {
            name: text(field_values, "startupName"),
            description: text(field_values, "tagline"),
            industry: text(field_values, "industry"),
            stage: text(field_values, "stage"),
            website: optional_text(field_values, "website"),
            founded_date: optional_text(field_values, "foundedDate"),
        },
        financial_raw_input: FinancialRawInput {
            period_start: text(field_values, "periodStart"),
            period_end: text(field_values, "periodEnd"),
            revenue: number(field_values, "revenue"),
            cogs: number(field_values, "cogs"),
            operating_expenses: number(field_values, "operatingExpenses"),
            cash_balance: number(field_values, "cashBalance"),
            monthly_burn_rate: number(field_values, "monthlyBurnRate"),
            currency: text(field_values, "currency"),
        },
        qualitative: Qualitative {
            problem_description: text(field_values, "problemDescription"),
            target_customer_persona: text(field_values, "targetCustomerPersona"),
            current_alternatives: text(field_values, "currentAlternatives"),
            why_now: text(field_values, "whyNow"),
            product_description: text(field_values, "productDescription"),
            demo_url: optional_text(field_values, "demoUrl"),
            users_count: optional_count(field_values, "usersCount"),
            retention_metrics: optional_text(field_values, "retentionMetrics"),
            competitors: text(field_values, "competitors"),
            differentiation: text(field_values, "differentiation"),
            why_you_win: text(field_values, "whyYouWin"),
            founder_background: text(field_values, "founderBackground"),
            domain_experience: text(field_values, "domainExperience"),
            past_wins_failures: optional_text(field_values, "pastWinsFailures"),
        },
        metadata: SubmissionMetadata {
            submitted_at: Utc::now(),
            version: PAYLOAD_VERSION.to_string(),
        },
    }
}

fn raw<'a>(values: &'a BTreeMap<String, String>, name: &str) -> &'a str {
    values.get(name).map(String::as_str).unwrap_or("")
}

fn text(values: &BTreeMap<String, String>, name: &str) -> String {
    raw(values, name).trim().to_string()
}

/// Blank optional strings become None so they serialize as null.
fn optional_text(values: &BTreeMap<String, String>, name: &str) -> Option<String> {
    let trimmed = raw(values, name).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Required numeric field: parse with a fallback of 0. Non-finite parses
/// ("NaN", "inf") also fall back; serde_json would render them as null.
fn number(values: &BTreeMap<String, String>, name: &str) -> f64 {
    match raw(values, name).trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Genuinely optional count: blank or unparseable becomes None.
fn optional_count(values: &BTreeMap<String, String>, name: &str) -> Option<i64> {
    raw(values, name).trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::empty_field_values;

    fn filled() -> BTreeMap<String, String> {
        let mut values = empty_field_values();
        for (name, value) in [
            ("startupName", "Acme Technologies"),
            ("tagline", "We help X do Y with Z"),
            ("website", "https://acme.example"),
            ("industry", "B2B SaaS"),
            ("stage", "Seed"),
            ("periodStart", "2024-01-01"),
            ("periodEnd", "2024-12-31"),
            ("revenue", "250000"),
            ("cogs", "75000"),
            ("operatingExpenses", "120000"),
            ("cashBalance", "500000"),
            ("monthlyBurnRate", "40000"),
            ("usersCount", "1000"),
        ] {
            values.insert(name.to_string(), value.to_string());
        }
        values
    }

    #[test]
    fn numeric_fields_parse_with_zero_fallback() {
        let mut values = filled();
        values.insert("revenue".to_string(), "not a number".to_string());

        let payload = build_payload(&values);
        assert_eq!(payload.financial_raw_input.revenue, 0.0);
        assert_eq!(payload.financial_raw_input.cogs, 75000.0);
        assert_eq!(payload.financial_raw_input.monthly_burn_rate, 40000.0);
    }

    #[test]
    fn non_finite_numeric_input_falls_back_to_zero_on_the_wire() {
        let mut values = filled();
        values.insert("revenue".to_string(), "NaN".to_string());
        values.insert("cogs".to_string(), "inf".to_string());

        let payload = build_payload(&values);
        assert_eq!(payload.financial_raw_input.revenue, 0.0);
        assert_eq!(payload.financial_raw_input.cogs, 0.0);

        // Every financial field must serialize as an actual JSON number.
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["financial_raw_input"]["revenue"].is_number());
        assert!(json["financial_raw_input"]["cogs"].is_number());
    }

    #[test]
    fn blank_optional_strings_become_null() {
        let mut values = filled();
        values.insert("pastWinsFailures".to_string(), "".to_string());
        values.insert("foundedDate".to_string(), "  ".to_string());

        let payload = build_payload(&values);
        assert_eq!(payload.qualitative.past_wins_failures, None);
        assert_eq!(payload.startup_context.founded_date, None);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["qualitative"]["past_wins_failures"].is_null());
    }

    #[test]
    fn optional_count_is_none_when_blank_or_unparseable() {
        let mut values = filled();
        values.insert("usersCount".to_string(), "".to_string());
        assert_eq!(build_payload(&values).qualitative.users_count, None);

        values.insert("usersCount".to_string(), "lots".to_string());
        assert_eq!(build_payload(&values).qualitative.users_count, None);

        // Strict integer parse: fractional input is dropped, not truncated.
        values.insert("usersCount".to_string(), "42.5".to_string());
        assert_eq!(build_payload(&values).qualitative.users_count, None);

        values.insert("usersCount".to_string(), "1000".to_string());
        assert_eq!(build_payload(&values).qualitative.users_count, Some(1000));
    }

    #[test]
    fn strings_pass_through_trimmed() {
        let mut values = filled();
        values.insert("startupName".to_string(), "  Acme  ".to_string());

        let payload = build_payload(&values);
        assert_eq!(payload.startup_context.name, "Acme");
        assert_eq!(payload.startup_context.description, "We help X do Y with Z");
    }

    #[test]
    fn metadata_carries_the_schema_version() {
        let payload = build_payload(&filled());
        assert_eq!(payload.metadata.version, "2.0");
    }

    #[test]
    fn payload_wire_shape_has_the_four_parts() {
        let json = serde_json::to_value(build_payload(&filled())).unwrap();
        for part in [
            "startup_context",
            "financial_raw_input",
            "qualitative",
            "metadata",
        ] {
            assert!(json.get(part).is_some(), "missing '{}'", part);
        }
        assert_eq!(json["startup_context"]["name"], "Acme Technologies");
        assert_eq!(json["financial_raw_input"]["operating_expenses"], 120000.0);
    }
}

// Submission payload models
// Wire contract of the external analysis service (`POST /evaluate`). Key
// names are snake_case on the wire and must stay stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema version tag attached to every submission.
pub const PAYLOAD_VERSION: &str = "2.0";

/// The assembled submission: four nested parts built strictly from validated
/// field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub startup_context: StartupContext,
    pub financial_raw_input: FinancialRawInput,
    pub qualitative: Qualitative,
    pub metadata: SubmissionMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupContext {
    pub name: String,
    /// The tagline; the analysis service calls it `description`.
    pub description: String,
    pub industry: String,
    pub stage: String,
    pub website: Option<String>,
    pub founded_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRawInput {
    pub period_start: String,
    pub period_end: String,
    pub revenue: f64,
    pub cogs: f64,
    pub operating_expenses: f64,
    pub cash_balance: f64,
    pub monthly_burn_rate: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualitative {
    pub problem_description: String,
    pub target_customer_persona: String,
    pub current_alternatives: String,
    pub why_now: String,
    pub product_description: String,
    pub demo_url: Option<String>,
    pub users_count: Option<i64>,
    pub retention_metrics: Option<String>,
    pub competitors: String,
    pub differentiation: String,
    pub why_you_win: String,
    pub founder_background: String,
    pub domain_experience: String,
    pub past_wins_failures: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    pub submitted_at: DateTime<Utc>,
    pub version: String,
}

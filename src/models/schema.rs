// Field schema
// Declarative rule table for the intake form: one FieldDefinition per field,
// grouped into wizard steps. Field names are the camelCase wire names used by
// the draft snapshot and the extraction service, so they must stay stable.

use std::collections::BTreeMap;

/// Number of wizard steps. Step indices run 1..=TOTAL_STEPS.
pub const TOTAL_STEPS: u8 = 6;

/// Industry options offered by the intake UI (informational; membership is
/// not validated).
pub const INDUSTRIES: &[&str] = &[
    "AI / Machine Learning",
    "B2B SaaS",
    "Consumer Tech",
    "E-commerce",
    "EdTech",
    "FinTech",
    "HealthTech",
    "Climate / CleanTech",
    "Marketplace",
    "Hardware / IoT",
    "Other",
];

/// Funding stage options offered by the intake UI.
pub const STAGES: &[&str] = &[
    "Pre-seed",
    "Seed",
    "Series A",
    "Series B",
    "Series C+",
    "Pre-revenue",
    "Revenue Generating",
];

/// Supported reporting currencies. The first entry is the default.
pub const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "INR", "CAD", "AUD"];

const WEBSITE_PATTERN: &str = r"^(https?://)?[\w.-]+\.\w{2,}(/.*)?$";

/// Declarative validation rule. A rule with no constraints always passes.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub pattern: Option<&'static str>,
    pub is_number: bool,
}

impl ValidationRule {
    pub const fn optional() -> Self {
        Self {
            required: false,
            min_length: None,
            pattern: None,
            is_number: false,
        }
    }

    pub const fn required() -> Self {
        Self {
            required: true,
            ..Self::optional()
        }
    }

    pub const fn required_min(min_length: usize) -> Self {
        Self {
            min_length: Some(min_length),
            ..Self::required()
        }
    }

    pub const fn required_number() -> Self {
        Self {
            is_number: true,
            ..Self::required()
        }
    }

    pub const fn optional_pattern(pattern: &'static str) -> Self {
        Self {
            pattern: Some(pattern),
            ..Self::optional()
        }
    }
}

/// One intake field: wire name, owning step, validation rule.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub step: u8,
    pub rule: ValidationRule,
}

const fn def(name: &'static str, step: u8, rule: ValidationRule) -> FieldDefinition {
    FieldDefinition { name, step, rule }
}

/// The complete intake schema. Immutable, defined once, global.
pub static FIELD_SCHEMA: &[FieldDefinition] = &[
    // Step 1: Startup Identity
    def("startupName", 1, ValidationRule::required_min(2)),
    def("tagline", 1, ValidationRule::required_min(10)),
    def("website", 1, ValidationRule::optional_pattern(WEBSITE_PATTERN)),
    def("industry", 1, ValidationRule::required()),
    def("stage", 1, ValidationRule::required()),
    def("foundedDate", 1, ValidationRule::optional()),
    // Step 2: Problem & Customer
    def("problemDescription", 2, ValidationRule::required_min(100)),
    def("targetCustomerPersona", 2, ValidationRule::required_min(50)),
    def("currentAlternatives", 2, ValidationRule::required_min(30)),
    def("whyNow", 2, ValidationRule::required_min(50)),
    // Step 3: Financials (all required; numbers feed the deterministic engine)
    def("periodStart", 3, ValidationRule::required()),
    def("periodEnd", 3, ValidationRule::required()),
    def("revenue", 3, ValidationRule::required_number()),
    def("cogs", 3, ValidationRule::required_number()),
    def("operatingExpenses", 3, ValidationRule::required_number()),
    def("cashBalance", 3, ValidationRule::required_number()),
    def("monthlyBurnRate", 3, ValidationRule::required_number()),
    def("currency", 3, ValidationRule::required()),
    // Step 4: Product & Traction
    def("productDescription", 4, ValidationRule::required_min(50)),
    def("demoUrl", 4, ValidationRule::optional()),
    def("usersCount", 4, ValidationRule::optional()),
    def("retentionMetrics", 4, ValidationRule::optional()),
    // Step 5: Market & Competition
    def("competitors", 5, ValidationRule::required_min(30)),
    def("differentiation", 5, ValidationRule::required_min(50)),
    def("whyYouWin", 5, ValidationRule::required_min(50)),
    // Step 6: Team
    def("founderBackground", 6, ValidationRule::required_min(50)),
    def("domainExperience", 6, ValidationRule::required_min(30)),
    def("pastWinsFailures", 6, ValidationRule::optional()),
];

/// Look up a field definition by wire name.
pub fn field(name: &str) -> Option<&'static FieldDefinition> {
    FIELD_SCHEMA.iter().find(|f| f.name == name)
}

/// All fields belonging to one step, in schema order.
pub fn step_fields(step: u8) -> impl Iterator<Item = &'static FieldDefinition> {
    FIELD_SCHEMA.iter().filter(move |f| f.step == step)
}

/// Human-readable step title.
pub fn step_title(step: u8) -> &'static str {
    match step {
        1 => "Startup Identity",
        2 => "Problem & Customer",
        3 => "Financials",
        4 => "Product & Traction",
        5 => "Market & Competition",
        6 => "Team",
        _ => "Unknown",
    }
}

/// The default (empty) field map: an entry for every schema field so the
/// value map is never sparse. Currency pre-selects the default currency.
pub fn empty_field_values() -> BTreeMap<String, String> {
    FIELD_SCHEMA
        .iter()
        .map(|f| {
            let value = if f.name == "currency" { CURRENCIES[0] } else { "" };
            (f.name.to_string(), value.to_string())
        })
        .collect()
}

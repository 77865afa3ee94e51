// Completion analyzer
// Pure derivation of per-step and overall completion from the current field
// values. Only required fields count toward the ratios; a field counts as
// completed once its value is non-empty (validity is the validator's job).

use std::collections::BTreeMap;

use crate::models::schema::{self, TOTAL_STEPS};

/// Confidence label for the overall completion percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLabel {
    Excellent,
    Good,
    Fair,
    Incomplete,
}

impl ConfidenceLabel {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            90..=u8::MAX => ConfidenceLabel::Excellent,
            70..=89 => ConfidenceLabel::Good,
            50..=69 => ConfidenceLabel::Fair,
            _ => ConfidenceLabel::Incomplete,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::Excellent => "Excellent",
            ConfidenceLabel::Good => "Good",
            ConfidenceLabel::Fair => "Fair",
            ConfidenceLabel::Incomplete => "Incomplete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCompletion {
    pub name: &'static str,
    pub total_required: usize,
    pub completed_required: usize,
}

/// Derived completion metrics. Never stored; recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub per_step: Vec<StepCompletion>,
    pub overall_percent: u8,
    pub label: ConfidenceLabel,
}

pub fn analyze(field_values: &BTreeMap<String, String>) -> CompletionReport {
    let per_step: Vec<StepCompletion> = (1..=TOTAL_STEPS)
        .map(|step| {
            let required = schema::step_fields(step).filter(|f| f.rule.required);
            let mut total = 0;
            let mut completed = 0;
            for field in required {
                total += 1;
                let filled = field_values
                    .get(field.name)
                    .map(|v| !v.trim().is_empty())
                    .unwrap_or(false);
                if filled {
                    completed += 1;
                }
            }
            StepCompletion {
                name: schema::step_title(step),
                total_required: total,
                completed_required: completed,
            }
        })
        .collect();

    let total: usize = per_step.iter().map(|s| s.total_required).sum();
    let completed: usize = per_step.iter().map(|s| s.completed_required).sum();

    let overall_percent = if total == 0 {
        0
    } else {
        (100.0 * completed as f64 / total as f64).round() as u8
    };

    CompletionReport {
        per_step,
        overall_percent,
        label: ConfidenceLabel::from_percent(overall_percent),
    }
}

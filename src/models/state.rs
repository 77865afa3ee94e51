// Wizard state and the persisted draft snapshot
//
// WizardState is the single in-memory source of truth for one intake session.
// Invariants:
// - step_index stays within 1..=TOTAL_STEPS
// - field_values always holds an entry for every schema field (empty string
//   means unset; the map is never sparse)
// - completed_steps is only ever added to; membership is re-checked only when
//   the user advances through the step again (soft invariant)
// - errors holds at most one message per field and is cleared for a field the
//   moment its value changes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::schema::{self, TOTAL_STEPS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step_index: u8,
    pub field_values: BTreeMap<String, String>,
    pub errors: BTreeMap<String, String>,
    pub completed_steps: BTreeSet<u8>,
}

impl WizardState {
    /// Fresh session: all fields empty, positioned at step 1.
    pub fn new() -> Self {
        Self {
            step_index: 1,
            field_values: schema::empty_field_values(),
            errors: BTreeMap::new(),
            completed_steps: BTreeSet::new(),
        }
    }

    /// Restore from a persisted draft. Unknown draft keys are dropped, fields
    /// missing from the draft stay empty, and out-of-range indices are
    /// clamped so a stale or hand-edited snapshot can never break the
    /// in-range invariants. Errors are never persisted and start empty.
    pub fn from_snapshot(snapshot: DraftSnapshot) -> Self {
        let mut field_values = schema::empty_field_values();
        for (name, value) in snapshot.form_data {
            if let Some(slot) = field_values.get_mut(&name) {
                *slot = value;
            }
        }

        Self {
            step_index: snapshot.current_step.clamp(1, TOTAL_STEPS),
            field_values,
            errors: BTreeMap::new(),
            completed_steps: snapshot
                .completed_steps
                .into_iter()
                .filter(|s| (1..=TOTAL_STEPS).contains(s))
                .collect(),
        }
    }

    /// Snapshot the persistable parts of the state.
    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> DraftSnapshot {
        DraftSnapshot {
            form_data: self.field_values.clone(),
            current_step: self.step_index,
            completed_steps: self.completed_steps.iter().copied().collect(),
            saved_at,
        }
    }

    /// Value of one field, empty string when unset.
    pub fn value(&self, name: &str) -> &str {
        self.field_values.get(name).map(String::as_str).unwrap_or("")
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

/// The persisted draft document. The wire format is stable for compatibility
/// with previously saved drafts:
/// `{ "formData": {..}, "currentStep": n, "completedSteps": [..], "savedAt": ".." }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    pub form_data: BTreeMap<String, String>,
    pub current_step: u8,
    pub completed_steps: Vec<u8>,
    pub saved_at: DateTime<Utc>,
}

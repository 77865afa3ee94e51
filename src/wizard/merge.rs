// Extraction merge
// Named overlay of an externally extracted partial field map onto existing
// wizard state. Precedence is explicit: incoming values overwrite, keys the
// extraction omitted are preserved, keys the schema does not know are
// ignored. The overlay is idempotent.

use log::debug;
use std::collections::BTreeMap;

use crate::models::schema;
use crate::models::state::WizardState;

/// Merge an extracted field map into `current`, returning the new state.
///
/// Only `field_values` changes; step index, errors, and completed steps are
/// carried over untouched (the controller resets navigation after a merge,
/// and completed steps are deliberately left stale until re-validated).
pub fn merge_extracted(
    current: &WizardState,
    extracted: &BTreeMap<String, String>,
) -> WizardState {
    let mut next = current.clone();
    for (name, value) in extracted {
        match next.field_values.get_mut(name) {
            Some(slot) => {
                *slot = value.clone();
            }
            None => {
                debug!(
                    "[PHASE: extraction] Ignoring unknown extracted field '{}'",
                    name
                );
            }
        }
    }
    next
}

/// Number of extracted keys the schema actually knows about.
pub fn known_field_count(extracted: &BTreeMap<String, String>) -> usize {
    extracted
        .keys()
        .filter(|name| schema::field(name).is_some())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn known_keys_overwrite_and_unknown_keys_are_ignored() {
        let mut state = WizardState::new();
        state.field_values.insert("tagline".into(), "old tagline".into());

        let incoming = extracted(&[("startupName", "Acme"), ("unknownField", "x")]);
        let merged = merge_extracted(&state, &incoming);

        assert_eq!(merged.value("startupName"), "Acme");
        assert!(!merged.field_values.contains_key("unknownField"));
        // Fields the extraction omitted are preserved.
        assert_eq!(merged.value("tagline"), "old tagline");
    }

    #[test]
    fn merge_is_idempotent() {
        let state = WizardState::new();
        let incoming = extracted(&[
            ("startupName", "Acme"),
            ("industry", "B2B SaaS"),
            ("bogus", "ignored"),
        ]);

        let once = merge_extracted(&state, &incoming);
        let twice = merge_extracted(&once, &incoming);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_does_not_touch_navigation_or_completed_steps() {
        let mut state = WizardState::new();
        state.step_index = 4;
        state.completed_steps.insert(1);
        state.completed_steps.insert(2);
        state.errors.insert("tagline".into(), "Minimum 10 characters required".into());

        let merged = merge_extracted(&state, &extracted(&[("startupName", "Acme")]));
        assert_eq!(merged.step_index, 4);
        assert_eq!(merged.completed_steps, state.completed_steps);
        assert_eq!(merged.errors, state.errors);
    }

    #[test]
    fn empty_extraction_is_a_no_op() {
        let state = WizardState::new();
        let merged = merge_extracted(&state, &BTreeMap::new());
        assert_eq!(merged, state);
    }

    #[test]
    fn known_field_count_filters_on_the_schema() {
        let incoming = extracted(&[("startupName", "Acme"), ("mystery", "x")]);
        assert_eq!(known_field_count(&incoming), 1);
    }
}

// Wizard controller
//
// The only stateful, side-effecting component: it owns the WizardState and
// orchestrates validation, navigation, draft persistence, extraction merges,
// and payload assembly. All mutation happens synchronously in response to
// discrete user or timer events; the async session wrapper below serializes
// those events through one mutex, so no finer-grained locking exists.

pub mod completion;
pub mod merge;
pub mod payload;
pub mod validation;

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::extraction::ExtractionClient;
use crate::api::submission::{SubmissionReceipt, SubmissionSink};
use crate::draft::DraftStore;
use crate::error::WizardError;
use crate::models::payload::SubmissionPayload;
use crate::models::schema::{self, TOTAL_STEPS};
use crate::models::state::WizardState;

pub use completion::{CompletionReport, ConfidenceLabel, StepCompletion};
pub use validation::{validate_field, validate_step, StepValidation};

pub struct WizardController {
    state: WizardState,
    store: Arc<dyn DraftStore>,
    last_saved: Option<DateTime<Utc>>,
    submitted: bool,
}

impl WizardController {
    /// Create a controller, restoring a persisted draft when one exists.
    /// A missing or unreadable draft falls back to the default empty state;
    /// initialization itself never fails.
    pub async fn initialize(store: Arc<dyn DraftStore>) -> Self {
        let state = match store.load().await {
            Ok(Some(snapshot)) => {
                info!(
                    "[PHASE: initialization] Restored draft from {} (step {})",
                    snapshot.saved_at, snapshot.current_step
                );
                WizardState::from_snapshot(snapshot)
            }
            Ok(None) => WizardState::new(),
            Err(e) => {
                warn!(
                    "[PHASE: initialization] Draft unreadable, starting fresh: {:#}",
                    e
                );
                WizardState::new()
            }
        };

        Self {
            state,
            store,
            last_saved: None,
            submitted: false,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    /// Set one field's value and optimistically clear its error. The error
    /// returns, if still warranted, when the step is next validated. No
    /// navigation or validity side effects.
    pub fn edit(&mut self, field: &str, value: impl Into<String>) {
        if self.submitted {
            warn!("[PHASE: navigation] Ignoring edit after submission");
            return;
        }
        if schema::field(field).is_none() {
            warn!("[PHASE: navigation] Ignoring edit of unknown field '{}'", field);
            return;
        }

        self.state.field_values.insert(field.to_string(), value.into());
        self.state.errors.remove(field);
    }

    /// Validate the current step and advance when it passes. Returns whether
    /// the wizard moved. The validated step joins `completed_steps`
    /// (idempotently); on failure only the error map changes.
    pub fn next(&mut self) -> bool {
        if self.submitted {
            return false;
        }

        let step = self.state.step_index;
        let result = validation::validate_step(step, &self.state.field_values);
        self.state.errors = result.errors;

        if !result.is_valid {
            info!("[PHASE: navigation] [STEP: {}] Validation blocked advance", step);
            return false;
        }

        self.state.completed_steps.insert(step);
        self.state.step_index = (step + 1).min(TOTAL_STEPS);
        true
    }

    /// Go back one step. Never validates, never blocked.
    pub fn previous(&mut self) {
        if self.submitted {
            return;
        }
        self.state.step_index = self.state.step_index.max(2) - 1;
    }

    /// Jump directly to a step. Only backward jumps and jumps to already
    /// completed steps are allowed; anything else is rejected defensively.
    pub fn jump_to(&mut self, target: u8) -> bool {
        if self.submitted || !(1..=TOTAL_STEPS).contains(&target) {
            return false;
        }

        let allowed =
            target <= self.state.step_index || self.state.completed_steps.contains(&target);
        if !allowed {
            warn!(
                "[PHASE: navigation] Rejected jump to uncompleted step {} from {}",
                target, self.state.step_index
            );
            return false;
        }

        self.state.step_index = target;
        true
    }

    /// Snapshot the state to the draft store. Failures are logged and
    /// swallowed: persistence trouble degrades to in-memory-only operation,
    /// it never interrupts editing. `savedAt` is clamped monotonic across
    /// the session.
    pub async fn save_draft(&mut self) {
        if self.submitted {
            return;
        }

        let now = Utc::now();
        let saved_at = match self.last_saved {
            Some(previous) => previous.max(now),
            None => now,
        };

        let snapshot = self.state.snapshot(saved_at);
        match self.store.save(&snapshot).await {
            Ok(()) => {
                self.last_saved = Some(saved_at);
            }
            Err(e) => {
                warn!("[PHASE: draft] Save failed (continuing in memory): {:#}", e);
            }
        }
    }

    /// Overlay extracted fields onto the current state and send the user
    /// back to step 1 to review. Completed steps are deliberately left
    /// as-is; they are re-checked as the user advances again. Returns the
    /// number of recognized fields applied.
    pub fn apply_extraction(&mut self, extracted: &BTreeMap<String, String>) -> usize {
        if self.submitted {
            warn!("[PHASE: extraction] Ignoring merge after submission");
            return 0;
        }

        let applied = merge::known_field_count(extracted);
        self.state = merge::merge_extracted(&self.state, extracted);
        self.state.step_index = 1;
        info!(
            "[PHASE: extraction] Applied {} of {} extracted fields",
            applied,
            extracted.len()
        );
        applied
    }

    /// Derived completion metrics for display.
    pub fn completion(&self) -> CompletionReport {
        completion::analyze(&self.state.field_values)
    }

    /// Validation gate plus payload assembly, without terminal side effects.
    /// On failure the error map updates exactly like a failed `next()`.
    pub(crate) fn prepare_submission(&mut self) -> Result<SubmissionPayload, WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }

        let step = self.state.step_index;
        let result = validation::validate_step(step, &self.state.field_values);
        self.state.errors = result.errors;
        if !result.is_valid {
            info!("[PHASE: submission] [STEP: {}] Validation blocked submit", step);
            return Err(WizardError::StepInvalid { step });
        }

        Ok(payload::build_payload(&self.state.field_values))
    }

    /// Terminal transition: clear the draft (once; failure logged and
    /// swallowed) and mark the wizard submitted.
    pub(crate) async fn complete_submission(&mut self) {
        if let Err(e) = self.store.clear().await {
            warn!("[PHASE: submission] Draft clear failed: {:#}", e);
        }
        self.submitted = true;
        info!("[PHASE: submission] Wizard submitted; session is terminal");
    }

    /// Validate the final step and, when it passes, hand the assembled
    /// payload to the caller. The draft is cleared and the wizard becomes
    /// terminal; delivery of the payload is the caller's responsibility.
    pub async fn submit(&mut self) -> Result<SubmissionPayload, WizardError> {
        let payload = self.prepare_submission()?;
        self.complete_submission().await;
        Ok(payload)
    }
}

/// Async session wrapper: one mutex in front of the controller, a periodic
/// autosave task, and the glue to the extraction and submission
/// collaborators. Dropping the session aborts the autosave task.
pub struct WizardSession {
    controller: Arc<Mutex<WizardController>>,
    autosave: JoinHandle<()>,
}

impl WizardSession {
    /// Default autosave cadence.
    pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

    pub async fn start(store: Arc<dyn DraftStore>, autosave_interval: Duration) -> Self {
        let controller = Arc::new(Mutex::new(WizardController::initialize(store).await));

        let weak = Arc::downgrade(&controller);
        let autosave = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(autosave_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval fires immediately; skip the zeroth tick
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(controller) = weak.upgrade() else {
                    break;
                };
                let mut guard = controller.lock().await;
                if guard.is_submitted() {
                    break;
                }
                guard.save_draft().await;
            }
        });

        Self { controller, autosave }
    }

    /// Shared handle to the controller for user-driven events.
    pub fn controller(&self) -> Arc<Mutex<WizardController>> {
        Arc::clone(&self.controller)
    }

    /// Auto-fill: call the extraction service, then overlay the result onto
    /// whatever state exists at resolution time. The overlay is
    /// last-write-wins by design; no edit generation is tracked, so an edit
    /// made while the call was in flight can be overwritten (known,
    /// accepted race). On extraction failure the state is untouched.
    pub async fn auto_fill(
        &self,
        client: &dyn ExtractionClient,
        text: &str,
    ) -> Result<usize, WizardError> {
        let fields = client.extract(text).await?;
        let mut controller = self.controller.lock().await;
        Ok(controller.apply_extraction(&fields))
    }

    /// Full submission flow: gate on final-step validation, deliver the
    /// payload to the sink, and only on acceptance clear the draft and end
    /// the session. A sink rejection leaves state and draft intact for
    /// correction and resubmission.
    pub async fn submit_to(
        &self,
        sink: &dyn SubmissionSink,
    ) -> Result<SubmissionReceipt, WizardError> {
        let mut controller = self.controller.lock().await;
        let payload = controller.prepare_submission()?;

        let receipt = sink.submit(&payload).await?;
        controller.complete_submission().await;
        Ok(receipt)
    }
}

impl Drop for WizardSession {
    fn drop(&mut self) {
        self.autosave.abort();
    }
}

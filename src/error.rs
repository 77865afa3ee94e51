// Error taxonomy
//
// Field validation errors are data (the per-field `errors` map), not Err
// values. Draft persistence failures are logged and swallowed so editing is
// never interrupted. Everything that does surface to callers goes through
// WizardError; none of it is fatal to the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    /// The extraction service call failed; wizard state is untouched.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The submission sink rejected the payload or was unreachable; wizard
    /// state and draft are preserved for retry.
    #[error("submission failed: {0}")]
    Submission(String),

    /// The gating step still has required-field errors.
    #[error("step {step} has validation errors")]
    StepInvalid { step: u8 },

    /// The wizard already completed a submission; the session is terminal.
    #[error("evaluation already submitted")]
    AlreadySubmitted,
}

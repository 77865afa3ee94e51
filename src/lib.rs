// Evaluation intake wizard
// Library entry point: the wizard state machine and draft/merge engine that
// feeds a multi-step evaluation submission to an external analysis service.

pub mod api;
pub mod config;
pub mod draft;
pub mod error;
pub mod models;
pub mod utils;
pub mod wizard;

pub use api::extraction::{ExtractionClient, HttpExtractionClient};
pub use api::submission::{HttpSubmissionSink, SubmissionReceipt, SubmissionSink};
pub use config::WizardConfig;
pub use draft::{DraftStore, FileDraftStore, MemoryDraftStore};
pub use error::WizardError;
pub use models::payload::SubmissionPayload;
pub use models::schema::{FieldDefinition, ValidationRule, FIELD_SCHEMA, TOTAL_STEPS};
pub use models::state::{DraftSnapshot, WizardState};
pub use wizard::{CompletionReport, ConfidenceLabel, WizardController, WizardSession};

use log::info;
use std::path::Path;

/// Initialize logging with dual output: a JSON log file for structured
/// parsing and, optionally, human-readable lines on stdout. `[PHASE: ..]`
/// and `[STEP: ..]` tags embedded in messages are lifted into structured
/// fields by the formatters in `utils::logging`.
pub fn init_logging(log_dir: &Path, with_stdout: bool) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let timestamp = chrono::Utc::now().format("%Y-%m-%d-%H%M%S");
    let json_log_file = log_dir.join(format!("intake-{}.log", timestamp));

    let mut dispatch = fern::Dispatch::new().level(log::LevelFilter::Debug);

    if with_stdout {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    let timestamp_local = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                    let (phase, step, cleaned) =
                        utils::logging::parse_log_metadata(&format!("{}", message));
                    out.finish(format_args!(
                        "{}",
                        utils::logging::format_human_readable_log(
                            &timestamp_local.to_string(),
                            record.level(),
                            record.target(),
                            &cleaned,
                            phase.as_deref(),
                            step.as_deref(),
                        )
                    ));
                })
                .chain(std::io::stdout()),
        );
    }

    dispatch = dispatch.chain(
        fern::Dispatch::new()
            .format(|out, message, record| {
                let timestamp_utc = chrono::Utc::now().to_rfc3339();
                let (phase, step, cleaned) =
                    utils::logging::parse_log_metadata(&format!("{}", message));
                out.finish(format_args!(
                    "{}",
                    utils::logging::format_json_log(
                        &timestamp_utc,
                        record.level(),
                        record.target(),
                        &cleaned,
                        phase.as_deref(),
                        step.as_deref(),
                    )
                ));
            })
            .chain(fern::log_file(&json_log_file)?),
    );

    dispatch.apply()?;

    info!(
        "[PHASE: initialization] Logging initialized, log file: {:?}",
        json_log_file
    );
    Ok(())
}

// Runtime configuration
// Environment-variable driven with safe defaults; malformed values fall back
// to the default and are logged rather than failing startup.

use log::warn;
use std::path::PathBuf;
use std::time::Duration;

use crate::draft::FileDraftStore;
use crate::wizard::WizardSession;

const AUTOSAVE_ENV: &str = "EVALUATION_AUTOSAVE_SECS";
const DRAFT_PATH_ENV: &str = "EVALUATION_DRAFT_PATH";
const EXTRACTION_URL_ENV: &str = "EVALUATION_EXTRACTION_URL";
const SUBMISSION_URL_ENV: &str = "EVALUATION_SUBMISSION_URL";

const DEFAULT_EXTRACTION_URL: &str = "http://127.0.0.1:8000/extract";
const DEFAULT_SUBMISSION_URL: &str = "http://127.0.0.1:8000/evaluate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    pub autosave_interval: Duration,
    pub draft_path: PathBuf,
    pub extraction_url: String,
    pub submission_url: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            autosave_interval: WizardSession::DEFAULT_AUTOSAVE_INTERVAL,
            draft_path: FileDraftStore::default_path(),
            extraction_url: DEFAULT_EXTRACTION_URL.to_string(),
            submission_url: DEFAULT_SUBMISSION_URL.to_string(),
        }
    }
}

impl WizardConfig {
    /// Read overrides from the environment on top of the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(AUTOSAVE_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    config.autosave_interval = Duration::from_secs(secs);
                }
                _ => {
                    warn!(
                        "[PHASE: initialization] Ignoring invalid {}='{}'",
                        AUTOSAVE_ENV, raw
                    );
                }
            }
        }

        if let Ok(path) = std::env::var(DRAFT_PATH_ENV) {
            if !path.trim().is_empty() {
                config.draft_path = PathBuf::from(path);
            }
        }

        if let Ok(url) = std::env::var(EXTRACTION_URL_ENV) {
            if !url.trim().is_empty() {
                config.extraction_url = url;
            }
        }

        if let Ok(url) = std::env::var(SUBMISSION_URL_ENV) {
            if !url.trim().is_empty() {
                config.submission_url = url;
            }
        }

        config
    }
}

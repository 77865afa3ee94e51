// Submission sink
//
// Hands the assembled payload to the analysis service (`POST /evaluate`).
// No retry here: on failure the error message comes back to the caller
// intact and the wizard state is left unchanged so the user can correct and
// resubmit.

use async_trait::async_trait;
use log::{info, warn};
use serde::Deserialize;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use crate::error::WizardError;
use crate::models::payload::SubmissionPayload;

/// Identifier of the evaluation the sink created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub evaluation_id: String,
}

#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, WizardError>;
}

/// Successful response body of the analysis service.
#[derive(Debug, Deserialize)]
struct EvaluationCreated {
    evaluation_id: String,
}

/// Error body the service returns on validation failure (FastAPI-style).
#[derive(Debug, Deserialize)]
struct ServiceError {
    detail: String,
}

/// HTTP implementation of the sink.
pub struct HttpSubmissionSink {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpSubmissionSink {
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
        })
    }
}

#[async_trait]
impl SubmissionSink for HttpSubmissionSink {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, WizardError> {
        let correlation_id = Uuid::new_v4().simple().to_string();
        info!(
            "[PHASE: submission] [{}] Submitting evaluation for '{}'",
            correlation_id, payload.startup_context.name
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| WizardError::Submission(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServiceError>(&body)
                .map(|e| e.detail)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            warn!(
                "[PHASE: submission] [{}] Rejected: {}",
                correlation_id, message
            );
            return Err(WizardError::Submission(message));
        }

        let created: EvaluationCreated = response
            .json()
            .await
            .map_err(|e| WizardError::Submission(format!("invalid response body: {}", e)))?;

        info!(
            "[PHASE: submission] [{}] Evaluation created: {}",
            correlation_id, created.evaluation_id
        );
        Ok(SubmissionReceipt {
            evaluation_id: created.evaluation_id,
        })
    }
}

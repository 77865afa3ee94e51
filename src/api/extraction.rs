// Extraction service client
//
// The auto-fill feature sends free-form pitch text to the extraction service
// and gets back a flat JSON object whose keys are (a subset of) the intake
// field names. The response shape is treated defensively: only string and
// numeric values are accepted, anything else is dropped per key. No timeout
// is enforced here; extraction latency is the service's concern.

use async_trait::async_trait;
use log::{info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;
use uuid::Uuid;

use crate::error::WizardError;

#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Extract intake fields from unstructured text.
    async fn extract(&self, text: &str) -> Result<BTreeMap<String, String>, WizardError>;
}

/// HTTP client for the extraction endpoint (`POST { "text": .. }`).
pub struct HttpExtractionClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpExtractionClient {
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl ExtractionClient for HttpExtractionClient {
    async fn extract(&self, text: &str) -> Result<BTreeMap<String, String>, WizardError> {
        let correlation_id = Uuid::new_v4().simple().to_string();
        info!(
            "[PHASE: extraction] [{}] Requesting extraction ({} chars of text)",
            correlation_id,
            text.len()
        );

        let body = serde_json::json!({ "text": text });
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| WizardError::Extraction(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(
                "[PHASE: extraction] [{}] Service returned HTTP {}: {}",
                correlation_id, status, detail
            );
            return Err(WizardError::Extraction(format!("HTTP {}", status)));
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| WizardError::Extraction(format!("invalid response body: {}", e)))?;

        // The service reports its own failures as { "error": .. }.
        if let Some(message) = parsed.get("error").and_then(Value::as_str) {
            return Err(WizardError::Extraction(message.to_string()));
        }

        let fields = coerce_extracted(&parsed);
        info!(
            "[PHASE: extraction] [{}] Received {} usable fields",
            correlation_id,
            fields.len()
        );
        Ok(fields)
    }
}

/// Flatten an arbitrary extraction response into field-name/string pairs.
/// Strings pass through, numbers are stringified, everything else (nulls,
/// booleans, nested structures) is dropped.
pub fn coerce_extracted(value: &Value) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let Some(object) = value.as_object() else {
        return fields;
    };

    for (name, raw) in object {
        match raw {
            Value::String(s) => {
                fields.insert(name.clone(), s.clone());
            }
            Value::Number(n) => {
                fields.insert(name.clone(), n.to_string());
            }
            _ => {}
        }
    }
    fields
}

use serde::{Deserialize, Serialize};

use super::document::BatchUploadOutcome;

/// Standard response envelope used by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub error_code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl ApiResponse<BatchUploadOutcome> {
    /// Wrap a raw batch result. The batch endpoint does not send an envelope,
    /// so status and code are synthesized from the failure count.
    pub fn from_batch(outcome: BatchUploadOutcome) -> Self {
        Self {
            error_code: outcome.envelope_error_code(),
            status: outcome.envelope_status().to_string(),
            message: outcome.message.clone(),
            data: outcome,
        }
    }
}

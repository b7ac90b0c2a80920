//! Shared interpretation of transport outcomes.
//!
//! Every endpoint turns a [`TransportOutcome`] into either the response body
//! or a [`ClientError`] carrying a human-readable message. Error bodies are
//! read in three tiers: a `message` field from a JSON body, else the raw body
//! text, else the endpoint's generic fallback.

use parkora_core::ClientError;
use serde::de::DeserializeOwned;

use crate::transport::TransportOutcome;

/// Generic texts used when the server gives no usable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureMessages {
    pub fallback: &'static str,
    pub network: &'static str,
    pub aborted: &'static str,
}

pub const UPLOAD_MESSAGES: FailureMessages = FailureMessages {
    fallback: "File upload failed",
    network: "Network error during file upload",
    aborted: "File upload was aborted",
};

pub const DOCUMENTS_MESSAGES: FailureMessages = FailureMessages {
    fallback: "Failed to load documents",
    network: "Network error while loading documents",
    aborted: "Document request was aborted",
};

pub const LOGIN_MESSAGES: FailureMessages = FailureMessages {
    fallback: "Login failed",
    network: "Network error during login",
    aborted: "Login request was aborted",
};

pub const REGISTER_MESSAGES: FailureMessages = FailureMessages {
    fallback: "Registration failed",
    network: "Network error during registration",
    aborted: "Registration request was aborted",
};

/// Message for a non-2xx response. `body` is `Err` when the body could not be read.
pub fn failure_message(body: Result<&str, &str>, fallback: &str) -> String {
    let Ok(text) = body else {
        return fallback.to_string();
    };

    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => json
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string(),
        Err(_) if !text.trim().is_empty() => text.to_string(),
        Err(_) => fallback.to_string(),
    }
}

/// Body text of a 2xx response, or the normalized error.
pub fn interpret(outcome: TransportOutcome, messages: &FailureMessages) -> Result<String, ClientError> {
    match outcome {
        TransportOutcome::Loaded { status, body } if (200..300).contains(&status) => {
            body.map_err(|_| ClientError::ParseResponse)
        }
        TransportOutcome::Loaded { status, body } => Err(ClientError::Http {
            status,
            message: failure_message(body.as_deref().map_err(String::as_str), messages.fallback),
        }),
        TransportOutcome::NetworkError(_) => Err(ClientError::Network(messages.network.to_string())),
        TransportOutcome::Aborted => Err(ClientError::Aborted(messages.aborted.to_string())),
    }
}

/// [`interpret`], then parse the 2xx body as JSON. A body that is not the
/// expected JSON is an error even though the HTTP exchange succeeded.
pub fn decode_json<T: DeserializeOwned>(
    outcome: TransportOutcome,
    messages: &FailureMessages,
) -> Result<T, ClientError> {
    let text = interpret(outcome, messages)?;
    serde_json::from_str(&text).map_err(|e| {
        tracing::debug!(error = %e, "Response body did not match the expected shape");
        ClientError::ParseResponse
    })
}

#![allow(dead_code)]

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use parkora_api_client::{
    ApiClient, HttpRequest, MemoryStore, ProgressEvent, ProgressReporter, SessionStore, Transport,
    TransportOutcome,
};
use parkora_core::models::LocalFile;
use parkora_core::{now_epoch_secs, StorageKeys};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

pub const BASE_URL: &str = "http://api.test/api/v1";

/// One scripted exchange: progress events, then how the request ends.
pub struct Exchange {
    pub events: Vec<ProgressEvent>,
    pub outcome: TransportOutcome,
}

impl Exchange {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            events: Vec::new(),
            outcome: TransportOutcome::Loaded {
                status,
                body: Ok(body.into()),
            },
        }
    }

    pub fn network_error() -> Self {
        Self {
            events: Vec::new(),
            outcome: TransportOutcome::NetworkError("connection refused".to_string()),
        }
    }

    pub fn with_progress(mut self, events: Vec<ProgressEvent>) -> Self {
        self.events = events;
        self
    }
}

/// Transport that answers from a queue and records every request.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Exchange>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new(script: Vec<Exchange>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(
        &self,
        request: HttpRequest,
        progress: ProgressReporter,
        cancel: CancellationToken,
    ) -> TransportOutcome {
        self.requests.lock().unwrap().push(request);
        if cancel.is_cancelled() {
            return TransportOutcome::Aborted;
        }
        let exchange = self.script.lock().unwrap().pop_front();
        match exchange {
            Some(exchange) => {
                for event in exchange.events {
                    progress.emit(event);
                }
                exchange.outcome
            }
            None => TransportOutcome::NetworkError("no scripted response".to_string()),
        }
    }
}

pub fn new_session() -> Arc<SessionStore> {
    Arc::new(SessionStore::new(
        Box::new(MemoryStore::new()),
        StorageKeys::default(),
    ))
}

pub fn client(transport: Arc<MockTransport>) -> ApiClient {
    ApiClient::with_transport(BASE_URL, transport, new_session())
}

/// Signed with a throwaway secret; the client never checks signatures.
pub fn mint_token(roles: &[&str], exp: i64) -> String {
    let claims = serde_json::json!({
        "sub": "partner@example.com",
        "userId": "7",
        "email": "partner@example.com",
        "firstName": "Ana",
        "lastName": "Silva",
        "roles": roles,
        "iss": "parkora",
        "iat": exp - 3600,
        "exp": exp,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"integration-secret"),
    )
    .unwrap()
}

pub fn fresh_token(roles: &[&str]) -> String {
    mint_token(roles, now_epoch_secs() + 3600)
}

pub fn pdf(name: &str, size: usize) -> LocalFile {
    LocalFile::new(name, "application/pdf", vec![0x25u8; size])
}

pub fn png(name: &str, size: usize) -> LocalFile {
    LocalFile::new(name, "image/png", vec![0x89u8; size])
}

pub fn descriptor_json(document_type: &str, path: Option<&str>, message: &str) -> serde_json::Value {
    serde_json::json!({
        "path": path,
        "bucket": "documents",
        "fileName": format!("{}.pdf", document_type.to_lowercase()),
        "fileSize": 1024,
        "contentType": "application/pdf",
        "documentType": document_type,
        "verificationStatus": "PENDING",
        "message": message,
    })
}

pub fn batch_json(files: Vec<serde_json::Value>, total: u32, ok: u32, failed: u32) -> String {
    serde_json::json!({
        "uploadedFiles": files,
        "totalFiles": total,
        "successfulUploads": ok,
        "failedUploads": failed,
        "message": "Batch upload completed",
    })
    .to_string()
}

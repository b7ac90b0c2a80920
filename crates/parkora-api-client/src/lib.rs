//! HTTP client for the Parkora partner API.
//!
//! Provides document upload (single and batch) with byte-level progress,
//! document listing, login and partner registration. Every request goes
//! through a [`Transport`]; the bearer token comes from the shared
//! [`SessionStore`]. The CLI and the onboarding crate use this client directly.

pub mod api;
pub mod response;
pub mod session;
pub mod storage;
pub mod transport;

use parkora_core::{ClientConfig, ClientError};
use std::fmt;
use std::sync::Arc;

pub use api::{BatchFiles, DocumentList};
pub use response::{failure_message, FailureMessages};
pub use session::{Session, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use transport::{
    HttpRequest, HttpTransport, Method, MultipartBody, MultipartField, ProgressCallback,
    ProgressEvent, ProgressReporter, RequestBody, RequestControl, Transport, TransportOutcome,
};

/// Client for the partner API.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    session: Arc<SessionStore>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    /// Client over `reqwest` using the configured base URL and timeout.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Ok(Self::with_transport(
            config.api_url.clone(),
            Arc::new(transport),
            session,
        ))
    }

    pub fn with_transport(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Send one request. The session token, if any, is attached as a bearer
    /// header; its absence is not an error.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        control: &RequestControl,
    ) -> TransportOutcome {
        let request = HttpRequest {
            method,
            url: self.build_url(path),
            bearer_token: self.session.token(),
            body,
        };
        tracing::debug!(
            method = ?request.method,
            url = %request.url,
            authenticated = request.bearer_token.is_some(),
            "Dispatching request"
        );
        self.transport
            .execute(request, control.progress().clone(), control.cancellation())
            .await
    }
}

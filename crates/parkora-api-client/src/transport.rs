//! Transport seam between the API client and the network.
//!
//! A [`Transport`] performs one HTTP exchange and reports how it ended:
//! with a response (any status), with a network failure, or aborted by the
//! caller. Upload progress is pushed through a [`ProgressReporter`] while
//! the request body is being written.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use parkora_core::models::LocalFile;
use parkora_core::ClientError;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Size of the slices a file body is streamed in. Progress advances once per slice.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub enum MultipartField {
    Text { name: String, value: String },
    File { name: String, file: LocalFile },
}

/// Ordered multipart form. Only fields that were added are sent.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    fields: Vec<MultipartField>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(MultipartField::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: LocalFile) -> Self {
        self.fields.push(MultipartField::File {
            name: name.into(),
            file,
        });
        self
    }

    pub fn fields(&self) -> &[MultipartField] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|f| match f {
                MultipartField::Text { name, .. } | MultipartField::File { name, .. } => {
                    name.as_str()
                }
            })
            .collect()
    }

    pub fn text_value(&self, field: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match f {
            MultipartField::Text { name, value } if name == field => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn file_named(&self, field: &str) -> Option<&LocalFile> {
        self.fields.iter().find_map(|f| match f {
            MultipartField::File { name, file } if name == field => Some(file),
            _ => None,
        })
    }

    /// Total bytes of all file parts; the denominator for upload progress.
    pub fn file_bytes_total(&self) -> u64 {
        self.fields
            .iter()
            .map(|f| match f {
                MultipartField::File { file, .. } => file.size(),
                MultipartField::Text { .. } => 0,
            })
            .sum()
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Sent as `Authorization: Bearer {token}` when present.
    pub bearer_token: Option<String>,
    pub body: RequestBody,
}

/// How a single exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    /// A response arrived. `body` is `Err` if it could not be read.
    Loaded {
        status: u16,
        body: Result<String, String>,
    },
    /// No response at all (connect failure, reset, timeout).
    NetworkError(String),
    /// The caller cancelled the request.
    Aborted,
}

/// Bytes written so far out of `total`. `total` is `None` when the length
/// is not computable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl ProgressEvent {
    pub fn computable(loaded: u64, total: u64) -> Self {
        Self {
            loaded,
            total: Some(total),
        }
    }

    pub fn unknown(loaded: u64) -> Self {
        Self {
            loaded,
            total: None,
        }
    }

    /// Rounded percentage, or `None` if the total is unknown or zero.
    pub fn percent(&self) -> Option<u8> {
        let total = self.total.filter(|t| *t > 0)?;
        let ratio = self.loaded as f64 / total as f64;
        Some((ratio * 100.0).round().clamp(0.0, 100.0) as u8)
    }
}

pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Forwards progress to an optional callback. Events with an unknown total
/// are dropped, so the callback never sees a made-up 0 or 100.
#[derive(Clone, Default)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl ProgressReporter {
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let (Some(callback), Some(percent)) = (&self.callback, event.percent()) {
            callback(percent);
        }
    }
}

/// Progress observer and cancellation handle for one client call.
#[derive(Clone, Debug, Default)]
pub struct RequestControl {
    progress: ProgressReporter,
    cancel: CancellationToken,
}

impl RequestControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress<F>(callback: F) -> Self
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        Self {
            progress: ProgressReporter::new(Arc::new(callback)),
            cancel: CancellationToken::new(),
        }
    }

    /// Abort through an externally held token instead of a fresh one.
    pub fn cancel_with(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    /// Handle that aborts the in-flight request when cancelled.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn abort(&self) {
        self.cancel.cancel();
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: HttpRequest,
        progress: ProgressReporter,
        cancel: CancellationToken,
    ) -> TransportOutcome;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn progress_stream(
    bytes: Bytes,
    sent: Arc<AtomicU64>,
    total: u64,
    progress: ProgressReporter,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let chunks: Vec<Bytes> = (0..bytes.len())
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| bytes.slice(start..(start + UPLOAD_CHUNK_SIZE).min(bytes.len())))
        .collect();

    futures::stream::iter(chunks).map(move |chunk| {
        let len = chunk.len() as u64;
        let loaded = sent.fetch_add(len, Ordering::SeqCst) + len;
        progress.emit(ProgressEvent::computable(loaded, total));
        Ok(chunk)
    })
}

fn build_form(body: MultipartBody, progress: ProgressReporter) -> reqwest::Result<Form> {
    let total = body.file_bytes_total();
    let sent = Arc::new(AtomicU64::new(0));
    let mut form = Form::new();

    for field in body.fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name, value),
            MultipartField::File { name, file } => {
                let length = file.size();
                let stream = progress_stream(file.bytes, Arc::clone(&sent), total, progress.clone());
                let part = Part::stream_with_length(Body::wrap_stream(stream), length)
                    .file_name(file.name)
                    .mime_str(&file.content_type)?;
                form.part(name, part)
            }
        };
    }

    Ok(form)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: HttpRequest,
        progress: ProgressReporter,
        cancel: CancellationToken,
    ) -> TransportOutcome {
        let HttpRequest {
            method,
            url,
            bearer_token,
            body,
        } = request;

        let mut builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(token) = bearer_token.as_deref() {
            builder = builder.bearer_auth(token);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(multipart) => match build_form(multipart, progress) {
                Ok(form) => builder.multipart(form),
                Err(e) => {
                    tracing::warn!(error = %e, url = %url, "Failed to build multipart body");
                    return TransportOutcome::NetworkError(e.to_string());
                }
            },
        };

        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| e.to_string());
            Ok::<_, reqwest::Error>(TransportOutcome::Loaded { status, body })
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(url = %url, "Request aborted by caller");
                TransportOutcome::Aborted
            }
            result = exchange => match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(error = %e, url = %url, "Request failed before a response arrived");
                    TransportOutcome::NetworkError(e.to_string())
                }
            },
        }
    }
}

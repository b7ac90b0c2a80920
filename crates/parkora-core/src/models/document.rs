use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use crate::error::ClientError;

/// Document categories accepted by the storage endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    BusinessRegistration,
    TaxIdentification,
    AdditionalDocument,
}

impl DocumentType {
    /// Wire spelling to canonical type. The remote API has labelled the business
    /// license with both `BUSINESS_REGISTRATION` and `BUSINESS_LICENSE`.
    pub const WIRE_NAMES: &'static [(&'static str, DocumentType)] = &[
        ("BUSINESS_REGISTRATION", DocumentType::BusinessRegistration),
        ("BUSINESS_LICENSE", DocumentType::BusinessRegistration),
        ("TAX_IDENTIFICATION", DocumentType::TaxIdentification),
        ("ADDITIONAL_DOCUMENT", DocumentType::AdditionalDocument),
    ];

    /// Spelling sent to the server.
    pub fn as_wire(&self) -> &'static str {
        match self {
            DocumentType::BusinessRegistration => "BUSINESS_REGISTRATION",
            DocumentType::TaxIdentification => "TAX_IDENTIFICATION",
            DocumentType::AdditionalDocument => "ADDITIONAL_DOCUMENT",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::WIRE_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|(_, doc_type)| *doc_type)
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_wire())
    }
}

/// Human review state of an uploaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentReviewStatus {
    #[default]
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "verified")]
    Verified,
    #[serde(alias = "rejected")]
    Rejected,
}

/// Server-side metadata for one uploaded file. Read-only on the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadedFileDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: Option<String>,
    pub path: Option<String>,
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub file_name: String,
    pub file_size: u64,
    pub content_type: String,
    pub document_type: Option<String>,
    pub verification_status: DocumentReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadedFileDescriptor {
    /// Storage path, else public URL. Blank values count as absent.
    pub fn location(&self) -> Option<&str> {
        [self.path.as_deref(), self.url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        self.document_type.as_deref().and_then(DocumentType::from_wire)
    }

    /// The server message mentions a failure (case-insensitive "failed").
    pub fn reports_failure(&self) -> bool {
        self.message
            .as_deref()
            .map(|m| m.to_lowercase().contains("failed"))
            .unwrap_or(false)
    }

    /// Heuristic: the server stored the file iff it gave us a location and
    /// did not describe the upload as failed.
    pub fn is_successful(&self) -> bool {
        self.location().is_some() && !self.reports_failure()
    }

    pub fn is_rejected(&self) -> bool {
        self.verification_status == DocumentReviewStatus::Rejected
    }
}

/// Raw result of a multi-file upload request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUploadOutcome {
    #[serde(default)]
    pub uploaded_files: Vec<UploadedFileDescriptor>,
    pub total_files: u32,
    pub successful_uploads: u32,
    pub failed_uploads: u32,
    #[serde(default)]
    pub message: String,
}

impl BatchUploadOutcome {
    pub fn is_complete_success(&self) -> bool {
        self.failed_uploads == 0
            && self.successful_uploads == self.total_files
            && !self.uploaded_files.iter().any(|f| f.reports_failure())
    }

    /// Synthetic envelope status: `success` or `partial_success`.
    pub fn envelope_status(&self) -> &'static str {
        if self.failed_uploads == 0 {
            "success"
        } else {
            "partial_success"
        }
    }

    pub fn envelope_error_code(&self) -> i32 {
        if self.failed_uploads == 0 {
            0
        } else {
            1
        }
    }
}

/// A file picked locally, held in memory until it is sent.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl std::fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl LocalFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = std::fs::read(path).map_err(|e| {
            ClientError::InvalidInput(format!("Failed to read file {}: {}", path.display(), e))
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();
        let content_type = content_type_for(path).to_string();
        Ok(Self::new(name, content_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

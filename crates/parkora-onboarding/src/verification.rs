//! Company verification form
//!
//! Three document slots, each moving through
//! `selected -> uploading -> success | error`. A failed slot keeps its file
//! and can be retried on its own. A successful slot is locked against
//! reselection until the server marks its document as rejected.

use parkora_api_client::{ApiClient, BatchFiles, ProgressCallback, RequestControl};
use parkora_core::models::{DocumentReviewStatus, DocumentType, LocalFile, UploadedFileDescriptor};
use parkora_core::{log_client_error, ClientError, FieldErrors, FilePolicy, FileViolation};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const SUBMITTED_MESSAGE: &str = "Verification submitted successfully! Your documents are under review.";
const PARTIAL_FAILURE_MESSAGE: &str =
    "Some documents failed to upload. Please retry the failed documents.";
const UPLOAD_FAILED_MESSAGE: &str = "File upload failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotId {
    BusinessLicense,
    TaxDocument,
    AdditionalDocument,
}

/// Slot, its wire document type, label and whether submission needs it.
const SLOT_TABLE: [(SlotId, DocumentType, &str, bool); 3] = [
    (
        SlotId::BusinessLicense,
        DocumentType::BusinessRegistration,
        "Business license document",
        true,
    ),
    (
        SlotId::TaxDocument,
        DocumentType::TaxIdentification,
        "Tax document",
        true,
    ),
    (
        SlotId::AdditionalDocument,
        DocumentType::AdditionalDocument,
        "Additional document",
        false,
    ),
];

impl SlotId {
    pub const ALL: [SlotId; 3] = [
        SlotId::BusinessLicense,
        SlotId::TaxDocument,
        SlotId::AdditionalDocument,
    ];

    fn index(self) -> usize {
        match self {
            SlotId::BusinessLicense => 0,
            SlotId::TaxDocument => 1,
            SlotId::AdditionalDocument => 2,
        }
    }

    pub fn document_type(self) -> DocumentType {
        SLOT_TABLE[self.index()].1
    }

    pub fn from_document_type(document_type: DocumentType) -> SlotId {
        SLOT_TABLE
            .iter()
            .find(|(_, t, _, _)| *t == document_type)
            .map(|(slot, _, _, _)| *slot)
            .unwrap_or(SlotId::AdditionalDocument)
    }

    /// Slot for a wire document type, accepting every known spelling.
    pub fn from_wire(value: &str) -> Option<SlotId> {
        DocumentType::from_wire(value).map(SlotId::from_document_type)
    }

    /// Form field name, also used as the key in field errors.
    pub fn field_name(self) -> &'static str {
        BatchFiles::field_name(self.document_type())
    }

    pub fn label(self) -> &'static str {
        SLOT_TABLE[self.index()].2
    }

    pub fn is_required(self) -> bool {
        SLOT_TABLE[self.index()].3
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    Empty,
    Selected,
    Uploading,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSlot {
    pub file: Option<LocalFile>,
    pub status: SlotStatus,
    pub progress: u8,
    pub remote: Option<UploadedFileDescriptor>,
    pub error: Option<String>,
}

impl FileSlot {
    /// Accepted by the server and not rejected in review.
    pub fn is_locked(&self) -> bool {
        self.status == SlotStatus::Success
            && self.remote.as_ref().map(|r| !r.is_rejected()).unwrap_or(false)
    }

    /// Holds a local file that still has to be sent.
    pub fn has_pending_file(&self) -> bool {
        self.file.is_some() && matches!(self.status, SlotStatus::Selected | SlotStatus::Error)
    }

    pub fn is_rejected(&self) -> bool {
        self.remote.as_ref().map(|r| r.is_rejected()).unwrap_or(false)
    }

    fn succeed(&mut self, descriptor: UploadedFileDescriptor) {
        self.file = None;
        self.status = SlotStatus::Success;
        self.progress = 100;
        self.remote = Some(descriptor);
        self.error = None;
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.status = SlotStatus::Error;
        self.error = Some(message.into());
    }
}

/// Review state of the whole verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Approved only if at least one document exists and all are verified.
pub fn aggregate_status(documents: &[UploadedFileDescriptor]) -> VerificationStatus {
    let all_verified = documents
        .iter()
        .all(|d| d.verification_status == DocumentReviewStatus::Verified);
    if !documents.is_empty() && all_verified {
        VerificationStatus::Approved
    } else if documents.iter().any(|d| d.is_rejected()) {
        VerificationStatus::Rejected
    } else {
        VerificationStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("{} has already been accepted", .0.label())]
    Locked(SlotId),

    #[error(transparent)]
    Invalid(#[from] FileViolation),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Local validation failed; nothing was sent.
    Blocked { errors: FieldErrors },
    Submitted { message: String },
    /// The request went through but some documents were not stored.
    PartialFailure { message: String, failed: Vec<SlotId> },
    /// The request itself failed.
    Failed { message: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Submitted { .. })
    }
}

pub struct VerificationForm {
    slots: [FileSlot; 3],
    field_errors: FieldErrors,
    status: VerificationStatus,
    documents_loaded: bool,
    policy: FilePolicy,
    progress: Arc<AtomicU8>,
    observer: Option<ProgressCallback>,
    cancel: CancellationToken,
}

impl fmt::Debug for VerificationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationForm")
            .field("slots", &self.slots)
            .field("field_errors", &self.field_errors)
            .field("status", &self.status)
            .field("documents_loaded", &self.documents_loaded)
            .field("progress", &self.upload_progress())
            .finish()
    }
}

impl Default for VerificationForm {
    fn default() -> Self {
        Self::new(FilePolicy::default())
    }
}

impl VerificationForm {
    pub fn new(policy: FilePolicy) -> Self {
        Self {
            slots: Default::default(),
            field_errors: FieldErrors::new(),
            status: VerificationStatus::default(),
            documents_loaded: false,
            policy,
            progress: Arc::new(AtomicU8::new(0)),
            observer: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Also receive upload percentages as they are reported.
    pub fn on_progress<F>(&mut self, observer: F)
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
    }

    pub fn slot(&self, slot: SlotId) -> &FileSlot {
        &self.slots[slot.index()]
    }

    fn slot_mut(&mut self, slot: SlotId) -> &mut FileSlot {
        &mut self.slots[slot.index()]
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    pub fn documents_loaded(&self) -> bool {
        self.documents_loaded
    }

    /// Last reported percentage of the upload in flight (or just finished).
    pub fn upload_progress(&self) -> u8 {
        self.progress.load(Ordering::SeqCst)
    }

    /// Cancelling the returned token aborts the upload in flight.
    pub fn abort_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn request_control(&self) -> RequestControl {
        self.progress.store(0, Ordering::SeqCst);
        let progress = Arc::clone(&self.progress);
        let observer = self.observer.clone();
        RequestControl::with_progress(move |percent| {
            progress.store(percent, Ordering::SeqCst);
            if let Some(observer) = &observer {
                observer(percent);
            }
        })
        .cancel_with(self.cancel.clone())
    }

    /// A used-up abort handle is replaced so the next request can run.
    fn renew_cancellation(&mut self) {
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }
    }

    /// Pick a file for a slot. A policy violation puts the slot in `error`
    /// and the file is not kept.
    pub fn select_file(&mut self, slot: SlotId, file: LocalFile) -> Result<(), SelectionError> {
        if self.slot(slot).is_locked() {
            return Err(SelectionError::Locked(slot));
        }

        if let Err(violation) = self.policy.check(&file) {
            let message = violation.to_string();
            tracing::debug!(slot = %slot, file_name = %file.name, error = %message, "File rejected by policy");
            let state = self.slot_mut(slot);
            state.file = None;
            state.progress = 0;
            state.fail(message.clone());
            self.field_errors.insert(slot.field_name().to_string(), message);
            return Err(violation.into());
        }

        let was_rejected = self.slot(slot).is_rejected();
        *self.slot_mut(slot) = FileSlot {
            file: Some(file),
            status: SlotStatus::Selected,
            ..FileSlot::default()
        };
        self.field_errors.remove(slot.field_name());

        if was_rejected
            && self.status == VerificationStatus::Rejected
            && !self.slots.iter().any(FileSlot::is_rejected)
        {
            self.status = VerificationStatus::Pending;
        }
        Ok(())
    }

    /// Check the form without sending anything.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for slot in SlotId::ALL {
            let state = self.slot(slot);
            if state.has_pending_file() {
                if let Some(file) = &state.file {
                    if let Err(violation) = self.policy.check(file) {
                        errors.insert(slot.field_name().to_string(), violation.to_string());
                    }
                }
            } else if slot.is_required() && !state.is_locked() {
                let message = state
                    .error
                    .clone()
                    .unwrap_or_else(|| format!("{} is required", slot.label()));
                errors.insert(slot.field_name().to_string(), message);
            }
        }
        errors
    }

    /// Send every pending file in one batch and reconcile the result per slot.
    pub async fn submit(&mut self, client: &ApiClient) -> SubmissionOutcome {
        let errors = self.validate();
        self.field_errors = errors.clone();
        if !errors.is_empty() {
            tracing::debug!(fields = errors.len(), "Submission blocked by validation");
            return SubmissionOutcome::Blocked { errors };
        }

        let mut files = BatchFiles::default();
        let mut sent = Vec::new();
        for slot in SlotId::ALL {
            let state = self.slot(slot);
            if !state.has_pending_file() {
                continue;
            }
            if let Some(file) = state.file.clone() {
                files.insert(slot.document_type(), file);
                sent.push(slot);
            }
        }

        if sent.is_empty() {
            tracing::info!("Nothing new to upload, refreshing documents");
            self.status = VerificationStatus::Pending;
            self.refresh(client).await;
            return SubmissionOutcome::Submitted {
                message: SUBMITTED_MESSAGE.to_string(),
            };
        }

        for slot in &sent {
            let state = self.slot_mut(*slot);
            state.status = SlotStatus::Uploading;
            state.progress = 0;
            state.error = None;
        }

        let control = self.request_control();
        let result = client.upload_batch(files, &control).await;
        self.renew_cancellation();

        let batch = match result {
            Ok(response) => response.data,
            Err(e) => return self.fail_sent(&sent, e),
        };

        let progress = self.upload_progress();
        for slot in &sent {
            self.slot_mut(*slot).progress = progress;
        }
        for descriptor in &batch.uploaded_files {
            let Some(slot) = descriptor.document_type.as_deref().and_then(SlotId::from_wire) else {
                tracing::warn!(document_type = ?descriptor.document_type, "Descriptor with unknown document type");
                continue;
            };
            if !sent.contains(&slot) {
                if descriptor.reports_failure() {
                    tracing::warn!(slot = %slot, message = ?descriptor.message, "Failure reported for a slot that was not sent");
                }
                continue;
            }
            if descriptor.is_successful() {
                self.slot_mut(slot).succeed(descriptor.clone());
            } else {
                let message = descriptor
                    .message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string());
                self.slot_mut(slot).fail(message);
            }
        }

        let mut failed = Vec::new();
        for slot in &sent {
            let state = self.slot_mut(*slot);
            if state.status == SlotStatus::Uploading {
                state.fail(UPLOAD_FAILED_MESSAGE);
            }
            if state.status == SlotStatus::Error {
                failed.push(*slot);
                if let Some(message) = state.error.clone() {
                    self.field_errors.insert(slot.field_name().to_string(), message);
                }
            }
        }

        if !failed.is_empty() || !batch.is_complete_success() {
            tracing::warn!(
                failed = ?failed,
                total_files = batch.total_files,
                failed_uploads = batch.failed_uploads,
                "Verification submission partially failed"
            );
            return SubmissionOutcome::PartialFailure {
                message: PARTIAL_FAILURE_MESSAGE.to_string(),
                failed,
            };
        }

        self.status = VerificationStatus::Pending;
        tracing::info!(documents = sent.len(), "Verification submitted");
        SubmissionOutcome::Submitted {
            message: SUBMITTED_MESSAGE.to_string(),
        }
    }

    fn fail_sent(&mut self, sent: &[SlotId], error: ClientError) -> SubmissionOutcome {
        log_client_error(&error, "Verification submission failed");
        let message = error.to_string();
        for slot in sent {
            self.slot_mut(*slot).fail(message.clone());
            self.field_errors.insert(slot.field_name().to_string(), message.clone());
        }
        SubmissionOutcome::Failed { message }
    }

    /// Re-send one failed slot through the single-file endpoint.
    pub async fn retry_slot(
        &mut self,
        client: &ApiClient,
        slot: SlotId,
    ) -> Result<UploadedFileDescriptor, ClientError> {
        let state = self.slot(slot);
        let file = match (&state.status, &state.file) {
            (SlotStatus::Error, Some(file)) => file.clone(),
            _ => {
                return Err(ClientError::InvalidInput(format!(
                    "{} has nothing to retry",
                    slot.label()
                )))
            }
        };
        if let Err(violation) = self.policy.check(&file) {
            return Err(ClientError::Validation(violation.to_string()));
        }

        {
            let state = self.slot_mut(slot);
            state.status = SlotStatus::Uploading;
            state.progress = 0;
            state.error = None;
        }

        let control = self.request_control();
        let result = client.upload_single(&file, slot.document_type(), &control).await;
        self.renew_cancellation();
        self.slot_mut(slot).progress = self.upload_progress();

        match result {
            Ok(response) if response.data.is_successful() => {
                let descriptor = response.data;
                self.slot_mut(slot).succeed(descriptor.clone());
                self.field_errors.remove(slot.field_name());
                tracing::info!(slot = %slot, "Retry succeeded");
                Ok(descriptor)
            }
            Ok(response) => {
                let message = response
                    .data
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .or_else(|| Some(response.message).filter(|m| !m.trim().is_empty()))
                    .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string());
                self.slot_mut(slot).fail(message.clone());
                self.field_errors.insert(slot.field_name().to_string(), message.clone());
                let error = ClientError::UploadRejected(message);
                log_client_error(&error, "Retry rejected");
                Err(error)
            }
            Err(e) => {
                log_client_error(&e, "Retry failed");
                let message = e.to_string();
                self.slot_mut(slot).fail(message.clone());
                self.field_errors.insert(slot.field_name().to_string(), message);
                Err(e)
            }
        }
    }

    /// Fetch previously submitted documents once. Failure leaves the form
    /// usable for a fresh submission.
    pub async fn load_existing(&mut self, client: &ApiClient) {
        if self.documents_loaded {
            return;
        }
        self.documents_loaded = true;

        match client.list_documents().await {
            Ok(documents) => self.apply_documents(&documents),
            Err(e) => log_client_error(&e, "Could not load existing documents"),
        }
    }

    pub async fn refresh(&mut self, client: &ApiClient) {
        self.documents_loaded = false;
        self.load_existing(client).await;
    }

    /// Mark slots with a stored document as `success`. Slots holding a local
    /// file that is not yet sent are left alone.
    pub fn apply_documents(&mut self, documents: &[UploadedFileDescriptor]) {
        for descriptor in documents {
            let Some(slot) = descriptor.document_type.as_deref().and_then(SlotId::from_wire) else {
                continue;
            };
            if self.slot(slot).has_pending_file() {
                continue;
            }
            self.slot_mut(slot).succeed(descriptor.clone());
            self.field_errors.remove(slot.field_name());
        }
        self.status = aggregate_status(documents);
        tracing::debug!(documents = documents.len(), status = ?self.status, "Existing documents applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(size: usize) -> LocalFile {
        LocalFile::new("doc.pdf", "application/pdf", vec![0u8; size])
    }

    fn descriptor(document_type: &str, status: DocumentReviewStatus) -> UploadedFileDescriptor {
        UploadedFileDescriptor {
            path: Some(format!("partners/1/{}.pdf", document_type)),
            file_name: "doc.pdf".to_string(),
            document_type: Some(document_type.to_string()),
            verification_status: status,
            ..Default::default()
        }
    }

    #[test]
    fn test_slot_mapping_accepts_business_license_synonym() {
        assert_eq!(SlotId::from_wire("BUSINESS_REGISTRATION"), Some(SlotId::BusinessLicense));
        assert_eq!(SlotId::from_wire("BUSINESS_LICENSE"), Some(SlotId::BusinessLicense));
        assert_eq!(SlotId::from_wire("TAX_IDENTIFICATION"), Some(SlotId::TaxDocument));
        assert_eq!(SlotId::from_wire("ADDITIONAL_DOCUMENT"), Some(SlotId::AdditionalDocument));
        assert_eq!(SlotId::from_wire("PASSPORT"), None);
        for slot in SlotId::ALL {
            assert_eq!(SlotId::from_document_type(slot.document_type()), slot);
        }
    }

    #[test]
    fn test_field_names() {
        assert_eq!(SlotId::BusinessLicense.field_name(), "businessLicense");
        assert_eq!(SlotId::TaxDocument.field_name(), "taxDocument");
        assert_eq!(SlotId::AdditionalDocument.field_name(), "additionalDocument");
    }

    #[test]
    fn test_select_file_violation_does_not_store_file() {
        let mut form = VerificationForm::default();
        let png = LocalFile::new("big.png", "image/png", vec![0u8; 11 * 1024 * 1024]);
        let err = form.select_file(SlotId::TaxDocument, png).unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 10MB");

        let slot = form.slot(SlotId::TaxDocument);
        assert_eq!(slot.status, SlotStatus::Error);
        assert!(slot.file.is_none());
        assert_eq!(
            form.field_errors().get("taxDocument").map(String::as_str),
            Some("File size must be less than 10MB")
        );
    }

    #[test]
    fn test_select_file_rejects_unsupported_type() {
        let mut form = VerificationForm::default();
        let gif = LocalFile::new("a.gif", "image/gif", vec![0u8; 10]);
        let err = form.select_file(SlotId::AdditionalDocument, gif).unwrap_err();
        assert_eq!(err.to_string(), "File must be PDF, JPEG, or PNG");
    }

    #[test]
    fn test_select_file_clears_previous_error() {
        let mut form = VerificationForm::default();
        let _ = form.select_file(SlotId::TaxDocument, LocalFile::new("a.gif", "image/gif", vec![1]));
        form.select_file(SlotId::TaxDocument, pdf(10)).unwrap();
        let slot = form.slot(SlotId::TaxDocument);
        assert_eq!(slot.status, SlotStatus::Selected);
        assert!(slot.error.is_none());
        assert!(form.field_errors().is_empty());
    }

    #[test]
    fn test_accepted_slot_is_locked_until_rejected() {
        let mut form = VerificationForm::default();
        form.apply_documents(&[descriptor("BUSINESS_REGISTRATION", DocumentReviewStatus::Pending)]);
        let err = form.select_file(SlotId::BusinessLicense, pdf(10)).unwrap_err();
        assert_eq!(err, SelectionError::Locked(SlotId::BusinessLicense));

        let mut form = VerificationForm::default();
        form.apply_documents(&[
            descriptor("BUSINESS_LICENSE", DocumentReviewStatus::Rejected),
            descriptor("TAX_IDENTIFICATION", DocumentReviewStatus::Verified),
        ]);
        assert_eq!(form.status(), VerificationStatus::Rejected);
        form.select_file(SlotId::BusinessLicense, pdf(10)).unwrap();
        assert_eq!(form.slot(SlotId::BusinessLicense).status, SlotStatus::Selected);
        assert_eq!(form.status(), VerificationStatus::Pending);
    }

    #[test]
    fn test_rejection_marker_stays_while_another_slot_is_rejected() {
        let mut form = VerificationForm::default();
        form.apply_documents(&[
            descriptor("BUSINESS_REGISTRATION", DocumentReviewStatus::Rejected),
            descriptor("TAX_IDENTIFICATION", DocumentReviewStatus::Rejected),
        ]);
        form.select_file(SlotId::BusinessLicense, pdf(10)).unwrap();
        assert_eq!(form.status(), VerificationStatus::Rejected);
        form.select_file(SlotId::TaxDocument, pdf(10)).unwrap();
        assert_eq!(form.status(), VerificationStatus::Pending);
    }

    #[test]
    fn test_aggregate_status() {
        use DocumentReviewStatus::*;
        assert_eq!(aggregate_status(&[]), VerificationStatus::Pending);
        assert_eq!(
            aggregate_status(&[descriptor("TAX_IDENTIFICATION", Verified)]),
            VerificationStatus::Approved
        );
        assert_eq!(
            aggregate_status(&[
                descriptor("TAX_IDENTIFICATION", Verified),
                descriptor("BUSINESS_REGISTRATION", Rejected)
            ]),
            VerificationStatus::Rejected
        );
        assert_eq!(
            aggregate_status(&[
                descriptor("TAX_IDENTIFICATION", Verified),
                descriptor("BUSINESS_REGISTRATION", Pending)
            ]),
            VerificationStatus::Pending
        );
    }

    #[test]
    fn test_validate_requires_mandatory_slots() {
        let form = VerificationForm::default();
        let errors = form.validate();
        assert_eq!(
            errors.get("businessLicense").map(String::as_str),
            Some("Business license document is required")
        );
        assert_eq!(
            errors.get("taxDocument").map(String::as_str),
            Some("Tax document is required")
        );
        assert!(!errors.contains_key("additionalDocument"));
    }

    #[test]
    fn test_validate_accepts_previously_uploaded_documents() {
        let mut form = VerificationForm::default();
        form.apply_documents(&[
            descriptor("BUSINESS_REGISTRATION", DocumentReviewStatus::Pending),
            descriptor("TAX_IDENTIFICATION", DocumentReviewStatus::Pending),
        ]);
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_validate_requires_replacement_for_rejected_document() {
        let mut form = VerificationForm::default();
        form.apply_documents(&[
            descriptor("BUSINESS_REGISTRATION", DocumentReviewStatus::Rejected),
            descriptor("TAX_IDENTIFICATION", DocumentReviewStatus::Pending),
        ]);
        let errors = form.validate();
        assert!(errors.contains_key("businessLicense"));
        assert!(!errors.contains_key("taxDocument"));
    }

    #[test]
    fn test_submission_outcome_serializes_with_tag() {
        let outcome = SubmissionOutcome::PartialFailure {
            message: "m".to_string(),
            failed: vec![SlotId::TaxDocument],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "partial_failure");
        assert_eq!(json["failed"][0], "taxDocument");
    }
}

//! Domain methods for the partner API client.
//!
//! Uploads, document listing and authentication. All of them share the
//! error normalization in [`crate::response`].

use parkora_core::models::{
    ApiResponse, BatchUploadOutcome, DocumentType, LocalFile, LoginRequest, RegisterPartnerForm,
    RegisterPartnerRequest, TokenResponse, UploadedFileDescriptor, UserIdentity,
};
use parkora_core::validation::validate_registration;
use parkora_core::ClientError;
use serde::Deserialize;

use crate::response::{
    decode_json, DOCUMENTS_MESSAGES, LOGIN_MESSAGES, REGISTER_MESSAGES, UPLOAD_MESSAGES,
};
use crate::transport::{Method, MultipartBody, RequestBody, RequestControl};
use crate::ApiClient;

pub const UPLOAD_PATH: &str = "/storage/upload";
pub const DOCUMENTS_PATH: &str = "/storage/documents";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PARTNER_PATH: &str = "/auth/register/partners";

/// Multipart field name of each document type in a batch upload.
const BATCH_FIELDS: &[(DocumentType, &str)] = &[
    (DocumentType::BusinessRegistration, "businessLicense"),
    (DocumentType::TaxIdentification, "taxDocument"),
    (DocumentType::AdditionalDocument, "additionalDocument"),
];

/// Files for one batch upload. Absent slots are not sent.
#[derive(Debug, Clone, Default)]
pub struct BatchFiles {
    pub business_license: Option<LocalFile>,
    pub tax_document: Option<LocalFile>,
    pub additional_document: Option<LocalFile>,
}

impl BatchFiles {
    pub fn field_name(document_type: DocumentType) -> &'static str {
        BATCH_FIELDS
            .iter()
            .find(|(t, _)| *t == document_type)
            .map(|(_, name)| *name)
            .unwrap_or("file")
    }

    pub fn insert(&mut self, document_type: DocumentType, file: LocalFile) {
        *self.slot_mut(document_type) = Some(file);
    }

    pub fn get(&self, document_type: DocumentType) -> Option<&LocalFile> {
        match document_type {
            DocumentType::BusinessRegistration => self.business_license.as_ref(),
            DocumentType::TaxIdentification => self.tax_document.as_ref(),
            DocumentType::AdditionalDocument => self.additional_document.as_ref(),
        }
    }

    fn slot_mut(&mut self, document_type: DocumentType) -> &mut Option<LocalFile> {
        match document_type {
            DocumentType::BusinessRegistration => &mut self.business_license,
            DocumentType::TaxIdentification => &mut self.tax_document,
            DocumentType::AdditionalDocument => &mut self.additional_document,
        }
    }

    pub fn len(&self) -> usize {
        BATCH_FIELDS
            .iter()
            .filter(|(t, _)| self.get(*t).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Each present file plus a `<field>DocumentType` text part naming its type.
    pub fn into_multipart(mut self) -> MultipartBody {
        let mut body = MultipartBody::new();
        for (document_type, field) in BATCH_FIELDS {
            if let Some(file) = self.slot_mut(*document_type).take() {
                body = body
                    .file(*field, file)
                    .text(format!("{}DocumentType", field), document_type.as_wire());
            }
        }
        body
    }
}

/// `GET /storage/documents` answers either with a bare array or inside an envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DocumentList {
    Bare(Vec<UploadedFileDescriptor>),
    Envelope {
        #[serde(default)]
        data: Option<Vec<UploadedFileDescriptor>>,
    },
}

impl DocumentList {
    pub fn into_documents(self) -> Vec<UploadedFileDescriptor> {
        match self {
            DocumentList::Bare(documents) => documents,
            DocumentList::Envelope { data } => data.unwrap_or_default(),
        }
    }
}

fn token_or_unauthorized(response: TokenResponse, fallback: &str) -> Result<String, ClientError> {
    match response.data.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => {
            let message = response.message.trim();
            Err(ClientError::Unauthorized(if message.is_empty() {
                fallback.to_string()
            } else {
                message.to_string()
            }))
        }
    }
}

impl ApiClient {
    /// Upload one document.
    pub async fn upload_single(
        &self,
        file: &LocalFile,
        document_type: DocumentType,
        control: &RequestControl,
    ) -> Result<ApiResponse<UploadedFileDescriptor>, ClientError> {
        let body = MultipartBody::new()
            .file("file", file.clone())
            .text("documentType", document_type.as_wire());

        let outcome = self
            .dispatch(Method::Post, UPLOAD_PATH, RequestBody::Multipart(body), control)
            .await;
        let response: ApiResponse<UploadedFileDescriptor> = decode_json(outcome, &UPLOAD_MESSAGES)?;

        tracing::info!(
            document_type = %document_type,
            file_name = %response.data.file_name,
            "Document uploaded"
        );
        Ok(response)
    }

    /// Upload every present slot in one request. Progress covers the whole batch.
    pub async fn upload_batch(
        &self,
        files: BatchFiles,
        control: &RequestControl,
    ) -> Result<ApiResponse<BatchUploadOutcome>, ClientError> {
        let file_count = files.len();
        let body = files.into_multipart();

        let outcome = self
            .dispatch(Method::Post, UPLOAD_PATH, RequestBody::Multipart(body), control)
            .await;
        let batch: BatchUploadOutcome = decode_json(outcome, &UPLOAD_MESSAGES)?;

        tracing::info!(
            sent = file_count,
            total_files = batch.total_files,
            successful_uploads = batch.successful_uploads,
            failed_uploads = batch.failed_uploads,
            "Batch upload finished"
        );
        Ok(ApiResponse::from_batch(batch))
    }

    /// Documents already submitted by the signed-in partner.
    pub async fn list_documents(&self) -> Result<Vec<UploadedFileDescriptor>, ClientError> {
        let outcome = self
            .dispatch(
                Method::Get,
                DOCUMENTS_PATH,
                RequestBody::Empty,
                &RequestControl::new(),
            )
            .await;
        let list: DocumentList = decode_json(outcome, &DOCUMENTS_MESSAGES)?;
        Ok(list.into_documents())
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ClientError> {
        let body = serde_json::to_value(request)?;
        let outcome = self
            .dispatch(
                Method::Post,
                LOGIN_PATH,
                RequestBody::Json(body),
                &RequestControl::new(),
            )
            .await;
        decode_json(outcome, &LOGIN_MESSAGES)
    }

    /// Validates the form before sending; field errors never reach the network.
    pub async fn register_partner(
        &self,
        form: &RegisterPartnerForm,
    ) -> Result<TokenResponse, ClientError> {
        let errors = validate_registration(form);
        if !errors.is_empty() {
            let summary = errors
                .iter()
                .map(|(field, message)| format!("{}: {}", field, message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ClientError::Validation(summary));
        }

        let body = serde_json::to_value(RegisterPartnerRequest::from(form))?;
        let outcome = self
            .dispatch(
                Method::Post,
                REGISTER_PARTNER_PATH,
                RequestBody::Json(body),
                &RequestControl::new(),
            )
            .await;
        decode_json(outcome, &REGISTER_MESSAGES)
    }

    /// Log in and start a session with the returned token.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserIdentity, ClientError> {
        let response = self
            .login(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        let token = token_or_unauthorized(response, LOGIN_MESSAGES.fallback)?;
        self.session().login(&token)
    }

    /// Register and, if the server issued a token, start a session with it.
    pub async fn sign_up(
        &self,
        form: &RegisterPartnerForm,
    ) -> Result<Option<UserIdentity>, ClientError> {
        let response = self.register_partner(form).await?;
        match response.data.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => self.session().login(token).map(Some),
            _ => Ok(None),
        }
    }
}

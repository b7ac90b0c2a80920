//! Parkora Core Library
//!
//! This crate provides the domain models, error types, configuration, token
//! decoding and validation policies shared by the Parkora partner client crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod token;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, StorageKeys};
pub use models::{
    ApiResponse, BatchUploadOutcome, DocumentReviewStatus, DocumentType, LocalFile, RoleSet,
    UploadedFileDescriptor, UserIdentity,
};
pub use error::{log_client_error, ClientError, ErrorMetadata, LogLevel, TokenError};
pub use token::{decode_token, is_expired, is_expired_at, now_epoch_secs, TokenClaims};
pub use validation::{FieldErrors, FilePolicy, FileViolation};

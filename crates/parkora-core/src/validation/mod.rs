//! Validation modules

pub mod file_policy;
pub mod register;

use std::collections::BTreeMap;

/// Field name to the first human-readable message raised for it.
pub type FieldErrors = BTreeMap<String, String>;

pub use file_policy::{FilePolicy, FileViolation, ALLOWED_CONTENT_TYPES, MAX_FILE_SIZE_BYTES};
pub use register::validate_registration;

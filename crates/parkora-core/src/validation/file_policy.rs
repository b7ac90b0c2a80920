//! Size and type policy for verification documents.

use crate::models::LocalFile;

pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: &[&str] =
    &["application/pdf", "image/jpeg", "image/jpg", "image/png"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileViolation {
    #[error("File size must be less than {max_mb}MB")]
    TooLarge { size: u64, max_mb: u64 },

    #[error("File must be PDF, JPEG, or PNG")]
    UnsupportedType(String),
}

#[derive(Debug, Clone)]
pub struct FilePolicy {
    pub max_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FilePolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: MAX_FILE_SIZE_BYTES,
            allowed_content_types: ALLOWED_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FilePolicy {
    /// Size is checked before type.
    pub fn check(&self, file: &LocalFile) -> Result<(), FileViolation> {
        if file.size() > self.max_size_bytes {
            return Err(FileViolation::TooLarge {
                size: file.size(),
                max_mb: self.max_size_bytes / (1024 * 1024),
            });
        }

        // Ignore parameters such as `; charset=binary`.
        let essence = file
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if !self.allowed_content_types.iter().any(|t| *t == essence) {
            return Err(FileViolation::UnsupportedType(file.content_type.clone()));
        }
        Ok(())
    }
}

//! Data models for the application
//!
//! Wire shapes exchanged with the remote API plus the client-side identity
//! derived from token claims.

mod auth;
mod document;
mod envelope;
mod user;

// Re-export all models for convenient imports
pub use auth::*;
pub use document::*;
pub use envelope::*;
pub use user::*;

//! Shared constants

/// Role required for the partner dashboard and verification pages.
pub const PARTNER_ROLE: &str = "partners";

/// Role required for the admin dashboard.
pub const ADMIN_ROLE: &str = "admin";

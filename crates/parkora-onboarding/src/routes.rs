//! Page routes and the access rule attached to each.

use parkora_core::constants::{ADMIN_ROLE, PARTNER_ROLE};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    PartnerDashboard,
    Verification,
    AdminDashboard,
    AccessDenied,
}

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Sign-in pages. Signed-in users are sent to their landing page.
    Public,
    /// Anyone, signed in or not.
    Open,
    /// Signed-in users holding `role`, or any signed-in user when `None`.
    Protected { role: Option<&'static str> },
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Register,
        Route::ForgotPassword,
        Route::PartnerDashboard,
        Route::Verification,
        Route::AdminDashboard,
        Route::AccessDenied,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::ForgotPassword => "/forgot-password",
            Route::PartnerDashboard => "/",
            Route::Verification => "/verification",
            Route::AdminDashboard => "/admin",
            Route::AccessDenied => "/access-denied",
        }
    }

    /// Exact path match; a trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }

    pub fn access(&self) -> RouteAccess {
        match self {
            Route::Login | Route::Register | Route::ForgotPassword => RouteAccess::Public,
            Route::AccessDenied => RouteAccess::Open,
            Route::PartnerDashboard | Route::Verification => RouteAccess::Protected {
                role: Some(PARTNER_ROLE),
            },
            Route::AdminDashboard => RouteAccess::Protected {
                role: Some(ADMIN_ROLE),
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

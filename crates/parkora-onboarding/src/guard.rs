//! Navigation guard
//!
//! The decision is made from local session state only. Token expiry is
//! checked here as a convenience; the API still rejects stale tokens itself.

use parkora_api_client::SessionStore;
use parkora_core::{now_epoch_secs, UserIdentity};
use serde::Serialize;

use crate::routes::{Route, RouteAccess};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "route", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    AccessDenied,
    Redirect(Route),
}

/// Where a signed-in user lands when visiting a sign-in page.
pub fn landing_route(user: &UserIdentity) -> Route {
    if user.is_admin() {
        Route::AdminDashboard
    } else {
        Route::PartnerDashboard
    }
}

pub fn can_enter(route: Route, session: &SessionStore) -> GuardDecision {
    can_enter_at(route, session, now_epoch_secs())
}

/// An expired token found here signs the session out as a side effect.
pub fn can_enter_at(route: Route, session: &SessionStore, now: i64) -> GuardDecision {
    match route.access() {
        RouteAccess::Open => GuardDecision::Allow,
        RouteAccess::Public => {
            if !session.is_authenticated() || !session.ensure_fresh_at(now) {
                return GuardDecision::Allow;
            }
            match session.user() {
                Some(user) => GuardDecision::Redirect(landing_route(&user)),
                None => GuardDecision::Allow,
            }
        }
        RouteAccess::Protected { role } => {
            if !session.is_authenticated() || !session.ensure_fresh_at(now) {
                tracing::debug!(route = %route, "Not signed in");
                return GuardDecision::RedirectToLogin;
            }
            let Some(user) = session.user() else {
                return GuardDecision::RedirectToLogin;
            };
            match role {
                Some(role) if !user.has_role(role) => {
                    tracing::info!(route = %route, user_id = %user.id, role, "Missing required role");
                    GuardDecision::AccessDenied
                }
                _ => GuardDecision::Allow,
            }
        }
    }
}

//! Partner onboarding workflow.
//!
//! [`verification`] drives the document submission form: per-slot file
//! selection, batch submission with partial-failure reconciliation, single
//! slot retry and rehydration from previously submitted documents.
//! [`guard`] decides whether a route may be entered with the current session.

pub mod guard;
pub mod routes;
pub mod verification;

pub use guard::{can_enter, can_enter_at, landing_route, GuardDecision};
pub use routes::{Route, RouteAccess};
pub use verification::{
    aggregate_status, FileSlot, SelectionError, SlotId, SlotStatus, SubmissionOutcome,
    VerificationForm, VerificationStatus,
};

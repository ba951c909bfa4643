//! provider-session-axum - Axum bindings for provider-session
//!
//! Three integration points: [`auth_router`] mounts the login lifecycle
//! routes, [`require_session`] guards protected route trees, and [`AuthUser`]
//! extracts the authenticated user in handlers.

mod error;
mod middleware;
mod router;
mod session;
#[cfg(test)]
mod test_utils;

pub use middleware::require_session;
pub use router::auth_router;
pub use session::{AuthRejection, AuthUser};

// Re-exported so applications depending on this crate alone can reach the
// names they need for wiring and tests.
pub use provider_session::{CSRF_HEADER, SESSION_COOKIE_NAME};

//! Navigation guard
//!
//! Decides, before a route transition completes, whether the transition may
//! proceed or must be redirected. The rules are checked in order and the first
//! match wins:
//!
//! 1. auth required, no session → login
//! 2. guest only, session present → the session role's dashboard
//! 3. role required, session role differs → the session role's dashboard
//! 4. proceed
//!
//! A role mismatch never produces a "forbidden" outcome; the user is sent to
//! their own dashboard instead.

use tracing::debug;

use crate::route::{Access, DASHBOARD_PATH, DOCTOR_DASHBOARD_PATH, LOGIN_PATH};
use crate::session::Session;
use crate::types::Role;

/// Outcome of a guard evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Redirect(&'static str),
}

impl Decision {
    pub const fn is_proceed(self) -> bool {
        matches!(self, Self::Proceed)
    }

    pub const fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::Redirect(path) => Some(path),
            Self::Proceed => None,
        }
    }
}

/// Landing page for a role. Anything but `DOCTOR`, including no role at
/// all, lands on the patient dashboard.
pub const fn dashboard_for(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Doctor) => DOCTOR_DASHBOARD_PATH,
        _ => DASHBOARD_PATH,
    }
}

/// Evaluate the guard for a transition from `from` to `to`
pub fn evaluate(to: &str, access: Access, from: &str, session: &Session) -> Decision {
    debug!(
        to,
        from,
        authenticated = session.is_authenticated,
        "Navigation"
    );

    if access.requires_auth() && !session.is_authenticated {
        debug!("Redirecting to login: requires auth but not authenticated");
        return Decision::Redirect(LOGIN_PATH);
    }

    if access.requires_guest() && session.is_authenticated {
        debug!("Redirecting to dashboard: authenticated user trying to access guest page");
        return Decision::Redirect(dashboard_for(session.user_role()));
    }

    if let Some(required) = access.required_role() {
        if session.user_role() != Some(required) {
            debug!(required = %required, "Redirecting to dashboard: user type mismatch");
            return Decision::Redirect(dashboard_for(session.user_role()));
        }
    }

    debug!("Navigation allowed");
    Decision::Proceed
}

//! Route protection for authenticated-only screens.

use crate::store::SessionStore;
use std::sync::Arc;
use tracing::debug;

/// Where an anonymous user is sent.
pub const LOGIN_ROUTE: &str = "/login";

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny { redirect_to: &'static str },
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// Gates protected content on the session store. Reads only; never calls the
/// network.
#[derive(Clone)]
pub struct AuthGuard {
    session: Arc<SessionStore>,
}

impl AuthGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub fn check_access(&self) -> Access {
        if self.session.is_authenticated() {
            Access::Allow
        } else {
            debug!(redirect_to = LOGIN_ROUTE, "Access denied");
            Access::Deny {
                redirect_to: LOGIN_ROUTE,
            }
        }
    }
}

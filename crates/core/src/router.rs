//! Route resolution with the navigation guard applied

use thiserror::Error;
use tracing::{debug, warn};

use crate::guard::{Decision, evaluate};
use crate::route::{Access, Route, RouteTable, normalize};
use crate::session::Session;

/// Upper bound on guard and static redirects followed for one navigation
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("Redirect loop navigating to {to}: {}", chain.join(" -> "))]
    RedirectLoop { to: String, chain: Vec<String> },
}

/// Where a navigation ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Final path after all redirects
    pub path: String,
    /// Matched route, `None` when nothing in the table matches
    pub route: Option<&'static Route>,
    /// Paths that were redirected away from, in order
    pub redirected_from: Vec<String>,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        !self.redirected_from.is_empty()
    }
}

/// Router over a route table
#[derive(Debug, Clone, Copy, Default)]
pub struct Router {
    table: RouteTable,
}

impl Router {
    pub const fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Navigate to `to`, running the guard against `session` before each
    /// transition. Redirect targets go through the guard again.
    pub fn navigate(
        &self,
        to: &str,
        from: &str,
        session: &Session,
    ) -> Result<Navigation, RouterError> {
        let mut current = normalize(to).to_string();
        let mut redirected_from = Vec::new();

        loop {
            let route = self.table.resolve(&current);
            let decision = match route.and_then(|r| r.redirect) {
                Some(target) => {
                    debug!(from = %current, to = target, "Static redirect");
                    Decision::Redirect(target)
                }
                None => {
                    let access = route.map_or(Access::Public, |r| r.access);
                    evaluate(&current, access, from, session)
                }
            };

            match decision {
                Decision::Proceed => {
                    if route.is_none() {
                        debug!(path = %current, "No route matched");
                    }
                    return Ok(Navigation {
                        path: current,
                        route,
                        redirected_from,
                    });
                }
                Decision::Redirect(_) if redirected_from.len() == MAX_REDIRECTS => {
                    warn!(to, "Giving up after {MAX_REDIRECTS} redirects");
                    return Err(RouterError::RedirectLoop {
                        to: to.to_string(),
                        chain: redirected_from,
                    });
                }
                Decision::Redirect(target) => {
                    redirected_from.push(std::mem::replace(&mut current, target.to_string()));
                }
            }
        }
    }
}

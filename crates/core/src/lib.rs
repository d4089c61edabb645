//! HealthTrack core types and navigation logic
//!
//! Everything in this crate is synchronous and free of I/O except the
//! file-backed token storage. The async session store lives in
//! `healthtrack-session`, the HTTP client in `healthtrack-http`.

pub mod error;
pub mod guard;
pub mod route;
pub mod router;
pub mod session;
pub mod storage;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult};
pub use guard::{Decision, dashboard_for, evaluate};
pub use route::{Access, ROUTES, Route, RouteTable, View};
pub use router::{Navigation, Router, RouterError};
pub use session::Session;
pub use storage::{FileTokenStorage, MemoryTokenStorage, TOKEN_KEY, TokenStorage};
pub use types::{Role, UserProfile};
pub use validation::ValidateConfig;

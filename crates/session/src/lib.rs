//! Authentication session store
//!
//! [`SessionStore`] owns the current [`Session`](healthtrack_core::Session),
//! persists its token through a [`TokenStorage`](healthtrack_core::TokenStorage)
//! and talks to the API through `healthtrack-http`. It is an ordinary value:
//! create one per application run and pass it to whatever needs it.

pub mod error;
pub mod store;

pub use error::SessionError;
pub use store::SessionStore;

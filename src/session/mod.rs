//! Session state, persistence and expiry.

pub mod expiry;
pub mod storage;
mod store;

pub use expiry::{
    AuthRedirect, DEFAULT_EXPIRY_CHECK_INTERVAL, ExpiryMonitor, NoRedirect, check_once,
};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, Slot};
pub use store::{LogoutReason, SessionState, SessionStore};

#[cfg(test)]
pub(crate) use store::sample_user;

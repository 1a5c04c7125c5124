//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionManager`: current user, login/logout/refetch and change notification
//! - `TokenStore`: persistence of the credential token, with file, keychain
//!   and in-memory backends
//!
//! The persisted token is the only thing that survives a restart; the user
//! record is always re-fetched from the backend.

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::KeyringTokenStore;
pub use session::{ProfileSource, SessionManager, SessionSnapshot, SessionState};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

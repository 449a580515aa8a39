//! # session-tokens
//!
//! Short-lived, unguessable session tokens mapped to application values.
//!
//! A [`SessionStore`] issues tokens with a [`Salter`](crypt::Salter) and keeps
//! each token's value in a pluggable [`ExpiringStore`]. Missing and expired
//! tokens both surface as [`SessionError::InvalidToken`].
//!
//! ## Features
//!
//! - **Tunable token generation**: fast (system PRNG) or secure (several
//!   entropy sources) policies
//! - **Pluggable storage**: any store implementing [`ExpiringStore`]
//! - **In-memory store**: global or per-entry TTL with an optional background
//!   sweeper
//! - **Explicit fatal errors**: token collisions and entropy failures are
//!   reported as distinct, fatal variants
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use session_tokens::{MemoryStore, SessionError, SessionStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::<Option<String>>::new(Duration::from_secs(1800)));
//! let sessions = SessionStore::builder()
//!     .salter_secure(b"CvoTVwDw685Ve0qjGn".to_vec())
//!     .store(Arc::clone(&store))
//!     .build()?;
//!
//! let token = sessions.add(None)?;
//! sessions.set(&token, Some("alice".to_string()))?;
//! assert_eq!(sessions.get(&token)?, Some("alice".to_string()));
//!
//! sessions.delete(&token)?;
//! assert!(matches!(sessions.get(&token), Err(SessionError::InvalidToken(_))));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod crypt;
pub mod error;
pub mod logging;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use crypt::{Salter, SalterPolicy};
pub use error::{BuildError, RandomError, Result, SessionError, StoreError};
pub use session::{SessionStore, SessionStoreBuilder, Token};
pub use store::{ExpiringStore, MemoryStore};

//! Session lifecycle.
//!
//! This module provides the session token type, the session store facade
//! that issues tokens and translates store errors, and its builder.

mod builder;
mod store;
mod token;

pub use builder::SessionStoreBuilder;
pub use store::SessionStore;
pub use token::Token;

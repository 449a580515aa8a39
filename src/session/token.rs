//! Session token type.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Number of characters shown when a token is logged.
const LOG_PREFIX_LEN: usize = 8;

/// Opaque identifier of a session entry.
///
/// Tokens are only produced by a [`Salter`](crate::crypt::Salter); callers
/// never choose them. They consist of URL-safe base64 characters and can be
/// used as store keys, cookie values or path segments without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(String);

impl Token {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    /// Borrow the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// A short prefix safe to put in logs.
    pub fn log_prefix(&self) -> &str {
        log_prefix(&self.0)
    }
}

/// Leading characters of a raw token string, for logging.
pub(crate) fn log_prefix(token: &str) -> &str {
    match token.char_indices().nth(LOG_PREFIX_LEN) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}

impl Deref for Token {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

//! Token derivation from a static salt and fresh randomness.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::random::RandomSourceList;
use crate::error::RandomError;
use crate::session::Token;

/// Bytes of randomness drawn for every default token.
pub const DEFAULT_TOKEN_ENTROPY: usize = 32;

/// Token generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalterPolicy {
    /// Thread-local system PRNG only. Tokens take at most tens of
    /// microseconds to generate.
    Fast,
    /// OS CSPRNG, system PRNG and timing jitter combined. A few microseconds
    /// in the best case, typically low milliseconds under load.
    #[default]
    Secure,
}

impl SalterPolicy {
    /// Whether the policy accepts an empty salt.
    pub fn allows_empty_salt(&self) -> bool {
        matches!(self, Self::Fast)
    }

    /// The randomness sources backing this policy.
    pub fn sources(&self) -> RandomSourceList {
        match self {
            Self::Fast => RandomSourceList::fast(),
            Self::Secure => RandomSourceList::secure(),
        }
    }
}

impl fmt::Display for SalterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => f.write_str("fast"),
            Self::Secure => f.write_str("secure"),
        }
    }
}

impl FromStr for SalterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "secure" => Ok(Self::Secure),
            other => Err(format!("unknown salter policy: {}", other)),
        }
    }
}

/// Derives tokens from a static salt and a list of randomness sources.
///
/// A token is `base64url(SHA-256(salt || random))` without padding, so it is
/// safe as a store key, cookie value or URL segment. The derivation is
/// deterministic for a given salt and random input; only the randomness
/// changes between calls.
///
/// The salter is immutable after construction and can be shared between
/// threads.
pub struct Salter {
    sources: RandomSourceList,
    salt: Vec<u8>,
}

impl Salter {
    /// Create a salter from explicit sources and a salt.
    pub fn new(sources: RandomSourceList, salt: impl Into<Vec<u8>>) -> Self {
        Self {
            sources,
            salt: salt.into(),
        }
    }

    /// Create a salter relying only on the system PRNG.
    pub fn fast(salt: impl Into<Vec<u8>>) -> Self {
        Self::from_policy(SalterPolicy::Fast, salt)
    }

    /// Create a salter combining several entropy sources.
    ///
    /// Slower than [`Salter::fast`]: each token costs a syscall and a round of
    /// timing jitter collection.
    pub fn secure(salt: impl Into<Vec<u8>>) -> Self {
        Self::from_policy(SalterPolicy::Secure, salt)
    }

    /// Create a salter for the given policy.
    pub fn from_policy(policy: SalterPolicy, salt: impl Into<Vec<u8>>) -> Self {
        Self::new(policy.sources(), salt)
    }

    /// Generate a token from [`DEFAULT_TOKEN_ENTROPY`] random bytes.
    pub fn default_token(&self) -> Result<Token, RandomError> {
        self.token(DEFAULT_TOKEN_ENTROPY)
    }

    /// Generate a token from `entropy_len` random bytes.
    pub fn token(&self, entropy_len: usize) -> Result<Token, RandomError> {
        if entropy_len == 0 {
            return Err(RandomError::EmptyRequest);
        }

        let mut random = vec![0u8; entropy_len];
        self.sources.fill(&mut random)?;
        Ok(self.derive(&random))
    }

    /// Derive the token for a given random input.
    pub fn derive(&self, random: &[u8]) -> Token {
        let mut hasher = Sha256::new();
        hasher.update(&self.salt);
        hasher.update(random);
        Token::new(URL_SAFE_NO_PAD.encode(hasher.finalize()))
    }

    /// Length of the configured salt in bytes.
    pub fn salt_len(&self) -> usize {
        self.salt.len()
    }

    /// The randomness sources in use.
    pub fn sources(&self) -> &RandomSourceList {
        &self.sources
    }
}

impl fmt::Debug for Salter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The salt is secret material.
        f.debug_struct("Salter")
            .field("sources", &self.sources)
            .field("salt_len", &self.salt.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SALT: &[u8] = b"CvoTVwDw685Ve0qjGn//zmHGKvoCcslYNQT4AQ9FygSk9t6NuzBHuohyO";

    #[test]
    fn test_derive_is_deterministic() {
        let salter = Salter::fast(SALT);
        let random = [7u8; 32];
        assert_eq!(salter.derive(&random), salter.derive(&random));
    }

    #[test]
    fn test_derive_depends_on_salt() {
        let a = Salter::fast(b"salt-a".to_vec());
        let b = Salter::fast(b"salt-b".to_vec());
        let random = [1u8; 32];
        assert_ne!(a.derive(&random), b.derive(&random));
    }

    #[test]
    fn test_token_is_url_safe() {
        let salter = Salter::fast(SALT);
        for _ in 0..100 {
            let token = salter.default_token().unwrap();
            // 32 digest bytes -> 43 unpadded base64 characters.
            assert_eq!(token.len(), 43);
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_uniqueness_fast() {
        let salter = Salter::fast(SALT);
        let mut tokens = HashSet::new();
        for _ in 0..10_000 {
            let token = salter.default_token().unwrap();
            assert!(tokens.insert(token.clone()), "Duplicate token: {}", token);
        }
    }

    #[test]
    fn test_uniqueness_secure() {
        let salter = Salter::secure(SALT);
        let mut tokens = HashSet::new();
        for _ in 0..200 {
            assert!(tokens.insert(salter.default_token().unwrap()));
        }
    }

    #[test]
    fn test_empty_salt_still_random() {
        let salter = Salter::fast(Vec::new());
        assert_ne!(
            salter.default_token().unwrap(),
            salter.default_token().unwrap()
        );
    }

    #[test]
    fn test_zero_entropy_rejected() {
        let salter = Salter::fast(SALT);
        assert!(matches!(salter.token(0), Err(RandomError::EmptyRequest)));
    }

    #[test]
    fn test_empty_source_list_fails() {
        let salter = Salter::new(RandomSourceList::new(), SALT);
        assert!(matches!(
            salter.default_token(),
            Err(RandomError::NoSources)
        ));
    }

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!("fast".parse::<SalterPolicy>().unwrap(), SalterPolicy::Fast);
        assert_eq!(
            "SECURE".parse::<SalterPolicy>().unwrap(),
            SalterPolicy::Secure
        );
        assert!("weak".parse::<SalterPolicy>().is_err());
        assert_eq!(SalterPolicy::Fast.to_string(), "fast");
        assert_eq!(SalterPolicy::default(), SalterPolicy::Secure);
    }

    #[test]
    fn test_debug_hides_salt() {
        let salter = Salter::fast(b"super-secret".to_vec());
        let debug = format!("{:?}", salter);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("salt_len: 12"));
    }
}

//! Token generation.
//!
//! A [`Salter`] combines a static salt with bytes drawn from a
//! [`RandomSourceList`]. Two policies are available:
//!
//! - **Fast**: thread-local system PRNG only
//! - **Secure**: OS CSPRNG, system PRNG and timing jitter XORed together
//!
//! ## Example
//!
//! ```rust
//! use session_tokens::crypt::Salter;
//!
//! let salter = Salter::fast(b"my-static-salt".to_vec());
//! let token = salter.default_token().unwrap();
//! assert_eq!(token.len(), 43);
//! ```

pub mod random;
pub mod salter;

pub use random::{JitterRandom, OsRandom, RandomSource, RandomSourceList, SystemRandom};
pub use salter::{Salter, SalterPolicy, DEFAULT_TOKEN_ENTROPY};

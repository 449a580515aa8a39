//! Randomness sources for token generation.

use std::fmt;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::{RngCore, TryRngCore};
use sha2::{Digest, Sha256};

use crate::error::RandomError;

/// A source of raw random bytes.
pub trait RandomSource: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Fill `buf` completely with random bytes.
    ///
    /// Fails only on catastrophic system failure.
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomError>;
}

/// Thread-local CSPRNG seeded from the operating system.
///
/// This is the fast default: no syscall per call, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn name(&self) -> &'static str {
        "system"
    }

    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomError> {
        rand::rng().fill_bytes(buf);
        Ok(())
    }
}

/// The operating system CSPRNG, read on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn name(&self) -> &'static str {
        "os"
    }

    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| RandomError::Source {
                source_name: self.name(),
                message: e.to_string(),
            })
    }
}

/// Default number of timing samples condensed into each 32-byte block.
pub const DEFAULT_JITTER_ROUNDS: u32 = 128;

/// Entropy gathered from CPU timing jitter.
///
/// Every round times a small SHA-256 workload and feeds the measured
/// nanoseconds into an accumulator digest. The output does not depend on the
/// OS random device, at the cost of latency: roughly tens of microseconds per
/// 32 bytes with the default round count, more on loaded machines.
#[derive(Debug, Clone, Copy)]
pub struct JitterRandom {
    rounds: u32,
}

impl JitterRandom {
    /// Create a jitter source sampling `rounds` timings per 32-byte block.
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
        }
    }

    /// Number of timing samples per block.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    fn block(&self, counter: u64) -> [u8; 32] {
        let mut acc = Sha256::new();
        acc.update(counter.to_le_bytes());
        if let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) {
            acc.update(now.as_nanos().to_le_bytes());
        }

        let mut scratch = [0u8; 32];
        for round in 0..self.rounds {
            let start = Instant::now();
            let mut work = Sha256::new();
            work.update(scratch);
            work.update(round.to_le_bytes());
            scratch = work.finalize().into();
            acc.update(start.elapsed().as_nanos().to_le_bytes());
        }
        acc.update(scratch);
        acc.finalize().into()
    }
}

impl Default for JitterRandom {
    fn default() -> Self {
        Self::new(DEFAULT_JITTER_ROUNDS)
    }
}

impl RandomSource for JitterRandom {
    fn name(&self) -> &'static str {
        "jitter"
    }

    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomError> {
        for (i, chunk) in buf.chunks_mut(32).enumerate() {
            let block = self.block(i as u64);
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
        Ok(())
    }
}

/// An ordered list of randomness sources combined by XOR.
///
/// The first source fills the buffer and every following source is XORed in,
/// so the output is at least as unpredictable as the strongest member.
pub struct RandomSourceList {
    sources: Vec<Box<dyn RandomSource>>,
}

impl RandomSourceList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Only the thread-local system PRNG.
    pub fn fast() -> Self {
        Self::new().with_source(SystemRandom)
    }

    /// OS CSPRNG, system PRNG and timing jitter combined.
    pub fn secure() -> Self {
        Self::new()
            .with_source(OsRandom)
            .with_source(SystemRandom)
            .with_source(JitterRandom::default())
    }

    /// Append a source.
    pub fn with_source(mut self, source: impl RandomSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of configured sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if no sources are configured.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Names of the configured sources, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Fill `buf` from every source.
    pub fn fill(&self, buf: &mut [u8]) -> Result<(), RandomError> {
        let (first, rest) = self.sources.split_first().ok_or(RandomError::NoSources)?;
        first.fill(buf)?;

        if rest.is_empty() {
            return Ok(());
        }

        let mut scratch = vec![0u8; buf.len()];
        for source in rest {
            source.fill(&mut scratch)?;
            for (b, s) in buf.iter_mut().zip(scratch.iter()) {
                *b ^= s;
            }
        }
        Ok(())
    }
}

impl Default for RandomSourceList {
    fn default() -> Self {
        Self::fast()
    }
}

impl fmt::Debug for RandomSourceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSourceList")
            .field("sources", &self.names())
            .finish()
    }
}

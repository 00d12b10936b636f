// Prime Generation
// Random odd candidates of exact bit length, filtered by Miller-Rabin

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::{CryptoRng, RngCore};

use super::bigint::{random_bits, RsaBigInt};
use super::error::{Result, RsaError};
use super::primality::is_probably_prime_with_rng;
use crate::config::{RsaConfig, DEFAULT_ROUNDS, MIN_PRIME_BITS};

/// Shared flag that stops a running prime search.
///
/// Clones observe the same flag, so one can be handed to another thread
/// while the search runs.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Searches for probable primes of a requested size.
#[derive(Clone, Debug)]
pub struct PrimeGenerator {
    rounds: usize,
    max_attempts: Option<usize>,
    cancel: CancelFlag,
}

impl Default for PrimeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ROUNDS)
    }
}

impl PrimeGenerator {
    pub fn new(rounds: usize) -> Self {
        Self {
            rounds,
            max_attempts: None,
            cancel: CancelFlag::new(),
        }
    }

    pub fn from_config(config: &RsaConfig) -> Self {
        Self::new(config.miller_rabin_rounds).with_max_attempts(config.max_prime_attempts)
    }

    /// Limit the number of candidates tried per prime. `None` removes the limit.
    pub fn with_max_attempts(mut self, max_attempts: Option<usize>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Generate a prime using `thread_rng`.
    pub fn generate_prime(&self, bit_length: usize) -> Result<RsaBigInt> {
        self.generate_prime_with_rng(bit_length, &mut rand::thread_rng())
    }

    /// Generate a prime of exactly `bit_length` bits.
    ///
    /// Each candidate is drawn uniformly, then its lowest bit (odd) and
    /// highest bit (exact size) are forced to 1 before testing.
    pub fn generate_prime_with_rng<R: RngCore + CryptoRng + ?Sized>(
        &self,
        bit_length: usize,
        rng: &mut R,
    ) -> Result<RsaBigInt> {
        if bit_length < MIN_PRIME_BITS {
            return Err(RsaError::InvalidBitLength {
                min: MIN_PRIME_BITS,
                actual: bit_length,
            });
        }
        if self.rounds == 0 {
            return Err(RsaError::InvalidRounds);
        }

        let top_bit = (bit_length - 1) as u64;
        let mut attempts = 0usize;

        loop {
            if self.cancel.is_cancelled() {
                log::debug!("{}-bit prime search cancelled after {} attempts", bit_length, attempts);
                return Err(RsaError::Cancelled);
            }
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(RsaError::PrimeGenerationExhausted {
                        bit_length,
                        attempts,
                    });
                }
            }
            attempts += 1;

            let mut candidate = random_bits(rng, bit_length);
            candidate.set_bit(0, true);
            candidate.set_bit(top_bit, true);

            if is_probably_prime_with_rng(&candidate, self.rounds, rng) {
                log::debug!("found {}-bit prime after {} attempts", bit_length, attempts);
                return Ok(candidate);
            }
        }
    }
}

/// Generate a prime of `bit_length` bits with the default round count and no attempt cap.
pub fn generate_prime(bit_length: usize) -> Result<RsaBigInt> {
    PrimeGenerator::default().generate_prime(bit_length)
}

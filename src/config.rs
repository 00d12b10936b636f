// Engine Configuration
// Prime size, Miller-Rabin rounds and the optional prime search cap

use crate::rsa::error::{Result, RsaError};

/// Prime size used when nothing else is configured.
pub const DEFAULT_BIT_LENGTH: usize = 2000;

/// Miller-Rabin rounds used when nothing else is configured.
pub const DEFAULT_ROUNDS: usize = 100;

/// Below this many rounds a warning is logged.
pub const RECOMMENDED_MIN_ROUNDS: usize = 40;

/// Smallest prime size the prime generator accepts.
pub const MIN_PRIME_BITS: usize = 2;

/// Smallest prime size the key generator accepts.
pub const MIN_KEYPAIR_BITS: usize = 8;

/// Configuration for key generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaConfig {
    /// Size of each prime factor in bits. The modulus is about twice as long.
    pub bit_length: usize,
    pub miller_rabin_rounds: usize,
    /// Candidates tried per prime before giving up. `None` searches forever.
    pub max_prime_attempts: Option<usize>,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            bit_length: DEFAULT_BIT_LENGTH,
            miller_rabin_rounds: DEFAULT_ROUNDS,
            max_prime_attempts: None,
        }
    }
}

impl RsaConfig {
    pub fn with_bit_length(mut self, bit_length: usize) -> Self {
        self.bit_length = bit_length;
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.miller_rabin_rounds = rounds;
        self
    }

    pub fn with_max_prime_attempts(mut self, attempts: Option<usize>) -> Self {
        self.max_prime_attempts = attempts;
        self
    }

    /// Check the settings before any prime search starts.
    pub fn validate(&self) -> Result<()> {
        if self.bit_length < MIN_KEYPAIR_BITS {
            return Err(RsaError::InvalidBitLength {
                min: MIN_KEYPAIR_BITS,
                actual: self.bit_length,
            });
        }
        if self.miller_rabin_rounds == 0 {
            return Err(RsaError::InvalidRounds);
        }
        if self.miller_rabin_rounds < RECOMMENDED_MIN_ROUNDS {
            log::warn!(
                "{} Miller-Rabin rounds is below the recommended {}",
                self.miller_rabin_rounds,
                RECOMMENDED_MIN_ROUNDS
            );
        }
        Ok(())
    }
}

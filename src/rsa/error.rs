// RSA Error Types
// Every failure the engine can report, one variant per cause

use std::fmt;

/// Key component checked by the verification hooks on [`RsaKeyPair`](super::RsaKeyPair).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyComponent {
    PublicExponent,
    PrivateExponent,
}

impl fmt::Display for KeyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyComponent::PublicExponent => write!(f, "public exponent"),
            KeyComponent::PrivateExponent => write!(f, "private exponent"),
        }
    }
}

/// Errors that can occur during key generation, encoding, encryption or decryption.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RsaError {
    #[error("Encoded message is not smaller than the modulus")]
    MessageTooLarge,

    #[error("Ciphertext is not smaller than the modulus")]
    CiphertextTooLarge,

    #[error("No {bit_length}-bit prime found in {attempts} attempts")]
    PrimeGenerationExhausted { bit_length: usize, attempts: usize },

    #[error("Prime generation was cancelled")]
    Cancelled,

    #[error("Both primes are equal; the modulus would be a perfect square")]
    DegenerateModulus,

    #[error("No odd public exponent below the totient is coprime with it")]
    NoValidExponent,

    #[error("Exponent has no inverse modulo the totient")]
    NoModularInverse,

    #[error("Decoded bytes are not valid UTF-8: {0}")]
    InvalidByteSequence(String),

    #[error("Text of {0} bytes does not fit a 4-byte length prefix")]
    LengthPrefixOverflow(usize),

    #[error("Length prefix declares {declared} bytes but {available} are present")]
    InvalidLengthPrefix { declared: usize, available: usize },

    #[error("Supplied {component} does not match the generated key")]
    KeyMismatch { component: KeyComponent },

    #[error("Invalid bit length: must be at least {min} bits, got {actual}")]
    InvalidBitLength { min: usize, actual: usize },

    #[error("Miller-Rabin round count must be at least 1")]
    InvalidRounds,

    #[error("Invalid key: {0}")]
    InvalidKey(&'static str),
}

pub type Result<T> = std::result::Result<T, RsaError>;

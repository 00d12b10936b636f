// Message Types
// Integer forms of a plaintext before and after exponentiation

use std::fmt;

use super::bigint::RsaBigInt;

/// A plaintext already mapped to an integer by a [`Codec`](super::Codec).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage(RsaBigInt);

impl EncodedMessage {
    pub fn new(value: RsaBigInt) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &RsaBigInt {
        &self.0
    }

    pub fn into_inner(self) -> RsaBigInt {
        self.0
    }
}

impl From<RsaBigInt> for EncodedMessage {
    fn from(value: RsaBigInt) -> Self {
        Self(value)
    }
}

/// Result of encrypting an [`EncodedMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext(RsaBigInt);

impl Ciphertext {
    pub fn new(value: RsaBigInt) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &RsaBigInt {
        &self.0
    }

    pub fn into_inner(self) -> RsaBigInt {
        self.0
    }

    /// Big-endian hex, as shown by the command-line tool.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes_be())
    }
}

impl From<RsaBigInt> for Ciphertext {
    fn from(value: RsaBigInt) -> Self {
        Self(value)
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

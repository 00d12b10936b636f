// Message Codec
// Reversible mapping between text and the integer that gets encrypted

use num_traits::Zero;

use super::bigint::RsaBigInt;
use super::error::{Result, RsaError};
use super::message::EncodedMessage;

/// Size of the length header used by [`Codec::LengthPrefixed`].
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// How text is turned into an integer and back.
///
/// Both variants read bytes in little-endian order: the first byte of the
/// text is the lowest-order byte of the integer. Changing that order breaks
/// decoding of anything encrypted before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    /// UTF-8 bytes read directly as an integer.
    ///
    /// The byte count is recovered from the bit length, so trailing NUL
    /// characters are lost: `"A\0"` decodes as `"A"`.
    #[default]
    BitLength,
    /// A 4-byte little-endian byte count followed by the UTF-8 bytes.
    ///
    /// The count restores any trailing NUL characters on decode.
    LengthPrefixed,
}

impl Codec {
    pub fn encode(&self, text: &str) -> Result<EncodedMessage> {
        match self {
            Codec::BitLength => Ok(encode(text)),
            Codec::LengthPrefixed => {
                let bytes = text.as_bytes();
                let header = length_header(bytes.len())?;

                let mut framed = Vec::with_capacity(LENGTH_PREFIX_BYTES + bytes.len());
                framed.extend_from_slice(&header);
                framed.extend_from_slice(bytes);
                Ok(EncodedMessage::new(RsaBigInt::from_bytes_le(&framed)))
            }
        }
    }

    /// Decode a message that was encoded into at most `max_len` bytes.
    ///
    /// `max_len` is the byte length of the modulus the message was encrypted
    /// under. A length header claiming more than fits is rejected before any
    /// bytes are restored.
    pub fn decode(&self, message: &EncodedMessage, max_len: usize) -> Result<String> {
        match self {
            Codec::BitLength => decode(message),
            Codec::LengthPrefixed => {
                let mut bytes = le_bytes(message.value());
                if bytes.len() < LENGTH_PREFIX_BYTES {
                    bytes.resize(LENGTH_PREFIX_BYTES, 0);
                }

                let mut header = [0u8; LENGTH_PREFIX_BYTES];
                header.copy_from_slice(&bytes[..LENGTH_PREFIX_BYTES]);
                let declared = u32::from_le_bytes(header) as usize;

                let mut payload = bytes.split_off(LENGTH_PREFIX_BYTES);
                let room = max_len.saturating_sub(LENGTH_PREFIX_BYTES);
                if payload.len() > declared || declared > room {
                    return Err(RsaError::InvalidLengthPrefix {
                        declared,
                        available: payload.len(),
                    });
                }
                payload.resize(declared, 0);
                utf8(payload)
            }
        }
    }
}

fn length_header(len: usize) -> Result<[u8; LENGTH_PREFIX_BYTES]> {
    let declared = u32::try_from(len).map_err(|_| RsaError::LengthPrefixOverflow(len))?;
    Ok(declared.to_le_bytes())
}

/// Encode text with [`Codec::BitLength`].
pub fn encode(text: &str) -> EncodedMessage {
    EncodedMessage::new(RsaBigInt::from_bytes_le(text.as_bytes()))
}

/// Decode with [`Codec::BitLength`]: `ceil(bits / 8)` little-endian bytes read as UTF-8.
pub fn decode(message: &EncodedMessage) -> Result<String> {
    utf8(le_bytes(message.value()))
}

// Zero has no bytes; num-bigint would return [0].
fn le_bytes(value: &RsaBigInt) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_le()
    }
}

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| RsaError::InvalidByteSequence(e.to_string()))
}

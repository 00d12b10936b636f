// RSA Encryption Implementation
// Textbook RSA: c = m^e mod n with no padding applied

use super::bigint::mod_pow;
use super::codec::Codec;
use super::error::{Result, RsaError};
use super::keygen::RsaPublicKey;
use super::message::{Ciphertext, EncodedMessage};

/// Encrypt an encoded message with the public key.
///
/// The message must be smaller than the modulus. Without padding the result
/// is deterministic: equal messages give equal ciphertexts.
pub fn encrypt(message: &EncodedMessage, public_key: &RsaPublicKey) -> Result<Ciphertext> {
    if message.value() >= public_key.n() {
        return Err(RsaError::MessageTooLarge);
    }

    // Compute c = m^e mod n
    let c = mod_pow(message.value(), public_key.e(), public_key.n());
    Ok(Ciphertext::new(c))
}

/// Encode text with `codec`, then encrypt it
pub fn encrypt_string(plaintext: &str, codec: Codec, public_key: &RsaPublicKey) -> Result<Ciphertext> {
    let message = codec.encode(plaintext)?;
    encrypt(&message, public_key)
}

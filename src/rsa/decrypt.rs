// RSA Decryption Implementation
// m = c^d mod n, followed by decoding back to text

use super::bigint::mod_pow;
use super::codec::Codec;
use super::error::{Result, RsaError};
use super::keygen::RsaPrivateKey;
use super::message::{Ciphertext, EncodedMessage};

/// Decrypt a ciphertext with the private key
pub fn decrypt(ciphertext: &Ciphertext, private_key: &RsaPrivateKey) -> Result<EncodedMessage> {
    if ciphertext.value() >= private_key.n() {
        return Err(RsaError::CiphertextTooLarge);
    }

    let m = mod_pow(ciphertext.value(), private_key.d(), private_key.n());
    Ok(EncodedMessage::new(m))
}

/// Decrypt a ciphertext and decode it to a string
pub fn decrypt_to_string(
    ciphertext: &Ciphertext,
    codec: Codec,
    private_key: &RsaPrivateKey,
) -> Result<String> {
    let message = decrypt(ciphertext, private_key)?;
    let max_len = ((private_key.bit_length() + 7) / 8) as usize;
    codec.decode(&message, max_len)
}

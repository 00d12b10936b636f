use std::sync::OnceLock;

use num_bigint::BigUint;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use textbook_rsa::{
    decrypt, decrypt_to_string, encode, encrypt, encrypt_string, Codec, EncodedMessage,
    KeyGenerator, RsaConfig, RsaError, RsaKeyPair,
};

fn generator(bits: usize) -> KeyGenerator {
    KeyGenerator::new(RsaConfig::default().with_bit_length(bits).with_rounds(40)).unwrap()
}

#[test]
fn test_full_pipeline() {
    let keypair = generator(512).generate_keypair().unwrap();
    let (public_key, private_key) = keypair.into_parts();

    let plaintext = "The quick brown fox jumps over the lazy dog";
    let message = encode(plaintext);
    let ciphertext = encrypt(&message, &public_key).unwrap();
    assert_ne!(ciphertext.value(), message.value());

    let recovered = decrypt(&ciphertext, &private_key).unwrap();
    assert_eq!(recovered, message);
    assert_eq!(textbook_rsa::decode(&recovered).unwrap(), plaintext);
}

#[test]
fn test_seeded_keypairs_repeat() {
    let first = generator(64)
        .generate_keypair_with_rng(&mut StdRng::seed_from_u64(1))
        .unwrap();
    let second = generator(64)
        .generate_keypair_with_rng(&mut StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(first.public_key(), second.public_key());
    assert_eq!(first.private_key(), second.private_key());
}

#[test]
fn test_message_filling_modulus_is_rejected() {
    let keypair = generator(64)
        .generate_keypair_with_rng(&mut StdRng::seed_from_u64(3))
        .unwrap();
    let public_key = keypair.public_key();

    let too_large = EncodedMessage::new(public_key.n().clone());
    assert_eq!(public_key.encrypt(&too_large), Err(RsaError::MessageTooLarge));

    // 17 bytes are longer than a modulus built from two 64-bit primes
    let text = "x".repeat(17);
    assert!(encode(&text).value() >= public_key.n());
    assert_eq!(
        encrypt_string(&text, Codec::BitLength, public_key),
        Err(RsaError::MessageTooLarge)
    );
}

#[test]
fn test_every_byte_value_below_modulus_survives() {
    let keypair = generator(32)
        .generate_keypair_with_rng(&mut StdRng::seed_from_u64(77))
        .unwrap();
    for value in [0u32, 1, 2, 255, 256, 65_535, 1 << 24] {
        let message = EncodedMessage::new(BigUint::from(value));
        let ciphertext = keypair.public_key().encrypt(&message).unwrap();
        assert_eq!(keypair.private_key().decrypt(&ciphertext).unwrap(), message);
    }
}

// Two 256-bit primes: room for 63 bytes, more than 12 chars of up to 4 bytes plus a header
fn shared_keypair() -> &'static RsaKeyPair {
    static KEYPAIR: OnceLock<RsaKeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| {
        generator(256)
            .generate_keypair_with_rng(&mut StdRng::seed_from_u64(2024))
            .unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn text_survives_encryption(text in "[^\\x00]{0,12}") {
        let keypair = shared_keypair();
        let ciphertext = encrypt(&encode(&text), keypair.public_key()).unwrap();
        let recovered = decrypt(&ciphertext, keypair.private_key()).unwrap();
        prop_assert_eq!(textbook_rsa::decode(&recovered).unwrap(), text);
    }

    #[test]
    fn length_prefixed_text_survives_encryption(text in "\\PC{0,12}\\x00{0,2}") {
        let keypair = shared_keypair();
        let codec = Codec::LengthPrefixed;
        let ciphertext = encrypt_string(&text, codec, keypair.public_key()).unwrap();
        let recovered = decrypt_to_string(&ciphertext, codec, keypair.private_key()).unwrap();
        prop_assert_eq!(recovered, text);
    }
}

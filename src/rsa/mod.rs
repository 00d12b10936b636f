// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keygen;
pub mod message;
pub mod primality;
pub mod prime_gen;

pub use codec::{decode, encode, Codec};
pub use decrypt::{decrypt, decrypt_to_string};
pub use encrypt::{encrypt, encrypt_string};
pub use error::{KeyComponent, Result, RsaError};
pub use keygen::{
    derive_keypair, generate_keypair, select_public_exponent, KeyGenerator, RsaKeyPair,
    RsaPrivateKey, RsaPublicKey, CONVENTIONAL_EXPONENT,
};
pub use message::{Ciphertext, EncodedMessage};
pub use primality::{is_probably_prime, is_probably_prime_with_rng};
pub use prime_gen::{generate_prime, CancelFlag, PrimeGenerator};

//! Textbook RSA.
//!
//! Key generation from Miller-Rabin probable primes, a reversible text codec,
//! and encryption/decryption by plain modular exponentiation.
//!
//! No padding is applied: encryption is deterministic and malleable. This
//! crate is for illustration and must not protect real data.
//!
//! ```rust,no_run
//! use textbook_rsa::{Codec, KeyGenerator, RsaConfig};
//!
//! let generator = KeyGenerator::new(RsaConfig::default().with_bit_length(512))?;
//! let keypair = generator.generate_keypair()?;
//!
//! let message = Codec::BitLength.encode("hello")?;
//! let ciphertext = keypair.public_key().encrypt(&message)?;
//! let recovered = keypair.private_key().decrypt(&ciphertext)?;
//! assert_eq!(textbook_rsa::decode(&recovered)?, "hello");
//! # Ok::<(), textbook_rsa::RsaError>(())
//! ```

pub mod app;
pub mod config;
pub mod rsa;

pub use config::RsaConfig;
pub use rsa::*;

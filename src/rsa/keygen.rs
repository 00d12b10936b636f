// RSA Key Generation
// Derives modulus, public exponent and private exponent from two fresh primes

use std::fmt;

use num_traits::One;
use rand::{CryptoRng, RngCore};

use super::bigint::{from_u64, gcd, mod_inverse, RsaBigInt};
use super::decrypt::decrypt;
use super::encrypt::encrypt;
use super::error::{KeyComponent, Result, RsaError};
use super::message::{Ciphertext, EncodedMessage};
use super::prime_gen::{CancelFlag, PrimeGenerator};
use crate::config::RsaConfig;

/// Public exponent tried before any other.
pub const CONVENTIONAL_EXPONENT: u64 = 65537;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    n: RsaBigInt, // Modulus
    e: RsaBigInt, // Public exponent
}

/// RSA Private Key
///
/// Holds only the modulus and the private exponent; the prime factors are
/// dropped once `d` is derived.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    n: RsaBigInt, // Modulus (same as public)
    d: RsaBigInt, // Private exponent
}

/// RSA Key Pair generated from a single prime pair
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    public_key: RsaPublicKey,
    private_key: RsaPrivateKey,
}

impl RsaPublicKey {
    /// Build a public key from externally supplied components.
    pub fn new(n: RsaBigInt, e: RsaBigInt) -> Result<Self> {
        validate_components(&n, &e)?;
        Ok(Self { n, e })
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    pub fn e(&self) -> &RsaBigInt {
        &self.e
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Encrypt an encoded message with this key
    pub fn encrypt(&self, message: &EncodedMessage) -> Result<Ciphertext> {
        encrypt(message, self)
    }
}

impl RsaPrivateKey {
    /// Build a private key from externally supplied components.
    pub fn new(n: RsaBigInt, d: RsaBigInt) -> Result<Self> {
        validate_components(&n, &d)?;
        Ok(Self { n, d })
    }

    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    pub fn d(&self) -> &RsaBigInt {
        &self.d
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Decrypt a ciphertext with this key
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<EncodedMessage> {
        decrypt(ciphertext, self)
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n", &self.n)
            .field("d", &"<redacted>")
            .finish()
    }
}

impl RsaKeyPair {
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    pub fn into_parts(self) -> (RsaPublicKey, RsaPrivateKey) {
        (self.public_key, self.private_key)
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }

    /// Check a caller-entered public exponent against the generated one.
    pub fn verify_public_exponent(&self, candidate: &RsaBigInt) -> Result<()> {
        if *candidate != self.public_key.e {
            return Err(RsaError::KeyMismatch {
                component: KeyComponent::PublicExponent,
            });
        }
        Ok(())
    }

    /// Check a caller-entered private exponent against the generated one.
    pub fn verify_private_exponent(&self, candidate: &RsaBigInt) -> Result<()> {
        if *candidate != self.private_key.d {
            return Err(RsaError::KeyMismatch {
                component: KeyComponent::PrivateExponent,
            });
        }
        Ok(())
    }
}

fn validate_components(n: &RsaBigInt, exponent: &RsaBigInt) -> Result<()> {
    let one = RsaBigInt::one();
    if *n <= one {
        return Err(RsaError::InvalidKey("modulus must be greater than 1"));
    }
    if *exponent <= one || exponent >= n {
        return Err(RsaError::InvalidKey("exponent must lie strictly between 1 and the modulus"));
    }
    Ok(())
}

/// Pick the public exponent for a totient.
///
/// 65537 is used when it is below the totient and coprime with it. Otherwise
/// odd values from 3 upward are scanned; running past the totient yields
/// `NoValidExponent`.
pub fn select_public_exponent(totient: &RsaBigInt) -> Result<RsaBigInt> {
    let one = RsaBigInt::one();

    let conventional = from_u64(CONVENTIONAL_EXPONENT);
    if conventional < *totient && gcd(&conventional, totient) == one {
        return Ok(conventional);
    }
    log::warn!("65537 is not usable for this totient, scanning odd exponents");

    let mut e = from_u64(3);
    while e < *totient {
        if gcd(&e, totient) == one {
            return Ok(e);
        }
        e += 2u8;
    }

    Err(RsaError::NoValidExponent)
}

/// Derive a key pair from two primes.
///
/// `p` and `q` are consumed and not kept in the result.
pub fn derive_keypair(p: RsaBigInt, q: RsaBigInt) -> Result<RsaKeyPair> {
    if p == q {
        return Err(RsaError::DegenerateModulus);
    }
    let two = from_u64(2);
    if p < two || q < two {
        return Err(RsaError::InvalidKey("prime factors must be at least 2"));
    }

    let n = &p * &q;
    let totient = (&p - 1u8) * (&q - 1u8);

    let e = select_public_exponent(&totient)?;
    let d = mod_inverse(&e, &totient).ok_or(RsaError::NoModularInverse)?;
    log::debug!("derived {}-bit modulus with e = {}", n.bits(), e);

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { n: n.clone(), e },
        private_key: RsaPrivateKey { n, d },
    })
}

/// Generates key pairs for one configuration.
#[derive(Clone, Debug)]
pub struct KeyGenerator {
    config: RsaConfig,
    primes: PrimeGenerator,
}

impl KeyGenerator {
    pub fn new(config: RsaConfig) -> Result<Self> {
        config.validate()?;
        let primes = PrimeGenerator::from_config(&config);
        Ok(Self { config, primes })
    }

    /// Stop prime search when `cancel` is raised.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.primes = self.primes.with_cancel_flag(cancel);
        self
    }

    pub fn config(&self) -> &RsaConfig {
        &self.config
    }

    /// Generate a key pair using `thread_rng`.
    pub fn generate_keypair(&self) -> Result<RsaKeyPair> {
        self.generate_keypair_with_rng(&mut rand::thread_rng())
    }

    /// Generate a key pair, drawing new primes whenever the pair is degenerate.
    pub fn generate_keypair_with_rng<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<RsaKeyPair> {
        log::debug!(
            "generating two {}-bit primes ({} Miller-Rabin rounds)",
            self.config.bit_length,
            self.primes.rounds()
        );

        loop {
            let (p, q) = self.generate_primes(rng)?;
            match derive_keypair(p, q) {
                Err(RsaError::DegenerateModulus) => {
                    log::debug!("generated primes are equal, retrying");
                }
                Ok(keypair) => {
                    log::info!("generated {}-bit RSA key pair", keypair.bit_length());
                    return Ok(keypair);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn generate_primes<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(RsaBigInt, RsaBigInt)> {
        let bits = self.config.bit_length;
        let p = self.primes.generate_prime_with_rng(bits, rng)?;
        let q = self.primes.generate_prime_with_rng(bits, rng)?;
        Ok((p, q))
    }
}

/// Generate a key pair from two `bit_length`-bit primes with default settings
pub fn generate_keypair(bit_length: usize) -> Result<RsaKeyPair> {
    KeyGenerator::new(RsaConfig::default().with_bit_length(bit_length))?.generate_keypair()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_generator(bits: usize) -> KeyGenerator {
        KeyGenerator::new(RsaConfig::default().with_bit_length(bits).with_rounds(40)).unwrap()
    }

    fn assert_exponents_match(keypair: &RsaKeyPair, totient: &RsaBigInt) {
        let e = keypair.public_key().e();
        let d = keypair.private_key().d();
        assert_eq!(gcd(e, totient), from_u64(1));
        assert_eq!((d * e) % totient, from_u64(1));
        assert!(*e > from_u64(1) && e < totient);
    }

    #[test]
    fn test_textbook_example() {
        // 65537 exceeds the totient 3120; 3 and 5 divide it, so 7 is chosen
        let keypair = derive_keypair(from_u64(61), from_u64(53)).unwrap();
        assert_eq!(keypair.public_key().n(), &from_u64(3233));
        assert_eq!(keypair.public_key().e(), &from_u64(7));
        assert_eq!(keypair.private_key().d(), &from_u64(1783));
        assert_eq!(keypair.private_key().n(), keypair.public_key().n());
    }

    #[test]
    fn test_fallback_when_65537_divides_totient() {
        // 917519 - 1 = 2 * 7 * 65537
        let p = from_u64(917519);
        let q = from_u64(1000003);
        let totient = (&p - 1u8) * (&q - 1u8);
        let keypair = derive_keypair(p, q).unwrap();
        assert_eq!(keypair.public_key().e(), &from_u64(5));
        assert_eq!(keypair.private_key().d(), &from_u64(734015868029));
        assert_exponents_match(&keypair, &totient);
    }

    #[test]
    fn test_select_conventional_exponent() {
        let totient = from_u64(1_000_000) * from_u64(1_000_002);
        assert_eq!(select_public_exponent(&totient).unwrap(), from_u64(65537));
    }

    #[test]
    fn test_no_valid_exponent() {
        // totient of 2 * 3 is 2: no odd exponent fits below it
        assert_eq!(derive_keypair(from_u64(2), from_u64(3)).unwrap_err(), RsaError::NoValidExponent);
    }

    #[test]
    fn test_degenerate_modulus() {
        assert_eq!(
            derive_keypair(from_u64(61), from_u64(61)).unwrap_err(),
            RsaError::DegenerateModulus
        );
    }

    #[test]
    fn test_rejects_unit_factor() {
        assert!(matches!(
            derive_keypair(from_u64(1), from_u64(61)),
            Err(RsaError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_key_properties() {
        let generator = small_generator(64);
        let (p, q) = generator.generate_primes(&mut StdRng::seed_from_u64(5)).unwrap();
        let totient = (&p - 1u8) * (&q - 1u8);

        let keypair = generator.generate_keypair_with_rng(&mut StdRng::seed_from_u64(5)).unwrap();

        // Verify n = p * q
        assert_eq!(keypair.public_key().n(), &(&p * &q));
        assert_exponents_match(&keypair, &totient);
    }

    #[test]
    fn test_small_primes_retry_until_distinct() {
        // 8-bit primes collide often; every seed must still give a valid pair
        let generator = small_generator(8);
        for seed in 0..50 {
            let keypair = generator
                .generate_keypair_with_rng(&mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert!(keypair.bit_length() >= 15);
        }
    }

    #[test]
    fn test_key_generation() {
        let keypair = generate_keypair(256).unwrap();
        assert!(keypair.bit_length() >= 511);
        assert!(keypair.public_key().e() >= &from_u64(3));
        assert!(keypair.private_key().d() < keypair.private_key().n());
    }

    #[test]
    fn test_invalid_config() {
        let result = KeyGenerator::new(RsaConfig::default().with_bit_length(4));
        assert!(matches!(result, Err(RsaError::InvalidBitLength { .. })));
    }

    #[test]
    fn test_cancelled_generation() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let generator = small_generator(128).with_cancel_flag(cancel);
        assert_eq!(generator.generate_keypair().unwrap_err(), RsaError::Cancelled);
    }

    #[test]
    fn test_exhausted_generation() {
        let config = RsaConfig::default()
            .with_bit_length(128)
            .with_max_prime_attempts(Some(0));
        let generator = KeyGenerator::new(config).unwrap();
        assert!(matches!(
            generator.generate_keypair(),
            Err(RsaError::PrimeGenerationExhausted { bit_length: 128, .. })
        ));
    }

    #[test]
    fn test_verify_exponents() {
        let keypair = derive_keypair(from_u64(61), from_u64(53)).unwrap();
        assert!(keypair.verify_public_exponent(&from_u64(7)).is_ok());
        assert!(keypair.verify_private_exponent(&from_u64(1783)).is_ok());
        assert_eq!(
            keypair.verify_public_exponent(&from_u64(65537)),
            Err(RsaError::KeyMismatch {
                component: KeyComponent::PublicExponent
            })
        );
        assert_eq!(
            keypair.verify_private_exponent(&from_u64(1)),
            Err(RsaError::KeyMismatch {
                component: KeyComponent::PrivateExponent
            })
        );
    }

    #[test]
    fn test_key_constructors_validate() {
        assert!(RsaPublicKey::new(from_u64(3233), from_u64(17)).is_ok());
        assert!(RsaPublicKey::new(from_u64(1), from_u64(17)).is_err());
        assert!(RsaPublicKey::new(from_u64(3233), from_u64(1)).is_err());
        assert!(RsaPrivateKey::new(from_u64(3233), from_u64(3233)).is_err());
    }

    #[test]
    fn test_private_debug_hides_exponent() {
        let keypair = derive_keypair(from_u64(61), from_u64(53)).unwrap();
        let printed = format!("{:?}", keypair.private_key());
        assert!(printed.contains("3233"));
        assert!(!printed.contains("1783"));
    }
}

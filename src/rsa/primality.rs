// Miller-Rabin Primality Test
// Probabilistic test used by the prime generator

use num_bigint::{BigInt, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};

use super::bigint::{mod_pow, RsaBigInt};

/// Miller-Rabin test with `rounds` random bases drawn from `thread_rng`.
///
/// Negative inputs, 0, 1 and even numbers other than 2 are rejected without
/// running any round. A `true` verdict is wrong with probability at most
/// `4^-rounds`. At least one round always runs, so 0 behaves like 1.
pub fn is_probably_prime(candidate: &BigInt, rounds: usize) -> bool {
    if candidate.sign() == Sign::Minus {
        return false;
    }
    match candidate.to_biguint() {
        Some(n) => is_probably_prime_with_rng(&n, rounds, &mut rand::thread_rng()),
        None => false,
    }
}

/// Miller-Rabin test drawing bases from the supplied random source.
pub fn is_probably_prime_with_rng<R: RngCore + CryptoRng + ?Sized>(
    candidate: &RsaBigInt,
    rounds: usize,
    rng: &mut R,
) -> bool {
    let two = RsaBigInt::from(2u8);
    let three = RsaBigInt::from(3u8);

    if *candidate == two || *candidate == three {
        return true;
    }
    if *candidate < two || candidate.is_even() {
        return false;
    }

    // candidate - 1 = 2^r * d with d odd
    let n_minus_one = candidate - 1u8;
    let mut d = n_minus_one.clone();
    let mut r = 0usize;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for _ in 0..rounds.max(1) {
        // Uniform base in [2, candidate - 2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = mod_pow(&a, &d, candidate);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..r {
            x = (&x * &x) % candidate;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // a is a witness for compositeness
        return false;
    }

    true
}

// Command-line session
// Generates a key pair, encrypts one message and decrypts it again

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{RsaConfig, DEFAULT_BIT_LENGTH, DEFAULT_ROUNDS};
use crate::rsa::bigint::RsaBigInt;
use crate::rsa::{self, decrypt_to_string, Ciphertext, Codec, KeyGenerator, RsaKeyPair};

/// Text codec selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CodecArg {
    /// Byte count taken from the integer's bit length
    Legacy,
    /// 4-byte length header in front of the text
    LengthPrefixed,
}

impl From<CodecArg> for Codec {
    fn from(arg: CodecArg) -> Self {
        match arg {
            CodecArg::Legacy => Codec::BitLength,
            CodecArg::LengthPrefixed => Codec::LengthPrefixed,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "textbook-rsa",
    about = "Generate an RSA key pair, encrypt a message and decrypt it again (no padding; illustration only)"
)]
pub struct Args {
    /// Size of each prime in bits
    #[arg(short = 'b', long = "bits", default_value_t = DEFAULT_BIT_LENGTH)]
    pub bits: usize,

    /// Miller-Rabin rounds per candidate
    #[arg(long = "rounds", default_value_t = DEFAULT_ROUNDS)]
    pub rounds: usize,

    /// Give up after this many candidates per prime
    #[arg(long = "max-attempts")]
    pub max_attempts: Option<usize>,

    /// How the message text is mapped to an integer
    #[arg(long = "codec", value_enum, default_value_t = CodecArg::Legacy)]
    pub codec: CodecArg,

    /// Message to encrypt; read from stdin when omitted
    #[arg(short = 'm', long = "message")]
    pub message: Option<String>,

    /// Print the ciphertext as big-endian hex instead of decimal
    #[arg(long = "hex")]
    pub hex: bool,

    /// Public exponent the caller expects; encryption stops on mismatch
    #[arg(long = "expect-e")]
    pub expect_e: Option<RsaBigInt>,

    /// Private exponent the caller expects; decryption stops on mismatch
    #[arg(long = "expect-d")]
    pub expect_d: Option<RsaBigInt>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn config(&self) -> RsaConfig {
        RsaConfig::default()
            .with_bit_length(self.bits)
            .with_rounds(self.rounds)
            .with_max_prime_attempts(self.max_attempts)
    }
}

/// Exponents the caller re-entered and wants checked before use.
#[derive(Clone, Debug, Default)]
pub struct Confirmation {
    pub public_exponent: Option<RsaBigInt>,
    pub private_exponent: Option<RsaBigInt>,
}

/// Output of one encrypt/decrypt round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    pub ciphertext: Ciphertext,
    pub recovered: String,
}

/// One generated key pair and the codec used with it.
pub struct Session {
    keypair: RsaKeyPair,
    codec: Codec,
}

impl Session {
    pub fn new(keypair: RsaKeyPair, codec: Codec) -> Self {
        Self { keypair, codec }
    }

    pub fn keypair(&self) -> &RsaKeyPair {
        &self.keypair
    }

    /// Encrypt `plaintext` and decrypt it again, checking any confirmed exponents first.
    pub fn round_trip(&self, plaintext: &str, confirm: &Confirmation) -> rsa::Result<Transcript> {
        let message = self.codec.encode(plaintext)?;

        if let Some(e) = &confirm.public_exponent {
            self.keypair.verify_public_exponent(e)?;
        }
        let ciphertext = self.keypair.public_key().encrypt(&message)?;

        if let Some(d) = &confirm.private_exponent {
            self.keypair.verify_private_exponent(d)?;
        }
        let recovered = decrypt_to_string(&ciphertext, self.codec, self.keypair.private_key())?;

        Ok(Transcript {
            ciphertext,
            recovered,
        })
    }
}

fn read_message() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read message from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Run one session from parsed arguments.
pub fn run(args: Args) -> Result<()> {
    let generator = KeyGenerator::new(args.config()).context("invalid configuration")?;

    let message = match &args.message {
        Some(message) => message.clone(),
        None => {
            eprintln!("Enter a message:");
            read_message()?
        }
    };

    eprintln!("Generating {}-bit primes... this may take a moment.", args.bits);
    let keypair = generator.generate_keypair().context("key generation failed")?;
    eprintln!("Keys generated successfully.");

    let session = Session::new(keypair, args.codec.into());
    let confirm = Confirmation {
        public_exponent: args.expect_e.clone(),
        private_exponent: args.expect_d.clone(),
    };

    let public_key = session.keypair().public_key();
    println!("Public key component (e): {}", public_key.e());
    println!("Private key component (d): {}", session.keypair().private_key().d());

    let transcript = session
        .round_trip(&message, &confirm)
        .context("encryption round trip failed")?;

    if args.hex {
        println!("Ciphertext: {}", transcript.ciphertext.to_hex());
    } else {
        println!("Ciphertext: {}", transcript.ciphertext);
    }
    println!("Decrypted message: {}", transcript.recovered);

    Ok(())
}

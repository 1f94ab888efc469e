//! Steam Guard mobile authenticator.
//!
//! Steam Guard is TOTP over HMAC-SHA1 with a 30 second period, but instead of decimal digits
//! the intermediate code is written as five symbols of a 26 character alphabet, least
//! significant symbol first. The shared secret comes from Steam's mobile app data as base-64 and
//! cannot be generated locally.

use crate::codec::Base64;
use crate::digest::Algorithm;
use crate::error::Result;
use crate::options::{Mode, Options};
use crate::variant::{time_counter, verify_window, State, Variant};

const PERIOD: u32 = 30;
const CODE_LENGTH: usize = 5;
/// Digits and consonants, minus those easily confused with each other.
const ALPHABET: &[u8; 26] = b"23456789BCDFGHJKMNPQRTVWXY";

/// Steam Guard authenticator.
#[derive(Clone, Debug)]
pub struct SteamGuard {
    state: State,
}

impl SteamGuard {
    pub fn new(options: Options) -> Self {
        Self { state: State::new(Self::MODE, options) }
    }
}

impl Default for SteamGuard {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl From<Options> for SteamGuard {
    fn from(options: Options) -> Self {
        Self::new(options)
    }
}

impl Variant for SteamGuard {
    const MODE: Mode = Mode::SteamGuard;
    type Codec = Base64;

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn get_counter(&self, input: Option<i64>) -> u64 {
        time_counter(self, input)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Sha1
    }

    fn period(&self) -> u32 {
        PERIOD
    }

    fn generates_secrets(&self) -> bool {
        false
    }

    fn get_otp(&self, code: u32) -> String {
        format_symbols(code)
    }

    fn verify(&self, otp: &str, input: Option<i64>) -> Result<bool> {
        verify_window(self, otp, input)
    }
}

fn format_symbols(mut code: u32) -> String {
    let base = ALPHABET.len() as u32;
    let mut otp = String::with_capacity(CODE_LENGTH);
    for _ in 0..CODE_LENGTH {
        otp.push(char::from(ALPHABET[(code % base) as usize]));
        code /= base;
    }
    otp
}

//! The derivation pipeline shared by every OTP flavour.
//!
//! Generating a code always runs the same four steps:
//!
//! 1. [`get_counter`](Variant::get_counter): turn the caller's input (a counter or a unix
//!    timestamp) into the 64-bit counter `C`
//! 2. [`get_hmac`](Variant::get_hmac): HMAC the big-endian counter with the shared secret
//! 3. [`get_code`](Variant::get_code): dynamically truncate the HMAC to a 31-bit integer
//! 4. [`get_otp`](Variant::get_otp): format that integer as the code shown to the user
//!
//! A [`Variant`] supplies the steps that differ between flavours (counter derivation, fixed
//! algorithm or period, formatting, secret encoding) and inherits the rest.

use log::{debug, trace, warn};
use ring::constant_time::verify_slices_are_equal;

use crate::codec::SecretCodec;
use crate::digest::{compute_hmac, Algorithm, Digest, Hmac};
use crate::error::{Error, Result};
use crate::options::{Mode, Options};
use crate::secret::SecretKey;
use crate::time;

/// Configuration and secret owned by one variant instance.
///
/// The stored options always carry the owning variant's mode.
#[derive(Clone, Debug)]
pub struct State {
    options: Options,
    secret: Option<SecretKey>,
}

impl State {
    pub fn new(mode: Mode, options: Options) -> Self {
        Self { options: options.with_mode(mode), secret: None }
    }

    pub(crate) fn install_secret(&mut self, secret: SecretKey) {
        self.secret = Some(secret);
    }
}

/// One OTP flavour.
///
/// Implementors provide access to their [`State`] and override whichever pipeline steps they
/// fix or change. Every override derives its effective values per call; the stored
/// [`Options`] are never rewritten behind the caller's back.
pub trait Variant {
    /// Mode this variant implements.
    const MODE: Mode;

    /// Textual encoding of this variant's secrets.
    type Codec: SecretCodec;

    fn state(&self) -> &State;

    fn state_mut(&mut self) -> &mut State;

    /// Counter derivation for `input` (step 1).
    fn get_counter(&self, input: Option<i64>) -> u64;

    fn options(&self) -> &Options {
        &self.state().options
    }

    /// Replaces the options; the secret is kept. The mode stays [`Self::MODE`].
    fn set_options(&mut self, options: Options) {
        self.state_mut().options = options.with_mode(Self::MODE);
    }

    /// Effective hash algorithm.
    fn algorithm(&self) -> Algorithm {
        self.options().algorithm()
    }

    /// Effective period in seconds.
    fn period(&self) -> u32 {
        self.options().period()
    }

    /// Whether secrets for this variant may be generated locally.
    fn generates_secrets(&self) -> bool {
        true
    }

    /// Decodes and stores `encoded`. On failure the previous secret stays in place.
    fn set_secret(&mut self, encoded: &str) -> Result<()> {
        let secret = SecretKey::decode::<Self::Codec>(encoded)?;
        debug!("{}: secret set", Self::MODE);
        self.state_mut().install_secret(secret);
        Ok(())
    }

    /// The current secret in this variant's encoding.
    fn get_secret(&self) -> Result<String> {
        self.state().secret.as_ref().map(SecretKey::encode::<Self::Codec>).ok_or(Error::NoSecret)
    }

    /// Generates, stores and returns a fresh random secret.
    ///
    /// `length` defaults to the configured secret length.
    fn create_secret(&mut self, length: Option<usize>) -> Result<String> {
        if !self.generates_secrets() {
            return Err(Error::UnsupportedOperation("secret generation"));
        }
        let secret = SecretKey::generate(length.unwrap_or_else(|| self.options().secret_length()))?;
        debug!("{}: created a {} byte secret", Self::MODE, secret.len());
        let encoded = secret.encode::<Self::Codec>();
        self.state_mut().install_secret(secret);
        Ok(encoded)
    }

    /// HMAC of `counter` under the secret (step 2).
    fn get_hmac(&self, counter: u64) -> Result<Hmac> {
        let secret = self.state().secret.as_ref().ok_or(Error::NoSecret)?;
        Ok(compute_hmac(self.algorithm(), secret.as_ref(), counter))
    }

    /// Intermediate code extracted from `hmac` (step 3).
    fn get_code(&self, hmac: &Hmac) -> u32 {
        hmac.truncate()
    }

    /// Final formatting (step 4): decimal, zero-padded to the configured digits.
    fn get_otp(&self, code: u32) -> String {
        self.options().digits().format(code)
    }

    /// Runs the whole pipeline for a raw counter.
    fn code_at_counter(&self, counter: u64) -> Result<String> {
        let hmac = self.get_hmac(counter)?;
        Ok(self.get_otp(self.get_code(&hmac)))
    }

    /// Generates the code for `input` (counter value or unix timestamp, depending on mode).
    fn code(&self, input: Option<i64>) -> Result<String> {
        self.code_at_counter(self.get_counter(input))
    }

    /// Checks `otp` against the code for `input` with a single constant-time comparison.
    fn verify(&self, otp: &str, input: Option<i64>) -> Result<bool> {
        verify_exact(self, otp, input)
    }
}

/// Compares two codes in time independent of where they differ.
pub(crate) fn codes_match(expected: &str, given: &str) -> bool {
    verify_slices_are_equal(expected.as_bytes(), given.as_bytes()).is_ok()
}

pub(crate) fn verify_exact<V: Variant + ?Sized>(
    variant: &V,
    otp: &str,
    input: Option<i64>,
) -> Result<bool> {
    let valid = codes_match(&variant.code(input)?, otp);
    trace!("{}: verification {}", V::MODE, if valid { "succeeded" } else { "failed" });
    Ok(valid)
}

/// Checks `otp` against every counter within the adjacency window around `input`.
///
/// The window is `[C - adjacent, C + adjacent]`; the first match wins. With no adjacent codes
/// allowed this is exactly [`verify_exact`].
pub(crate) fn verify_window<V: Variant + ?Sized>(
    variant: &V,
    otp: &str,
    input: Option<i64>,
) -> Result<bool> {
    let adjacent = i64::from(variant.options().adjacent());
    if adjacent == 0 {
        return verify_exact(variant, otp, input);
    }

    let timeslice = variant.get_counter(input);
    for i in -adjacent..=adjacent {
        let candidate = variant.code_at_counter(timeslice.wrapping_add(i as u64))?;
        if codes_match(&candidate, otp) {
            trace!("{}: verification succeeded with drift {}", V::MODE, i);
            return Ok(true);
        }
    }
    trace!("{}: verification failed within ±{} codes", V::MODE, adjacent);
    Ok(false)
}

/// Effective "now" for time-based variants.
///
/// Local time unless the options ask for server time and carry a pre-fetched value.
pub(crate) fn current_time(options: &Options) -> i64 {
    if options.use_local_time() {
        return time::now();
    }
    match options.server_time() {
        Some((server_time, last_request_time)) => {
            time::adjusted_time(server_time, last_request_time)
        }
        None => {
            warn!("server time requested but none was supplied; using local time");
            time::now()
        }
    }
}

/// Timeslice counter for time-based variants, using the variant's effective period.
pub(crate) fn time_counter<V: Variant + ?Sized>(variant: &V, input: Option<i64>) -> u64 {
    let options = variant.options();
    let timestamp = input.unwrap_or_else(|| current_time(options));
    time::timeslice(timestamp, options.time_offset(), variant.period())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_is_exact() {
        assert!(codes_match("123456", "123456"));
        assert!(!codes_match("123456", "0123456"));
        assert!(!codes_match("123456", "123457"));
        assert!(!codes_match("123456", ""));
    }

    #[test]
    fn current_time_prefers_supplied_server_time() {
        let local = Options::default();
        assert!((current_time(&local) - time::now()).abs() <= 1);

        let remote = Options::default().with_server_time(1_000, time::now());
        assert!((1_000..1_005).contains(&current_time(&remote)));

        let mut missing = Options::default();
        missing.set_use_local_time(false);
        assert!((current_time(&missing) - time::now()).abs() <= 1);
    }
}

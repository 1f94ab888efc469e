//! Decoded shared secret.

use core::fmt;

use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::codec::SecretCodec;
use crate::error::{Error, Result};

/// Smallest secret [`SecretKey::generate`] will produce (128 bits, per RFC 4226 §4 R6).
pub const MIN_SECRET_LENGTH: usize = 16;
/// Largest secret [`SecretKey::generate`] will produce.
pub const MAX_SECRET_LENGTH: usize = 1024;

/// Raw shared secret bytes, wiped from memory on drop.
///
/// As per [RFC 4226][4226], "each HOTP generator has a different and unique secret." The
/// secret is only ever handed out again in its variant's textual encoding; `Debug` output is
/// redacted.
///
/// [4226]: https://tools.ietf.org/html/rfc4226
#[derive(Clone, Eq, PartialEq)]
pub struct SecretKey(Zeroizing<Vec<u8>>);

impl SecretKey {
    /// Wraps already-decoded secret bytes.
    pub fn from_bytes(raw: Vec<u8>) -> Self {
        Self(Zeroizing::new(raw))
    }

    /// Decodes `encoded` with codec `C`.
    ///
    /// Surrounding whitespace is ignored; anything else outside the codec's alphabet is an
    /// error.
    pub fn decode<C: SecretCodec>(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(Error::InvalidSecretEncoding("the given secret string is empty".into()));
        }
        C::decode(encoded).map(Self::from_bytes)
    }

    /// Encodes the secret with codec `C`.
    pub fn encode<C: SecretCodec>(&self) -> String {
        C::encode(&self.0)
    }

    /// Generates `length` bytes from the system's secure random number generator.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidConfiguration`] unless
    /// `MIN_SECRET_LENGTH <= length <= MAX_SECRET_LENGTH`.
    pub fn generate(length: usize) -> Result<Self> {
        if !(MIN_SECRET_LENGTH..=MAX_SECRET_LENGTH).contains(&length) {
            return Err(Error::InvalidConfiguration(format!(
                "invalid secret length: {}",
                length
            )));
        }
        let mut raw = Zeroizing::new(vec![0u8; length]);
        SystemRandom::new().fill(&mut raw[..])?;
        Ok(Self(raw))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for SecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey([REDACTED; {}])", self.0.len())
    }
}

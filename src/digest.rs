//! HMAC digest types and dynamic truncation.

use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

use ring::hmac::{self, HMAC_SHA1_FOR_LEGACY_USE_ONLY as HMAC_SHA1, HMAC_SHA256, HMAC_SHA512};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Hash algorithm underlying the HMAC.
///
/// [RFC 4226][4226] prescribes HMAC-SHA1. [RFC 6238][6238] extends this to HMAC-SHA256 and
/// HMAC-SHA512, which authenticator apps commonly advertise through the `algorithm` URI
/// parameter.
///
/// [4226]: https://datatracker.ietf.org/doc/html/rfc4226
/// [6238]: https://datatracker.ietf.org/doc/html/rfc6238
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Sha1
    }
}

impl Algorithm {
    /// Name as used in `otpauth://` URIs.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Sha1 => "SHA1",
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha512 => "SHA512",
        }
    }

    /// Length in bytes of the HMAC this algorithm produces.
    pub fn output_len(self) -> usize {
        match self {
            Algorithm::Sha1 => 20,
            Algorithm::Sha256 => 32,
            Algorithm::Sha512 => 64,
        }
    }

    fn ring(self) -> hmac::Algorithm {
        match self {
            Algorithm::Sha1 => HMAC_SHA1,
            Algorithm::Sha256 => HMAC_SHA256,
            Algorithm::Sha512 => HMAC_SHA512,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SHA1" => Ok(Algorithm::Sha1),
            "SHA256" => Ok(Algorithm::Sha256),
            "SHA512" => Ok(Algorithm::Sha512),
            _ => Err(Error::InvalidConfiguration(format!("invalid algorithm: {}", s))),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Algorithm> for String {
    fn from(algorithm: Algorithm) -> Self {
        algorithm.as_str().to_owned()
    }
}

/// Trait for digests that can be dynamically truncated.
pub trait Digest: AsRef<[u8]> {
    /// Dynamic truncation as per [RFC 4226 §5.3][4226].
    ///
    /// The low nibble of the last byte selects an offset; the four bytes starting there are read
    /// as a big-endian integer with the sign bit cleared. The procedure is the same for every
    /// digest length.
    ///
    /// [4226]: https://datatracker.ietf.org/doc/html/rfc4226#section-5.3
    ///
    /// # Panics
    ///
    /// Truncating a digest shorter than 19 bytes unconditionally panics. This never happens with
    /// [`Hmac`], which only holds 20, 32 or 64 bytes, but could for foreign implementations.
    fn truncate(&self) -> u32 {
        let digest = self.as_ref();
        // the offset is four bits wide, so up to 15 + 4 bytes are read
        assert!(digest.len() >= 19);
        let index = (digest[digest.len() - 1] & 0xf) as usize;
        let bytes = [digest[index], digest[index + 1], digest[index + 2], digest[index + 3]];
        // Strip leading bit to remove signed/unsigned ambiguity
        u32::from_be_bytes(bytes) & 0x7fff_ffff
    }
}

/// HMAC output of one of the supported algorithms (20, 32 or 64 bytes).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Hmac(Vec<u8>);

impl Hmac {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Hmac {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Digest for Hmac {}

/// Accepts externally computed digests, so long as some supported algorithm could have
/// produced them.
impl TryFrom<&[u8]> for Hmac {
    type Error = Error;

    fn try_from(raw: &[u8]) -> Result<Self, Self::Error> {
        match raw.len() {
            20 | 32 | 64 => Ok(Self(raw.to_vec())),
            len => Err(Error::InvalidDigest(len)),
        }
    }
}

/// Computes HMAC(`key`, `counter`) with the counter packed as eight big-endian bytes.
pub fn compute_hmac(algorithm: Algorithm, key: &[u8], counter: u64) -> Hmac {
    let key = hmac::Key::new(algorithm.ring(), key);
    Hmac(hmac::sign(&key, &counter.to_be_bytes()).as_ref().to_vec())
}

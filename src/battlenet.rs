//! Blizzard Battle.net authenticator.
//!
//! Battle.net codes are TOTP with fixed parameters: HMAC-SHA1, a 30 second period and 8 digits,
//! whatever the options say. Secrets are 20 bytes, exchanged as hex, and issued by Blizzard, so
//! they cannot be generated locally.
//!
//! Every authenticator also has a serial (`US-1306-2525-4376`) and a restore code
//! (`CR24KPKF51`) derived from serial and secret. With both, the secret can be recovered from
//! the issuing authority; the transport for that exchange is supplied by the caller as a
//! [`RestoreAuthority`].
//!
//! See <https://github.com/winauth/winauth/blob/master/Authenticator/BattleNetAuthenticator.cs>.

use core::fmt;

use log::debug;
use ring::constant_time::verify_slices_are_equal;
use ring::digest::{self, SHA1_FOR_LEGACY_USE_ONLY as SHA1};
use ring::hmac::{self, HMAC_SHA1_FOR_LEGACY_USE_ONLY as HMAC_SHA1};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::codec::Hex;
use crate::digest::Algorithm;
use crate::error::{Error, Result};
use crate::length::format_decimal;
use crate::options::{Mode, Options};
use crate::secret::SecretKey;
use crate::variant::{time_counter, verify_window, State, Variant};

const DIGITS: u8 = 8;
const PERIOD: u32 = 30;
const SECRET_LENGTH: usize = 20;
const RESTORE_CODE_LENGTH: usize = 10;
/// `0-9A-Z` without `I`, `L`, `O` and `S`.
const RESTORE_CODE_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRTUVWXYZ";
const REGIONS: [&str; 4] = ["US", "EU", "KR", "CN"];

/// Battle.net authenticator.
#[derive(Clone, Debug)]
pub struct BattleNet {
    state: State,
}

impl BattleNet {
    pub fn new(options: Options) -> Self {
        Self { state: State::new(Self::MODE, options) }
    }

    /// Recovers the secret for `serial` from `authority` and installs it.
    ///
    /// See [`restore_secret`].
    pub fn restore<A: RestoreAuthority + ?Sized>(
        &mut self,
        serial: &str,
        restore_code: &str,
        authority: &mut A,
    ) -> Result<RestoredAuthenticator> {
        let (restored, secret) = restore(serial, restore_code, authority)?;
        self.state.install_secret(secret);
        debug!("{}: secret restored", Self::MODE);
        Ok(restored)
    }
}

impl Default for BattleNet {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl From<Options> for BattleNet {
    fn from(options: Options) -> Self {
        Self::new(options)
    }
}

impl Variant for BattleNet {
    const MODE: Mode = Mode::BattleNet;
    type Codec = Hex;

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
        format_decimal(code, DIGITS)
    }

    fn verify(&self, otp: &str, input: Option<i64>) -> Result<bool> {
        verify_window(self, otp, input)
    }
}

/// The issuing side of a Battle.net restore.
///
/// A restore is a two-step exchange. The authority first hands out a challenge for the serial;
/// the client answers with an HMAC over serial and challenge, keyed with the restore code, plus
/// a one-time pad. The authority checks the answer and returns the secret XORed with the pad.
/// Any transport concerns (HTTP, encrypting the answer to the authority's public key) belong to
/// the implementor.
pub trait RestoreAuthority {
    /// Requests a restore challenge for the normalized `serial`.
    fn initiate(&mut self, serial: &str) -> Result<Vec<u8>>;

    /// Submits the challenge `response` and the `one_time_pad`, returning the padded secret.
    fn validate(&mut self, serial: &str, response: &[u8], one_time_pad: &[u8]) -> Result<Vec<u8>>;
}

/// Outcome of a successful restore.
#[derive(Clone, Eq, PartialEq)]
pub struct RestoredAuthenticator {
    pub serial: String,
    pub restore_code: String,
    pub region: String,
    /// Hex-encoded secret.
    pub secret: String,
}

impl fmt::Debug for RestoredAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestoredAuthenticator")
            .field("serial", &self.serial)
            .field("restore_code", &self.restore_code)
            .field("region", &self.region)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Uppercases `serial` and strips dashes: `us-1306-2525-4376` becomes `US130625254376`.
pub fn normalize_serial(serial: &str) -> Result<String> {
    let normalized: String =
        serial.trim().chars().filter(|&c| c != '-').map(|c| c.to_ascii_uppercase()).collect();
    let well_formed = normalized.len() == 14
        && normalized.is_ascii()
        && REGIONS.contains(&&normalized[..2])
        && normalized[2..].bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(Error::Restore(format!("invalid serial: {}", serial)));
    }
    Ok(normalized)
}

/// Region prefix of `serial` (`US`, `EU`, `KR` or `CN`).
pub fn region(serial: &str) -> Result<String> {
    normalize_serial(serial).map(|serial| serial[..2].to_owned())
}

/// Restore code for `serial` and raw `secret`.
///
/// The last ten bytes of SHA-1(serial ‖ secret), each reduced to five bits and mapped onto
/// [`RESTORE_CODE_ALPHABET`].
pub fn restore_code(serial: &str, secret: &[u8]) -> Result<String> {
    let serial = normalize_serial(serial)?;
    let mut data = Zeroizing::new(serial.into_bytes());
    data.extend_from_slice(secret);
    let hash = digest::digest(&SHA1, &data);
    let tail = &hash.as_ref()[hash.as_ref().len() - RESTORE_CODE_LENGTH..];
    Ok(tail.iter().map(|b| char::from(RESTORE_CODE_ALPHABET[usize::from(b & 0x1f)])).collect())
}

/// Maps a restore code back onto its five-bit values.
pub fn decode_restore_code(restore_code: &str) -> Result<[u8; RESTORE_CODE_LENGTH]> {
    let restore_code = restore_code.trim();
    if restore_code.len() != RESTORE_CODE_LENGTH {
        return Err(Error::Restore(format!(
            "restore code must be {} characters",
            RESTORE_CODE_LENGTH
        )));
    }
    let mut decoded = [0u8; RESTORE_CODE_LENGTH];
    for (out, c) in decoded.iter_mut().zip(restore_code.bytes()) {
        let c = c.to_ascii_uppercase();
        *out = RESTORE_CODE_ALPHABET.iter().position(|&symbol| symbol == c).ok_or_else(|| {
            Error::Restore(format!("invalid restore code character: {:?}", char::from(c)))
        })? as u8;
    }
    Ok(decoded)
}

/// Recovers the secret for `serial` from `authority`, proving possession of `restore_code`.
///
/// The returned secret is only accepted if it reproduces `restore_code`.
pub fn restore_secret<A: RestoreAuthority + ?Sized>(
    serial: &str,
    restore_code: &str,
    authority: &mut A,
) -> Result<RestoredAuthenticator> {
    restore(serial, restore_code, authority).map(|(restored, _)| restored)
}

fn restore<A: RestoreAuthority + ?Sized>(
    serial: &str,
    code: &str,
    authority: &mut A,
) -> Result<(RestoredAuthenticator, SecretKey)> {
    let serial = normalize_serial(serial)?;
    let code = code.trim().to_ascii_uppercase();
    let key = Zeroizing::new(decode_restore_code(&code)?);

    let challenge = authority.initiate(&serial)?;
    let mut message = Zeroizing::new(serial.clone().into_bytes());
    message.extend_from_slice(&challenge);
    let response = hmac::sign(&hmac::Key::new(HMAC_SHA1, &key[..]), &message);

    let mut pad = Zeroizing::new([0u8; SECRET_LENGTH]);
    SystemRandom::new().fill(&mut pad[..])?;

    let padded = Zeroizing::new(authority.validate(&serial, response.as_ref(), &pad[..])?);
    if padded.len() != SECRET_LENGTH {
        return Err(Error::Restore(format!(
            "authority returned {} bytes, expected {}",
            padded.len(),
            SECRET_LENGTH
        )));
    }
    let secret = SecretKey::from_bytes(padded.iter().zip(pad.iter()).map(|(a, b)| a ^ b).collect());

    let expected = restore_code(&serial, secret.as_ref())?;
    if verify_slices_are_equal(expected.as_bytes(), code.as_bytes()).is_err() {
        return Err(Error::Restore("restored secret does not match the restore code".into()));
    }
    debug!("{}: restore for region {} completed", Mode::BattleNet, &serial[..2]);

    let restored = RestoredAuthenticator {
        region: serial[..2].to_owned(),
        serial: format!("{}-{}-{}-{}", &serial[..2], &serial[2..6], &serial[6..10], &serial[10..]),
        restore_code: code,
        secret: secret.encode::<Hex>(),
    };
    Ok((restored, secret))
}

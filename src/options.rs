//! Authenticator configuration.
//!
//! [`Options`] is a plain value: every field is validated when it is assigned, so an `Options`
//! that exists is always usable. Invalid assignments return
//! [`Error::InvalidConfiguration`] and leave the previous value in place.

use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::digest::Algorithm;
use crate::error::{Error, Result};
use crate::length::Digits;
use crate::secret::{MAX_SECRET_LENGTH, MIN_SECRET_LENGTH};

/// Shortest accepted validity period, in seconds.
pub const MIN_PERIOD: u32 = 15;
/// Longest accepted validity period, in seconds.
pub const MAX_PERIOD: u32 = 60;
/// Upper bound on the verification window, to keep verification loops short.
pub const MAX_ADJACENT: u32 = 500;

/// Which OTP flavour an [`Authenticator`](crate::Authenticator) runs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    /// Counter based, RFC 4226.
    Hotp,
    /// Time based, RFC 6238.
    Totp,
    /// Blizzard's Battle.net authenticator.
    BattleNet,
    /// Valve's Steam Guard mobile authenticator.
    SteamGuard,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Totp
    }
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Hotp => "hotp",
            Mode::Totp => "totp",
            Mode::BattleNet => "battlenet",
            Mode::SteamGuard => "steamguard",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hotp" => Ok(Mode::Hotp),
            "totp" => Ok(Mode::Totp),
            "battlenet" => Ok(Mode::BattleNet),
            "steamguard" => Ok(Mode::SteamGuard),
            _ => Err(Error::InvalidConfiguration(format!("invalid mode: {}", s))),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_owned()
    }
}

/// Validated authenticator options.
///
/// Defaults: TOTP, SHA-1, 6 digits, 30 second period, 20 byte secrets, one adjacent code on
/// either side, no time offset, local time.
///
/// ```
/// # use otp_authenticator::{Algorithm, Mode, Options};
/// let options = Options::default()
///     .with_mode(Mode::Totp)
///     .with_algorithm(Algorithm::Sha256)
///     .with_digits(8)?
///     .with_period(60)?;
/// assert_eq!(options.period(), 60);
/// # Ok::<(), otp_authenticator::Error>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OptionsConfig", into = "OptionsConfig")]
pub struct Options {
    mode: Mode,
    algorithm: Algorithm,
    digits: Digits,
    period: u32,
    secret_length: usize,
    adjacent: u32,
    time_offset: i64,
    use_local_time: bool,
    server_time: Option<i64>,
    last_request_time: Option<i64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: Mode::Totp,
            algorithm: Algorithm::Sha1,
            digits: Digits::Six,
            period: 30,
            secret_length: 20,
            adjacent: 1,
            time_offset: 0,
            use_local_time: true,
            server_time: None,
            last_request_time: None,
        }
    }
}

impl Options {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn digits(&self) -> Digits {
        self.digits
    }

    /// Validity period of a time-based code, in seconds.
    pub fn period(&self) -> u32 {
        self.period
    }

    /// Length in bytes of secrets produced by `create_secret`.
    pub fn secret_length(&self) -> usize {
        self.secret_length
    }

    /// Number of codes on either side of the current one accepted during verification.
    pub fn adjacent(&self) -> u32 {
        self.adjacent
    }

    /// Seconds added to every timestamp before the timeslice is computed.
    pub fn time_offset(&self) -> i64 {
        self.time_offset
    }

    pub fn use_local_time(&self) -> bool {
        self.use_local_time
    }

    /// Pre-fetched server time and the local time at which it was fetched.
    pub fn server_time(&self) -> Option<(i64, i64)> {
        match (self.server_time, self.last_request_time) {
            (Some(server_time), Some(last_request_time)) => Some((server_time, last_request_time)),
            _ => None,
        }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    /// Sets the code length; only 6 and 8 are accepted.
    pub fn set_digits(&mut self, digits: u8) -> Result<()> {
        self.digits = Digits::try_from(digits)?;
        Ok(())
    }

    /// Sets the period; accepted range is 15 to 60 seconds.
    pub fn set_period(&mut self, period: u32) -> Result<()> {
        if !(MIN_PERIOD..=MAX_PERIOD).contains(&period) {
            return Err(Error::InvalidConfiguration(format!("invalid period: {}", period)));
        }
        self.period = period;
        Ok(())
    }

    /// Sets the generated secret length; accepted range is 16 to 1024 bytes.
    pub fn set_secret_length(&mut self, secret_length: usize) -> Result<()> {
        if !(MIN_SECRET_LENGTH..=MAX_SECRET_LENGTH).contains(&secret_length) {
            return Err(Error::InvalidConfiguration(format!(
                "invalid secret length: {}",
                secret_length
            )));
        }
        self.secret_length = secret_length;
        Ok(())
    }

    /// Sets the verification window; accepted range is 0 to [`MAX_ADJACENT`].
    pub fn set_adjacent(&mut self, adjacent: i64) -> Result<()> {
        match u32::try_from(adjacent) {
            Ok(adjacent) if adjacent <= MAX_ADJACENT => {
                self.adjacent = adjacent;
                Ok(())
            }
            _ => Err(Error::InvalidConfiguration(format!("invalid adjacent value: {}", adjacent))),
        }
    }

    pub fn set_time_offset(&mut self, time_offset: i64) {
        self.time_offset = time_offset;
    }

    pub fn set_use_local_time(&mut self, use_local_time: bool) {
        self.use_local_time = use_local_time;
    }

    /// Records a server time fetched when the local clock read `last_request_time`.
    pub fn set_server_time(&mut self, server_time: i64, last_request_time: i64) {
        self.server_time = Some(server_time);
        self.last_request_time = Some(last_request_time);
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.set_mode(mode);
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.set_algorithm(algorithm);
        self
    }

    pub fn with_digits(mut self, digits: u8) -> Result<Self> {
        self.set_digits(digits)?;
        Ok(self)
    }

    pub fn with_period(mut self, period: u32) -> Result<Self> {
        self.set_period(period)?;
        Ok(self)
    }

    pub fn with_secret_length(mut self, secret_length: usize) -> Result<Self> {
        self.set_secret_length(secret_length)?;
        Ok(self)
    }

    pub fn with_adjacent(mut self, adjacent: i64) -> Result<Self> {
        self.set_adjacent(adjacent)?;
        Ok(self)
    }

    pub fn with_time_offset(mut self, time_offset: i64) -> Self {
        self.set_time_offset(time_offset);
        self
    }

    pub fn with_server_time(mut self, server_time: i64, last_request_time: i64) -> Self {
        self.set_use_local_time(false);
        self.set_server_time(server_time, last_request_time);
        self
    }
}

/// Unvalidated, serializable form of [`Options`].
///
/// Deserializing `Options` goes through this type and then the same setters used at runtime,
/// so configuration files cannot smuggle in out-of-range values. Missing fields take their
/// defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    pub mode: Mode,
    pub algorithm: Algorithm,
    pub digits: u8,
    pub period: u32,
    pub secret_length: usize,
    pub adjacent: i64,
    pub time_offset: i64,
    pub use_local_time: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_request_time: Option<i64>,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Options::default().into()
    }
}

impl TryFrom<OptionsConfig> for Options {
    type Error = Error;

    fn try_from(config: OptionsConfig) -> Result<Self> {
        let mut options = Options::default()
            .with_mode(config.mode)
            .with_algorithm(config.algorithm)
            .with_digits(config.digits)?
            .with_period(config.period)?
            .with_secret_length(config.secret_length)?
            .with_adjacent(config.adjacent)?
            .with_time_offset(config.time_offset);
        options.set_use_local_time(config.use_local_time);
        options.server_time = config.server_time;
        options.last_request_time = config.last_request_time;
        Ok(options)
    }
}

impl From<Options> for OptionsConfig {
    fn from(options: Options) -> Self {
        Self {
            mode: options.mode,
            algorithm: options.algorithm,
            digits: options.digits.get(),
            period: options.period,
            secret_length: options.secret_length,
            adjacent: i64::from(options.adjacent),
            time_offset: options.time_offset,
            use_local_time: options.use_local_time,
            server_time: options.server_time,
            last_request_time: options.last_request_time,
        }
    }
}

//! The mode-switching facade.

use log::debug;

use crate::battlenet::{BattleNet, RestoreAuthority, RestoredAuthenticator};
use crate::digest::Hmac;
use crate::error::{Error, Result};
use crate::hotp::Hotp;
use crate::options::{Mode, Options};
use crate::steam::SteamGuard;
use crate::totp::Totp;
use crate::uri::provisioning_uri;
use crate::variant::Variant;

#[derive(Clone, Debug)]
enum Engine {
    Hotp(Hotp),
    Totp(Totp),
    BattleNet(BattleNet),
    SteamGuard(SteamGuard),
}

impl Engine {
    fn new(options: Options) -> Self {
        match options.mode() {
            Mode::Hotp => Engine::Hotp(options.into()),
            Mode::Totp => Engine::Totp(options.into()),
            Mode::BattleNet => Engine::BattleNet(options.into()),
            Mode::SteamGuard => Engine::SteamGuard(options.into()),
        }
    }
}

macro_rules! dispatch {
    ($engine:expr, $variant:ident => $body:expr) => {
        match $engine {
            Engine::Hotp($variant) => $body,
            Engine::Totp($variant) => $body,
            Engine::BattleNet($variant) => $body,
            Engine::SteamGuard($variant) => $body,
        }
    };
}

/// One authenticator of any [`Mode`], selected by its [`Options`].
///
/// Switching to a different mode through [`set_options`](Authenticator::set_options) starts a
/// fresh variant and discards the secret, since secrets are not portable between modes.
///
/// ```
/// # use otp_authenticator::{Authenticator, Mode, Options};
/// let mut auth = Authenticator::new(Options::default().with_mode(Mode::Hotp));
/// auth.set_secret("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ")?;
/// assert_eq!(auth.code(Some(1))?, "287082");
/// assert!(auth.verify("287082", Some(1))?);
/// # Ok::<(), otp_authenticator::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Authenticator {
    engine: Engine,
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl From<Options> for Authenticator {
    fn from(options: Options) -> Self {
        Self::new(options)
    }
}

impl Authenticator {
    pub fn new(options: Options) -> Self {
        Self { engine: Engine::new(options) }
    }

    /// Builds an authenticator and installs `encoded` as its secret.
    pub fn with_secret(options: Options, encoded: &str) -> Result<Self> {
        let mut authenticator = Self::new(options);
        authenticator.set_secret(encoded)?;
        Ok(authenticator)
    }

    pub fn options(&self) -> &Options {
        dispatch!(&self.engine, v => v.options())
    }

    pub fn mode(&self) -> Mode {
        self.options().mode()
    }

    /// Applies `options`. A change of mode replaces the variant and drops the secret.
    pub fn set_options(&mut self, options: Options) {
        let (from, to) = (self.mode(), options.mode());
        if from != to {
            debug!("switching mode from {} to {}; secret discarded", from, to);
            self.engine = Engine::new(options);
            return;
        }
        dispatch!(&mut self.engine, v => v.set_options(options))
    }

    /// Decodes `encoded` with the mode's codec and stores it. On failure the previous secret is
    /// kept.
    pub fn set_secret(&mut self, encoded: &str) -> Result<()> {
        dispatch!(&mut self.engine, v => v.set_secret(encoded))
    }

    pub fn get_secret(&self) -> Result<String> {
        dispatch!(&self.engine, v => v.get_secret())
    }

    /// Generates and stores a random secret of `length` bytes (the configured secret length if
    /// `None`), returning it encoded.
    ///
    /// Battle.net and Steam Guard secrets are issued by their services; those modes return
    /// [`Error::UnsupportedOperation`].
    pub fn create_secret(&mut self, length: Option<usize>) -> Result<String> {
        dispatch!(&mut self.engine, v => v.create_secret(length))
    }

    /// The code for `input`: a counter in HOTP mode, a unix timestamp otherwise. `None` means
    /// counter 0 or the current time.
    pub fn code(&self, input: Option<i64>) -> Result<String> {
        dispatch!(&self.engine, v => v.code(input))
    }

    /// Checks `otp` against `input`, within the adjacency window for time-based modes.
    pub fn verify(&self, otp: &str, input: Option<i64>) -> Result<bool> {
        dispatch!(&self.engine, v => v.verify(otp, input))
    }

    pub fn get_counter(&self, input: Option<i64>) -> u64 {
        dispatch!(&self.engine, v => v.get_counter(input))
    }

    pub fn get_hmac(&self, counter: u64) -> Result<Hmac> {
        dispatch!(&self.engine, v => v.get_hmac(counter))
    }

    pub fn get_code(&self, hmac: &Hmac) -> u32 {
        dispatch!(&self.engine, v => v.get_code(hmac))
    }

    pub fn get_otp(&self, code: u32) -> String {
        dispatch!(&self.engine, v => v.get_otp(code))
    }

    /// `otpauth://` URI for the current secret and options. See
    /// [`provisioning_uri`](crate::uri::provisioning_uri).
    pub fn get_uri(
        &self,
        label: &str,
        issuer: &str,
        hotp_counter: Option<u64>,
        omit_settings: bool,
    ) -> Result<String> {
        let secret = self.get_secret()?;
        provisioning_uri(self.options(), &secret, label, issuer, hotp_counter, omit_settings)
    }

    /// Recovers and installs a Battle.net secret. Only available in [`Mode::BattleNet`].
    pub fn restore_battlenet<A: RestoreAuthority + ?Sized>(
        &mut self,
        serial: &str,
        restore_code: &str,
        authority: &mut A,
    ) -> Result<RestoredAuthenticator> {
        match &mut self.engine {
            Engine::BattleNet(battlenet) => battlenet.restore(serial, restore_code, authority),
            _ => Err(Error::UnsupportedOperation("battle.net restore")),
        }
    }
}

//! One-time password generation and verification.
//!
//! Implements counter-based codes ([RFC 4226][4226]), time-based codes ([RFC 6238][6238]) and two
//! proprietary TOTP derivatives: Blizzard's Battle.net authenticator and Valve's Steam Guard.
//! Each flavour is a [`Variant`]; [`Authenticator`] picks one according to [`Options::mode`].
//!
//! ```
//! # use otp_authenticator::{Authenticator, Options};
//! let mut auth = Authenticator::new(Options::default().with_digits(8)?);
//! auth.set_secret("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ")?;
//! assert_eq!(auth.code(Some(59))?, "94287082");
//! assert!(auth.verify("94287082", Some(59))?);
//! # Ok::<(), otp_authenticator::Error>(())
//! ```
//!
//! Secrets are held in memory that is wiped on drop and are never logged. The crate logs through
//! the [`log`] facade and installs no logger of its own.
//!
//! [4226]: https://tools.ietf.org/html/rfc4226
//! [6238]: https://tools.ietf.org/html/rfc6238

mod authenticator;
pub mod battlenet;
pub mod codec;
mod digest;
mod error;
mod hotp;
mod length;
mod options;
mod secret;
mod steam;
pub mod time;
mod totp;
pub mod uri;
mod variant;

pub use crate::authenticator::Authenticator;
pub use crate::battlenet::{BattleNet, RestoreAuthority, RestoredAuthenticator};
pub use crate::codec::{Base32, Base64, Hex, SecretCodec};
pub use crate::digest::{compute_hmac, Algorithm, Digest, Hmac};
pub use crate::error::{Error, Result};
pub use crate::hotp::Hotp;
pub use crate::length::Digits;
pub use crate::options::{Mode, Options, OptionsConfig, MAX_ADJACENT, MAX_PERIOD, MIN_PERIOD};
pub use crate::secret::{SecretKey, MAX_SECRET_LENGTH, MIN_SECRET_LENGTH};
pub use crate::steam::SteamGuard;
pub use crate::totp::Totp;
pub use crate::variant::{State, Variant};

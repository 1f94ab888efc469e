//! Error type shared by every authenticator operation.

use thiserror::Error;

/// Authenticator error type.
///
/// Every error is raised at the point of violation and leaves the receiver unchanged: a failed
/// setter keeps the previous value, and a failed [`set_secret`] keeps the previous secret.
///
/// [`set_secret`]: crate::Authenticator::set_secret
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// An option was assigned a value outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The encoded secret was empty or did not match the codec's character set.
    #[error("invalid secret encoding: {0}")]
    InvalidSecretEncoding(String),

    /// An operation needing the shared secret was attempted before one was set.
    #[error("no secret set")]
    NoSecret,

    /// The active variant does not support the requested operation.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// HMAC bytes supplied from outside had a length no supported algorithm produces.
    #[error("invalid HMAC digest length: {0} bytes")]
    InvalidDigest(usize),

    /// A Battle.net restore could not be completed.
    #[error("restore failed: {0}")]
    Restore(String),

    /// The system random number generator failed.
    #[error("secure random number generator failure")]
    Crypto,
}

impl From<ring::error::Unspecified> for Error {
    fn from(_: ring::error::Unspecified) -> Self {
        Error::Crypto
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! HMAC-based one-time passwords ([RFC 4226][4226]).
//!
//! [4226]: https://tools.ietf.org/html/rfc4226

use crate::codec::Base32;
use crate::options::{Mode, Options};
use crate::variant::{State, Variant};

/// Counter-based authenticator.
///
/// The caller owns the synchronized moving counter and passes it in on every call; it defaults
/// to 0 when omitted. Verification compares against that one counter only. Looking ahead for a
/// resynchronizing client is the caller's decision, made by passing the counters to try.
#[derive(Clone, Debug)]
pub struct Hotp {
    state: State,
}

impl Hotp {
    pub fn new(options: Options) -> Self {
        Self { state: State::new(Self::MODE, options) }
    }
}

impl Default for Hotp {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl From<Options> for Hotp {
    fn from(options: Options) -> Self {
        Self::new(options)
    }
}

impl Variant for Hotp {
    const MODE: Mode = Mode::Hotp;
    type Codec = Base32;

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// The counter itself; negative inputs keep their two's-complement bit pattern.
    fn get_counter(&self, input: Option<i64>) -> u64 {
        input.unwrap_or(0) as u64
    }
}

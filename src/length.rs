//! Code length restrictions and decimal formatting.

use core::convert::TryFrom;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Number of decimal digits in a generated code.
///
/// [RFC 4226][4226] requires at least 6 digits and allows 7 or 8; [RFC 6238][6238]'s reference
/// code goes up to 8. Authenticator apps in the wild only display 6 or 8 digits, so those are the
/// only lengths accepted here.
///
/// [4226]: https://datatracker.ietf.org/doc/html/rfc4226
/// [6238]: https://datatracker.ietf.org/doc/html/rfc6238
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Digits {
    Six,
    Eight,
}

impl Default for Digits {
    fn default() -> Self {
        Digits::Six
    }
}

impl Digits {
    pub fn get(self) -> u8 {
        match self {
            Digits::Six => 6,
            Digits::Eight => 8,
        }
    }

    /// Reduces an intermediate code modulo 10^digits and left-pads it with zeros.
    pub fn format(self, code: u32) -> String {
        format_decimal(code, self.get())
    }
}

impl TryFrom<u8> for Digits {
    type Error = Error;

    fn try_from(digits: u8) -> Result<Self, Self::Error> {
        match digits {
            6 => Ok(Digits::Six),
            8 => Ok(Digits::Eight),
            _ => Err(Error::InvalidConfiguration(format!("invalid code length: {}", digits))),
        }
    }
}

impl From<Digits> for u8 {
    fn from(digits: Digits) -> Self {
        digits.get()
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// `code mod 10^width`, zero-padded to `width` characters.
pub(crate) fn format_decimal(code: u32, width: u8) -> String {
    let code = code % 10_u32.pow(u32::from(width));
    format!("{:0>width$}", code, width = usize::from(width))
}

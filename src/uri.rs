//! `otpauth://` provisioning URIs, as scanned from QR codes by authenticator apps.
//!
//! See <https://github.com/google/google-authenticator/wiki/Key-Uri-Format>.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Error, Result};
use crate::options::{Mode, Options};

/// Everything but RFC 3986 unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn encode(component: &str) -> String {
    utf8_percent_encode(component, COMPONENT).to_string()
}

/// Formats a provisioning URI for `secret` (already in the mode's text encoding).
///
/// Any mode is formatted; the mode name becomes the URI host. `label` and `issuer` are trimmed
/// and must not be empty. Unless `omit_settings` is set, the configured digits and algorithm are
/// included, along with the period for TOTP or the counter for HOTP when one is given.
pub fn provisioning_uri(
    options: &Options,
    secret: &str,
    label: &str,
    issuer: &str,
    hotp_counter: Option<u64>,
    omit_settings: bool,
) -> Result<String> {
    let mode = options.mode();
    let (label, issuer) = (label.trim(), issuer.trim());
    if label.is_empty() || issuer.is_empty() {
        return Err(Error::InvalidConfiguration("label and issuer cannot be empty".into()));
    }

    let mut uri = format!(
        "otpauth://{}/{}?secret={}&issuer={}",
        mode,
        encode(label),
        encode(secret),
        encode(issuer)
    );
    if omit_settings {
        return Ok(uri);
    }

    uri.push_str(&format!("&digits={}&algorithm={}", options.digits(), options.algorithm()));
    match (mode, hotp_counter) {
        (Mode::Totp, _) => uri.push_str(&format!("&period={}", options.period())),
        (Mode::Hotp, Some(counter)) => uri.push_str(&format!("&counter={}", counter)),
        _ => {}
    }
    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Algorithm;

    const SECRET: &str = "XVSWWIXN4NMA3XNNDJ6XTFSLM3DILOTZ";

    fn hotp() -> Options {
        Options::default()
            .with_mode(Mode::Hotp)
            .with_algorithm(Algorithm::Sha256)
            .with_digits(8)
            .unwrap()
    }

    #[test]
    fn hotp_uri() {
        assert_eq!(
            provisioning_uri(&hotp(), SECRET, "test", "example.com", Some(42), false).unwrap(),
            "otpauth://hotp/test?secret=XVSWWIXN4NMA3XNNDJ6XTFSLM3DILOTZ&issuer=example.com\
             &digits=8&algorithm=SHA256&counter=42"
        );
        assert_eq!(
            provisioning_uri(&hotp(), SECRET, "test", "example.com", None, false).unwrap(),
            "otpauth://hotp/test?secret=XVSWWIXN4NMA3XNNDJ6XTFSLM3DILOTZ&issuer=example.com\
             &digits=8&algorithm=SHA256"
        );
    }

    #[test]
    fn totp_uri() {
        let options = Options::default()
            .with_algorithm(Algorithm::Sha512)
            .with_digits(8)
            .unwrap()
            .with_period(60)
            .unwrap();
        assert_eq!(
            provisioning_uri(&options, SECRET, " test ", "example.com", Some(42), false).unwrap(),
            "otpauth://totp/test?secret=XVSWWIXN4NMA3XNNDJ6XTFSLM3DILOTZ&issuer=example.com\
             &digits=8&algorithm=SHA512&period=60"
        );
    }

    #[test]
    fn omitted_settings() {
        let expected =
            "otpauth://totp/test?secret=XVSWWIXN4NMA3XNNDJ6XTFSLM3DILOTZ&issuer=example.com";
        let uri = provisioning_uri(&Options::default(), SECRET, "test", "example.com", None, true);
        assert_eq!(uri.unwrap(), expected);
        let uri = provisioning_uri(&hotp(), SECRET, "test", "example.com", Some(42), true);
        assert_eq!(uri.unwrap(), expected.replace("totp", "hotp"));
    }

    #[test]
    fn components_are_percent_encoded() {
        let uri = provisioning_uri(
            &Options::default(),
            SECRET,
            "Example Co:alice@example.com",
            "Example Co",
            None,
            true,
        )
        .unwrap();
        assert_eq!(
            uri,
            "otpauth://totp/Example%20Co%3Aalice%40example.com\
             ?secret=XVSWWIXN4NMA3XNNDJ6XTFSLM3DILOTZ&issuer=Example%20Co"
        );
    }

    #[test]
    fn empty_label_or_issuer() {
        let options = Options::default();
        for (label, issuer) in &[("", "example.com"), ("test", "  "), (" \t", "")] {
            assert!(matches!(
                provisioning_uri(&options, SECRET, label, issuer, None, false),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn proprietary_modes() {
        let options = Options::default().with_mode(Mode::BattleNet);
        assert_eq!(
            provisioning_uri(&options, "3132", "test", "example.com", Some(42), false).unwrap(),
            "otpauth://battlenet/test?secret=3132&issuer=example.com&digits=6&algorithm=SHA1"
        );
        let options = Options::default().with_mode(Mode::SteamGuard);
        assert_eq!(
            provisioning_uri(&options, "MTIzNA==", "test", "example.com", None, true).unwrap(),
            "otpauth://steamguard/test?secret=MTIzNA%3D%3D&issuer=example.com"
        );
    }
}

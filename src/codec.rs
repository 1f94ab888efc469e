//! Textual encodings of raw binary secrets.
//!
//! Authenticator apps exchange secrets as text, but the encoding depends on who issued them:
//! RFC 6238 provisioning uses unpadded base-32, Battle.net hands out hex strings, and Steam
//! Guard stores base-64. Each encoding is a [`SecretCodec`], and each variant picks one.

use data_encoding::{BASE32_NOPAD, BASE64, HEXLOWER, HEXLOWER_PERMISSIVE};

use crate::error::{Error, Result};

/// Encoder/decoder pair for one textual secret representation.
///
/// Decoding always runs [`check_charset`](SecretCodec::check_charset) first, so input with
/// characters outside the alphabet is rejected with a descriptive error instead of being
/// silently skipped.
pub trait SecretCodec {
    /// Human-readable codec name used in error messages.
    const NAME: &'static str;

    /// Encodes raw secret bytes.
    fn encode(raw: &[u8]) -> String;

    /// Verifies that `encoded` only uses the codec's alphabet. The empty string passes.
    fn check_charset(encoded: &str) -> Result<()>;

    /// Decodes text into raw secret bytes.
    fn decode(encoded: &str) -> Result<Vec<u8>>;
}

/// Checks `encoded` against a byte predicate, reporting the first offending character.
fn check_with(name: &str, encoded: &str, allowed: impl Fn(u8) -> bool) -> Result<()> {
    match encoded.char_indices().find(|&(_, c)| !c.is_ascii() || !allowed(c as u8)) {
        Some((position, c)) => Err(Error::InvalidSecretEncoding(format!(
            "{} must match its character set: found {:?} at position {}",
            name, c, position
        ))),
        None => Ok(()),
    }
}

fn malformed(name: &str, err: data_encoding::DecodeError) -> Error {
    Error::InvalidSecretEncoding(format!("malformed {} string: {}", name, err))
}

/// RFC 4648 base-32 (`A-Z2-7`), unpadded on output, case-insensitive on input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Base32;

impl SecretCodec for Base32 {
    const NAME: &'static str = "base32";

    fn encode(raw: &[u8]) -> String {
        BASE32_NOPAD.encode(raw)
    }

    fn check_charset(encoded: &str) -> Result<()> {
        check_with(Self::NAME, encoded, |b| {
            matches!(b.to_ascii_uppercase(), b'A'..=b'Z' | b'2'..=b'7')
        })
    }

    fn decode(encoded: &str) -> Result<Vec<u8>> {
        Self::check_charset(encoded)?;
        BASE32_NOPAD
            .decode(encoded.to_ascii_uppercase().as_bytes())
            .map_err(|e| malformed(Self::NAME, e))
    }
}

/// Hexadecimal, lowercase on output, either case on input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Hex;

impl SecretCodec for Hex {
    const NAME: &'static str = "hex";

    fn encode(raw: &[u8]) -> String {
        HEXLOWER.encode(raw)
    }

    fn check_charset(encoded: &str) -> Result<()> {
        check_with(Self::NAME, encoded, |b| b.is_ascii_hexdigit())
    }

    fn decode(encoded: &str) -> Result<Vec<u8>> {
        Self::check_charset(encoded)?;
        HEXLOWER_PERMISSIVE.decode(encoded.as_bytes()).map_err(|e| malformed(Self::NAME, e))
    }
}

/// RFC 4648 base-64 with the standard alphabet and `=` padding.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Base64;

impl SecretCodec for Base64 {
    const NAME: &'static str = "base64";

    fn encode(raw: &[u8]) -> String {
        BASE64.encode(raw)
    }

    fn check_charset(encoded: &str) -> Result<()> {
        check_with(Self::NAME, encoded, |b| {
            b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
        })
    }

    fn decode(encoded: &str) -> Result<Vec<u8>> {
        Self::check_charset(encoded)?;
        BASE64.decode(encoded.as_bytes()).map_err(|e| malformed(Self::NAME, e))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i.wrapping_mul(31) ^ (i >> 3)) as u8).collect()
    }

    #[test]
    fn round_trip_all_codecs() {
        for len in (0..=1024).step_by(7) {
            let raw = sample(len);
            assert_eq!(Base32::decode(&Base32::encode(&raw)).unwrap(), raw);
            assert_eq!(Hex::decode(&Hex::encode(&raw)).unwrap(), raw);
            assert_eq!(Base64::decode(&Base64::encode(&raw)).unwrap(), raw);
        }
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        assert_eq!(Base32::encode(&[]), "");
        assert_eq!(Base32::decode("").unwrap(), Vec::<u8>::new());
        assert_eq!(Hex::decode("").unwrap(), Vec::<u8>::new());
        assert_eq!(Base64::decode("").unwrap(), Vec::<u8>::new());
    }

    #[rstest]
    #[case(b"12345678901234567890", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ")]
    #[case(b"a", "ME")]
    #[case(b"ab", "MFRA")]
    #[case(b"abc", "MFRGG")]
    #[case(b"abcd", "MFRGGZA")]
    #[case(b"abcde", "MFRGGZDF")]
    #[case(b"abcdef", "MFRGGZDFMY")]
    #[case(b"abcdefg", "MFRGGZDFMZTQ")]
    fn base32_vectors(#[case] raw: &[u8], #[case] encoded: &str) {
        assert_eq!(Base32::encode(raw), encoded);
        assert_eq!(Base32::decode(encoded).unwrap(), raw);
    }

    #[test]
    fn base32_is_case_insensitive_and_normalizes() {
        let decoded = Base32::decode("gezdgnbvgy3tqojqgezdgnbvgy3tqojq").unwrap();
        assert_eq!(decoded, b"12345678901234567890");
        assert_eq!(Base32::encode(&decoded), "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ");
    }

    #[rstest]
    #[case("This_is_an_invalid_secret_phrase!")]
    #[case("GEZDGNBV0Y3TQOJQ")]
    #[case("GEZDGNBVGY3TQOJQ====")]
    fn base32_rejects_foreign_characters(#[case] encoded: &str) {
        assert!(matches!(Base32::decode(encoded), Err(Error::InvalidSecretEncoding(_))));
    }

    #[rstest]
    #[case(b"a", "YQ==")]
    #[case(b"ab", "YWI=")]
    #[case(b"abc", "YWJj")]
    #[case(b"abcdefg", "YWJjZGVmZw==")]
    #[case(b"12345678901234567890", "MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=")]
    fn base64_vectors(#[case] raw: &[u8], #[case] encoded: &str) {
        assert_eq!(Base64::encode(raw), encoded);
        assert_eq!(Base64::decode(encoded).unwrap(), raw);
    }

    #[test]
    fn base64_rejects_foreign_characters() {
        let err = Base64::check_charset("YWJjZÄ==...").unwrap_err();
        assert!(err.to_string().contains("base64 must match its character set"));
    }

    #[test]
    fn hex_accepts_both_cases_and_emits_lowercase() {
        let raw = Hex::decode("3132333435363738393031323334353637383930").unwrap();
        assert_eq!(raw, b"12345678901234567890");
        assert_eq!(Hex::decode("7B0BFA82").unwrap(), Hex::decode("7b0bfa82").unwrap());
        assert_eq!(Hex::encode(&[0x7b, 0x0b, 0xfa]), "7b0bfa");
    }

    #[test]
    fn hex_rejects_foreign_characters_and_odd_length() {
        assert!(matches!(Hex::decode("xyz0"), Err(Error::InvalidSecretEncoding(_))));
        assert!(matches!(Hex::decode("abc"), Err(Error::InvalidSecretEncoding(_))));
    }
}

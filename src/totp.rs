//! Time-based one-time passwords ([RFC 6238][6238]).
//!
//! TOTP is HOTP with the counter replaced by the number of whole periods elapsed since the unix
//! epoch: `T = floor((unix_time + time_offset) / period)`.
//!
//! [6238]: https://tools.ietf.org/html/rfc6238

use crate::codec::Base32;
use crate::error::Result;
use crate::options::{Mode, Options};
use crate::variant::{time_counter, verify_window, State, Variant};

/// Time-based authenticator.
///
/// Input values are unix timestamps in seconds; omitting them uses the current time (or the
/// adjusted server time, see [`Options::with_server_time`]). Verification accepts codes up to
/// [`Options::adjacent`] periods away from the given time.
#[derive(Clone, Debug)]
pub struct Totp {
    state: State,
}

impl Totp {
    pub fn new(options: Options) -> Self {
        Self { state: State::new(Self::MODE, options) }
    }
}

impl Default for Totp {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl From<Options> for Totp {
    fn from(options: Options) -> Self {
        Self::new(options)
    }
}

impl Variant for Totp {
    const MODE: Mode = Mode::Totp;
    type Codec = Base32;

    fn state(&self) -> &State {
        &self.state
    }

    fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn get_counter(&self, input: Option<i64>) -> u64 {
        time_counter(self, input)
    }

    fn verify(&self, otp: &str, input: Option<i64>) -> Result<bool> {
        verify_window(self, otp, input)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::digest::Algorithm;

    const SHA1_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";
    const SHA256_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZA";
    const SHA512_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ\
                                 GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQGEZDGNA";

    fn totp(algorithm: Algorithm, adjacent: i64) -> Totp {
        let options = Options::default()
            .with_algorithm(algorithm)
            .with_digits(8)
            .unwrap()
            .with_adjacent(adjacent)
            .unwrap();
        let mut totp = Totp::new(options);
        let secret = match algorithm {
            Algorithm::Sha1 => SHA1_SECRET,
            Algorithm::Sha256 => SHA256_SECRET,
            Algorithm::Sha512 => SHA512_SECRET,
        };
        totp.set_secret(secret).unwrap();
        totp
    }

    // Appendix B of RFC 6238, with the intermediate (untruncated) codes.
    #[rstest]
    #[case(Algorithm::Sha1, 59, 0x1, 1_094_287_082, "94287082")]
    #[case(Algorithm::Sha256, 59, 0x1, 746_119_246, "46119246")]
    #[case(Algorithm::Sha512, 59, 0x1, 490_693_936, "90693936")]
    #[case(Algorithm::Sha1, 1_111_111_109, 0x23523ec, 907_081_804, "07081804")]
    #[case(Algorithm::Sha256, 1_111_111_109, 0x23523ec, 1_568_084_774, "68084774")]
    #[case(Algorithm::Sha512, 1_111_111_109, 0x23523ec, 225_091_201, "25091201")]
    #[case(Algorithm::Sha1, 1_111_111_111, 0x23523ed, 414_050_471, "14050471")]
    #[case(Algorithm::Sha256, 1_111_111_111, 0x23523ed, 1_167_062_674, "67062674")]
    #[case(Algorithm::Sha512, 1_111_111_111, 0x23523ed, 1_899_943_326, "99943326")]
    #[case(Algorithm::Sha1, 1_234_567_890, 0x273ef07, 689_005_924, "89005924")]
    #[case(Algorithm::Sha256, 1_234_567_890, 0x273ef07, 91_819_424, "91819424")]
    #[case(Algorithm::Sha512, 1_234_567_890, 0x273ef07, 1_493_441_116, "93441116")]
    #[case(Algorithm::Sha1, 2_000_000_000, 0x3f940aa, 2_069_279_037, "69279037")]
    #[case(Algorithm::Sha256, 2_000_000_000, 0x3f940aa, 1_790_698_825, "90698825")]
    #[case(Algorithm::Sha512, 2_000_000_000, 0x3f940aa, 1_938_618_901, "38618901")]
    #[case(Algorithm::Sha1, 20_000_000_000, 0x27bc86aa, 1_465_353_130, "65353130")]
    #[case(Algorithm::Sha256, 20_000_000_000, 0x27bc86aa, 777_737_706, "77737706")]
    #[case(Algorithm::Sha512, 20_000_000_000, 0x27bc86aa, 1_047_863_826, "47863826")]
    fn rfc_6238_appendix_b(
        #[case] algorithm: Algorithm,
        #[case] timestamp: i64,
        #[case] timeslice: u64,
        #[case] intermediate: u32,
        #[case] expected: &str,
    ) {
        let totp = totp(algorithm, 0);
        let counter = totp.get_counter(Some(timestamp));
        assert_eq!(counter, timeslice);
        let code = totp.get_code(&totp.get_hmac(counter).unwrap());
        assert_eq!(code, intermediate);
        assert_eq!(totp.get_otp(code), expected);
        assert_eq!(totp.code(Some(timestamp)).unwrap(), expected);
        assert!(totp.verify(expected, Some(timestamp)).unwrap());
    }

    #[rstest]
    #[case(Algorithm::Sha1, 59, "94287082")]
    #[case(Algorithm::Sha256, 1_111_111_109, "68084774")]
    #[case(Algorithm::Sha512, 20_000_000_000, "47863826")]
    fn adjacent_window(#[case] algorithm: Algorithm, #[case] timestamp: i64, #[case] code: &str) {
        let adjacent = 20;
        let limit = 2 * adjacent;
        let mut totp = totp(algorithm, adjacent);

        for i in -limit..=limit {
            let mut options = totp.options().clone();
            options.set_time_offset(i * 30);
            totp.set_options(options);

            let valid = totp.verify(code, Some(timestamp)).unwrap();
            assert_eq!(valid, (-adjacent..=adjacent).contains(&i), "offset {} periods", i);
        }
    }

    #[test]
    fn verify_at_shifted_timestamps() {
        let totp = totp(Algorithm::Sha1, 2);
        let t0 = 1_234_567_890;
        let code = totp.code(Some(t0)).unwrap();
        for k in -4i64..=4 {
            assert_eq!(totp.verify(&code, Some(t0 + k * 30)).unwrap(), k.abs() <= 2);
        }
    }

    #[test]
    fn leading_zero_is_rejected() {
        let mut totp = Totp::default();
        totp.set_secret(SHA1_SECRET).unwrap();
        let code = totp.code(None).unwrap();
        assert!(totp.verify(&code, None).unwrap());
        assert!(!totp.verify(&format!("0{}", code), None).unwrap());
    }

    #[test]
    fn server_time_drives_default_counter() {
        let mut totp = totp(Algorithm::Sha1, 0);
        let options = totp.options().clone().with_server_time(45, crate::time::now());
        totp.set_options(options);
        assert_eq!(totp.get_counter(None), 1);
        assert_eq!(totp.code(None).unwrap(), "94287082");
    }
}

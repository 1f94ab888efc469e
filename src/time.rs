//! Clock access, timeslices and server-time adjustment.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in seconds.
///
/// A clock set before 1970 reads as negative time rather than failing.
pub fn now() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    }
}

/// The timeslice containing `timestamp`: `floor((timestamp + offset) / period)`.
///
/// Floor division keeps timestamps before the epoch in the slice below them, and the result is
/// reinterpreted as an unsigned 64-bit counter the way RFC 6238's `T` is packed.
pub fn timeslice(timestamp: i64, offset: i64, period: u32) -> u64 {
    timestamp.wrapping_add(offset).div_euclid(i64::from(period)) as u64
}

/// Translates the local clock onto a remote authority's clock.
///
/// `server_time` was reported by the authority when the local clock read `last_request_time`;
/// the time elapsed locally since then is added on top.
pub fn adjusted_time(server_time: i64, last_request_time: i64) -> i64 {
    adjusted_time_at(server_time, last_request_time, now())
}

/// [`adjusted_time`] evaluated against an explicit local time.
pub fn adjusted_time_at(server_time: i64, last_request_time: i64, now: i64) -> i64 {
    server_time.wrapping_add(now.wrapping_sub(last_request_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc_6238_timeslices() {
        assert_eq!(timeslice(59, 0, 30), 0x1);
        assert_eq!(timeslice(1_111_111_109, 0, 30), 0x23523ec);
        assert_eq!(timeslice(1_111_111_111, 0, 30), 0x23523ed);
        assert_eq!(timeslice(1_234_567_890, 0, 30), 0x273ef07);
        assert_eq!(timeslice(2_000_000_000, 0, 30), 0x3f940aa);
        assert_eq!(timeslice(20_000_000_000, 0, 30), 0x27bc86aa);
    }

    #[test]
    fn offset_shifts_slices() {
        assert_eq!(timeslice(59, 30, 30), 0x2);
        assert_eq!(timeslice(59, -30, 30), 0x0);
        // floor, not truncation toward zero
        assert_eq!(timeslice(-1, 0, 30), u64::MAX);
    }

    #[test]
    fn server_time_adjustment() {
        assert_eq!(adjusted_time_at(1_000, 500, 520), 1_020);
        assert_eq!(adjusted_time_at(1_000, 500, 500), 1_000);
        let adjusted = adjusted_time(1_000, now());
        assert!((1_000..1_005).contains(&adjusted));
    }
}

//! Uptime, boot time and load average.

use chrono::{DateTime, Local, TimeZone};

use crate::system::platform;

/// Seconds since boot, from the OS monotonic clock. Sub-second precision
/// where the OS keeps it.
pub fn uptime() -> f64 {
    platform::uptime_seconds()
}

/// Load averages over 1, 5 and 15 minutes.
///
/// Not reported by this layer: always exactly `(0.0, 0.0, 0.0)`. The zero
/// triple keeps the signature uniform for callers that expect three
/// samples on every platform; do not read it as a measurement.
pub fn load_average() -> (f64, f64, f64) {
    (0.0, 0.0, 0.0)
}

/// Wall-clock instant the system booted, when the OS reports one.
pub fn boot_time() -> Option<DateTime<Local>> {
    let epoch = platform::boot_epoch();
    if epoch == 0 {
        return None;
    }
    Local.timestamp_opt(epoch as i64, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_average_is_the_defined_zero_triple() {
        assert_eq!(load_average(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn uptime_is_positive_and_monotone() {
        let first = uptime();
        assert!(first > 0.0);
        let second = uptime();
        assert!(second >= first);
    }

    #[test]
    fn boot_time_is_in_the_past() {
        if let Some(booted) = boot_time() {
            assert!(booted <= Local::now());
        }
    }
}

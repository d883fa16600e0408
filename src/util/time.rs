// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback time formatting.

/// Render a playback position as zero-padded `HH:MM:SS`.
///
/// Fractions are floored to whole seconds. Callers must pass a finite,
/// non-negative value.
pub fn format_timestamp(seconds: f64) -> String {
    debug_assert!(seconds.is_finite() && seconds >= 0.0);

    let total = seconds.floor() as u64;
    let hours = (total / 3600) % 24;
    let minutes = (total / 60) % 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Whether `seconds` is usable as an annotation time.
pub fn is_valid_time(seconds: f64) -> bool {
    seconds.is_finite() && seconds >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(3725.0), "01:02:05");
        assert_eq!(format_timestamp(0.0), "00:00:00");
        assert_eq!(format_timestamp(12.0), "00:00:12");
    }

    #[test]
    fn test_format_timestamp_floors_fractions() {
        assert_eq!(format_timestamp(59.999), "00:00:59");
    }

    #[test]
    fn test_format_timestamp_wraps_at_a_day() {
        // Clock-style rendering, same as a UTC time of day
        assert_eq!(format_timestamp(86_400.0 + 61.0), "00:01:01");
    }

    #[test]
    fn test_is_valid_time() {
        assert!(is_valid_time(0.0));
        assert!(is_valid_time(12.5));
        assert!(!is_valid_time(-0.1));
        assert!(!is_valid_time(f64::NAN));
        assert!(!is_valid_time(f64::INFINITY));
    }
}

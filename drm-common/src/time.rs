use serde::{Deserialize, Serialize};

/// DRM broadcast UTC time as published by the SDC, distinct from the
/// receiver's own wall-clock. `local_offset_minutes` carries the
/// optional +/- 30 minute local-time offset some broadcasters signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrmTime {
    pub valid: bool,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub local_offset_minutes: Option<i32>,
}

impl DrmTime {
    pub fn invalid() -> Self {
        DrmTime {
            valid: false,
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            local_offset_minutes: None,
        }
    }

    /// Days since the Unix epoch for a proleptic Gregorian (year, month, day),
    /// using the same civil-calendar algorithm as most `chrono`-free tooling.
    fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
        let y = if month <= 2 { year - 1 } else { year };
        let era = if y >= 0 { y } else { y - 399 } / 400;
        let yoe = (y - era * 400) as i64;
        let mp = (month + 9) % 12;
        let doy = (153 * mp + 2) / 5 + day - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146097 + doe - 719468
    }

    /// Unix timestamp implied by this DRM time, ignoring `local_offset_minutes`
    /// (the offset is informational for display, not a timezone conversion).
    pub fn unix_timestamp(&self) -> Option<i64> {
        if !self.valid {
            return None;
        }
        let days = Self::days_from_civil(self.year as i64, self.month as i64, self.day as i64);
        Some(days * 86_400 + self.hour as i64 * 3_600 + self.minute as i64 * 60)
    }
}

impl Default for DrmTime {
    fn default() -> Self {
        Self::invalid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch_roundtrip() {
        let t = DrmTime {
            valid: true,
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            local_offset_minutes: None,
        };
        assert_eq!(t.unix_timestamp(), Some(0));
    }

    #[test]
    fn invalid_time_has_no_timestamp() {
        assert_eq!(DrmTime::invalid().unix_timestamp(), None);
    }

    #[test]
    fn known_date() {
        // 2024-03-01 00:00 UTC
        let t = DrmTime {
            valid: true,
            year: 2024,
            month: 3,
            day: 1,
            hour: 0,
            minute: 0,
            local_offset_minutes: Some(-30),
        };
        assert_eq!(t.unix_timestamp(), Some(1_709_251_200));
    }
}

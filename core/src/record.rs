//! The decoded time/date record and its conversions.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone as _, Timelike};

/// Time zone label carried by the frame-1 zone flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Central European Time, UTC+1.
    Cet,
    /// Central European Summer Time, UTC+2.
    Cest,
}

impl Zone {
    /// Offset from the reference meridian in hours.
    pub fn offset_hours(self) -> i32 {
        match self {
            Zone::Cet => 1,
            Zone::Cest => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::Cet => "CET",
            Zone::Cest => "CEST",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Leap-second warning carried in frame 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeapSecond {
    /// One second advance at the end of the month.
    Advance,
    #[default]
    None,
    /// One second delay at the end of the month.
    Delay,
}

impl LeapSecond {
    /// Signed indicator: -1 for an advance, 0 for none, +1 for a delay.
    pub fn indicator(self) -> i8 {
        match self {
            LeapSecond::Advance => -1,
            LeapSecond::None => 0,
            LeapSecond::Delay => 1,
        }
    }
}

const MONTH_NAMES: [&str; 13] = [
    "Invalid",
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_NAMES: [&str; 8] = [
    "Invalid",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// A full time-and-date record as carried by one SRC transmission.
///
/// Field domains follow the protocol (hour 0-23, minute 0-59, month 1-12, day
/// 1-31, weekday 1-7 with Monday = 1). Decode does not validate domains: a
/// corrupted-but-parity-clean capture passes its sums through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRecord {
    pub hour: u8,
    pub minute: u8,
    pub zone: Zone,
    pub month: u8,
    pub day: u8,
    pub day_of_week: u8,
    /// Full four-digit year. Only two digits are transmitted; see
    /// [`TimeRecord::resolve_century`].
    pub year: i32,
    /// Days until the next time zone change, `None` when seven or more away
    /// (or unknown).
    pub tz_change_days: Option<u8>,
    pub leap_second: LeapSecond,
}

impl TimeRecord {
    /// Build a record from a wall-clock datetime plus the transmission-only
    /// fields that no calendar can supply.
    pub fn from_datetime<Tz: chrono::TimeZone>(
        dt: &DateTime<Tz>,
        zone: Zone,
        tz_change_days: Option<u8>,
        leap_second: LeapSecond,
    ) -> Self {
        TimeRecord {
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            zone,
            month: dt.month() as u8,
            day: dt.day() as u8,
            day_of_week: dt.weekday().number_from_monday() as u8,
            year: dt.year(),
            tz_change_days,
            leap_second,
        }
    }

    /// Resolve a transmitted two-digit year against a pivot year.
    ///
    /// The protocol leaves the century ambiguous: a two-digit value beyond the
    /// pivot's own last two digits is taken to mean the 20th century, anything
    /// else the 21st. The decoder pivots on the current calendar year, so the
    /// same capture can resolve differently in different decades.
    pub fn resolve_century(two_digit: u8, pivot_year: i32) -> i32 {
        if i32::from(two_digit) > pivot_year - 2000 {
            1900 + i32::from(two_digit)
        } else {
            2000 + i32::from(two_digit)
        }
    }

    /// The record as a fixed-offset datetime, or `None` when the transmitted
    /// fields do not form a valid calendar date.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.zone.offset_hours() * 3600)?;
        offset
            .with_ymd_and_hms(
                self.year,
                u32::from(self.month),
                u32::from(self.day),
                u32::from(self.hour),
                u32::from(self.minute),
                0,
            )
            .single()
    }
}

impl fmt::Display for TimeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weekday = WEEKDAY_NAMES
            .get(usize::from(self.day_of_week))
            .unwrap_or(&WEEKDAY_NAMES[0]);
        let month = MONTH_NAMES
            .get(usize::from(self.month))
            .unwrap_or(&MONTH_NAMES[0]);
        writeln!(f, "Date: {} {} {} {}", weekday, month, self.day, self.year)?;
        writeln!(f, "Time: {:02}:{:02}", self.hour, self.minute)?;
        write!(f, "Time zone: {}", self.zone)?;
        if let Some(days) = self.tz_change_days {
            if days > 0 {
                write!(f, "\n{days} days to time zone change")?;
            }
        }
        match self.leap_second {
            LeapSecond::Advance => {
                write!(f, "\nLeap second: one second advance at the end of the month")?
            }
            LeapSecond::Delay => {
                write!(f, "\nLeap second: one second delay at the end of the month")?
            }
            LeapSecond::None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn century_pivot_prefers_recent_past() {
        // Pivot 2024: anything up to 24 is this century, beyond it last century
        assert_eq!(TimeRecord::resolve_century(0, 2024), 2000);
        assert_eq!(TimeRecord::resolve_century(24, 2024), 2024);
        assert_eq!(TimeRecord::resolve_century(25, 2024), 1925);
        assert_eq!(TimeRecord::resolve_century(99, 2024), 1999);
    }

    #[test]
    fn century_pivot_moves_with_the_clock() {
        // The same transmitted value resolves differently in different decades
        assert_eq!(TimeRecord::resolve_century(30, 2024), 1930);
        assert_eq!(TimeRecord::resolve_century(30, 2031), 2030);
    }

    #[test]
    fn from_datetime_captures_calendar_fields() {
        let dt = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 15, 14, 30, 0)
            .unwrap();
        let record = TimeRecord::from_datetime(&dt, Zone::Cet, None, LeapSecond::None);
        assert_eq!(record.hour, 14);
        assert_eq!(record.minute, 30);
        assert_eq!(record.day, 15);
        assert_eq!(record.month, 6);
        assert_eq!(record.year, 2024);
        // 2024-06-15 is a Saturday
        assert_eq!(record.day_of_week, 6);
    }

    #[test]
    fn to_datetime_round_trips_through_chrono() {
        let record = TimeRecord {
            hour: 23,
            minute: 59,
            zone: Zone::Cest,
            month: 12,
            day: 31,
            day_of_week: 2,
            year: 2030,
            tz_change_days: Some(3),
            leap_second: LeapSecond::None,
        };
        let dt = record.to_datetime().unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
        let back = TimeRecord::from_datetime(&dt, Zone::Cest, Some(3), LeapSecond::None);
        assert_eq!(back, record);
    }

    #[test]
    fn to_datetime_rejects_impossible_dates() {
        let record = TimeRecord {
            hour: 10,
            minute: 0,
            zone: Zone::Cet,
            month: 2,
            day: 31,
            day_of_week: 1,
            year: 2024,
            tz_change_days: None,
            leap_second: LeapSecond::None,
        };
        assert!(record.to_datetime().is_none());
    }

    #[test]
    fn display_reports_all_announced_fields() {
        let record = TimeRecord {
            hour: 8,
            minute: 5,
            zone: Zone::Cest,
            month: 3,
            day: 29,
            day_of_week: 7,
            year: 2026,
            tz_change_days: Some(2),
            leap_second: LeapSecond::Delay,
        };
        let report = record.to_string();
        assert!(report.contains("Sunday March 29 2026"));
        assert!(report.contains("08:05"));
        assert!(report.contains("CEST"));
        assert!(report.contains("2 days to time zone change"));
        assert!(report.contains("one second delay"));
    }

    #[test]
    fn display_tolerates_out_of_domain_fields() {
        let record = TimeRecord {
            hour: 31,
            minute: 77,
            zone: Zone::Cet,
            month: 15,
            day: 0,
            day_of_week: 0,
            year: 1985,
            tz_change_days: None,
            leap_second: LeapSecond::None,
        };
        let report = record.to_string();
        assert!(report.contains("Invalid"));
    }
}

//! Time-window resolution for the filter bar's symbolic time keys.
//!
//! Maps a key plus a current instant to a concrete cutoff instant: events
//! starting after the cutoff are out of the window. Pure functions of their
//! inputs — the caller injects `now`, nothing here reads the wall clock.

use std::fmt;
use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of a synodic month in days (new moon to new moon).
const SYNODIC_DAYS: f64 = 29.530_587_705_76;

const MS_PER_DAY: f64 = 86_400_000.0;

/// A known full-moon instant used as the reference for cycle counting.
static FULL_MOON_EPOCH: LazyLock<DateTime<Utc>> = LazyLock::new(|| {
    Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0)
        .single()
        .expect("valid reference instant")
});

/// Symbolic time filters offered by the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    /// Until the next local 06:00. A fixed wall-clock approximation of
    /// sunrise, not a solar computation.
    #[default]
    Sunrise,
    /// Until the next Sunday 20:15 local — classic TV primetime.
    SundayPrimetime,
    /// Until 06:00 local on the day after the next full moon.
    FullMoon,
    Hours6,
    Hours12,
    Hours24,
    Hours48,
    /// No time restriction. Resolves to a sentinel far in the future.
    All,
}

impl TimeFilter {
    /// Parse a filter-bar key. Unknown keys fall back to [`TimeFilter::Sunrise`]
    /// rather than erroring — a stale or mistyped key must never break the map.
    pub fn from_key(key: &str) -> Self {
        match key {
            "sunrise" => Self::Sunrise,
            "sunday-primetime" => Self::SundayPrimetime,
            "full-moon" => Self::FullMoon,
            "6h" => Self::Hours6,
            "12h" => Self::Hours12,
            "24h" => Self::Hours24,
            "48h" => Self::Hours48,
            "all" => Self::All,
            _ => Self::Sunrise,
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            Self::Sunrise => "sunrise",
            Self::SundayPrimetime => "sunday-primetime",
            Self::FullMoon => "full-moon",
            Self::Hours6 => "6h",
            Self::Hours12 => "12h",
            Self::Hours24 => "24h",
            Self::Hours48 => "48h",
            Self::All => "all",
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl Serialize for TimeFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_key())
    }
}

impl<'de> Deserialize<'de> for TimeFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(Self::from_key(&key))
    }
}

/// Resolve a time filter against `now`, in `now`'s own timezone.
///
/// "Local" times (06:00 sunrise, Sunday 20:15) are computed on the calendar
/// of the supplied timezone, so the caller decides what local means.
/// Identical `(filter, now)` inputs always yield the identical cutoff.
pub fn resolve<Tz: TimeZone>(filter: TimeFilter, now: DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    match filter {
        TimeFilter::Sunrise => {
            let day = if now.hour() >= 6 {
                now.date_naive() + Duration::days(1)
            } else {
                now.date_naive()
            };
            at_local(&tz, day, 6, 0)
        }
        TimeFilter::SundayPrimetime => {
            let weekday = now.weekday().num_days_from_sunday();
            let day = if weekday == 0 {
                if (now.hour(), now.minute()) >= (20, 15) {
                    now.date_naive() + Duration::days(7)
                } else {
                    now.date_naive()
                }
            } else {
                now.date_naive() + Duration::days(i64::from(7 - weekday))
            };
            at_local(&tz, day, 20, 15)
        }
        TimeFilter::FullMoon => {
            let day = next_full_moon(now.with_timezone(&Utc))
                .with_timezone(&tz)
                .date_naive()
                + Duration::days(1);
            at_local(&tz, day, 6, 0)
        }
        TimeFilter::Hours6 => now + Duration::hours(6),
        TimeFilter::Hours12 => now + Duration::hours(12),
        TimeFilter::Hours24 => now + Duration::hours(24),
        TimeFilter::Hours48 => now + Duration::hours(48),
        TimeFilter::All => {
            let day = NaiveDate::from_ymd_opt(now.year() + 10, 12, 31)
                .unwrap_or_else(|| now.date_naive());
            at_local(&tz, day, 0, 0)
        }
    }
}

/// First full-moon instant strictly after `now`: the smallest non-negative
/// cycle count `k` with `epoch + k * synodic > now`.
fn next_full_moon(now: DateTime<Utc>) -> DateTime<Utc> {
    let elapsed_days = (now - *FULL_MOON_EPOCH).num_milliseconds() as f64 / MS_PER_DAY;
    let cycles = if elapsed_days < 0.0 {
        0.0
    } else {
        (elapsed_days / SYNODIC_DAYS).floor() + 1.0
    };
    *FULL_MOON_EPOCH + Duration::milliseconds((cycles * SYNODIC_DAYS * MS_PER_DAY) as i64)
}

/// A wall-clock time on a calendar date, in the given timezone.
fn at_local<Tz: TimeZone>(tz: &Tz, date: NaiveDate, hour: u32, minute: u32) -> DateTime<Tz> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        // Fall-back transition: the wall-clock time occurs twice.
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Spring-forward gap: the wall-clock time does not exist on this date.
        LocalResult::None => tz.from_utc_datetime(&naive),
    }
}

// ===========================================================================
// Unit tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Berlin;
    use chrono_tz::Tz;

    fn berlin(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        Berlin.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap()
    }

    // -------------------------------------------------------------------
    // Fixed-duration windows
    // -------------------------------------------------------------------

    #[test]
    fn six_hours_is_exact() {
        let now = Utc.with_ymd_and_hms(2026, 8, 4, 9, 30, 0).single().unwrap();
        assert_eq!(resolve(TimeFilter::Hours6, now), now + Duration::hours(6));
    }

    #[test]
    fn forty_eight_hours_is_exact() {
        let now = berlin(2026, 8, 4, 9, 30);
        assert_eq!(resolve(TimeFilter::Hours48, now), now + Duration::hours(48));
    }

    // -------------------------------------------------------------------
    // Sunrise
    // -------------------------------------------------------------------

    #[test]
    fn sunrise_before_six_is_same_day() {
        let cutoff = resolve(TimeFilter::Sunrise, berlin(2026, 8, 4, 5, 0));
        assert_eq!(cutoff, berlin(2026, 8, 4, 6, 0));
    }

    #[test]
    fn sunrise_after_six_is_next_day() {
        let cutoff = resolve(TimeFilter::Sunrise, berlin(2026, 8, 4, 7, 0));
        assert_eq!(cutoff, berlin(2026, 8, 5, 6, 0));
    }

    #[test]
    fn sunrise_at_six_sharp_rolls_forward() {
        let cutoff = resolve(TimeFilter::Sunrise, berlin(2026, 8, 4, 6, 0));
        assert_eq!(cutoff, berlin(2026, 8, 5, 6, 0));
    }

    // -------------------------------------------------------------------
    // Sunday primetime
    // -------------------------------------------------------------------

    #[test]
    fn saturday_morning_resolves_to_next_day() {
        // 2026-08-01 is a Saturday.
        let cutoff = resolve(TimeFilter::SundayPrimetime, berlin(2026, 8, 1, 10, 0));
        assert_eq!(cutoff, berlin(2026, 8, 2, 20, 15));
    }

    #[test]
    fn sunday_before_primetime_is_same_day() {
        let cutoff = resolve(TimeFilter::SundayPrimetime, berlin(2026, 8, 2, 19, 59));
        assert_eq!(cutoff, berlin(2026, 8, 2, 20, 15));
    }

    #[test]
    fn sunday_after_primetime_rolls_a_week() {
        let cutoff = resolve(TimeFilter::SundayPrimetime, berlin(2026, 8, 2, 21, 0));
        assert_eq!(cutoff, berlin(2026, 8, 9, 20, 15));
    }

    #[test]
    fn sunday_at_primetime_sharp_rolls_a_week() {
        let cutoff = resolve(TimeFilter::SundayPrimetime, berlin(2026, 8, 2, 20, 15));
        assert_eq!(cutoff, berlin(2026, 8, 9, 20, 15));
    }

    #[test]
    fn midweek_resolves_to_coming_sunday() {
        // 2026-08-04 is a Tuesday.
        let cutoff = resolve(TimeFilter::SundayPrimetime, berlin(2026, 8, 4, 12, 0));
        assert_eq!(cutoff, berlin(2026, 8, 9, 20, 15));
    }

    // -------------------------------------------------------------------
    // Full moon
    // -------------------------------------------------------------------

    #[test]
    fn before_the_epoch_uses_the_epoch_moon() {
        // Epoch full moon: 2000-01-06T18:14:00Z. Cutoff is 06:00 on the
        // following day.
        let now = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single().unwrap();
        let cutoff = resolve(TimeFilter::FullMoon, now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2000, 1, 7, 6, 0, 0).single().unwrap());
    }

    #[test]
    fn just_after_the_epoch_moon_takes_the_next_cycle() {
        // One synodic month after the epoch: 2000-02-05T06:58:03Z.
        let now = Utc.with_ymd_and_hms(2000, 1, 6, 19, 0, 0).single().unwrap();
        let cutoff = resolve(TimeFilter::FullMoon, now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2000, 2, 6, 6, 0, 0).single().unwrap());
    }

    #[test]
    fn full_moon_cutoff_is_always_in_the_future() {
        let now = berlin(2026, 8, 4, 12, 0);
        let cutoff = resolve(TimeFilter::FullMoon, now);
        assert!(cutoff > now);
        // Never more than one synodic month plus a day out.
        assert!(cutoff - now < Duration::days(31));
    }

    // -------------------------------------------------------------------
    // Sentinel and fallback
    // -------------------------------------------------------------------

    #[test]
    fn all_is_a_decade_out() {
        let cutoff = resolve(TimeFilter::All, berlin(2026, 8, 4, 12, 0));
        assert_eq!(cutoff, berlin(2036, 12, 31, 0, 0));
    }

    #[test]
    fn unknown_key_falls_back_to_sunrise() {
        assert_eq!(TimeFilter::from_key("lunch-break"), TimeFilter::Sunrise);
        assert_eq!(TimeFilter::from_key(""), TimeFilter::Sunrise);
    }

    #[test]
    fn wire_keys_deserialize_with_fallback() {
        let filter: TimeFilter = serde_json::from_str("\"24h\"").unwrap();
        assert_eq!(filter, TimeFilter::Hours24);
        let unknown: TimeFilter = serde_json::from_str("\"brunch\"").unwrap();
        assert_eq!(unknown, TimeFilter::Sunrise);
        assert_eq!(serde_json::to_string(&TimeFilter::FullMoon).unwrap(), "\"full-moon\"");
    }

    #[test]
    fn keys_round_trip() {
        for key in ["sunrise", "sunday-primetime", "full-moon", "6h", "12h", "24h", "48h", "all"] {
            assert_eq!(TimeFilter::from_key(key).as_key(), key);
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        let now = berlin(2026, 8, 4, 12, 0);
        for filter in [
            TimeFilter::Sunrise,
            TimeFilter::SundayPrimetime,
            TimeFilter::FullMoon,
            TimeFilter::Hours24,
            TimeFilter::All,
        ] {
            assert_eq!(resolve(filter, now), resolve(filter, now));
        }
    }
}

//! TTL Module
//!
//! Normalizes the accepted TTL forms into a seconds count for the Store.

use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Months, Utc};
use thiserror::Error;

// == Calendar Interval ==
/// A duration made of calendar units.
///
/// Years and months are applied with calendar arithmetic, so the resulting
/// seconds count depends on the months crossed from the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CalendarInterval {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl CalendarInterval {
    pub fn of_seconds(seconds: u32) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    pub fn of_minutes(minutes: u32) -> Self {
        Self {
            minutes,
            ..Self::default()
        }
    }

    pub fn of_hours(hours: u32) -> Self {
        Self {
            hours,
            ..Self::default()
        }
    }

    pub fn of_days(days: u32) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn of_months(months: u32) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }

    // == To Seconds ==
    /// Adds the interval to the Unix epoch and returns the elapsed seconds.
    ///
    /// Saturates at `i64::MAX` if the end instant is not representable.
    pub fn to_seconds(&self) -> i64 {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        let months = self.years.saturating_mul(12).saturating_add(self.months);

        let end = epoch
            .checked_add_months(Months::new(months))
            .and_then(|t| t.checked_add_signed(Duration::try_days(i64::from(self.days))?))
            .and_then(|t| t.checked_add_signed(Duration::try_hours(i64::from(self.hours))?))
            .and_then(|t| t.checked_add_signed(Duration::try_minutes(i64::from(self.minutes))?))
            .and_then(|t| t.checked_add_signed(Duration::try_seconds(i64::from(self.seconds))?));

        match end {
            Some(end) => (end - epoch).num_seconds(),
            None => i64::MAX,
        }
    }
}

/// Error returned when an ISO-8601 duration cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid interval \"{0}\"")]
pub struct ParseIntervalError(String);

impl FromStr for CalendarInterval {
    type Err = ParseIntervalError;

    /// Parses `P[nY][nM][nW][nD][T[nH][nM][nS]]`, e.g. `PT20S` or `P1DT2H`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIntervalError(s.to_string());
        let rest = s.strip_prefix('P').ok_or_else(err)?;

        let mut interval = Self::default();
        let mut in_time = false;
        let mut digits = String::new();
        let mut seen: Vec<(bool, char)> = Vec::new();

        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                'T' if !in_time && digits.is_empty() => in_time = true,
                unit => {
                    let n: u32 = digits.parse().map_err(|_| err())?;
                    digits.clear();
                    if seen.contains(&(in_time, unit)) {
                        return Err(err());
                    }
                    match (in_time, unit) {
                        (false, 'Y') => interval.years = n,
                        (false, 'M') => interval.months = n,
                        (false, 'W') => {
                            interval.days = interval.days.saturating_add(n.saturating_mul(7))
                        }
                        (false, 'D') => interval.days = interval.days.saturating_add(n),
                        (true, 'H') => interval.hours = n,
                        (true, 'M') => interval.minutes = n,
                        (true, 'S') => interval.seconds = n,
                        _ => return Err(err()),
                    }
                    seen.push((in_time, unit));
                }
            }
        }

        // A `T` must introduce at least one time component
        let time_units = seen.iter().filter(|(time, _)| *time).count();
        if !digits.is_empty() || seen.is_empty() || (in_time && time_units == 0) {
            return Err(err());
        }

        Ok(interval)
    }
}

// == Ttl ==
/// Every form a caller may express an expiry in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ttl {
    /// No expiry
    #[default]
    Never,
    /// Relative seconds, passed through unchanged
    Seconds(i64),
    /// Calendar-aware relative interval
    Interval(CalendarInterval),
    /// Absolute expiration instant
    At(DateTime<Utc>),
}

impl Ttl {
    // == Normalize ==
    /// Converts to a seconds count, `0` meaning no expiry.
    ///
    /// Instants in the past yield a negative count.
    pub fn normalize(&self) -> i64 {
        self.normalize_at(Utc::now())
    }

    /// Like [`Ttl::normalize`], measuring instants against `now`.
    pub fn normalize_at(&self, now: DateTime<Utc>) -> i64 {
        match self {
            Ttl::Never => 0,
            Ttl::Seconds(seconds) => *seconds,
            Ttl::Interval(interval) => interval.to_seconds(),
            Ttl::At(instant) => instant.timestamp() - now.timestamp(),
        }
    }
}

/// Normalizes any accepted TTL form to seconds.
pub fn normalize_ttl(ttl: impl Into<Ttl>) -> i64 {
    ttl.into().normalize()
}

impl From<i32> for Ttl {
    fn from(seconds: i32) -> Self {
        Ttl::Seconds(i64::from(seconds))
    }
}

impl From<i64> for Ttl {
    fn from(seconds: i64) -> Self {
        Ttl::Seconds(seconds)
    }
}

impl From<u32> for Ttl {
    fn from(seconds: u32) -> Self {
        Ttl::Seconds(i64::from(seconds))
    }
}

impl From<u64> for Ttl {
    fn from(seconds: u64) -> Self {
        Ttl::Seconds(i64::try_from(seconds).unwrap_or(i64::MAX))
    }
}

impl From<StdDuration> for Ttl {
    fn from(duration: StdDuration) -> Self {
        duration.as_secs().into()
    }
}

impl From<CalendarInterval> for Ttl {
    fn from(interval: CalendarInterval) -> Self {
        Ttl::Interval(interval)
    }
}

impl From<DateTime<Utc>> for Ttl {
    fn from(instant: DateTime<Utc>) -> Self {
        Ttl::At(instant)
    }
}

impl<T: Into<Ttl>> From<Option<T>> for Ttl {
    fn from(ttl: Option<T>) -> Self {
        ttl.map_or(Ttl::Never, Into::into)
    }
}

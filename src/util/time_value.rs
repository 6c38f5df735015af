//! Human readable durations such as `1h30m` or `2d 4h`.

use std::{fmt, str::FromStr, time::Duration};

use thiserror::Error;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const YEAR: u64 = 365 * DAY;

/// Largest accepted duration in seconds (2^31 - 1, about 68 years).
pub const MAX_SECONDS: u64 = (1 << 31) - 1;

/// Units in the order they may appear in a duration string.
const UNITS: [(char, u64); 6] = [
    ('y', YEAR),
    ('w', WEEK),
    ('d', DAY),
    ('h', HOUR),
    ('m', MINUTE),
    ('s', 1),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("The value `{0}` could not be converted to a valid time duration.")]
pub struct InvalidTimeDuration(pub String);

/// A duration in whole seconds broken into years, days, hours, minutes and seconds.
///
/// Weeks are accepted when parsing but are folded into days for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValue {
    pub duration: u64,
    pub years: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeValue {
    /// Builds a value from a number of seconds, rounding fractions up.
    ///
    /// # Returns
    /// - `Ok(TimeValue)` - Duration within range
    /// - `Err(InvalidTimeDuration)` - Negative, not finite, or above [`MAX_SECONDS`]
    pub fn new(seconds: f64) -> Result<Self, InvalidTimeDuration> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(InvalidTimeDuration(seconds.to_string()));
        }

        let rounded = seconds.ceil();
        if rounded > MAX_SECONDS as f64 {
            return Err(InvalidTimeDuration(Self::split(rounded as u64).clean()));
        }

        Ok(Self::split(rounded as u64))
    }

    /// Builds a value from whole seconds.
    pub fn from_secs(seconds: u64) -> Result<Self, InvalidTimeDuration> {
        if seconds > MAX_SECONDS {
            return Err(InvalidTimeDuration(Self::split(seconds).clean()));
        }
        Ok(Self::split(seconds))
    }

    /// Parses strings like `1y2w3d4h5m6s`.
    ///
    /// Any subset of units is accepted as long as they appear in that order, each at most
    /// once, optionally separated by spaces. An empty string is zero seconds.
    pub fn parse(value: &str) -> Result<Self, InvalidTimeDuration> {
        let invalid = || InvalidTimeDuration(value.to_string());

        let mut total: u64 = 0;
        let mut next_unit = 0;
        let mut rest = value;

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits == 0 {
                return Err(invalid());
            }
            let amount: u64 = rest[..digits].parse().map_err(|_| invalid())?;

            let unit = rest[digits..].chars().next().ok_or_else(invalid)?;
            let position = UNITS[next_unit..]
                .iter()
                .position(|(symbol, _)| *symbol == unit)
                .ok_or_else(invalid)?;
            let (_, multiplier) = UNITS[next_unit + position];
            next_unit += position + 1;

            total = amount
                .checked_mul(multiplier)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(invalid)?;
            rest = &rest[digits + unit.len_utf8()..];
        }

        Self::from_secs(total)
    }

    fn split(duration: u64) -> Self {
        let (years, remaining) = (duration / YEAR, duration % YEAR);
        let (days, remaining) = (remaining / DAY, remaining % DAY);
        let (hours, remaining) = (remaining / HOUR, remaining % HOUR);
        let (minutes, seconds) = (remaining / MINUTE, remaining % MINUTE);

        Self {
            duration,
            years,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    fn parts(&self) -> impl Iterator<Item = (u64, &'static str, &'static str)> {
        [
            (self.years, "y", "years"),
            (self.days, "d", "days"),
            (self.hours, "h", "hours"),
            (self.minutes, "m", "minutes"),
            (self.seconds, "s", "seconds"),
        ]
        .into_iter()
        .filter(|(amount, _, _)| *amount > 0)
    }

    /// Compact form, e.g. `1d2h`.
    pub fn clean(&self) -> String {
        self.parts()
            .map(|(amount, short, _)| format!("{amount}{short}"))
            .collect()
    }

    /// Compact form with spaces, e.g. `1d 2h`.
    pub fn clean_spaced(&self) -> String {
        self.parts()
            .map(|(amount, short, _)| format!("{amount}{short}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Long form, e.g. `1 days 2 hours`.
    pub fn clean_full(&self) -> String {
        self.parts()
            .map(|(amount, _, long)| format!("{amount} {long}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.duration)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clean())
    }
}

impl FromStr for TimeValue {
    type Err = InvalidTimeDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

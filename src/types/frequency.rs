//! Calendar resampling frequencies
//!
//! Frequencies use the compact codes found in metric configuration files:
//! `D`, `W` / `W-MON` .. `W-SUN` and `MS`. An optional leading multiplier of
//! `1` is accepted, so `1W-MON` and `W-MON` are equivalent. Month-end `M` is
//! rejected rather than read as `MS`.
//!
//! Periods are labelled by their first day. Whether a boundary date belongs
//! to the period it opens or the one it closes is chosen per call with
//! [`Closed`].

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;
use crate::utils::time::{day_label, floor_to_month, month_label, next_month};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    Daily,
    /// Weeks starting on the given weekday
    Weekly(Weekday),
    MonthStart,
}

/// Which side of a period includes its boundary date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closed {
    /// `[start, next)`: a boundary date opens its own period
    Left,
    /// `(start, next]`: a boundary date closes the period before it
    Right,
}

impl Frequency {
    /// First day of the left-closed period containing `date`
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => date,
            Frequency::Weekly(anchor) => {
                let offset = (7 + date.weekday().num_days_from_monday()
                    - anchor.num_days_from_monday())
                    % 7;
                date.checked_sub_signed(Duration::days(offset as i64))
                    .unwrap_or(NaiveDate::MIN)
            }
            Frequency::MonthStart => floor_to_month(date),
        }
    }

    /// Label (first day) of the period `date` falls into under `closed`
    pub fn bin_start(&self, date: NaiveDate, closed: Closed) -> NaiveDate {
        match closed {
            Closed::Left => self.period_start(date),
            Closed::Right => self.period_start(date.pred_opt().unwrap_or(date)),
        }
    }

    /// Closing used when resampling cumulative series: anchored weeks close
    /// on the right, days and month starts on the left
    pub fn resample_closed(&self) -> Closed {
        match self {
            Frequency::Weekly(_) => Closed::Right,
            Frequency::Daily | Frequency::MonthStart => Closed::Left,
        }
    }

    /// First day of the period after the one starting at `start`; `None`
    /// past the last representable date
    pub fn next_period(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => start.succ_opt(),
            Frequency::Weekly(_) => start.checked_add_signed(Duration::days(7)),
            Frequency::MonthStart => next_month(start),
        }
    }

    /// Contiguous period labels covering `first` through `last`
    pub fn periods(&self, first: NaiveDate, last: NaiveDate, closed: Closed) -> Vec<NaiveDate> {
        let end = self.bin_start(last, closed);
        let mut current = self.bin_start(first, closed);
        let mut periods = Vec::new();
        while current <= end {
            periods.push(current);
            match self.next_period(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        periods
    }

    /// Axis label for a period start
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Frequency::MonthStart => month_label(start),
            _ => day_label(start),
        }
    }
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "D"),
            Frequency::Weekly(day) => write!(f, "W-{}", weekday_code(*day)),
            Frequency::MonthStart => write!(f, "MS"),
        }
    }
}

impl FromStr for Frequency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        let digits: String = code.chars().take_while(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() && digits.parse::<u32>() != Ok(1) {
            return Err(AppError::Config(format!(
                "Unsupported frequency multiplier in '{}'",
                s
            )));
        }
        let unit = &code[digits.len()..];

        match unit {
            "D" => Ok(Frequency::Daily),
            "W" => Ok(Frequency::Weekly(Weekday::Sun)),
            "MS" => Ok(Frequency::MonthStart),
            "M" => Err(AppError::Config(format!(
                "Month-end frequency '{}' is not supported, use MS",
                s
            ))),
            _ => match unit.strip_prefix("W-") {
                Some(day) => day
                    .parse::<Weekday>()
                    .map(Frequency::Weekly)
                    .map_err(|_| AppError::Config(format!("Unknown weekly anchor in '{}'", s))),
                None => Err(AppError::Config(format!("Unknown frequency '{}'", s))),
            },
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.to_string()
    }
}

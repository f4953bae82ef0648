//! Time utilities for calendar bucketing
//!
//! Month arithmetic on [`NaiveDate`] plus parsing of the timestamp formats found
//! in issue tracker exports.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime};

/// First day of the month containing `date`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use delivery_metrics::utils::time::floor_to_month;
///
/// let d = NaiveDate::from_ymd_opt(2018, 3, 20).unwrap();
/// assert_eq!(floor_to_month(d), NaiveDate::from_ymd_opt(2018, 3, 1).unwrap());
/// ```
pub fn floor_to_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month following the month containing `date`.
///
/// `None` past the last representable month.
pub fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    next_month(date)
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Contiguous month starts from `first`'s month to `last`'s month, inclusive.
///
/// Returns an empty vector when `last` falls in an earlier month than `first`.
pub fn month_starts(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let end = floor_to_month(last);
    let mut current = floor_to_month(first);
    let mut months = Vec::new();
    while current <= end {
        months.push(current);
        match next_month(current) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}

/// Number of days in the inclusive intersection of two inclusive date ranges.
pub fn overlap_days(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> i64 {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end < start {
        0
    } else {
        (end - start).num_days() + 1
    }
}

/// Axis label for a month bucket, e.g. `"Jan 18"`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %y").to_string()
}

/// Axis label for a period start date, e.g. `"01/01/2018"`.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parse a timestamp as exported by an issue tracker.
///
/// Accepts RFC 3339 (`2018-01-01T10:00:00Z`), the tracker's own
/// `2018-01-01T10:00:00.000+0000` form, a naive `2018-01-01T10:00:00`
/// (taken as UTC) and a plain `2018-01-01` date (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    let utc = FixedOffset::east_opt(0)?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_local_timezone(utc).single();
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|naive| naive.and_local_timezone(utc).single())
}

/// Serde adapters for tracker timestamps.
pub mod serde_timestamp {
    use super::parse_timestamp;
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("unrecognised timestamp '{}'", raw)))
    }

    /// Nullable variant, `null` and `""` both map to `None`.
    pub mod option {
        use super::parse_timestamp;
        use chrono::{DateTime, FixedOffset};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(
            value: &Option<DateTime<FixedOffset>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(
            deserializer: D,
        ) -> Result<Option<DateTime<FixedOffset>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => parse_timestamp(&s)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("unrecognised timestamp '{}'", s))),
            }
        }
    }
}

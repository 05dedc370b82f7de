//! The `Month` type and the rules for deciding which month a stored sale date falls in.

use crate::error::Res;
use anyhow::{bail, Context};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Timestamp layouts with a numeric offset that RFC 3339 rejects, such as `+0000`.
const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

/// Naive timestamp layouts. A trailing `Z` is allowed after any of them.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A calendar month, `1` (January) through `12` (December), independent of year.
///
/// A month is accepted as a number or a numeric string, with or without zero padding:
/// ```
/// # use product_sales::model::Month;
/// # use std::str::FromStr;
/// assert_eq!(Month::from_str("5").unwrap(), Month::from_str("05").unwrap());
/// assert_eq!(Month::new(5).unwrap().number(), 5);
/// assert!(Month::from_str("13").is_err());
/// assert!(Month::from_str("may").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    /// All twelve months in calendar order.
    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }

    pub fn new(number: u32) -> Res<Self> {
        if !(1..=12).contains(&number) {
            bail!("Month must be between 1 and 12, got {number}");
        }
        Ok(Self(number as u8))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Returns the month in which `date_of_sale` falls, as written. The stored text is parsed as
    /// a real date, so no substring of the day or time can be mistaken for the month. When the
    /// timestamp carries an offset, the month is taken in that offset; no conversion to another
    /// timezone takes place.
    ///
    /// Returns `None` when the text is not a date this crate understands.
    pub fn of_date(date_of_sale: &str) -> Option<Month> {
        let s = date_of_sale.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Month(dt.month() as u8));
        }
        for format in OFFSET_DATE_TIME_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, format) {
                return Some(Month(dt.month() as u8));
            }
        }
        let naive = s.strip_suffix(['Z', 'z']).unwrap_or(s);
        for format in NAIVE_DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
                return Some(Month(dt.month() as u8));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(|d| Month(d.month() as u8))
    }
}

impl FromStr for Month {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number: u32 = s
            .trim()
            .parse()
            .with_context(|| format!("Month must be a number between 1 and 12, got '{s}'"))?;
        Month::new(number)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Month::new(n),
            Raw::Text(s) => Month::from_str(&s),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_from_str() {
        assert_eq!(Month::from_str("1").unwrap().number(), 1);
        assert_eq!(Month::from_str("09").unwrap().number(), 9);
        assert_eq!(Month::from_str(" 12 ").unwrap().number(), 12);
        assert!(Month::from_str("0").is_err());
        assert!(Month::from_str("13").is_err());
        assert!(Month::from_str("").is_err());
        assert!(Month::from_str("-1").is_err());
        assert!(Month::from_str("5.5").is_err());
    }

    #[test]
    fn test_month_deserialize_number_or_string() {
        let a: Month = serde_json::from_str("5").unwrap();
        let b: Month = serde_json::from_str("\"05\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<Month>("13").is_err());
        assert!(serde_json::from_str::<Month>("\"june\"").is_err());
    }

    #[test]
    fn test_month_of_rfc3339_keeps_offset() {
        // Converting to UTC would move this to October.
        let date = "2021-11-01T02:00:00+05:30";
        assert_eq!(Month::of_date(date).unwrap().number(), 11);
        assert_eq!(
            Month::of_date("2022-05-01T00:00:00.000Z").unwrap().number(),
            5
        );
    }

    #[test]
    fn test_month_of_offset_without_colon() {
        assert_eq!(
            Month::of_date("2022-05-01T00:00:00.000+0000").unwrap().number(),
            5
        );
        assert_eq!(Month::of_date("2022-05-01 00:00:00+0000").unwrap().number(), 5);
        // Converting to UTC would move this to June.
        assert_eq!(Month::of_date("2022-05-31T23:30:00-0700").unwrap().number(), 5);
        assert_eq!(Month::of_date("2022-05-31T23:30-0700").unwrap().number(), 5);
    }

    #[test]
    fn test_month_of_naive_time_with_zulu_suffix() {
        assert_eq!(Month::of_date("2022-05-01T10:00Z").unwrap().number(), 5);
        assert_eq!(Month::of_date("2022-05-01 10:00:00Z").unwrap().number(), 5);
        assert!(Month::of_date("2022-05-01T10:00ZZ").is_none());
    }

    #[test]
    fn test_month_of_date_is_not_fooled_by_the_day() {
        // Day 05 of June must not match May.
        assert_eq!(Month::of_date("2022-06-05").unwrap().number(), 6);
        assert_eq!(Month::of_date("2022-06-05 10:05:05").unwrap().number(), 6);
    }

    #[test]
    fn test_month_of_unparseable_date() {
        assert!(Month::of_date("").is_none());
        assert!(Month::of_date("yesterday").is_none());
        assert!(Month::of_date("2022-13-01").is_none());
        assert!(Month::of_date("-05-").is_none());
    }

    #[test]
    fn test_month_all() {
        let all: Vec<u8> = Month::all().map(Month::number).collect();
        assert_eq!(all, (1..=12).collect::<Vec<u8>>());
    }
}

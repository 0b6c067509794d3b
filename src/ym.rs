use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Month};

/// A year and month, the unit of selection and of range comparison.
///
/// Ordering is lexicographic on `(year, month)`, which is exactly the order
/// used to decide whether a month falls inside a [`MonthRange`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub fn new(year: i32, month: Month) -> YearMonth {
        YearMonth { year, month }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    /// The year and month that `date` falls in.
    pub fn containing(date: Date) -> YearMonth {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses a year-month from the leading `YYYY-MM` of `s`.
    ///
    /// Anything after the first seven characters is ignored, so a full
    /// `YYYY-MM-DD` date (or a timestamp with further suffixes) is accepted
    /// and truncated to its month.
    pub fn parse_prefix(s: &str) -> Result<YearMonth, ParseYearMonthError> {
        let bytes = s.as_bytes();
        let (Some(year_part), Some(b'-'), Some(month_part)) =
            (bytes.get(..4), bytes.get(4), bytes.get(5..7))
        else {
            return Err(ParseYearMonthError::BadFormat);
        };
        if !year_part.iter().chain(month_part).all(u8::is_ascii_digit) {
            return Err(ParseYearMonthError::BadFormat);
        }
        let mut year = 0i32;
        for &d in year_part {
            year = year * 10 + i32::from(d - b'0');
        }
        let month_no = (month_part[0] - b'0') * 10 + (month_part[1] - b'0');
        let month =
            Month::try_from(month_no).map_err(|_| ParseYearMonthError::MonthOutOfRange(month_no))?;
        Ok(YearMonth { year, month })
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        Date::from_calendar_date(self.year, self.month, 1)
            .unwrap_or_else(|_| unreachable!("day 1 exists in every month"))
    }
}

/// Renders the sole interchange format, zero-padded `YYYY-MM`.
impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

/// Strict counterpart of [`YearMonth::parse_prefix`]: the whole string must
/// be a `YYYY-MM` value.
impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<YearMonth, ParseYearMonthError> {
        if s.len() != 7 {
            return Err(ParseYearMonthError::BadFormat);
        }
        YearMonth::parse_prefix(s)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ParseYearMonthError {
    #[error("expected a value in YYYY-MM format")]
    BadFormat,
    #[error("month {0} is not in 1..=12")]
    MonthOutOfRange(u8),
}

/// An optional minimum/maximum restricting selectable year-months.
///
/// Both endpoints are inclusive: a value equal to `min` or `max` is never
/// disallowed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MonthRange {
    min: Option<YearMonth>,
    max: Option<YearMonth>,
}

impl MonthRange {
    pub fn new(min: Option<YearMonth>, max: Option<YearMonth>) -> MonthRange {
        MonthRange { min, max }
    }

    pub fn disallows(&self, ym: YearMonth) -> bool {
        self.min.is_some_and(|min| ym < min) || self.max.is_some_and(|max| ym > max)
    }
}

/// A range endpoint as supplied by the caller: a textual `YYYY-MM…` prefix,
/// a calendar date, or an already-built [`YearMonth`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BoundSpec {
    Text(String),
    Day(Date),
    Month(YearMonth),
}

impl BoundSpec {
    /// Resolves the endpoint to a year-month.  Unparseable text resolves to
    /// `None`, i.e. "no bound", matching the forgiving construction contract.
    pub fn resolve(&self) -> Option<YearMonth> {
        match self {
            BoundSpec::Text(s) => YearMonth::parse_prefix(s).ok(),
            BoundSpec::Day(date) => Some(YearMonth::containing(*date)),
            BoundSpec::Month(ym) => Some(*ym),
        }
    }
}

impl From<&str> for BoundSpec {
    fn from(s: &str) -> BoundSpec {
        BoundSpec::Text(s.to_owned())
    }
}

impl From<Date> for BoundSpec {
    fn from(date: Date) -> BoundSpec {
        BoundSpec::Day(date)
    }
}

impl From<YearMonth> for BoundSpec {
    fn from(ym: YearMonth) -> BoundSpec {
        BoundSpec::Month(ym)
    }
}

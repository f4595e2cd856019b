use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};

/// An inclusive calendar-date interval used to filter observations.
///
/// A range whose `start` lies after its `end` is allowed. It matches no date,
/// so filtering with it yields an empty frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range covering a single day.
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, zero for inverted ranges.
    pub fn num_days(&self) -> i64 {
        if self.is_inverted() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(&self, other: &DateRange) -> DateRange {
        DateRange::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// Anything that resolves to a calendar-date interval.
pub trait DatePeriod {
    fn get_date_period(self) -> Option<DateRange>;
}

impl DatePeriod for DateRange {
    fn get_date_period(self) -> Option<DateRange> {
        Some(self)
    }
}

impl DatePeriod for NaiveDate {
    fn get_date_period(self) -> Option<DateRange> {
        Some(DateRange::day(self))
    }
}

impl DatePeriod for Year {
    fn get_date_period(self) -> Option<DateRange> {
        Some(DateRange::new(
            NaiveDate::from_ymd_opt(self.0, 1, 1)?,
            NaiveDate::from_ymd_opt(self.0, 12, 31)?,
        ))
    }
}

impl DatePeriod for Month {
    fn get_date_period(self) -> Option<DateRange> {
        let Month(year, month) = self;
        Some(DateRange::new(
            NaiveDate::from_ymd_opt(year, month, 1)?,
            NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)?,
        ))
    }
}

impl DatePeriod for &str {
    /// Accepts `YYYY-MM-DD`.
    fn get_date_period(self) -> Option<DateRange> {
        NaiveDate::parse_from_str(self, "%Y-%m-%d")
            .ok()
            .map(DateRange::day)
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_inclusive_bounds() {
        let range = DateRange::new(date(2013, 3, 1), date(2013, 3, 3));
        assert!(range.contains(date(2013, 3, 1)));
        assert!(range.contains(date(2013, 3, 3)));
        assert!(!range.contains(date(2013, 3, 4)));
        assert_eq!(range.num_days(), 3);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let range = DateRange::new(date(2014, 1, 2), date(2014, 1, 1));
        assert!(range.is_inverted());
        assert!(!range.contains(date(2014, 1, 1)));
        assert!(!range.contains(date(2014, 1, 2)));
        assert_eq!(range.num_days(), 0);
    }

    #[test]
    fn test_periods() {
        assert_eq!(
            Month::new(2, 2016).get_date_period(),
            Some(DateRange::new(date(2016, 2, 1), date(2016, 2, 29)))
        );
        assert_eq!(
            Year(2015).get_date_period(),
            Some(DateRange::new(date(2015, 1, 1), date(2015, 12, 31)))
        );
        assert_eq!(Month::new(13, 2016).get_date_period(), None);
        assert_eq!(
            "2017-02-28".get_date_period(),
            Some(DateRange::day(date(2017, 2, 28)))
        );
        assert_eq!("28/02/2017".get_date_period(), None);
    }

    #[test]
    fn test_union() {
        let a = DateRange::new(date(2013, 3, 1), date(2013, 6, 1));
        let b = DateRange::new(date(2013, 4, 1), date(2014, 1, 1));
        assert_eq!(a.union(&b), DateRange::new(date(2013, 3, 1), date(2014, 1, 1)));
    }
}

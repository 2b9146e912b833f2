use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates;

/// Controls what scale the timeline displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewUnit {
    #[default]
    Day,
    Week,
    Month,
}

impl ViewUnit {
    pub const ALL: [ViewUnit; 3] = [ViewUnit::Day, ViewUnit::Week, ViewUnit::Month];

    /// Pixels per calendar day.
    pub fn day_width(self) -> f32 {
        match self {
            ViewUnit::Day => 24.0,
            ViewUnit::Week => 20.0,
            ViewUnit::Month => 6.0,
        }
    }

    /// A day header is emitted for every `header_step`-th day of the range.
    pub fn header_step(self) -> usize {
        match self {
            ViewUnit::Day => 1,
            ViewUnit::Week => 7,
            ViewUnit::Month => 15,
        }
    }

    pub fn shows_weekdays(self) -> bool {
        matches!(self, ViewUnit::Day)
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewUnit::Day => "Day",
            ViewUnit::Week => "Week",
            ViewUnit::Month => "Month",
        }
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping the bounds if they arrive reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Number of calendar days covered, counting both ends.
    pub fn total_days(&self) -> i64 {
        dates::days_between(self.start, self.end) + 1
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// True when `[start, end]` shares at least one day with this range.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }
}

/// Caller-controlled view settings for one layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewConfig {
    pub unit: ViewUnit,
    /// Explicit chart window; derived from the tasks when `None`.
    pub range: Option<DateRange>,
}

impl ViewConfig {
    pub fn new(unit: ViewUnit) -> Self {
        Self { unit, range: None }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }
}

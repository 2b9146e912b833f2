//! Column header bands: year-month, day-of-month and weekday.

use chrono::{Datelike, NaiveDate, Weekday};

use super::dates;
use super::view::{DateRange, ViewUnit};

/// Narrow month bands are widened to this so their label stays legible.
pub const MIN_MONTH_BAND_WIDTH: f32 = 60.0;

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq)]
pub struct MonthBand {
    pub year: i32,
    pub month: u32,
    pub label: String,
    /// Days of this month inside the chart range.
    pub days: i64,
    pub left: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayHeader {
    /// Position in the chart's day sequence.
    pub index: usize,
    pub date: NaiveDate,
    pub left: f32,
    pub label: String,
    /// Only present in day view.
    pub weekday: Option<&'static str>,
    pub is_weekend: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnHeaders {
    pub months: Vec<MonthBand>,
    pub days: Vec<DayHeader>,
    /// Left edge of every Saturday and Sunday in the range, for shading.
    pub weekend_columns: Vec<f32>,
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn build_headers(range: &DateRange, unit: ViewUnit) -> ColumnHeaders {
    let day_width = unit.day_width();
    ColumnHeaders {
        months: month_bands(range, day_width),
        days: day_headers(range, unit),
        weekend_columns: range
            .start
            .iter_days()
            .take_while(|d| *d <= range.end)
            .enumerate()
            .filter(|(_, d)| is_weekend(*d))
            .map(|(i, _)| i as f32 * day_width)
            .collect(),
    }
}

fn month_bands(range: &DateRange, day_width: f32) -> Vec<MonthBand> {
    let mut bands = Vec::new();
    let mut cursor = first_of_month(range.start);

    while cursor <= range.end {
        let next = first_of_next_month(cursor);
        let band_start = cursor.max(range.start);
        let band_end = dates::add_days(next, -1).min(range.end);
        let days = dates::days_between(band_start, band_end) + 1;

        bands.push(MonthBand {
            year: cursor.year(),
            month: cursor.month(),
            label: cursor.format("%b %Y").to_string(),
            days,
            left: dates::days_between(range.start, band_start) as f32 * day_width,
            width: (days as f32 * day_width).max(MIN_MONTH_BAND_WIDTH),
        });
        cursor = next;
    }
    bands
}

fn day_headers(range: &DateRange, unit: ViewUnit) -> Vec<DayHeader> {
    let day_width = unit.day_width();
    range
        .start
        .iter_days()
        .take_while(|d| *d <= range.end)
        .enumerate()
        .step_by(unit.header_step())
        .map(|(index, date)| DayHeader {
            index,
            date,
            left: index as f32 * day_width,
            label: date.day().to_string(),
            weekday: unit
                .shows_weekdays()
                .then(|| WEEKDAY_LABELS[date.weekday().num_days_from_monday() as usize]),
            is_weekend: is_weekend(date),
        })
        .collect()
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1).unwrap_or_else(|| dates::add_days(first, 31))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_view_samples_every_seventh_day() {
        let range = DateRange::new(ymd(2025, 1, 1), ymd(2025, 1, 31));
        let headers = build_headers(&range, ViewUnit::Week);
        let indices: Vec<usize> = headers.days.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![0, 7, 14, 21, 28]);
        assert!(headers.days.iter().all(|d| d.weekday.is_none()));
        assert_eq!(headers.days[1].left, 140.0);
        assert_eq!(headers.days[1].label, "8");
    }

    #[test]
    fn month_view_samples_every_fifteenth_day() {
        let range = DateRange::new(ymd(2025, 1, 1), ymd(2025, 3, 1));
        let indices: Vec<usize> = build_headers(&range, ViewUnit::Month)
            .days
            .iter()
            .map(|d| d.index)
            .collect();
        assert_eq!(indices, vec![0, 15, 30, 45]);
    }

    #[test]
    fn day_view_has_weekday_labels_and_weekend_flags() {
        // 2025-01-04 is a Saturday.
        let range = DateRange::new(ymd(2025, 1, 1), ymd(2025, 1, 7));
        let headers = build_headers(&range, ViewUnit::Day);
        assert_eq!(headers.days.len(), 7);
        assert_eq!(headers.days[0].weekday, Some("Wed"));
        assert_eq!(headers.days[3].weekday, Some("Sat"));
        assert!(headers.days[3].is_weekend);
        assert!(headers.days[4].is_weekend);
        assert!(!headers.days[5].is_weekend);
        assert_eq!(headers.weekend_columns, vec![72.0, 96.0]);
    }

    #[test]
    fn month_bands_measure_days_in_range() {
        let range = DateRange::new(ymd(2025, 1, 20), ymd(2025, 3, 2));
        let bands = build_headers(&range, ViewUnit::Day).months;
        let summary: Vec<(u32, i64, f32, f32)> =
            bands.iter().map(|b| (b.month, b.days, b.left, b.width)).collect();
        assert_eq!(
            summary,
            vec![
                (1, 12, 0.0, 288.0),
                (2, 28, 288.0, 672.0),
                // Two days would be 48px; floored to the minimum.
                (3, 2, 960.0, MIN_MONTH_BAND_WIDTH),
            ]
        );
        assert_eq!(bands[0].label, "Jan 2025");
    }

    #[test]
    fn month_bands_cross_year_boundary() {
        let range = DateRange::new(ymd(2024, 12, 30), ymd(2025, 1, 2));
        let bands = build_headers(&range, ViewUnit::Week).months;
        assert_eq!(bands.len(), 2);
        assert_eq!((bands[0].year, bands[0].month, bands[0].days), (2024, 12, 2));
        assert_eq!((bands[1].year, bands[1].month, bands[1].days), (2025, 1, 2));
    }
}

//! Horizontal bar geometry for task and vegetable-header rows.

use chrono::NaiveDate;

use super::dates;
use super::view::DateRange;

/// Uniform shift, in days, applied to task bars, work-report markers and the
/// today line alike so all three stay aligned with each other.
pub const DISPLAY_OFFSET_DAYS: i64 = 2;

/// Bars never shrink below this, so clipped or zero-length tasks stay clickable.
pub const MIN_BAR_WIDTH: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f32,
    pub width: f32,
}

/// Day offset from the chart start to `day`, display shift included.
pub fn display_offset_days(range: &DateRange, day: NaiveDate) -> i64 {
    dates::days_between(range.start, day) + DISPLAY_OFFSET_DAYS
}

/// Geometry of a task bar clipped to `range`.
///
/// Callers should only ask for tasks that overlap the range; see
/// [`DateRange::overlaps`].
pub fn task_bar(range: &DateRange, start: NaiveDate, end: NaiveDate, day_width: f32) -> BarGeometry {
    let start_offset = display_offset_days(range, start);
    let duration = dates::days_between(start, end) + 1;

    let left = (start_offset as f32 * day_width).max(0.0);
    let mut width = duration as f32 * day_width;

    if start_offset < 0 {
        width += start_offset as f32 * day_width;
    }

    let overflow = dates::days_between(range.end, end);
    if overflow > 0 {
        width -= overflow as f32 * day_width;
    }

    BarGeometry {
        left,
        width: width.max(MIN_BAR_WIDTH),
    }
}

/// Vegetable headers span the whole chart.
pub fn header_bar(range: &DateRange, day_width: f32) -> BarGeometry {
    BarGeometry {
        left: 0.0,
        width: range.total_days() as f32 * day_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn jan_1_to_10() -> DateRange {
        DateRange::new(ymd(2025, 1, 1), ymd(2025, 1, 10))
    }

    #[test]
    fn unclipped_bar() {
        let bar = task_bar(&jan_1_to_10(), ymd(2025, 1, 3), ymd(2025, 1, 5), 24.0);
        assert_eq!(bar, BarGeometry { left: 96.0, width: 72.0 });
    }

    #[test]
    fn overflow_past_range_end_is_trimmed() {
        // Jan 8..12: 5 days, 2 of them after the 10th.
        let bar = task_bar(&jan_1_to_10(), ymd(2025, 1, 8), ymd(2025, 1, 12), 24.0);
        assert_eq!(bar, BarGeometry { left: 216.0, width: 72.0 });
    }

    #[test]
    fn start_far_before_window_is_clipped_at_zero() {
        // Offset is -5 + 2 = -3 days; 8 day task keeps 5 days of width.
        let bar = task_bar(&jan_1_to_10(), ymd(2024, 12, 27), ymd(2025, 1, 3), 24.0);
        assert_eq!(bar, BarGeometry { left: 0.0, width: 120.0 });
    }

    #[test]
    fn heavily_clipped_bar_keeps_minimum_width() {
        let bar = task_bar(&jan_1_to_10(), ymd(2024, 12, 1), ymd(2025, 1, 1), 6.0);
        assert_eq!(bar.left, 0.0);
        assert_eq!(bar.width, MIN_BAR_WIDTH);
    }

    #[test]
    fn reversed_dates_still_get_minimum_width() {
        let bar = task_bar(&jan_1_to_10(), ymd(2025, 1, 5), ymd(2025, 1, 3), 24.0);
        assert!(bar.left >= 0.0);
        assert_eq!(bar.width, MIN_BAR_WIDTH);
    }

    #[test]
    fn bars_are_never_negative_or_too_narrow() {
        let range = jan_1_to_10();
        for unit_width in [24.0, 20.0, 6.0] {
            for start_day in -20..25 {
                for len in 0..20 {
                    let start = dates::add_days(range.start, start_day);
                    let end = dates::add_days(start, len);
                    if !range.overlaps(start, end) {
                        continue;
                    }
                    let bar = task_bar(&range, start, end, unit_width);
                    assert!(bar.left >= 0.0, "{start}..{end}");
                    assert!(bar.width >= MIN_BAR_WIDTH, "{start}..{end}");
                }
            }
        }
    }

    #[test]
    fn header_bar_spans_chart() {
        assert_eq!(header_bar(&jan_1_to_10(), 20.0), BarGeometry { left: 0.0, width: 200.0 });
    }
}

//! Work-report markers and the today line.

use chrono::NaiveDate;
use uuid::Uuid;

use super::bars;
use super::hierarchy::{DatedReport, HierarchicalRow, ScheduledTask};
use super::view::DateRange;
use super::{HEADER_HEIGHT, ROW_HEIGHT};
use crate::error::LayoutError;
use crate::model::{WorkReport, WorkType};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkMarker {
    pub report: WorkReport,
    pub date: NaiveDate,
    pub work_type: WorkType,
    /// Index of the row the marker sits on.
    pub row_index: usize,
    pub task_id: Uuid,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TodayLine {
    pub date: NaiveDate,
    pub x: f32,
}

/// Vertical centre of row `row_index`.
pub fn row_center_y(row_index: usize) -> f32 {
    HEADER_HEIGHT + row_index as f32 * ROW_HEIGHT + ROW_HEIGHT / 2.0
}

/// Picks the task row a report belongs on.
///
/// Rows of the report's vegetable whose task name carries a keyword of the
/// report's work type are preferred; among several, the task whose dates are
/// closest to the report wins, then the earliest row. Without a keyword hit
/// the vegetable's first task row is used.
pub fn match_row<'a>(
    rows: &'a [HierarchicalRow],
    report: &DatedReport,
) -> Option<(usize, &'a ScheduledTask)> {
    let candidates: Vec<(usize, &ScheduledTask)> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| match row {
            HierarchicalRow::Task(t) if t.task.vegetable.id == report.report.vegetable_id => Some((i, t)),
            _ => None,
        })
        .collect();

    let work_type = report.report.work_type;
    candidates
        .iter()
        .filter(|(_, t)| work_type.matches_task_name(&t.task.name))
        .min_by_key(|(_, t)| t.distance_to(report.date))
        .or_else(|| candidates.first())
        .copied()
}

/// Places every report on its row. Reports outside `range` are left out;
/// reports with no row to land on come back as errors.
pub fn place_markers(
    rows: &[HierarchicalRow],
    reports: &[DatedReport],
    range: &DateRange,
    day_width: f32,
) -> (Vec<WorkMarker>, Vec<LayoutError>) {
    let mut markers = Vec::new();
    let mut unresolved = Vec::new();

    for report in reports {
        if !range.contains(report.date) {
            tracing::trace!(report = %report.report.id, date = %report.date, "work report outside chart window");
            continue;
        }
        let Some((row_index, task)) = match_row(rows, report) else {
            unresolved.push(LayoutError::UnresolvedReportPlacement {
                report_id: report.report.id,
                vegetable_id: report.report.vegetable_id,
            });
            continue;
        };
        markers.push(WorkMarker {
            report: report.report.clone(),
            date: report.date,
            work_type: report.report.work_type,
            row_index,
            task_id: task.task.id,
            x: bars::display_offset_days(range, report.date) as f32 * day_width,
            y: row_center_y(row_index),
        });
    }

    (markers, unresolved)
}

/// The today line, if today falls inside the chart.
pub fn place_today(range: &DateRange, today: NaiveDate, day_width: f32) -> Option<TodayLine> {
    let days = super::dates::days_between(range.start, today);
    if !(0..=range.total_days()).contains(&days) {
        return None;
    }
    Some(TodayLine {
        date: today,
        x: bars::display_offset_days(range, today) as f32 * day_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::hierarchy::{build_groups, flatten_rows, ExpandState, TaskFilter};
    use crate::model::{Task, Vegetable};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(veg: &Vegetable, name: &str, start: u32, end: u32) -> ScheduledTask {
        ScheduledTask::resolve(&Task::new(name, veg.to_ref(), ymd(2025, 1, start), ymd(2025, 1, end))).unwrap()
    }

    fn report(veg: &Vegetable, work_type: WorkType, day: u32) -> DatedReport {
        DatedReport::resolve(&WorkReport::new(veg.id, work_type, ymd(2025, 1, day))).unwrap()
    }

    fn rows_for(tasks: Vec<ScheduledTask>, vegs: &[&Vegetable]) -> Vec<HierarchicalRow> {
        let mut expand = ExpandState::default();
        expand.seed(vegs.iter().map(|v| v.id));
        flatten_rows(&build_groups(tasks, &[], &TaskFilter::default(), &expand).groups)
    }

    fn jan() -> DateRange {
        DateRange::new(ymd(2025, 1, 1), ymd(2025, 1, 31))
    }

    #[test]
    fn keyword_match_beats_first_row() {
        let tomato = Vegetable::new("トマト", "");
        let rows = rows_for(
            vec![task(&tomato, "定植", 1, 3), task(&tomato, "収穫", 10, 20)],
            &[&tomato],
        );
        let (markers, unresolved) = place_markers(&rows, &[report(&tomato, WorkType::Harvesting, 12)], &jan(), 24.0);
        assert!(unresolved.is_empty());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].row_index, 2);
        assert_eq!(markers[0].x, (11 + 2) as f32 * 24.0);
        assert_eq!(markers[0].y, HEADER_HEIGHT + 2.0 * ROW_HEIGHT + ROW_HEIGHT / 2.0);
    }

    #[test]
    fn falls_back_to_first_row_of_vegetable() {
        let tomato = Vegetable::new("トマト", "");
        let rows = rows_for(
            vec![task(&tomato, "定植", 1, 3), task(&tomato, "収穫", 10, 20)],
            &[&tomato],
        );
        let (markers, _) = place_markers(&rows, &[report(&tomato, WorkType::Watering, 5)], &jan(), 24.0);
        assert_eq!(markers[0].row_index, 1);
    }

    #[test]
    fn several_keyword_rows_prefer_nearest_dates() {
        let tomato = Vegetable::new("トマト", "");
        let rows = rows_for(
            vec![
                task(&tomato, "収穫 1st", 1, 5),
                task(&tomato, "収穫 2nd", 20, 25),
                task(&tomato, "収穫 3rd", 20, 25),
            ],
            &[&tomato],
        );
        let (markers, _) = place_markers(&rows, &[report(&tomato, WorkType::Harvesting, 18)], &jan(), 24.0);
        assert_eq!(markers[0].row_index, 2);
        let (markers, _) = place_markers(&rows, &[report(&tomato, WorkType::Harvesting, 3)], &jan(), 24.0);
        assert_eq!(markers[0].row_index, 1);
    }

    #[test]
    fn collapsed_group_leaves_report_unresolved() {
        let tomato = Vegetable::new("トマト", "");
        let rows = flatten_rows(
            &build_groups(
                vec![task(&tomato, "収穫", 1, 3)],
                &[],
                &TaskFilter::default(),
                &ExpandState::default(),
            )
            .groups,
        );
        let r = report(&tomato, WorkType::Harvesting, 2);
        let (markers, unresolved) = place_markers(&rows, &[r.clone()], &jan(), 24.0);
        assert!(markers.is_empty());
        assert_eq!(
            unresolved,
            vec![LayoutError::UnresolvedReportPlacement {
                report_id: r.report.id,
                vegetable_id: tomato.id,
            }]
        );
    }

    #[test]
    fn reports_outside_window_are_dropped_silently() {
        let tomato = Vegetable::new("トマト", "");
        let rows = rows_for(vec![task(&tomato, "収穫", 1, 3)], &[&tomato]);
        let range = DateRange::new(ymd(2025, 1, 1), ymd(2025, 1, 10));
        let (markers, unresolved) =
            place_markers(&rows, &[report(&tomato, WorkType::Harvesting, 11)], &range, 24.0);
        assert!(markers.is_empty());
        assert!(unresolved.is_empty());
    }

    #[test]
    fn today_at_chart_start_sits_at_display_offset() {
        let range = jan();
        for day_width in [24.0, 20.0, 6.0] {
            let line = place_today(&range, range.start, day_width).unwrap();
            assert_eq!(line.x, bars::DISPLAY_OFFSET_DAYS as f32 * day_width);
        }
    }

    #[test]
    fn today_outside_chart_is_omitted() {
        let range = DateRange::new(ymd(2025, 1, 1), ymd(2025, 1, 10));
        assert!(place_today(&range, ymd(2024, 12, 31), 24.0).is_none());
        assert!(place_today(&range, ymd(2025, 1, 12), 24.0).is_none());
        assert!(place_today(&range, ymd(2025, 1, 10), 24.0).is_some());
    }
}

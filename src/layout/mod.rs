//! Timeline layout engine.
//!
//! [`compute_geometry`] turns the current farm data, filters, expand state and
//! view settings into pixel positions for one frame. It is a pure function:
//! nothing is cached between calls and nothing here performs I/O.

pub mod bars;
pub mod dates;
pub mod headers;
pub mod hierarchy;
pub mod markers;
pub mod view;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::LayoutError;
use crate::model::FarmData;

pub use bars::{BarGeometry, DISPLAY_OFFSET_DAYS, MIN_BAR_WIDTH};
pub use headers::ColumnHeaders;
pub use hierarchy::{ExpandState, HierarchicalRow, ScheduledTask, TaskFilter};
pub use markers::{TodayLine, WorkMarker};
pub use view::{DateRange, ViewConfig, ViewUnit};

/// Height of the three stacked header bands.
pub const HEADER_BAND_HEIGHT: f32 = 20.0;
pub const HEADER_HEIGHT: f32 = HEADER_BAND_HEIGHT * 3.0;
pub const ROW_HEIGHT: f32 = 40.0;

/// Days shown when there is no explicit range and no dated task.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct RowGeometry {
    pub row: HierarchicalRow,
    pub top: f32,
    pub bar: BarGeometry,
}

/// Everything needed to paint one frame of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub range: DateRange,
    pub unit: ViewUnit,
    pub day_width: f32,
    pub total_days: i64,
    pub headers: ColumnHeaders,
    pub rows: Vec<RowGeometry>,
    pub markers: Vec<WorkMarker>,
    pub today: Option<TodayLine>,
    /// Tasks and reports left out of this pass, and why.
    pub skipped: Vec<LayoutError>,
}

impl ChartGeometry {
    /// Width of the dated grid.
    pub fn chart_width(&self) -> f32 {
        self.total_days as f32 * self.day_width
    }

    /// Grid width plus room for bars pushed right by the display offset.
    pub fn canvas_width(&self) -> f32 {
        (self.total_days + DISPLAY_OFFSET_DAYS) as f32 * self.day_width
    }

    pub fn content_height(&self) -> f32 {
        HEADER_HEIGHT + self.rows.len() as f32 * ROW_HEIGHT
    }

    pub fn task_row(&self, task_id: Uuid) -> Option<&RowGeometry> {
        self.rows.iter().find(|r| r.row.task_id() == Some(task_id))
    }

    pub fn visible_task_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.rows.iter().filter_map(|r| r.row.task_id())
    }

    pub fn markers_on_row(&self, row_index: usize) -> impl Iterator<Item = &WorkMarker> + '_ {
        self.markers.iter().filter(move |m| m.row_index == row_index)
    }

    /// Reports held back only because their vegetable's group is collapsed.
    /// They reappear when the group is expanded.
    pub fn collapsed_report_count(&self) -> usize {
        self.skipped.iter().filter(|err| self.is_collapsed_report(err)).count()
    }

    /// Entries that cannot be shown in any expand state: bad dates, and
    /// reports for vegetables with no visible task.
    pub fn dropped_count(&self) -> usize {
        self.skipped.iter().filter(|err| !self.is_collapsed_report(err)).count()
    }

    fn is_collapsed_report(&self, err: &LayoutError) -> bool {
        let LayoutError::UnresolvedReportPlacement { vegetable_id, .. } = err else {
            return false;
        };
        self.rows.iter().any(|r| {
            matches!(&r.row, HierarchicalRow::Vegetable { vegetable, expanded: false, .. } if vegetable.id == *vegetable_id)
        })
    }
}

/// Chart window: the explicit range if given, else the span of `tasks`,
/// else a default window starting today.
pub fn chart_range(explicit: Option<DateRange>, tasks: &[ScheduledTask], today: NaiveDate) -> DateRange {
    if let Some(range) = explicit {
        return range;
    }
    let earliest = tasks.iter().map(|t| t.start.min(t.end)).min();
    let latest = tasks.iter().map(|t| t.end.max(t.start)).max();
    match (earliest, latest) {
        (Some(start), Some(end)) => DateRange::new(start, end),
        _ => DateRange::new(today, dates::add_days(today, DEFAULT_WINDOW_DAYS)),
    }
}

/// Lays out one frame.
///
/// `today` must come from [`dates::today_in_display_tz`] (or a fixed day in
/// tests) so the today line agrees with task positions.
pub fn compute_geometry(
    data: &FarmData,
    filter: &TaskFilter,
    expand: &ExpandState,
    view: &ViewConfig,
    today: NaiveDate,
) -> ChartGeometry {
    let mut skipped = Vec::new();

    let mut tasks: Vec<ScheduledTask> = Vec::with_capacity(data.tasks.len());
    for task in data.tasks.iter().filter(|t| filter.matches(t)) {
        match ScheduledTask::resolve(task) {
            Ok(t) => tasks.push(t),
            Err(err) => {
                tracing::debug!(task = %task.id, name = %task.name, %err, "task left out of chart");
                skipped.push(err);
            }
        }
    }

    let range = chart_range(view.range, &tasks, today);
    tasks.retain(|t| range.overlaps(t.start, t.end));

    let mut reports = Vec::with_capacity(data.work_reports.len());
    for report in &data.work_reports {
        match hierarchy::DatedReport::resolve(report) {
            Ok(r) => reports.push(r),
            Err(err) => {
                tracing::debug!(report = %report.id, %err, "work report left out of chart");
                skipped.push(err);
            }
        }
    }

    let grouping = hierarchy::build_groups(tasks, &reports, filter, expand);
    skipped.extend(grouping.unresolved);

    let rows = hierarchy::flatten_rows(&grouping.groups);
    let day_width = view.unit.day_width();

    let group_reports: Vec<hierarchy::DatedReport> = grouping
        .groups
        .iter()
        .flat_map(|g| g.reports.iter().cloned())
        .collect();
    let (markers, unresolved) = markers::place_markers(&rows, &group_reports, &range, day_width);
    for err in &unresolved {
        tracing::debug!(%err, "work report not placed");
    }
    skipped.extend(unresolved);

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let bar = match &row {
                HierarchicalRow::Vegetable { .. } => bars::header_bar(&range, day_width),
                HierarchicalRow::Task(t) => bars::task_bar(&range, t.start, t.end, day_width),
            };
            RowGeometry {
                row,
                top: HEADER_HEIGHT + i as f32 * ROW_HEIGHT,
                bar,
            }
        })
        .collect();

    ChartGeometry {
        range,
        unit: view.unit,
        day_width,
        total_days: range.total_days(),
        headers: headers::build_headers(&range, view.unit),
        rows,
        markers,
        today: markers::place_today(&range, today, day_width),
        skipped,
    }
}

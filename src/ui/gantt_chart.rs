use crate::layout::hierarchy::GroupStats;
use crate::layout::{ChartGeometry, HierarchicalRow, RowGeometry, WorkMarker};
use crate::model::VegetableRef;
use crate::ui::theme;
use egui::{Align2, Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const BAND: f32 = theme::HEADER_BAND_HEIGHT;

/// What the user did in the chart this frame.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// A task bar was clicked.
    pub selected: Option<Uuid>,
    /// A vegetable header bar was clicked.
    pub toggled: Option<Uuid>,
    /// Click on empty canvas.
    pub cleared: bool,
    /// Vertical scroll offset after this frame, shared with the row list.
    pub scroll_y: f32,
}

/// Render the chart area (right panel) from precomputed geometry.
pub fn show_gantt_chart(
    geo: &ChartGeometry,
    selected_task: Option<Uuid>,
    scroll_y: f32,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction {
        scroll_y,
        ..Default::default()
    };
    let available = ui.available_size();
    let chart_width = geo.canvas_width().max(available.x);
    let chart_height = geo.content_height().max(available.y);

    let output = egui::ScrollArea::both()
        .id_salt("gantt-chart")
        .auto_shrink([false, false])
        .vertical_scroll_offset(scroll_y)
        .show(ui, |ui| {
            let (response, painter) =
                ui.allocate_painter(Vec2::new(chart_width, chart_height), Sense::click());
            let origin = response.rect.min;
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            draw_weekend_shading(&painter, origin, geo, chart_height);
            draw_rows_background(&painter, origin, geo, chart_width);
            draw_header(&painter, origin, geo, chart_width, chart_height);
            header_tooltips(ui, origin, geo);

            let mut group_index = 0usize;
            for (i, row) in geo.rows.iter().enumerate() {
                match &row.row {
                    HierarchicalRow::Vegetable { vegetable, expanded, stats } => {
                        if i > 0 {
                            group_index += 1;
                        }
                        let rect = draw_group_bar(
                            &painter,
                            origin,
                            row,
                            vegetable,
                            *expanded,
                            stats,
                            theme::task_color(group_index),
                        );
                        let resp = ui.interact(
                            rect,
                            ui.make_persistent_id(("group-bar", vegetable.id)),
                            Sense::click(),
                        );
                        if resp.clicked() {
                            interaction.toggled = Some(vegetable.id);
                            consumed_click = true;
                        }
                        if resp.hovered() {
                            egui::show_tooltip_at_pointer(
                                ui.ctx(),
                                ui.layer_id(),
                                egui::Id::new(("group-tip", vegetable.id)),
                                |ui| group_tooltip(ui, vegetable, stats),
                            );
                        }
                    }
                    HierarchicalRow::Task(scheduled) => {
                        let task = &scheduled.task;
                        let color = task.color.unwrap_or_else(|| theme::task_color(group_index));
                        let is_selected = selected_task == Some(task.id);
                        let rect = draw_task_bar(&painter, origin, row, &task.name, task.progress_percent(), color, is_selected);

                        let resp = ui.interact(
                            rect,
                            ui.make_persistent_id(("task-bar", task.id)),
                            Sense::click(),
                        );
                        if resp.clicked() {
                            interaction.selected = Some(task.id);
                            consumed_click = true;
                        }
                        if resp.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            egui::show_tooltip_at_pointer(
                                ui.ctx(),
                                ui.layer_id(),
                                egui::Id::new(("task-tip", task.id)),
                                |ui| {
                                    ui.strong(&task.name);
                                    ui.label(format!(
                                        "{} → {}",
                                        scheduled.start.format("%Y-%m-%d"),
                                        scheduled.end.format("%Y-%m-%d"),
                                    ));
                                    ui.label(format!("Progress: {}%", task.progress_percent()));
                                    ui.label(format!("Status: {}", task.status.label()));
                                    let reports = geo.markers_on_row(i).count();
                                    if reports > 0 {
                                        ui.label(format!("Work reports on this row: {reports}"));
                                    }
                                },
                            );
                        }
                    }
                }
            }

            for marker in &geo.markers {
                let rect = draw_marker(&painter, origin, marker);
                let resp = ui.interact(
                    rect,
                    ui.make_persistent_id(("marker", marker.report.id)),
                    Sense::hover(),
                );
                if resp.hovered() {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("marker-tip", marker.report.id)),
                        |ui| marker_tooltip(ui, marker),
                    );
                }
            }

            if let Some(today) = geo.today {
                draw_today_line(&painter, origin, today.x, chart_height);
            }

            if geo.rows.is_empty() {
                painter.text(
                    Pos2::new(origin.x + 16.0, origin.y + HEADER_HEIGHT + ROW_HEIGHT),
                    Align2::LEFT_CENTER,
                    "No tasks in this range",
                    theme::font_bar(),
                    theme::TEXT_DIM,
                );
            }

            if response.clicked() && !consumed_click {
                interaction.cleared = true;
            }
        });

    interaction.scroll_y = output.state.offset.y;
    interaction
}

fn draw_weekend_shading(painter: &egui::Painter, origin: Pos2, geo: &ChartGeometry, height: f32) {
    for left in &geo.headers.weekend_columns {
        painter.rect_filled(
            Rect::from_min_size(
                Pos2::new(origin.x + left, origin.y + BAND),
                Vec2::new(geo.day_width, height - BAND),
            ),
            0.0,
            theme::BG_WEEKEND,
        );
    }
}

fn draw_rows_background(painter: &egui::Painter, origin: Pos2, geo: &ChartGeometry, width: f32) {
    for (i, row) in geo.rows.iter().enumerate() {
        let y = origin.y + row.top;
        let fill = if row.row.is_header() {
            theme::BG_GROUP_ROW
        } else if i % 2 == 0 {
            theme::BG_PANEL
        } else {
            theme::BG_DARK
        };
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, ROW_HEIGHT)),
            0.0,
            fill,
        );
        painter.line_segment(
            [
                Pos2::new(origin.x, y + ROW_HEIGHT),
                Pos2::new(origin.x + width, y + ROW_HEIGHT),
            ],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

/// Three bands: months, day numbers, weekday names.
fn draw_header(painter: &egui::Painter, origin: Pos2, geo: &ChartGeometry, width: f32, height: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    for band in &geo.headers.months {
        let x = origin.x + band.left;
        painter.line_segment(
            [Pos2::new(x, origin.y), Pos2::new(x, origin.y + BAND)],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
        let clip = Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(band.width, BAND));
        painter.with_clip_rect(clip).text(
            Pos2::new(x + 5.0, origin.y + BAND / 2.0),
            Align2::LEFT_CENTER,
            &band.label,
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
    }
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + BAND),
            Pos2::new(origin.x + width, origin.y + BAND),
        ],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );

    for day in &geo.headers.days {
        let x = origin.x + day.left;
        painter.line_segment(
            [Pos2::new(x, origin.y + BAND), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        let color = if day.is_weekend {
            theme::TEXT_WEEKEND
        } else {
            theme::TEXT_SECONDARY
        };
        painter.text(
            Pos2::new(x + 3.0, origin.y + BAND * 1.5),
            Align2::LEFT_CENTER,
            &day.label,
            theme::font_sub(),
            color,
        );
        if let Some(weekday) = day.weekday {
            painter.text(
                Pos2::new(x + 3.0, origin.y + BAND * 2.5),
                Align2::LEFT_CENTER,
                weekday,
                theme::font_small(),
                color,
            );
        }
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    // End of the dated grid; the canvas runs on past it for shifted bars.
    let grid_end = origin.x + geo.chart_width();
    painter.line_segment(
        [Pos2::new(grid_end, origin.y + BAND), Pos2::new(grid_end, origin.y + height)],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

/// Hover text for the month and day bands.
fn header_tooltips(ui: &Ui, origin: Pos2, geo: &ChartGeometry) {
    for band in &geo.headers.months {
        let rect = Rect::from_min_size(Pos2::new(origin.x + band.left, origin.y), Vec2::new(band.width, BAND));
        let resp = ui.interact(rect, ui.make_persistent_id(("month-band", band.year, band.month)), Sense::hover());
        if resp.hovered() {
            egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), egui::Id::new("month-tip"), |ui| {
                ui.strong(format!("{}-{:02}", band.year, band.month));
                ui.label(format!("{} days in view", band.days));
            });
        }
    }

    for day in &geo.headers.days {
        let rect = Rect::from_min_size(
            Pos2::new(origin.x + day.left, origin.y + BAND),
            Vec2::new(geo.day_width, BAND * 2.0),
        );
        let resp = ui.interact(rect, ui.make_persistent_id(("day-header", day.index)), Sense::hover());
        if resp.hovered() {
            egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), egui::Id::new("day-tip"), |ui| {
                ui.strong(day.date.format("%Y-%m-%d (%a)").to_string());
                ui.label(format!("Day {} of {}", day.index + 1, geo.total_days));
            });
        }
    }
}

fn bar_rect(origin: Pos2, row: &RowGeometry) -> Rect {
    Rect::from_min_size(
        Pos2::new(origin.x + row.bar.left, origin.y + row.top + theme::BAR_INSET),
        Vec2::new(row.bar.width, ROW_HEIGHT - theme::BAR_INSET * 2.0),
    )
}

fn draw_group_bar(
    painter: &egui::Painter,
    origin: Pos2,
    row: &RowGeometry,
    vegetable: &VegetableRef,
    expanded: bool,
    stats: &GroupStats,
    color: Color32,
) -> Rect {
    let rect = bar_rect(origin, row);
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    painter.rect_filled(rect, rounding, theme::GROUP_BAR);

    let progress_width = rect.width() * f32::from(stats.mean_progress) / 100.0;
    if progress_width > 0.0 {
        painter.rect_filled(
            Rect::from_min_size(rect.min, Vec2::new(progress_width, rect.height())),
            rounding,
            color.gamma_multiply(0.35),
        );
    }
    painter.rect_stroke(rect, rounding, Stroke::new(1.0, color.gamma_multiply(0.6)));

    let chevron = if expanded {
        egui_phosphor::regular::CARET_DOWN
    } else {
        egui_phosphor::regular::CARET_RIGHT
    };
    painter.text(
        Pos2::new(rect.left() + 8.0, rect.center().y),
        Align2::LEFT_CENTER,
        format!(
            "{chevron}  {}  ·  {} tasks  ·  {}%",
            vegetable.display_name(),
            stats.task_count,
            stats.mean_progress
        ),
        theme::font_bar(),
        theme::TEXT_PRIMARY,
    );
    rect
}

fn draw_task_bar(
    painter: &egui::Painter,
    origin: Pos2,
    row: &RowGeometry,
    name: &str,
    progress: u8,
    color: Color32,
    is_selected: bool,
) -> Rect {
    let rect = bar_rect(origin, row);
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    painter.rect_filled(rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(rect, rounding, color);

    if progress > 0 {
        let progress_width = rect.width() * f32::from(progress.min(100)) / 100.0;
        painter.rect_filled(
            Rect::from_min_size(rect.min, Vec2::new(progress_width, rect.height())),
            rounding,
            theme::PROGRESS_OVERLAY,
        );
        if progress < 98 {
            let tick_x = rect.left() + progress_width;
            painter.line_segment(
                [
                    Pos2::new(tick_x, rect.top() + 2.0),
                    Pos2::new(tick_x, rect.bottom() - 2.0),
                ],
                Stroke::new(1.0, Color32::from_white_alpha(60)),
            );
        }
    }

    if is_selected {
        painter.rect_stroke(
            rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(name.to_owned(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = rect.top() + (rect.height() - galley.size().y) / 2.0;
        painter
            .with_clip_rect(rect)
            .galley(Pos2::new(rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }

    rect
}

fn draw_marker(painter: &egui::Painter, origin: Pos2, marker: &WorkMarker) -> Rect {
    let center = Pos2::new(origin.x + marker.x, origin.y + marker.y);
    let radius = theme::MARKER_RADIUS;
    painter.circle_filled(center + Vec2::new(0.5, 1.0), radius, Color32::from_black_alpha(50));
    painter.circle_filled(center, radius, marker.work_type.color());
    painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::WHITE));
    painter.text(
        center,
        Align2::CENTER_CENTER,
        marker.work_type.icon(),
        theme::font_small(),
        Color32::WHITE,
    );
    Rect::from_center_size(center, Vec2::splat(radius * 2.0 + 2.0))
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, x: f32, height: f32) {
    let x = origin.x + x;
    painter.line_segment(
        [
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Pos2::new(x, origin.y + height),
        ],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn group_tooltip(ui: &mut Ui, vegetable: &VegetableRef, stats: &GroupStats) {
    ui.strong(vegetable.display_name());
    ui.label(format!("Tasks: {}", stats.task_count));
    ui.label(format!("Average progress: {}%", stats.mean_progress));
    ui.label(format!("Work reports: {}", stats.report_count));
    if stats.harvest_total > 0.0 {
        ui.label(format!("Harvest: {:.1} kg", stats.harvest_total));
    }
    if stats.revenue_total > 0.0 {
        ui.label(format!("Expected revenue: ¥{:.0}", stats.revenue_total));
    }
}

fn marker_tooltip(ui: &mut Ui, marker: &WorkMarker) {
    ui.strong(format!("{} {}", marker.work_type.icon(), marker.work_type.label()));
    ui.label(marker.date.format("%Y-%m-%d").to_string());
    if let Some(notes) = marker.report.work_notes.as_deref().filter(|n| !n.is_empty()) {
        ui.label(notes);
    }
    if let Some(amount) = marker.report.harvest_amount {
        ui.label(format!("Harvest: {amount:.1} kg"));
    }
    if let Some(revenue) = marker.report.expected_revenue {
        ui.label(format!("Expected revenue: ¥{revenue:.0}"));
    }
}

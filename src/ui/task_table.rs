use crate::layout::{ChartGeometry, HierarchicalRow};
use crate::ui::theme;
use egui::{Align2, Color32, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

/// Actions that the row list can request.
pub enum TaskTableAction {
    None,
    Select(Uuid),
    ToggleGroup(Uuid),
}

/// Render the left-side row list. Rows line up with the chart rows, so the
/// list scrolls with the same vertical offset and starts below a block as
/// tall as the chart header.
pub fn show_task_table(
    geo: &ChartGeometry,
    selected_task: Option<Uuid>,
    scroll_y: &mut f32,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    let output = egui::ScrollArea::vertical()
        .id_salt("task-table")
        .auto_shrink([false, false])
        .vertical_scroll_offset(*scroll_y)
        .show(ui, |ui| {
            let width = ui.available_width();
            ui.spacing_mut().item_spacing.y = 0.0;

            let (header_rect, _) =
                ui.allocate_exact_size(Vec2::new(width, theme::HEADER_HEIGHT), Sense::hover());
            draw_column_header(ui, header_rect, geo);

            let mut group_index = 0usize;
            for (i, row) in geo.rows.iter().enumerate() {
                let (rect, resp) =
                    ui.allocate_exact_size(Vec2::new(width, theme::ROW_HEIGHT), Sense::click());
                let painter = ui.painter_at(rect);

                match &row.row {
                    HierarchicalRow::Vegetable { vegetable, expanded, stats } => {
                        if i > 0 {
                            group_index += 1;
                        }
                        let fill = if resp.hovered() {
                            theme::BG_HEADER
                        } else {
                            theme::BG_GROUP_ROW
                        };
                        painter.rect_filled(rect, 0.0, fill);

                        let chevron = if *expanded {
                            egui_phosphor::regular::CARET_DOWN
                        } else {
                            egui_phosphor::regular::CARET_RIGHT
                        };
                        painter.text(
                            Pos2::new(rect.left() + 8.0, rect.center().y),
                            Align2::LEFT_CENTER,
                            chevron,
                            theme::font_bar(),
                            theme::TEXT_SECONDARY,
                        );
                        painter.circle_filled(
                            Pos2::new(rect.left() + 28.0, rect.center().y),
                            4.0,
                            theme::task_color(group_index),
                        );
                        painter.text(
                            Pos2::new(rect.left() + 40.0, rect.center().y - 7.0),
                            Align2::LEFT_CENTER,
                            vegetable.display_name(),
                            theme::font_header(),
                            theme::TEXT_PRIMARY,
                        );
                        painter.text(
                            Pos2::new(rect.left() + 40.0, rect.center().y + 8.0),
                            Align2::LEFT_CENTER,
                            format!(
                                "{} tasks · {}% · {} reports",
                                stats.task_count, stats.mean_progress, stats.report_count
                            ),
                            theme::font_small(),
                            theme::TEXT_DIM,
                        );

                        if resp.clicked() {
                            action = TaskTableAction::ToggleGroup(vegetable.id);
                        }
                    }
                    HierarchicalRow::Task(scheduled) => {
                        let task = &scheduled.task;
                        let is_selected = selected_task == Some(task.id);
                        let fill = if is_selected {
                            theme::BG_SELECTED
                        } else if i % 2 == 0 {
                            theme::BG_PANEL
                        } else {
                            theme::BG_DARK
                        };
                        painter.rect_filled(rect, 0.0, fill);

                        let color = task.color.unwrap_or_else(|| theme::task_color(group_index));
                        painter.circle_filled(Pos2::new(rect.left() + 28.0, rect.center().y), 3.0, color);

                        let name_color = if is_selected {
                            Color32::WHITE
                        } else {
                            theme::TEXT_PRIMARY
                        };
                        let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), name_color);
                        let name_clip = Rect::from_min_max(
                            Pos2::new(rect.left() + 40.0, rect.top()),
                            Pos2::new(rect.right() - 96.0, rect.bottom()),
                        );
                        painter.with_clip_rect(name_clip).galley(
                            Pos2::new(name_clip.left(), rect.center().y - galley.size().y / 2.0 - 6.0),
                            galley,
                            Color32::TRANSPARENT,
                        );
                        painter.text(
                            Pos2::new(rect.left() + 40.0, rect.center().y + 9.0),
                            Align2::LEFT_CENTER,
                            format!(
                                "{} → {}",
                                scheduled.start.format("%m/%d"),
                                scheduled.end.format("%m/%d")
                            ),
                            theme::font_small(),
                            theme::TEXT_SECONDARY,
                        );

                        // Priority pill and progress on the right.
                        let pill = Rect::from_min_size(
                            Pos2::new(rect.right() - 90.0, rect.center().y - 7.0),
                            Vec2::new(36.0, 14.0),
                        );
                        painter.rect_filled(pill, 7.0, theme::priority_color(task.priority).gamma_multiply(0.8));
                        painter.text(
                            pill.center(),
                            Align2::CENTER_CENTER,
                            task.priority.label(),
                            theme::font_small(),
                            Color32::WHITE,
                        );
                        painter.text(
                            Pos2::new(rect.right() - 8.0, rect.center().y),
                            Align2::RIGHT_CENTER,
                            format!("{}%", task.progress_percent()),
                            theme::font_sub(),
                            theme::TEXT_SECONDARY,
                        );

                        if resp.clicked() {
                            action = TaskTableAction::Select(task.id);
                        }
                    }
                }

                painter.line_segment(
                    [rect.left_bottom(), rect.right_bottom()],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );
            }

            // Pad to the chart's content so both sides scroll the same distance.
            let remaining = ui.available_height();
            if remaining > 0.0 {
                ui.add_space(remaining);
            }
        });

    *scroll_y = output.state.offset.y;
    action
}

fn draw_column_header(ui: &Ui, rect: Rect, geo: &ChartGeometry) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme::BG_HEADER);
    painter.text(
        Pos2::new(rect.left() + 10.0, rect.top() + theme::HEADER_BAND_HEIGHT / 2.0 + 2.0),
        Align2::LEFT_CENTER,
        "Vegetables / Tasks",
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );
    let task_count = geo.visible_task_ids().count();
    painter.text(
        Pos2::new(rect.left() + 10.0, rect.top() + theme::HEADER_BAND_HEIGHT * 1.5 + 2.0),
        Align2::LEFT_CENTER,
        format!(
            "{} → {}  ·  {} tasks",
            geo.range.start.format("%Y-%m-%d"),
            geo.range.end.format("%Y-%m-%d"),
            task_count
        ),
        theme::font_small(),
        theme::TEXT_DIM,
    );
    let mut notes = Vec::new();
    let dropped = geo.dropped_count();
    if dropped > 0 {
        notes.push(format!("{} {dropped} entries not shown", egui_phosphor::regular::WARNING));
    }
    let collapsed = geo.collapsed_report_count();
    if collapsed > 0 {
        notes.push(format!("{collapsed} reports in collapsed groups"));
    }
    if !notes.is_empty() {
        let color = if dropped > 0 {
            theme::TEXT_WEEKEND
        } else {
            theme::TEXT_DIM
        };
        painter.text(
            Pos2::new(rect.left() + 10.0, rect.top() + theme::HEADER_BAND_HEIGHT * 2.5),
            Align2::LEFT_CENTER,
            notes.join("  ·  "),
            theme::font_small(),
            color,
        );
    }
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

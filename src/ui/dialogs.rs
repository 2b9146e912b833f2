use crate::app::FarmGanttApp;
use crate::model::WorkType;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

/// Read-only details of the selected task, with the work reports recorded
/// for its vegetable.
pub fn show_task_details(app: &mut FarmGanttApp, ctx: &Context) {
    let Some(task) = app.selected() else {
        app.selected_task = None;
        return;
    };

    let mut open = true;
    let vegetable_id = task.vegetable.id;
    let mut reports: Vec<_> = app
        .farm
        .work_reports
        .iter()
        .filter(|r| r.vegetable_id == vegetable_id)
        .collect();
    reports.sort_by(|a, b| a.work_date.cmp(&b.work_date));

    Window::new(RichText::new("Task Details").strong().size(14.0))
        .id(egui::Id::new("task_details"))
        .open(&mut open)
        .resizable(false)
        .collapsible(true)
        .default_width(320.0)
        .anchor(egui::Align2::RIGHT_TOP, [-16.0, 72.0])
        .show(ctx, |ui| {
            ui.heading(RichText::new(&task.name).color(theme::TEXT_PRIMARY));
            ui.add_space(4.0);

            egui::Grid::new("task_details_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    let key = |ui: &mut egui::Ui, text: &str| {
                        ui.label(RichText::new(text).color(theme::TEXT_SECONDARY));
                    };

                    key(ui, "Vegetable");
                    ui.label(task.vegetable.display_name());
                    ui.end_row();

                    key(ui, "Dates");
                    ui.label(format!("{} → {}", task.start, task.end));
                    ui.end_row();

                    key(ui, "Status");
                    ui.label(task.status.label());
                    ui.end_row();

                    key(ui, "Priority");
                    ui.label(RichText::new(task.priority.label()).color(theme::priority_color(task.priority)));
                    ui.end_row();

                    key(ui, "Progress");
                    ui.add(
                        egui::ProgressBar::new(f32::from(task.progress_percent()) / 100.0)
                            .desired_width(160.0)
                            .show_percentage(),
                    );
                    ui.end_row();

                    if let Some(user) = &task.assigned_user {
                        key(ui, "Assignee");
                        ui.label(&user.name);
                        ui.end_row();
                    }
                });

            ui.add_space(6.0);
            ui.separator();
            ui.label(RichText::new(format!("Work reports ({})", reports.len())).strong());

            if reports.is_empty() {
                ui.label(RichText::new("None recorded").color(theme::TEXT_DIM));
            }
            egui::ScrollArea::vertical().max_height(180.0).show(ui, |ui| {
                for report in &reports {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(report.work_type.icon()).color(report.work_type.color()));
                        ui.label(RichText::new(&report.work_date).color(theme::TEXT_SECONDARY));
                        ui.label(report.work_type.label());
                        if report.work_type == WorkType::Harvesting {
                            if let Some(amount) = report.harvest_amount {
                                ui.label(RichText::new(format!("{amount:.1} kg")).color(theme::TEXT_DIM));
                            }
                        }
                    });
                    if let Some(notes) = report.work_notes.as_deref().filter(|n| !n.is_empty()) {
                        ui.label(RichText::new(notes).size(11.0).color(theme::TEXT_DIM));
                    }
                }
            });
        });

    if !open {
        app.selected_task = None;
    }
}

pub fn show_about_dialog(app: &mut FarmGanttApp, ctx: &Context) {
    let mut open = app.show_about;
    Window::new(RichText::new("About").strong().size(14.0))
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([320.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(6.0);
                ui.label(
                    RichText::new(format!("{} Farm Gantt", egui_phosphor::regular::PLANT))
                        .size(20.0)
                        .strong()
                        .color(theme::ACCENT),
                );
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .size(11.0)
                        .color(theme::TEXT_DIM),
                );
                ui.add_space(8.0);
                ui.label("Vegetable work schedule with work-report markers.");
                ui.add_space(6.0);
                ui.label(
                    RichText::new("Built with Rust and egui")
                        .size(11.0)
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(6.0);
                if ui
                    .add(egui::Button::new(RichText::new("Close").color(Color32::WHITE)).fill(theme::ACCENT))
                    .clicked()
                {
                    app.show_about = false;
                }
            });
        });
    if !open {
        app.show_about = false;
    }
}

use crate::app::FarmGanttApp;
use crate::layout::{TaskFilter, ViewUnit};
use crate::model::TaskPriority;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top toolbar: menus, then a row of filters and the date range.
pub fn show_toolbar(app: &mut FarmGanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  Open...", icons::FOLDER_OPEN)).clicked() {
                app.open_farm();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Save          Ctrl+S", icons::FLOPPY_DISK)).clicked() {
                app.save_farm();
                ui.close_menu();
            }
            if ui.button("      Save As...").clicked() {
                app.save_farm_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import Tasks CSV...", icons::FILE_CSV)).clicked() {
                app.import_tasks_csv();
                ui.close_menu();
            }
            if ui.button(format!("{}  Import Work Reports CSV...", icons::FILE_CSV)).clicked() {
                app.import_reports_csv();
                ui.close_menu();
            }
            if ui.button(format!("{}  Export Tasks CSV...", icons::EXPORT)).clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            ui.label(RichText::new("Timeline Unit").small().weak());
            for unit in ViewUnit::ALL {
                if ui.radio(app.view.unit == unit, unit.label()).clicked() {
                    app.set_view_unit(unit);
                    ui.close_menu();
                }
            }
            ui.separator();
            if ui.button("  Expand All").clicked() {
                app.expand_all();
                ui.close_menu();
            }
            if ui.button("  Collapse All").clicked() {
                app.collapse_all();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Open Settings Folder", icons::GEAR)).clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned farm name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let unsaved = if app.source.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.farm.name, unsaved))
                    .size(11.0)
                    .weak(),
            );
        });
    });

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        show_filters(app, ui);
        ui.separator();
        show_range(app, ui);
    });
    ui.add_space(2.0);
}

fn show_filters(app: &mut FarmGanttApp, ui: &mut Ui) {
    let mut filter = app.filter;

    ui.label(RichText::new(icons::FUNNEL).color(theme::TEXT_DIM));
    let vegetable_text = filter
        .vegetable
        .and_then(|id| app.farm.vegetable(id))
        .map(|v| v.display_name())
        .unwrap_or_else(|| "All vegetables".to_string());
    egui::ComboBox::from_id_salt("vegetable_filter")
        .selected_text(RichText::new(vegetable_text).size(11.0))
        .width(160.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut filter.vegetable, None, "All vegetables");
            for vegetable in &app.farm.vegetables {
                ui.selectable_value(&mut filter.vegetable, Some(vegetable.id), vegetable.display_name());
            }
        });

    let priority_text = filter.priority.map(TaskPriority::label).unwrap_or("All priorities");
    egui::ComboBox::from_id_salt("priority_filter")
        .selected_text(RichText::new(priority_text).size(11.0))
        .width(110.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut filter.priority, None, "All priorities");
            for p in TaskPriority::ALL {
                ui.selectable_value(
                    &mut filter.priority,
                    Some(p),
                    RichText::new(p.label()).color(theme::priority_color(p)),
                );
            }
        });

    if filter.is_active() && ui.small_button("Clear").clicked() {
        filter = TaskFilter::default();
    }

    app.set_filter(filter);
}

fn show_range(app: &mut FarmGanttApp, ui: &mut Ui) {
    ui.checkbox(&mut app.custom_range, "Custom range");
    ui.add_enabled_ui(app.custom_range, |ui| {
        ui.add(egui_extras::DatePickerButton::new(&mut app.range_start).id_salt("range_start"));
        ui.label(RichText::new("→").color(theme::TEXT_DIM));
        ui.add(egui_extras::DatePickerButton::new(&mut app.range_end).id_salt("range_end"));
    });
    app.apply_range();
}

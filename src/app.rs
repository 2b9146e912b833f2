use chrono::NaiveDate;
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::AppSettings;
use crate::io::{csv_export, csv_import, FarmDataSource, JsonFileSource};
use crate::layout::{self, dates, DateRange, ExpandState, TaskFilter, ViewConfig, ViewUnit};
use crate::model::{FarmData, Task, TaskPriority, TaskStatus, Vegetable, WorkReport, WorkType};
use crate::ui;

/// Main application state.
pub struct FarmGanttApp {
    pub farm: FarmData,
    pub source: Option<Box<dyn FarmDataSource>>,

    // View state
    pub filter: TaskFilter,
    pub expand: ExpandState,
    pub view: ViewConfig,
    pub custom_range: bool,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub selected_task: Option<Uuid>,
    scroll_y: f32,

    // Dialog state
    pub show_about: bool,

    pub settings: AppSettings,
    pub settings_path: Option<PathBuf>,

    // Status message
    pub status_message: String,
}

impl FarmGanttApp {
    /// `source` is the data source picked at start-up; without one the app
    /// opens on sample data.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: AppSettings,
        settings_path: Option<PathBuf>,
        source: Option<Box<dyn FarmDataSource>>,
    ) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let today = dates::today_in_display_tz();
        let mut app = Self {
            farm: FarmData::default(),
            source: None,
            filter: TaskFilter::default(),
            expand: ExpandState::default(),
            view: ViewConfig::new(settings.view_unit),
            custom_range: false,
            range_start: today,
            range_end: dates::add_days(today, layout::DEFAULT_WINDOW_DAYS),
            selected_task: None,
            scroll_y: 0.0,
            show_about: false,
            settings,
            settings_path,
            status_message: "Ready".to_string(),
        };

        match source {
            Some(source) => app.load_from(source),
            None => app.replace_farm(Self::sample_farm(today)),
        }
        app
    }

    /// A small farm for first start-up.
    pub fn sample_farm(today: NaiveDate) -> FarmData {
        let day = |offset: i64| dates::add_days(today, offset);
        let mut farm = FarmData::new("Sample Farm");

        let mut tomato = Vegetable::new("トマト", "桃太郎");
        tomato.plot_name = Some("A-1".into());
        let eggplant = Vegetable::new("なす", "千両二号");
        let cucumber = Vegetable::new("きゅうり", "");

        let mut sowing = Task::new("播種", tomato.to_ref(), day(-20), day(-14));
        sowing.progress = 100;
        sowing.status = TaskStatus::Completed;
        let mut planting = Task::new("定植", tomato.to_ref(), day(-10), day(-6));
        planting.progress = 100;
        planting.status = TaskStatus::Completed;
        let mut harvest = Task::new("収穫", tomato.to_ref(), day(-2), day(25));
        harvest.progress = 20;
        harvest.status = TaskStatus::InProgress;
        harvest.priority = TaskPriority::High;

        let mut eggplant_plant = Task::new("定植", eggplant.to_ref(), day(-5), day(0));
        eggplant_plant.progress = 60;
        eggplant_plant.status = TaskStatus::InProgress;
        let eggplant_fert = Task::new("追肥", eggplant.to_ref(), day(5), day(8));

        let mut cucumber_sow = Task::new("種まき", cucumber.to_ref(), day(2), day(6));
        cucumber_sow.priority = TaskPriority::Low;

        let mut picked = WorkReport::new(tomato.id, WorkType::Harvesting, day(-1));
        picked.harvest_amount = Some(12.5);
        picked.expected_revenue = Some(6250.0);
        picked.work_notes = Some("First fruits, good colour".into());
        let mut watered = WorkReport::new(eggplant.id, WorkType::Watering, day(-3));
        watered.work_notes = Some("Dry week".into());
        let planted = WorkReport::new(eggplant.id, WorkType::Planting, day(-4));

        farm.tasks = vec![sowing, planting, harvest, eggplant_plant, eggplant_fert, cucumber_sow];
        farm.work_reports = vec![picked, watered, planted];
        farm.vegetables = vec![tomato, eggplant, cucumber];
        farm
    }

    fn replace_farm(&mut self, farm: FarmData) {
        self.farm = farm;
        self.farm.register_task_vegetables();
        self.selected_task = None;
        self.filter = TaskFilter::default();
        self.expand.reset();
        self.expand.seed(self.farm.vegetables.iter().map(|v| v.id));
    }

    fn load_from(&mut self, source: Box<dyn FarmDataSource>) {
        match source.load() {
            Ok(farm) => {
                self.status_message = format!("Loaded {}", source.describe());
                self.replace_farm(farm);
                self.source = Some(source);
            }
            Err(e) => {
                tracing::warn!(source = %source.describe(), error = %e, "could not load farm data");
                self.status_message = format!("Error loading: {}", e);
                self.replace_farm(Self::sample_farm(dates::today_in_display_tz()));
            }
        }
    }

    fn remember_dataset(&mut self, path: PathBuf) {
        self.settings.last_dataset = Some(path);
        self.persist_settings();
    }

    fn persist_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = self.settings.save(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not save settings");
        }
    }

    // --- File operations ---

    pub fn open_farm(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Farm data", &["farm.json", "json"])
            .pick_file()
        {
            let source = JsonFileSource::new(path.clone());
            match source.load() {
                Ok(farm) => {
                    self.replace_farm(farm);
                    self.source = Some(Box::new(source));
                    self.remember_dataset(path);
                    self.status_message = "Farm loaded".to_string();
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_farm(&mut self) {
        let Some(source) = &self.source else {
            self.save_farm_as();
            return;
        };
        self.farm.touch();
        match source.save(&self.farm) {
            Ok(()) => self.status_message = "Farm saved".to_string(),
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    pub fn save_farm_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Farm data", &["farm.json", "json"])
            .set_file_name(format!("{}.farm.json", self.farm.name))
            .save_file()
        {
            let source = JsonFileSource::new(path.clone());
            self.farm.touch();
            match source.save(&self.farm) {
                Ok(()) => {
                    self.source = Some(Box::new(source));
                    self.remember_dataset(path);
                    self.status_message = "Farm saved".to_string();
                }
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    /// Adds the tasks of a CSV file to the current farm.
    pub fn import_tasks_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            let known: Vec<Uuid> = self.farm.vegetables.iter().map(|v| v.id).collect();
            match csv_import::import_tasks_csv(&path, &mut self.farm.vegetables) {
                Ok(imported) => {
                    let count = imported.records.len();
                    self.farm.tasks.extend(imported.records);
                    self.farm.touch();
                    // New vegetables start expanded like the rest.
                    for vegetable in self.farm.vegetables.iter().filter(|v| !known.contains(&v.id)) {
                        if !self.expand.is_expanded(vegetable.id) {
                            self.expand.toggle(vegetable.id);
                        }
                    }
                    self.status_message = import_message("tasks", count, imported.skipped);
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    pub fn import_reports_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match csv_import::import_reports_csv(&path, &self.farm.vegetables) {
                Ok(imported) => {
                    let count = imported.records.len();
                    self.farm.work_reports.extend(imported.records);
                    self.farm.touch();
                    self.status_message = import_message("work reports", count, imported.skipped);
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.farm.tasks.is_empty() {
            self.status_message = "Nothing to export, the farm has no tasks".to_string();
            return;
        }
        let default_name = format!("{}.csv", self.farm.name);
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&default_name)
            .save_file()
        {
            match csv_export::export_tasks_csv(&self.farm.tasks, &path) {
                Ok(count) => {
                    self.status_message = format!("Exported {} tasks to CSV", count);
                }
                Err(e) => {
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    pub fn open_settings_folder(&mut self) {
        let Some(dir) = AppSettings::config_dir() else {
            self.status_message = "No settings folder on this platform".to_string();
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|()| open::that(&dir)) {
            tracing::warn!(dir = %dir.display(), error = %e, "could not open settings folder");
            self.status_message = format!("Could not open {}", dir.display());
        }
    }

    // --- View operations ---

    pub fn set_view_unit(&mut self, unit: ViewUnit) {
        if self.view.unit == unit {
            return;
        }
        tracing::info!(unit = unit.label(), "view unit changed");
        self.view.unit = unit;
        self.settings.view_unit = unit;
        self.persist_settings();
    }

    /// Pushes the custom range controls into the view config.
    pub fn apply_range(&mut self) {
        let view = range_view(self.view.unit, self.custom_range, self.range_start, self.range_end);
        if view.range != self.view.range {
            match view.range {
                Some(r) => tracing::info!(start = %r.start, end = %r.end, "date range changed"),
                None => tracing::info!("date range follows tasks"),
            }
            self.view = view;
        }
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        if filter != self.filter {
            tracing::info!(vegetable = ?filter.vegetable, priority = ?filter.priority, "filter changed");
            self.filter = filter;
        }
    }

    pub fn expand_all(&mut self) {
        self.expand.expand_all(self.farm.vegetables.iter().map(|v| v.id));
    }

    pub fn collapse_all(&mut self) {
        self.expand.collapse_all();
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected_task.and_then(|id| self.farm.task(id))
    }
}

fn import_message(what: &str, count: usize, skipped: usize) -> String {
    if skipped > 0 {
        format!("Imported {} {} ({} rows skipped)", count, what, skipped)
    } else {
        format!("Imported {} {}", count, what)
    }
}

impl eframe::App for FarmGanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            self.save_farm();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.selected_task = None;
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        let geometry = layout::compute_geometry(
            &self.farm,
            &self.filter,
            &self.expand,
            &self.view,
            dates::today_in_display_tz(),
        );

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {} · Reports: {} · {}",
                                self.farm.tasks.len(),
                                self.farm.work_reports.len(),
                                self.view.unit.label()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: hierarchical rows
        let mut table_action = ui::task_table::TaskTableAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::TABLE_WIDTH)
            .min_width(200.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                table_action =
                    ui::task_table::show_task_table(&geometry, self.selected_task, &mut self.scroll_y, ui);
            });

        match table_action {
            ui::task_table::TaskTableAction::Select(id) => self.selected_task = Some(id),
            ui::task_table::TaskTableAction::ToggleGroup(id) => self.expand.toggle(id),
            ui::task_table::TaskTableAction::None => {}
        }

        // Central panel: chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let interaction =
                ui::gantt_chart::show_gantt_chart(&geometry, self.selected_task, self.scroll_y, ui);
            self.scroll_y = interaction.scroll_y;
            if let Some(id) = interaction.selected {
                self.selected_task = Some(id);
            } else if interaction.cleared {
                self.selected_task = None;
            }
            if let Some(id) = interaction.toggled {
                self.expand.toggle(id);
            }
        });

        // Dialogs
        if self.selected_task.is_some() {
            ui::dialogs::show_task_details(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}

fn range_view(unit: ViewUnit, custom: bool, start: NaiveDate, end: NaiveDate) -> ViewConfig {
    let view = ViewConfig::new(unit);
    if custom {
        view.with_range(DateRange::new(start, end))
    } else {
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::HierarchicalRow;
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_farm_lays_out_cleanly() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let farm = FarmGanttApp::sample_farm(today);
        let mut expand = ExpandState::default();
        expand.seed(farm.vegetables.iter().map(|v| v.id));

        let geo = layout::compute_geometry(&farm, &TaskFilter::default(), &expand, &ViewConfig::default(), today);

        assert!(geo.skipped.is_empty(), "{:?}", geo.skipped);
        let headers: Vec<&str> = geo
            .rows
            .iter()
            .filter_map(|r| match &r.row {
                HierarchicalRow::Vegetable { vegetable, .. } => Some(vegetable.name.as_str()),
                HierarchicalRow::Task(_) => None,
            })
            .collect();
        assert_eq!(headers, vec!["きゅうり", "トマト", "なす"]);
        assert_eq!(geo.rows.len(), 9);

        let marker_rows: Vec<usize> = geo.markers.iter().map(|m| m.row_index).collect();
        assert_eq!(marker_rows, vec![5, 7, 7]);
        assert!(geo.today.is_some());
    }

    #[test]
    fn range_controls_build_view() {
        let a = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let view = range_view(ViewUnit::Week, true, a, b);
        assert_eq!(view.unit, ViewUnit::Week);
        assert_eq!(view.range, Some(DateRange::new(b, a)));

        let view = range_view(ViewUnit::Month, false, a, b);
        assert_eq!(view, ViewConfig::new(ViewUnit::Month));
    }

    #[test]
    fn import_message_mentions_skipped_rows() {
        assert_eq!(import_message("tasks", 3, 0), "Imported 3 tasks");
        assert_eq!(import_message("tasks", 3, 2), "Imported 3 tasks (2 rows skipped)");
    }
}

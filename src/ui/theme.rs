use egui::{Color32, FontId, Rounding, Stroke, Visuals};

use crate::model::TaskPriority;

// ── Palette ──────────────────────────────────────────────────────────────────

pub const BG_DARK: Color32 = Color32::from_rgb(24, 26, 24);
pub const BG_PANEL: Color32 = Color32::from_rgb(30, 33, 30);
pub const BG_HEADER: Color32 = Color32::from_rgb(36, 41, 36);
pub const BG_GROUP_ROW: Color32 = Color32::from_rgb(38, 46, 38);
pub const BG_WEEKEND: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 5);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(90, 170, 90, 45);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(52, 60, 52);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(120, 190, 110);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 236, 228);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 172, 158);
pub const TEXT_DIM: Color32 = Color32::from_rgb(105, 118, 104);
pub const TEXT_WEEKEND: Color32 = Color32::from_rgb(214, 120, 110);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(255, 255, 255);

pub const ACCENT: Color32 = Color32::from_rgb(96, 168, 88);
pub const TODAY_LINE: Color32 = Color32::from_rgb(240, 75, 75);
pub const GRID_LINE: Color32 = Color32::from_rgb(44, 50, 44);
pub const GROUP_BAR: Color32 = Color32::from_rgba_premultiplied(96, 168, 88, 40);

pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 55);

// ── Sizes ────────────────────────────────────────────────────────────────────

pub use crate::layout::{HEADER_BAND_HEIGHT, HEADER_HEIGHT, ROW_HEIGHT};

pub const BAR_ROUNDING: f32 = 5.0;
pub const BAR_INSET: f32 = 8.0; // vertical inset so bars don't touch row edges
pub const MARKER_RADIUS: f32 = 7.0;
pub const TABLE_WIDTH: f32 = 280.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_header() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.5)
}

pub fn font_bar() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.5)
}

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

// ── Task colours ─────────────────────────────────────────────────────────────

pub const TASK_COLORS: &[Color32] = &[
    Color32::from_rgb(76, 175, 80),   // Leaf green
    Color32::from_rgb(255, 152, 0),   // Carrot orange
    Color32::from_rgb(229, 57, 53),   // Tomato red
    Color32::from_rgb(124, 77, 255),  // Eggplant purple
    Color32::from_rgb(3, 169, 244),   // Sky blue
    Color32::from_rgb(205, 220, 57),  // Lime
    Color32::from_rgb(141, 110, 99),  // Soil brown
    Color32::from_rgb(0, 150, 136),   // Teal
];

/// Colour for a task without an explicit one, stable per palette slot.
pub fn task_color(index: usize) -> Color32 {
    TASK_COLORS[index % TASK_COLORS.len()]
}

pub fn priority_color(priority: TaskPriority) -> Color32 {
    match priority {
        TaskPriority::High => Color32::from_rgb(229, 83, 75),
        TaskPriority::Medium => Color32::from_rgb(230, 180, 60),
        TaskPriority::Low => Color32::from_rgb(120, 160, 210),
    }
}

// ── Apply custom visuals ─────────────────────────────────────────────────────

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();

    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = Color32::from_rgb(20, 22, 20);

    visuals.widgets.noninteractive.bg_fill = BG_PANEL;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(42, 48, 42);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(52, 60, 52);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals.widgets.active.bg_fill = Color32::from_rgb(60, 70, 60);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);
    visuals.widgets.active.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    visuals.window_rounding = Rounding::same(8.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.striped = false;

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    ctx.set_style(style);
}

//! GUI-specific constants for layout, status colors and sizing

use egui;

/// Builder window dimensions
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 860.0;
pub const WINDOW_MIN_WIDTH: f32 = 900.0;
pub const WINDOW_MIN_HEIGHT: f32 = 600.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Width of the form side panel in split preview mode
pub const FORM_PANEL_WIDTH: f32 = 520.0;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 180, 60);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(210, 40, 40);
pub const STATUS_WARNING: egui::Color32 = egui::Color32::from_rgb(200, 160, 0);

//! Form step components
//!
//! Each form reads its slice of the portfolio record, keeps local draft
//! state, and emits a single whole-sequence replacement action (or a
//! personal-info patch) when the user submits. Required-field validation
//! is local: an incomplete submission simply does nothing.

pub mod achievements;
pub mod education;
pub mod experience;
pub mod personal_info;
pub mod projects;
pub mod skills;

use eframe::egui;

/// Labelled single-line text field bound to an immutable source value;
/// invokes `on_change` with the edited text
pub(crate) fn text_field(
    ui: &mut egui::Ui,
    label: &str,
    value: &str,
    mut on_change: impl FnMut(String),
) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut buffer = value.to_string();
        if ui
            .add(egui::TextEdit::singleline(&mut buffer).desired_width(f32::INFINITY))
            .changed()
        {
            on_change(buffer);
        }
    });
}

/// Plain draft text input (the draft owns the string)
pub(crate) fn draft_field(ui: &mut egui::Ui, label: &str, buffer: &mut String) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::TextEdit::singleline(buffer).desired_width(f32::INFINITY));
    });
}

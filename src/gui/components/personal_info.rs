//! Personal information form (step 0)

use eframe::egui;
use tracing::warn;

use super::text_field;
use crate::gui::constants::*;
use crate::model::{PersonalInfo, PersonalInfoPatch};
use crate::preview::encode_data_uri;
use crate::store::Action;

/// Local state for the profile picture loader
pub struct PersonalInfoState {
    picture_path: String,
    picture_error: Option<String>,
}

impl PersonalInfoState {
    pub fn new() -> Self {
        Self {
            picture_path: String::new(),
            picture_error: None,
        }
    }
}

impl Default for PersonalInfoState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn ui(
    ui: &mut egui::Ui,
    info: &PersonalInfo,
    state: &mut PersonalInfoState,
) -> Option<Action> {
    let mut patch = PersonalInfoPatch::default();

    ui.group(|ui| {
        ui.label(egui::RichText::new("Personal Info").strong());
        ui.add_space(ITEM_SPACING);

        text_field(ui, "Full Name:", &info.full_name, |v| {
            patch.full_name = Some(v)
        });
        text_field(ui, "Title:", &info.title, |v| patch.title = Some(v));
        text_field(ui, "Email:", &info.email, |v| patch.email = Some(v));
        text_field(ui, "Phone:", &info.phone, |v| patch.phone = Some(v));
        text_field(ui, "Location:", &info.location, |v| patch.location = Some(v));
        text_field(ui, "LinkedIn:", &info.linkedin, |v| patch.linkedin = Some(v));
        text_field(ui, "GitHub:", &info.github, |v| patch.github = Some(v));

        ui.add_space(ITEM_SPACING);
        ui.label("Summary:");
        let mut summary = info.summary.clone();
        if ui
            .add(
                egui::TextEdit::multiline(&mut summary)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            )
            .changed()
        {
            patch.summary = Some(summary);
        }

        ui.add_space(ITEM_SPACING);
        ui.label("Profile picture (PNG):");
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.picture_path)
                    .hint_text("/path/to/picture.png")
                    .desired_width(260.0),
            );
            if ui.button("Load").clicked() {
                match load_picture(&state.picture_path) {
                    Ok(uri) => {
                        patch.profile_picture = Some(uri);
                        state.picture_error = None;
                    }
                    Err(err) => {
                        warn!(path = %state.picture_path, error = ?err, "Failed to load profile picture");
                        state.picture_error = Some(format!("{err:#}"));
                    }
                }
            }
            if !info.profile_picture.is_empty() && ui.button("Remove").clicked() {
                patch.profile_picture = Some(String::new());
            }
        });
        if let Some(error) = &state.picture_error {
            ui.colored_label(STATUS_ERROR, error);
        } else if !info.profile_picture.is_empty() {
            ui.colored_label(STATUS_OK, "Picture set");
        }
    });

    if patch != PersonalInfoPatch::default() {
        Some(Action::UpdatePersonalInfo(patch))
    } else {
        None
    }
}

fn load_picture(path: &str) -> anyhow::Result<String> {
    let bytes = std::fs::read(path.trim())?;
    encode_data_uri(&bytes)
}

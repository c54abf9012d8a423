//! Experience form (step 2)

use eframe::egui;
use uuid::Uuid;

use super::draft_field;
use crate::gui::constants::*;
use crate::model::Experience;
use crate::store::Action;

#[derive(Default)]
pub struct ExperienceState {
    editing: Option<Uuid>,
    role: String,
    company: String,
    duration: String,
    description: String,
    current: bool,
}

impl ExperienceState {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn load(&mut self, exp: &Experience) {
        self.editing = Some(exp.id);
        self.role = exp.role.clone();
        self.company = exp.company.clone();
        self.duration = exp.duration.clone();
        self.description = exp.description.clone();
        self.current = exp.current;
    }
}

pub fn ui(ui: &mut egui::Ui, experience: &[Experience], state: &mut ExperienceState) -> Option<Action> {
    let mut action = None;

    ui.group(|ui| {
        let heading = if state.editing.is_some() {
            "Edit Experience"
        } else {
            "Add Experience"
        };
        ui.label(egui::RichText::new(heading).strong());
        ui.add_space(ITEM_SPACING);

        draft_field(ui, "Role:", &mut state.role);
        draft_field(ui, "Company:", &mut state.company);
        draft_field(ui, "Duration:", &mut state.duration);
        ui.label("Description:");
        ui.add(
            egui::TextEdit::multiline(&mut state.description)
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
        ui.checkbox(&mut state.current, "Current position");

        ui.horizontal(|ui| {
            let label = if state.editing.is_some() { "Update" } else { "Add" };
            if ui.button(label).clicked() {
                // Required fields: missing means the submission is a no-op
                if !state.role.trim().is_empty() && !state.company.trim().is_empty() {
                    let mut next = experience.to_vec();
                    match state.editing {
                        Some(id) => {
                            if let Some(entry) = next.iter_mut().find(|e| e.id == id) {
                                entry.role = state.role.trim().to_string();
                                entry.company = state.company.trim().to_string();
                                entry.duration = state.duration.trim().to_string();
                                entry.description = state.description.trim().to_string();
                                entry.current = state.current;
                            }
                        }
                        None => next.push(Experience::new(
                            state.role.trim(),
                            state.company.trim(),
                            state.duration.trim(),
                            state.description.trim(),
                            state.current,
                        )),
                    }
                    action = Some(Action::ReplaceExperience(next));
                    state.reset();
                }
            }
            if state.editing.is_some() && ui.button("Cancel").clicked() {
                state.reset();
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    for exp in experience {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&exp.role).strong());
                ui.label(format!("• {}", exp.company));
                if exp.current {
                    ui.colored_label(STATUS_OK, "Current");
                }
            });
            if !exp.duration.is_empty() {
                ui.label(&exp.duration);
            }
            ui.horizontal(|ui| {
                if ui.button("Edit").clicked() {
                    state.load(exp);
                }
                if ui.button("Delete").clicked() {
                    let next: Vec<Experience> = experience
                        .iter()
                        .filter(|e| e.id != exp.id)
                        .cloned()
                        .collect();
                    action = Some(Action::ReplaceExperience(next));
                }
            });
        });
    }

    action
}

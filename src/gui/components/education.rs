//! Education form (step 4)

use eframe::egui;
use uuid::Uuid;

use super::draft_field;
use crate::gui::constants::*;
use crate::model::Education;
use crate::store::Action;

#[derive(Default)]
pub struct EducationState {
    editing: Option<Uuid>,
    degree: String,
    institute: String,
    duration: String,
    description: String,
}

impl EducationState {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn load(&mut self, edu: &Education) {
        self.editing = Some(edu.id);
        self.degree = edu.degree.clone();
        self.institute = edu.institute.clone();
        self.duration = edu.duration.clone();
        self.description = edu.description.clone().unwrap_or_default();
    }

    fn description_value(&self) -> Option<String> {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

pub fn ui(ui: &mut egui::Ui, education: &[Education], state: &mut EducationState) -> Option<Action> {
    let mut action = None;

    ui.group(|ui| {
        let heading = if state.editing.is_some() {
            "Edit Education"
        } else {
            "Add Education"
        };
        ui.label(egui::RichText::new(heading).strong());
        ui.add_space(ITEM_SPACING);

        draft_field(ui, "Degree:", &mut state.degree);
        draft_field(ui, "Institute:", &mut state.institute);
        draft_field(ui, "Duration:", &mut state.duration);
        ui.label("Description (optional):");
        ui.add(
            egui::TextEdit::multiline(&mut state.description)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );

        ui.horizontal(|ui| {
            let label = if state.editing.is_some() { "Update" } else { "Add" };
            if ui.button(label).clicked() {
                if !state.degree.trim().is_empty() && !state.institute.trim().is_empty() {
                    let mut next = education.to_vec();
                    match state.editing {
                        Some(id) => {
                            if let Some(entry) = next.iter_mut().find(|e| e.id == id) {
                                entry.degree = state.degree.trim().to_string();
                                entry.institute = state.institute.trim().to_string();
                                entry.duration = state.duration.trim().to_string();
                                entry.description = state.description_value();
                            }
                        }
                        None => next.push(Education::new(
                            state.degree.trim(),
                            state.institute.trim(),
                            state.duration.trim(),
                            state.description_value(),
                        )),
                    }
                    action = Some(Action::ReplaceEducation(next));
                    state.reset();
                }
            }
            if state.editing.is_some() && ui.button("Cancel").clicked() {
                state.reset();
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    for edu in education {
        ui.group(|ui| {
            ui.label(egui::RichText::new(&edu.degree).strong());
            ui.label(format!("{} • {}", edu.institute, edu.duration));
            ui.horizontal(|ui| {
                if ui.button("Edit").clicked() {
                    state.load(edu);
                }
                if ui.button("Delete").clicked() {
                    let next: Vec<Education> = education
                        .iter()
                        .filter(|e| e.id != edu.id)
                        .cloned()
                        .collect();
                    action = Some(Action::ReplaceEducation(next));
                }
            });
        });
    }

    action
}

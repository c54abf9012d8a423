//! Achievements form (step 5)

use eframe::egui;
use uuid::Uuid;

use super::draft_field;
use crate::gui::constants::*;
use crate::model::Achievement;
use crate::store::Action;

#[derive(Default)]
pub struct AchievementsState {
    editing: Option<Uuid>,
    title: String,
    issuer: String,
    date: String,
    description: String,
}

impl AchievementsState {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn load(&mut self, achievement: &Achievement) {
        self.editing = Some(achievement.id);
        self.title = achievement.title.clone();
        self.issuer = achievement.issuer.clone();
        self.date = achievement.date.clone();
        self.description = achievement.description.clone().unwrap_or_default();
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

pub fn ui(
    ui: &mut egui::Ui,
    achievements: &[Achievement],
    state: &mut AchievementsState,
) -> Option<Action> {
    let mut action = None;

    ui.group(|ui| {
        let heading = if state.editing.is_some() {
            "Edit Achievement"
        } else {
            "Add Achievement"
        };
        ui.label(egui::RichText::new(heading).strong());
        ui.add_space(ITEM_SPACING);

        draft_field(ui, "Title:", &mut state.title);
        draft_field(ui, "Issuer:", &mut state.issuer);
        draft_field(ui, "Date:", &mut state.date);
        ui.label("Description (optional):");
        ui.add(
            egui::TextEdit::multiline(&mut state.description)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );

        ui.horizontal(|ui| {
            let label = if state.editing.is_some() { "Update" } else { "Add" };
            if ui.button(label).clicked() {
                if !state.title.trim().is_empty() && !state.issuer.trim().is_empty() {
                    let mut next = achievements.to_vec();
                    match state.editing {
                        Some(id) => {
                            if let Some(entry) = next.iter_mut().find(|a| a.id == id) {
                                entry.title = state.title.trim().to_string();
                                entry.issuer = state.issuer.trim().to_string();
                                entry.date = state.date.trim().to_string();
                                entry.description = state.description_value();
                            }
                        }
                        None => next.push(Achievement::new(
                            state.title.trim(),
                            state.issuer.trim(),
                            state.date.trim(),
                            state.description_value(),
                        )),
                    }
                    action = Some(Action::ReplaceAchievements(next));
                    state.reset();
                }
            }
            if state.editing.is_some() && ui.button("Cancel").clicked() {
                state.reset();
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    for achievement in achievements {
        ui.group(|ui| {
            ui.label(egui::RichText::new(&achievement.title).strong());
            ui.label(format!("{} • {}", achievement.issuer, achievement.date));
            ui.horizontal(|ui| {
                if ui.button("Edit").clicked() {
                    state.load(achievement);
                }
                if ui.button("Delete").clicked() {
                    let next: Vec<Achievement> = achievements
                        .iter()
                        .filter(|a| a.id != achievement.id)
                        .cloned()
                        .collect();
                    action = Some(Action::ReplaceAchievements(next));
                }
            });
        });
    }

    action
}

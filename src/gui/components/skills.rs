//! Skills form (step 1)

use eframe::egui;

use crate::gui::constants::*;
use crate::model::{Skill, SkillLevel};
use crate::store::Action;

pub struct SkillsState {
    name: String,
    level: SkillLevel,
}

impl SkillsState {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            level: SkillLevel::Intermediate,
        }
    }
}

impl Default for SkillsState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn ui(ui: &mut egui::Ui, skills: &[Skill], state: &mut SkillsState) -> Option<Action> {
    let mut action = None;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Add Skill").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.name)
                    .hint_text("Skill name")
                    .desired_width(220.0),
            );
            level_combo(ui, "new_skill_level", &mut state.level);
            if ui.button("Add").clicked() && !state.name.trim().is_empty() {
                let mut next = skills.to_vec();
                next.push(Skill::new(state.name.trim(), state.level));
                action = Some(Action::ReplaceSkills(next));
                state.name.clear();
                state.level = SkillLevel::Intermediate;
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    for (index, skill) in skills.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(&skill.name);
            let mut level = skill.level;
            level_combo(ui, &format!("skill_level_{}", skill.id), &mut level);
            if level != skill.level {
                let mut next = skills.to_vec();
                next[index].level = level;
                action = Some(Action::ReplaceSkills(next));
            }
            if ui.button("Remove").clicked() {
                let mut next = skills.to_vec();
                next.remove(index);
                action = Some(Action::ReplaceSkills(next));
            }
        });
    }

    action
}

fn level_combo(ui: &mut egui::Ui, id: &str, level: &mut SkillLevel) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(level.label())
        .show_ui(ui, |ui| {
            for candidate in SkillLevel::ALL {
                ui.selectable_value(level, candidate, candidate.label());
            }
        });
}

//! Projects form (step 3)

use eframe::egui;
use uuid::Uuid;

use super::draft_field;
use crate::gui::constants::*;
use crate::model::Project;
use crate::store::Action;

#[derive(Default)]
pub struct ProjectsState {
    editing: Option<Uuid>,
    title: String,
    description: String,
    tech_stack: Vec<String>,
    tech_input: String,
    github_link: String,
    live_link: String,
    featured: bool,
}

impl ProjectsState {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn load(&mut self, project: &Project) {
        self.editing = Some(project.id);
        self.title = project.title.clone();
        self.description = project.description.clone();
        self.tech_stack = project.tech_stack.clone();
        self.tech_input.clear();
        self.github_link = project.github_link.clone();
        self.live_link = project.live_link.clone();
        self.featured = project.featured;
    }

    fn add_tech(&mut self) {
        let tech = self.tech_input.trim().to_string();
        // Case-sensitive exact-match dedup
        if !tech.is_empty() && !self.tech_stack.contains(&tech) {
            self.tech_stack.push(tech);
        }
        self.tech_input.clear();
    }
}

pub fn ui(ui: &mut egui::Ui, projects: &[Project], state: &mut ProjectsState) -> Option<Action> {
    let mut action = None;

    ui.group(|ui| {
        let heading = if state.editing.is_some() {
            "Edit Project"
        } else {
            "Add Project"
        };
        ui.label(egui::RichText::new(heading).strong());
        ui.add_space(ITEM_SPACING);

        draft_field(ui, "Title:", &mut state.title);
        ui.label("Description:");
        ui.add(
            egui::TextEdit::multiline(&mut state.description)
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );

        ui.horizontal(|ui| {
            ui.label("Tech:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.tech_input)
                    .hint_text("e.g. Rust")
                    .desired_width(160.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add tech").clicked() || submitted {
                state.add_tech();
            }
        });
        ui.horizontal_wrapped(|ui| {
            let mut remove = None;
            for (index, tech) in state.tech_stack.iter().enumerate() {
                if ui.small_button(format!("{tech} ✕")).clicked() {
                    remove = Some(index);
                }
            }
            if let Some(index) = remove {
                state.tech_stack.remove(index);
            }
        });

        draft_field(ui, "Source link:", &mut state.github_link);
        draft_field(ui, "Live link:", &mut state.live_link);
        ui.checkbox(&mut state.featured, "Featured project");

        ui.horizontal(|ui| {
            let label = if state.editing.is_some() { "Update" } else { "Add" };
            if ui.button(label).clicked() {
                if !state.title.trim().is_empty() && !state.description.trim().is_empty() {
                    let mut next = projects.to_vec();
                    match state.editing {
                        Some(id) => {
                            if let Some(entry) = next.iter_mut().find(|p| p.id == id) {
                                entry.title = state.title.trim().to_string();
                                entry.description = state.description.trim().to_string();
                                entry.tech_stack = state.tech_stack.clone();
                                entry.github_link = state.github_link.trim().to_string();
                                entry.live_link = state.live_link.trim().to_string();
                                entry.featured = state.featured;
                            }
                        }
                        None => {
                            let mut project =
                                Project::new(state.title.trim(), state.description.trim());
                            for tech in &state.tech_stack {
                                project.add_tech(tech.clone());
                            }
                            project.github_link = state.github_link.trim().to_string();
                            project.live_link = state.live_link.trim().to_string();
                            project.featured = state.featured;
                            next.push(project);
                        }
                    }
                    action = Some(Action::ReplaceProjects(next));
                    state.reset();
                }
            }
            if state.editing.is_some() && ui.button("Cancel").clicked() {
                state.reset();
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    for project in projects {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&project.title).strong());
                if project.featured {
                    ui.colored_label(STATUS_WARNING, "Featured");
                }
            });
            if !project.tech_stack.is_empty() {
                ui.label(project.tech_stack.join(", "));
            }
            ui.horizontal(|ui| {
                // Featured is independently toggleable without a full edit
                let mut featured = project.featured;
                if ui.checkbox(&mut featured, "Featured").changed() {
                    let next: Vec<Project> = projects
                        .iter()
                        .map(|p| {
                            let mut p = p.clone();
                            if p.id == project.id {
                                p.featured = featured;
                            }
                            p
                        })
                        .collect();
                    action = Some(Action::ReplaceProjects(next));
                }
                if ui.button("Edit").clicked() {
                    state.load(project);
                }
                if ui.button("Delete").clicked() {
                    let next: Vec<Project> = projects
                        .iter()
                        .filter(|p| p.id != project.id)
                        .cloned()
                        .collect();
                    action = Some(Action::ReplaceProjects(next));
                }
            });
        });
    }

    action
}

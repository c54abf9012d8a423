//! Portfolio builder GUI implemented with egui/eframe
//!
//! The app owns the state store; forms and header controls dispatch actions
//! into it and the preview texture is re-rendered from the new state.

pub mod components;
pub mod constants;

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{error, info, warn};

use crate::constants::steps;
use crate::export::{ExportResult, default_filename, spawn_export};
use crate::model::{PreviewMode, TemplateKind, Theme};
use crate::preview::TemplateRenderer;
use crate::store::{Action, Store};
use constants::*;

struct StatusMessage {
    text: String,
    color: egui::Color32,
}

/// Per-step local form drafts
#[derive(Default)]
struct Drafts {
    personal: components::personal_info::PersonalInfoState,
    skills: components::skills::SkillsState,
    experience: components::experience::ExperienceState,
    projects: components::projects::ProjectsState,
    education: components::education::EducationState,
    achievements: components::achievements::AchievementsState,
}

pub struct BuilderApp {
    store: Store,
    drafts: Drafts,
    renderer: Option<TemplateRenderer>,
    renderer_error: Option<String>,
    preview_texture: Option<egui::TextureHandle>,
    /// Bumped on every dispatch; preview re-renders when it trails
    revision: u64,
    rendered_revision: Option<u64>,
    /// Busy guard: no second export may start while one is in flight
    export_rx: Option<mpsc::Receiver<ExportResult>>,
    status_message: Option<StatusMessage>,
    confirm_clear: bool,
}

impl BuilderApp {
    fn new(cc: &CreationContext<'_>, mut store: Store) -> Self {
        info!("Initializing builder GUI");

        // Follow the OS color scheme once at startup, but never downgrade
        // an explicitly stored dark preference.
        if matches!(cc.egui_ctx.system_theme(), Some(egui::Theme::Dark))
            && store.state().settings.theme == Theme::Light
        {
            info!("OS prefers dark color scheme, switching theme");
            store.dispatch(Action::SetTheme(Theme::Dark));
        }

        let (renderer, renderer_error) = match TemplateRenderer::from_system_fonts() {
            Ok(renderer) => (Some(renderer), None),
            Err(err) => {
                error!(error = ?err, "Failed to load fonts for the preview renderer");
                (None, Some(format!("{err:#}")))
            }
        };

        Self {
            store,
            drafts: Drafts::default(),
            renderer,
            renderer_error,
            preview_texture: None,
            revision: 0,
            rendered_revision: None,
            export_rx: None,
            status_message: None,
            confirm_clear: false,
        }
    }

    fn dispatch(&mut self, action: Action) {
        self.store.dispatch(action);
        self.revision += 1;
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        if self.rendered_revision == Some(self.revision) {
            return;
        }
        let Some(renderer) = &self.renderer else {
            return;
        };
        let state = self.store.state();
        let bitmap = renderer.render(
            &state.portfolio_data,
            state.settings.selected_template,
            1.0,
        );
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [bitmap.width(), bitmap.height()],
            bitmap.data(),
        );
        self.preview_texture =
            Some(ctx.load_texture("portfolio-preview", image, egui::TextureOptions::LINEAR));
        self.rendered_revision = Some(self.revision);
    }

    fn start_export(&mut self) {
        if self.export_rx.is_some() {
            // UI disables the button, but guard re-entry regardless
            warn!("Export requested while one is already in flight");
            return;
        }
        let state = self.store.state();
        let filename = default_filename(&state.portfolio_data.personal_info.full_name);
        let path = export_dir().join(filename);
        info!(path = %path.display(), "Starting PDF export");
        self.export_rx = Some(spawn_export(
            state.portfolio_data.clone(),
            state.settings.selected_template,
            path,
        ));
        self.status_message = Some(StatusMessage {
            text: "Exporting PDF...".to_string(),
            color: STATUS_WARNING,
        });
    }

    fn poll_export(&mut self) {
        let Some(rx) = &self.export_rx else { return };
        match rx.try_recv() {
            Ok(Ok(path)) => {
                self.export_rx = None;
                self.status_message = Some(StatusMessage {
                    text: format!("Exported to {}", path.display()),
                    color: STATUS_OK,
                });
            }
            Ok(Err(err)) => {
                error!(error = ?err, "PDF export failed");
                self.export_rx = None;
                self.status_message = Some(StatusMessage {
                    text: format!("Export failed: {err:#}"),
                    color: STATUS_ERROR,
                });
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.export_rx = None;
                self.status_message = Some(StatusMessage {
                    text: "Export worker vanished".to_string(),
                    color: STATUS_ERROR,
                });
            }
        }
    }

    fn header_bar(&mut self, ui: &mut egui::Ui) {
        let settings = self.store.state().settings.clone();
        ui.horizontal(|ui| {
            ui.heading("Folio");
            ui.separator();

            let mut template = settings.selected_template;
            egui::ComboBox::from_id_salt("template_picker")
                .selected_text(template.label())
                .show_ui(ui, |ui| {
                    for candidate in TemplateKind::ALL {
                        ui.selectable_value(&mut template, candidate, candidate.label());
                    }
                });
            if template != settings.selected_template {
                self.dispatch(Action::SetTemplate(template));
                self.status_message = Some(StatusMessage {
                    text: format!("Switched to {} template", template.label()),
                    color: STATUS_OK,
                });
            }

            let preview_label = match settings.preview_mode {
                PreviewMode::Split => "Full Preview",
                PreviewMode::Full => "Split View",
            };
            if ui.button(preview_label).clicked() {
                let next = match settings.preview_mode {
                    PreviewMode::Split => PreviewMode::Full,
                    PreviewMode::Full => PreviewMode::Split,
                };
                self.dispatch(Action::SetPreviewMode(next));
            }

            let theme_label = match settings.theme {
                Theme::Light => "Dark",
                Theme::Dark => "Light",
            };
            if ui.button(theme_label).clicked() {
                let next = match settings.theme {
                    Theme::Light => Theme::Dark,
                    Theme::Dark => Theme::Light,
                };
                self.dispatch(Action::SetTheme(next));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Clear").clicked() {
                    self.confirm_clear = true;
                }
                let exporting = self.export_rx.is_some();
                let export_label = if exporting { "Exporting..." } else { "Export PDF" };
                if ui
                    .add_enabled(!exporting, egui::Button::new(export_label))
                    .clicked()
                {
                    self.start_export();
                }
            });
        });

        if let Some(message) = &self.status_message {
            ui.colored_label(message.color, &message.text);
        }
        if let Some(error) = &self.renderer_error {
            ui.colored_label(STATUS_ERROR, format!("Preview unavailable: {error}"));
        }
    }

    fn step_navigation(&mut self, ui: &mut egui::Ui) {
        let current = self.store.state().settings.current_step;

        ui.horizontal_wrapped(|ui| {
            for (index, title) in steps::TITLES.iter().enumerate() {
                if ui.selectable_label(current == index, *title).clicked() {
                    self.dispatch(Action::SetCurrentStep(index));
                }
            }
        });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(current > 0, egui::Button::new("← Previous"))
                .clicked()
            {
                self.dispatch(Action::SetCurrentStep(current - 1));
            }
            ui.label(format!("Step {} of {}", current + 1, steps::COUNT));
            if ui
                .add_enabled(current + 1 < steps::COUNT, egui::Button::new("Next →"))
                .clicked()
            {
                self.dispatch(Action::SetCurrentStep(current + 1));
            }
        });
    }

    fn form_panel(&mut self, ui: &mut egui::Ui) {
        self.step_navigation(ui);
        ui.separator();

        // Snapshot the slices the forms read; actions are dispatched after
        // the UI pass so the store is only borrowed once.
        let data = self.store.state().portfolio_data.clone();
        let step = self.store.state().settings.current_step;

        let action = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match step {
                0 => components::personal_info::ui(ui, &data.personal_info, &mut self.drafts.personal),
                1 => components::skills::ui(ui, &data.skills, &mut self.drafts.skills),
                2 => components::experience::ui(ui, &data.experience, &mut self.drafts.experience),
                3 => components::projects::ui(ui, &data.projects, &mut self.drafts.projects),
                4 => components::education::ui(ui, &data.education, &mut self.drafts.education),
                5 => components::achievements::ui(ui, &data.achievements, &mut self.drafts.achievements),
                // Out-of-range step: no form resolves
                _ => None,
            })
            .inner;

        if let Some(action) = action {
            self.dispatch(action);
        }
    }

    fn preview_panel(&mut self, ui: &mut egui::Ui) {
        match &self.preview_texture {
            Some(texture) => {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        let size = texture.size_vec2();
                        let width = ui.available_width().min(size.x);
                        let scaled = egui::vec2(width, width * size.y / size.x);
                        ui.add(egui::Image::new(texture).fit_to_exact_size(scaled));
                    });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("Preview unavailable");
                });
            }
        }
    }

    fn confirm_clear_dialog(&mut self, ctx: &egui::Context) {
        if !self.confirm_clear {
            return;
        }
        egui::Window::new("Clear all data?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("This removes all portfolio data and the saved session. It cannot be undone.");
                ui.add_space(ITEM_SPACING);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.confirm_clear = false;
                    }
                    if ui
                        .button(egui::RichText::new("Clear everything").color(STATUS_ERROR))
                        .clicked()
                    {
                        self.store.clear_all();
                        self.revision += 1;
                        self.drafts = Drafts::default();
                        self.confirm_clear = false;
                        self.status_message = Some(StatusMessage {
                            text: "All portfolio data has been cleared".to_string(),
                            color: STATUS_WARNING,
                        });
                    }
                });
            });
    }
}

impl eframe::App for BuilderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Reflect the active theme as the global presentation flag
        ctx.set_visuals(match self.store.state().settings.theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        });

        self.poll_export();
        self.refresh_preview(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(ITEM_SPACING);
            self.header_bar(ui);
            ui.add_space(ITEM_SPACING);
        });

        let preview_mode = self.store.state().settings.preview_mode;
        match preview_mode {
            PreviewMode::Split => {
                egui::SidePanel::left("form_panel")
                    .resizable(true)
                    .default_width(FORM_PANEL_WIDTH)
                    .show(ctx, |ui| {
                        self.form_panel(ui);
                    });
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.preview_panel(ui);
                });
            }
            PreviewMode::Full => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.preview_panel(ui);
                });
            }
        }

        self.confirm_clear_dialog(ctx);

        if self.export_rx.is_some() {
            // Keep polling the worker while an export is in flight
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/// Where exported PDFs land: the user's download directory when known
fn export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn run_gui(store: Store) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Folio"),
        ..Default::default()
    };

    eframe::run_native(
        "Folio",
        options,
        Box::new(move |cc| Ok(Box::new(BuilderApp::new(cc, store)))),
    )
    .map_err(|err| anyhow!("Failed to launch builder GUI: {err}"))
}

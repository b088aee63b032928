use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use log::{info, warn};

use crate::config::AppConfig;
use crate::engine::engine::Engine;
use crate::engine::protocol::{
    CredentialStatus, EngineCommand, EngineResponse, Notice, SessionView,
};
use crate::model::message::Role;
use crate::model::phase::GamePhase;
use crate::storage::StoreRef;
use crate::ui::settings::DisplaySettings;
use crate::ui::{center_panel, left_panel, right_panel, screens};

const NOTICE_LIFETIME: Duration = Duration::from_secs(4);
const CUSTOM_FONT: &str = "custom";

#[derive(Default)]
pub struct UiState {
    pub input_text: String,
    pub should_auto_scroll: bool,
    pub show_settings: bool,
    pub show_credential: bool,
    pub credential_input: String,

    /// Prologue lines shown locally. Ticks are queued to the engine, which
    /// may be blocked on the opening request.
    pub prologue_shown: usize,
    pub last_prologue_tick: Option<Instant>,
}

pub struct HudChronicleApp {
    pub ui: UiState,
    pub view: SessionView,
    pub credential: CredentialStatus,
    pub settings: DisplaySettings,
    notices: Vec<(Notice, Instant)>,

    prologue_line_delay: Duration,
    store: StoreRef,
    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl HudChronicleApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, store: StoreRef) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let prologue_line_delay = config.prologue_line_delay;
        let engine_store = store.clone();
        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, config, engine_store);
            engine.run();
        });

        let settings = DisplaySettings::load(store.as_ref());
        install_font(&cc.egui_ctx, &settings);

        Self {
            ui: UiState::default(),
            view: SessionView::default(),
            credential: CredentialStatus::Verifying,
            settings,
            notices: Vec::new(),
            prologue_line_delay,
            store,
            cmd_tx,
            resp_rx,
        }
    }

    pub fn send_command(&self, cmd: EngineCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("engine thread is gone, command dropped");
        }
    }

    fn drain_responses(&mut self) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::View(view) => {
                    if view.messages.len() != self.view.messages.len() {
                        self.ui.should_auto_scroll = true;
                    }
                    self.view = *view;
                }
                EngineResponse::Notices(notices) => {
                    let now = Instant::now();
                    self.notices.extend(notices.into_iter().map(|n| (n, now)));
                }
                EngineResponse::Credential(status) => {
                    match &status {
                        CredentialStatus::Missing | CredentialStatus::Rejected(_) => {
                            self.ui.show_credential = true
                        }
                        CredentialStatus::Accepted => {
                            self.ui.show_credential = false;
                            self.ui.credential_input.clear();
                        }
                        CredentialStatus::Verifying => {}
                    }
                    self.credential = status;
                }
            }
        }
    }

    fn apply_display_settings(&self, ctx: &egui::Context) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        let size = self.settings.text_size;
        ctx.style_mut(|style| {
            style
                .text_styles
                .insert(egui::TextStyle::Body, egui::FontId::proportional(size));
            style
                .text_styles
                .insert(egui::TextStyle::Button, egui::FontId::proportional(size));
            style.text_styles.insert(
                egui::TextStyle::Heading,
                egui::FontId::proportional(size * 1.5),
            );
        });
    }

    /// Drive the prologue reveal from the frame clock.
    fn tick_prologue(&mut self, ctx: &egui::Context) {
        let GamePhase::Prologue { revealed, total, .. } = self.view.phase else {
            self.ui.prologue_shown = 0;
            self.ui.last_prologue_tick = None;
            return;
        };

        self.ui.prologue_shown = self.ui.prologue_shown.max(revealed);
        if self.ui.prologue_shown >= total {
            return;
        }

        let now = Instant::now();
        let last = *self.ui.last_prologue_tick.get_or_insert(now);
        if now.duration_since(last) >= self.prologue_line_delay {
            self.ui.prologue_shown += 1;
            self.ui.last_prologue_tick = Some(now);
            self.send_command(EngineCommand::AdvancePrologue);
        }
        ctx.request_repaint_after(self.prologue_line_delay);
    }

    fn draw_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("HUD Chronicle");
                ui.separator();
                ui.label(self.view.phase.to_string());
                if self.view.busy {
                    ui.spinner();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ 설정").clicked() {
                        self.ui.show_settings = !self.ui.show_settings;
                    }
                    if ui.button("🔑 API 키").clicked() {
                        self.ui.show_credential = !self.ui.show_credential;
                    }
                });
            });
        });
    }

    fn draw_notices(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.notices
            .retain(|(_, shown)| now.duration_since(*shown) < NOTICE_LIFETIME);
        if self.notices.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notices"))
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 48.0])
            .show(ctx, |ui| {
                for (notice, _) in &self.notices {
                    let fill = match notice {
                        Notice::Info(_) => egui::Color32::from_rgb(40, 60, 90),
                        Notice::PerkUnlocked(_) => egui::Color32::from_rgb(120, 90, 20),
                        Notice::Warning(_) => egui::Color32::from_rgb(130, 90, 30),
                        Notice::Error(_) => egui::Color32::from_rgb(140, 40, 40),
                    };
                    egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
                        ui.label(egui::RichText::new(notice.text()).color(egui::Color32::WHITE));
                    });
                    ui.add_space(4.0);
                }
            });

        ctx.request_repaint_after(Duration::from_millis(250));
    }

    fn draw_credential_window(&mut self, ctx: &egui::Context) {
        if !self.ui.show_credential {
            return;
        }

        let mut open = true;
        let mut command = None;
        egui::Window::new("Gemini API 키")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("게임을 진행하려면 Gemini API 키가 필요합니다.");
                ui.add(
                    egui::TextEdit::singleline(&mut self.ui.credential_input)
                        .password(true)
                        .hint_text("API 키"),
                );

                match &self.credential {
                    CredentialStatus::Verifying => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("확인 중…");
                        });
                    }
                    CredentialStatus::Rejected(reason) => {
                        ui.colored_label(egui::Color32::LIGHT_RED, reason);
                    }
                    CredentialStatus::Accepted => {
                        ui.label("저장된 키가 있습니다.");
                    }
                    CredentialStatus::Missing => {}
                }

                let verifying = self.credential == CredentialStatus::Verifying;
                ui.horizontal(|ui| {
                    let can_submit =
                        !verifying && !self.ui.credential_input.trim().is_empty();
                    if ui.add_enabled(can_submit, egui::Button::new("확인")).clicked() {
                        command = Some(EngineCommand::SubmitCredential(
                            self.ui.credential_input.clone(),
                        ));
                    }
                    if ui
                        .add_enabled(!verifying, egui::Button::new("저장된 키 삭제"))
                        .clicked()
                    {
                        command = Some(EngineCommand::ClearCredential);
                    }
                });
            });

        if let Some(cmd) = command {
            self.send_command(cmd);
        }
        if !open {
            self.ui.show_credential = false;
        }
    }

    fn draw_settings_window(&mut self, ctx: &egui::Context) {
        if !self.ui.show_settings {
            return;
        }

        let mut open = true;
        let mut changed = false;
        let mut reload_font = false;

        egui::Window::new("화면 설정").open(&mut open).show(ctx, |ui| {
            ui.label("UI 배율");
            changed |= ui
                .add(egui::Slider::new(&mut self.settings.ui_scale, 0.75..=2.0))
                .changed();

            ui.label("글자 크기");
            changed |= ui
                .add(egui::Slider::new(&mut self.settings.text_size, 10.0..=28.0))
                .changed();

            ui.separator();
            for role in [Role::User, Role::Model, Role::System] {
                ui.horizontal(|ui| {
                    let mut color = self.settings.color(role);
                    if ui.color_edit_button_srgba(&mut color).changed() {
                        self.settings.set_color(role, color);
                        changed = true;
                    }
                    ui.label(role.as_str());
                });
            }

            ui.separator();
            ui.label("글꼴 파일 (TTF/OTF)");
            let mut path = self
                .settings
                .font_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut path);
                if ui.button("적용").clicked() {
                    reload_font = true;
                }
            });
            let path = path.trim();
            self.settings.font_path = (!path.is_empty()).then(|| path.into());
        });

        if reload_font {
            install_font(ctx, &self.settings);
            changed = true;
        }
        if changed || !open {
            self.settings.save(self.store.as_ref());
        }
        if !open {
            self.ui.show_settings = false;
        }
    }
}

impl eframe::App for HudChronicleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_responses();
        self.apply_display_settings(ctx);
        self.tick_prologue(ctx);

        self.draw_top_bar(ctx);
        left_panel::draw_left_panel(ctx, self);

        match self.view.phase {
            GamePhase::Playing => {
                right_panel::draw_right_panel(ctx, self);
                center_panel::draw_center_panel(ctx, self);
            }
            _ => screens::draw_phase_screen(ctx, self),
        }

        self.draw_notices(ctx);
        self.draw_credential_window(ctx);
        self.draw_settings_window(ctx);

        self.ui.should_auto_scroll = false;

        // engine responses arrive between frames
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}

fn install_font(ctx: &egui::Context, settings: &DisplaySettings) {
    let mut fonts = egui::FontDefinitions::default();

    if let Some(path) = &settings.font_path {
        match std::fs::read(path) {
            Ok(bytes) => {
                fonts.font_data.insert(
                    CUSTOM_FONT.to_owned(),
                    Arc::new(egui::FontData::from_owned(bytes)),
                );
                for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                    fonts
                        .families
                        .entry(family)
                        .or_default()
                        .insert(0, CUSTOM_FONT.to_owned());
                }
                info!("using font {}", path.display());
            }
            Err(e) => warn!("could not read font {}: {e}", path.display()),
        }
    }

    ctx.set_fonts(fonts);
}

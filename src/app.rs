//! Desktop demo host: egui/eframe window that plays the input framework.
//!
//! # Architecture
//!
//! [`KeyboardApp`] is the top-level [`eframe::App`].  It owns one
//! [`KeyboardService`] bound to an in-memory [`EditorBuffer`] and drives it
//! the way a platform input framework would:
//!
//! * the "Focus" toggle starts / finishes the input session,
//! * taps on the painted keyboard go through [`KeyboardService::on_tap`],
//! * the Translate button calls [`KeyboardService::on_translate`],
//! * every frame calls [`KeyboardService::poll`] (the UI-thread hand-off),
//! * closing the window calls [`KeyboardService::on_destroy`].
//!
//! Notices are shown under the keyboard until their duration expires.

use std::time::{Duration, Instant};

use eframe::egui;

use crate::config::UiConfig;
use crate::connection::EditorBuffer;
use crate::service::{KeyboardService, Notice};

/// Height of the painted keyboard in points.
const KEYBOARD_HEIGHT: f32 = 200.0;

/// eframe application hosting the keyboard.
pub struct KeyboardApp {
    service: KeyboardService<EditorBuffer>,
    /// Field kept by the host while no input session is active.
    parked_field: Option<EditorBuffer>,
    /// Visible notices with the time they expire.
    notices: Vec<(Notice, Instant)>,
    ui_config: UiConfig,
}

impl KeyboardApp {
    /// Create the app and start an input session on an empty field.
    pub fn new(mut service: KeyboardService<EditorBuffer>, ui_config: UiConfig) -> Self {
        service.on_create_input_view();
        service.on_start_input(EditorBuffer::new(), false);
        Self {
            service,
            parked_field: None,
            notices: Vec::new(),
            ui_config,
        }
    }

    // ── Per-frame bookkeeping ────────────────────────────────────────────

    fn collect_notices(&mut self) {
        let now = Instant::now();
        for notice in self.service.take_notices() {
            let expires = now + notice.length.duration(&self.ui_config);
            self.notices.push((notice, expires));
        }
        self.notices.retain(|(_, expires)| *expires > now);
    }

    fn toggle_focus(&mut self) {
        match self.parked_field.take() {
            Some(field) => self.service.on_start_input(field, false),
            None => self.parked_field = self.service.on_finish_input(),
        }
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_field(&mut self, ui: &mut egui::Ui) {
        let focused = self.service.connection().is_some();

        ui.horizontal(|ui| {
            let label = if focused { "Unfocus field" } else { "Focus field" };
            if ui.button(label).clicked() {
                self.toggle_focus();
            }
            if let Some(field) = self.service.connection_mut() {
                if ui.button("Select all").clicked() {
                    field.select_all();
                }
                if ui.button("Clear selection").clicked() {
                    field.clear_selection();
                }
            }
        });

        let field = self
            .service
            .connection()
            .or(self.parked_field.as_ref());
        let rendered = field.map(render_field).unwrap_or_default();

        egui::Frame::new()
            .fill(if focused {
                egui::Color32::from_rgb(40, 40, 48)
            } else {
                egui::Color32::from_rgb(28, 28, 28)
            })
            .corner_radius(egui::CornerRadius::same(4))
            .inner_margin(egui::Margin::same(6))
            .show(ui, |ui| {
                ui.set_min_height(80.0);
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new(rendered).monospace().size(14.0));
            });
    }

    fn draw_translate_bar(&mut self, ui: &mut egui::Ui) {
        let state = self.service.ui();
        ui.horizontal(|ui| {
            let button = egui::Button::new(format!("Translate → {}", self.service.target_language()));
            if ui.add_enabled(state.translate_enabled, button).clicked() {
                self.service.on_translate();
            }
            if state.progress_visible {
                ui.spinner();
            }
            ui.label(
                egui::RichText::new(self.service.state().label())
                    .color(egui::Color32::from_rgb(150, 150, 150))
                    .size(11.0),
            );
        });
    }

    fn draw_keyboard(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), KEYBOARD_HEIGHT),
            egui::Sense::click(),
        );

        if let Some(view) = self.service.view() {
            let painter = ui.painter();
            let hovered = response.hover_pos();
            for (key, (left, top, width, height)) in view.key_rects() {
                let key_rect = egui::Rect::from_min_size(
                    egui::pos2(
                        rect.left() + left * rect.width(),
                        rect.top() + top * rect.height(),
                    ),
                    egui::vec2(width * rect.width(), height * rect.height()),
                )
                .shrink(2.0);

                let fill = if hovered.is_some_and(|p| key_rect.contains(p)) {
                    egui::Color32::from_rgb(80, 80, 96)
                } else {
                    egui::Color32::from_rgb(56, 56, 64)
                };
                painter.rect_filled(key_rect, 4.0, fill);
                painter.text(
                    key_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    key.label(),
                    egui::FontId::proportional(16.0),
                    egui::Color32::from_rgb(230, 230, 230),
                );
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let x = (pos.x - rect.left()) / rect.width();
                let y = (pos.y - rect.top()) / rect.height();
                if let Some(code) = self.service.on_tap(x, y) {
                    log::debug!("tap ({x:.2}, {y:.2}) → key {}", code.0);
                }
            }
        }
    }

    fn draw_notices(&self, ui: &mut egui::Ui) {
        for (notice, _) in &self.notices {
            ui.label(
                egui::RichText::new(notice.message.as_str())
                    .color(egui::Color32::from_rgb(255, 136, 68))
                    .size(12.0),
            );
        }
    }
}

/// Field text with `|` at the cursor and `[` `]` around the selection.
fn render_field(field: &EditorBuffer) -> String {
    let (sel_start, sel_end) = field.selection().unwrap_or((usize::MAX, usize::MAX));
    let mut out = String::with_capacity(field.text().len() + 2);
    for (i, c) in field.text().chars().enumerate() {
        if i == sel_start {
            out.push('[');
        }
        if i == sel_end {
            out.push(']');
        }
        if i == field.cursor() && field.selection().is_none() {
            out.push('|');
        }
        out.push(c);
    }
    let len = field.text().chars().count();
    if sel_end == len {
        out.push(']');
    }
    if field.cursor() == len && field.selection().is_none() {
        out.push('|');
    }
    out
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for KeyboardApp {
    /// Called every frame by eframe.  Applies finished translations, then
    /// renders the field, translate bar, keyboard and notices.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.service.poll();
        self.collect_notices();

        if self.service.ui().progress_visible || !self.notices.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_field(ui);
            ui.add_space(6.0);
            self.draw_translate_bar(ui);
            ui.separator();
            self.draw_keyboard(ui);
            ui.add_space(4.0);
            self.draw_notices(ui);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.service.on_destroy();
        log::info!("translator keyboard closing");
    }
}

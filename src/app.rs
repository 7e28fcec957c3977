use eframe::egui::{self, Context, RichText};
use std::path::PathBuf;

use crate::context::AppContext;
use crate::credentials::redact;
use crate::models::{ClipboardSnapshot, Operation};
use crate::theme::StyleToken;

pub struct FiledeckApp {
    pub ctx: AppContext,
    pub api_key_input: String,
    pub show_api_key: bool,
    pub path_input: String,
    pub status_message: Option<String>,
}

impl FiledeckApp {
    pub fn new(cc: &eframe::CreationContext<'_>, ctx: AppContext) -> Self {
        ctx.themes.apply_theme(&cc.egui_ctx);
        Self {
            api_key_input: ctx.credentials.get().unwrap_or_default(),
            ctx,
            show_api_key: false,
            path_input: String::new(),
            status_message: None,
        }
    }

    pub fn select_theme(&mut self, egui_ctx: &Context, token: StyleToken) {
        // Fire-and-forget; the in-memory value is already current.
        drop(self.ctx.themes.set_theme(token.id()));
        self.ctx.themes.apply_theme(egui_ctx);
        self.status_message = Some(format!("Theme set to {}", token.id()));
    }

    /// Saves the field with surrounding whitespace trimmed. A blank field
    /// leaves the stored key untouched.
    pub fn save_api_key(&mut self) {
        let key = self.api_key_input.trim().to_string();
        if key.is_empty() {
            self.status_message = Some("Enter an API key first".to_string());
            return;
        }
        drop(self.ctx.credentials.save(&key));
        self.status_message = Some(format!("API key saved ({})", redact(&key)));
    }

    pub fn stage_paths(&mut self, operation: Operation) {
        let paths: Vec<PathBuf> = self
            .path_input
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect();
        if paths.is_empty() {
            return;
        }
        self.ctx.clipboard.set_items(&paths, operation);
        let verb = if operation == Operation::Move { "Cut" } else { "Copied" };
        self.status_message = Some(format!("{} {} items", verb, paths.len()));
        self.path_input.clear();
    }

    /// Hands the pending files to the paste target. Moves are consumed.
    pub fn paste_pending(&mut self) -> ClipboardSnapshot {
        let pending = self.ctx.clipboard.take();
        self.status_message = Some(if pending.has_items() {
            let verb = if pending.operation == Operation::Move { "Moved" } else { "Copied" };
            format!("{} {} items here", verb, pending.files.len())
        } else {
            "Nothing to paste".to_string()
        });
        pending
    }

    fn show_appearance(&mut self, ui: &mut egui::Ui) {
        ui.heading("Appearance");
        let current = self.ctx.themes.current_style();
        ui.horizontal_wrapped(|ui| {
            ui.label("Theme:");
            for token in StyleToken::ALL {
                if ui.selectable_label(current == token, token.label()).clicked() {
                    let egui_ctx = ui.ctx().clone();
                    self.select_theme(&egui_ctx, token);
                }
            }
        });
        let stored = self.ctx.themes.get_theme();
        if stored != current.id() {
            ui.label(RichText::new(format!("Unknown theme \"{}\", showing light", stored)).weak());
        }
    }

    fn show_credentials(&mut self, ui: &mut egui::Ui) {
        ui.heading("API key");
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.api_key_input)
                    .password(!self.show_api_key)
                    .hint_text("Paste your Gemini API key"),
            );
            ui.checkbox(&mut self.show_api_key, "Show");
            if ui.button("💾 Save").clicked() {
                self.save_api_key();
            }
        });
        if self.ctx.credentials.is_set() {
            let stored = self.ctx.credentials.get().unwrap_or_default();
            ui.label(format!("Stored: {}", redact(&stored)));
        } else {
            ui.label(RichText::new("No key stored").weak());
        }
    }

    fn show_clipboard(&mut self, ui: &mut egui::Ui) {
        ui.heading("Pending file operation");
        ui.horizontal(|ui| {
            ui.label("Paths:");
            ui.text_edit_singleline(&mut self.path_input);
            if ui.button("📋 Copy").clicked() {
                self.stage_paths(Operation::Copy);
            }
            if ui.button("✂ Cut").clicked() {
                self.stage_paths(Operation::Move);
            }
            if ui.button("📌 Paste").clicked() {
                self.paste_pending();
            }
        });

        let snapshot = self.ctx.clipboard.snapshot();
        if snapshot.has_items() {
            ui.label(format!("{:?} of {} items:", snapshot.operation, snapshot.files.len()));
            egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                for file in &snapshot.files {
                    ui.monospace(file.display().to_string());
                }
            });
        } else {
            ui.label(RichText::new("Nothing pending").weak());
        }

        if ui.button("🗑 Clear").clicked() {
            self.ctx.clipboard.clear();
            self.status_message = Some("Clipboard cleared".to_string());
        }
    }
}

impl eframe::App for FiledeckApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if let Some(message) = &self.status_message {
                ui.label(message);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_appearance(ui);
            ui.separator();
            self.show_credentials(ui);
            ui.separator();
            self.show_clipboard(ui);
        });
    }
}

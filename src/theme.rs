use std::sync::Arc;

use eframe::egui::{self, Color32};
use serde::{Deserialize, Serialize};

use crate::prefs::{PendingWrite, PreferenceStore};

pub const NAMESPACE: &str = "ThemePrefs";
pub const KEY_SELECTED_THEME: &str = "SelectedTheme";
pub const DEFAULT_THEME: &str = "light";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleToken {
    Light,
    Dark,
    Amoled,
    Nordic,
    Solarized,
}

impl StyleToken {
    pub const ALL: [StyleToken; 5] = [
        StyleToken::Light,
        StyleToken::Dark,
        StyleToken::Amoled,
        StyleToken::Nordic,
        StyleToken::Solarized,
    ];

    /// The identifier stored in preferences.
    pub fn id(self) -> &'static str {
        match self {
            StyleToken::Light => "light",
            StyleToken::Dark => "dark",
            StyleToken::Amoled => "amoled",
            StyleToken::Nordic => "nordic",
            StyleToken::Solarized => "solarized",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StyleToken::Light => "☀ Light",
            StyleToken::Dark => "🌙 Dark",
            StyleToken::Amoled => "⬛ AMOLED",
            StyleToken::Nordic => "❄ Nordic",
            StyleToken::Solarized => "🌅 Solarized",
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            StyleToken::Light => egui::Visuals::light(),
            StyleToken::Dark => egui::Visuals::dark(),
            StyleToken::Amoled => {
                let mut visuals = egui::Visuals::dark();
                visuals.panel_fill = Color32::BLACK;
                visuals.window_fill = Color32::BLACK;
                visuals.extreme_bg_color = Color32::BLACK;
                visuals.faint_bg_color = Color32::from_rgb(12, 12, 12);
                visuals.widgets.noninteractive.bg_fill = Color32::BLACK;
                visuals
            }
            StyleToken::Nordic => {
                let mut visuals = egui::Visuals::dark();
                visuals.panel_fill = Color32::from_rgb(0x2e, 0x34, 0x40);
                visuals.window_fill = Color32::from_rgb(0x3b, 0x42, 0x52);
                visuals.extreme_bg_color = Color32::from_rgb(0x24, 0x29, 0x33);
                visuals.faint_bg_color = Color32::from_rgb(0x43, 0x4c, 0x5e);
                visuals.override_text_color = Some(Color32::from_rgb(0xec, 0xef, 0xf4));
                visuals.selection.bg_fill = Color32::from_rgb(0x5e, 0x81, 0xac);
                visuals.hyperlink_color = Color32::from_rgb(0x88, 0xc0, 0xd0);
                visuals
            }
            StyleToken::Solarized => {
                let mut visuals = egui::Visuals::light();
                visuals.panel_fill = Color32::from_rgb(0xfd, 0xf6, 0xe3);
                visuals.window_fill = Color32::from_rgb(0xee, 0xe8, 0xd5);
                visuals.extreme_bg_color = Color32::from_rgb(0xee, 0xe8, 0xd5);
                visuals.faint_bg_color = Color32::from_rgb(0xf5, 0xef, 0xdc);
                visuals.override_text_color = Some(Color32::from_rgb(0x65, 0x7b, 0x83));
                visuals.selection.bg_fill = Color32::from_rgb(0x26, 0x8b, 0xd2);
                visuals.hyperlink_color = Color32::from_rgb(0x2a, 0xa1, 0x98);
                visuals
            }
        }
    }
}

/// Anything a style can be applied to.
pub trait StyleSurface {
    fn apply_style(&self, token: StyleToken);
}

impl StyleSurface for egui::Context {
    fn apply_style(&self, token: StyleToken) {
        self.set_visuals(token.visuals());
    }
}

/// Total mapping from a stored identifier to a style. Unknown input is light.
pub fn resolve_style(id: &str) -> StyleToken {
    match id {
        "light" => StyleToken::Light,
        "dark" => StyleToken::Dark,
        "amoled" => StyleToken::Amoled,
        "nordic" => StyleToken::Nordic,
        "solarized" => StyleToken::Solarized,
        _ => StyleToken::Light,
    }
}

#[derive(Clone)]
pub struct ThemeStore {
    prefs: Arc<dyn PreferenceStore>,
}

impl ThemeStore {
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        Self { prefs }
    }

    /// Stored as given; unrecognized ids are kept and render as light.
    pub fn set_theme(&self, id: &str) -> PendingWrite {
        tracing::debug!(theme = id, "saving theme");
        self.prefs.put_string(NAMESPACE, KEY_SELECTED_THEME, id)
    }

    pub fn get_theme(&self) -> String {
        self.prefs
            .get_string_or(NAMESPACE, KEY_SELECTED_THEME, DEFAULT_THEME)
    }

    pub fn resolve_style(&self, id: &str) -> StyleToken {
        resolve_style(id)
    }

    pub fn current_style(&self) -> StyleToken {
        resolve_style(&self.get_theme())
    }

    pub fn apply_theme(&self, screen: &dyn StyleSurface) {
        screen.apply_style(self.current_style());
    }
}

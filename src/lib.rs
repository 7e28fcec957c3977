pub mod app;
pub mod clipboard;
pub mod context;
pub mod credentials;
pub mod error;
pub mod models;
pub mod prefs;
pub mod settings;
pub mod theme;

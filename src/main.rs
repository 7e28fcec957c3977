use eframe::{egui, NativeOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use filedeck::app;
use filedeck::context::AppContext;
use filedeck::settings::AppSettings;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

fn main() -> Result<(), eframe::Error> {
    let settings = AppSettings::load();
    init_logging(&settings.log_level);
    tracing::info!(config = %AppSettings::get_config_path().display(), "starting filedeck");

    let ctx = AppContext::from_settings(&settings);
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(egui::Vec2::new(settings.window_width, settings.window_height)),
        ..Default::default()
    };
    eframe::run_native(
        "Filedeck Preferences",
        options,
        Box::new(|cc| Box::new(app::FiledeckApp::new(cc, ctx))),
    )
}

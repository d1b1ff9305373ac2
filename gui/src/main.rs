// GUI main entry point using Dioxus
use dioxus::prelude::*;
use dioxus_desktop::{Config as DesktopConfig, LogicalSize, WindowBuilder};

use gui::app::App;
use gui::config::AppConfig;

fn main() {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting candle viewer (Dioxus Desktop)...");

    let app_config = match AppConfig::load() {
        Ok(cfg) => {
            tracing::info!(
                version = %cfg.version,
                backend = %cfg.backend.base_url,
                "Configuration loaded"
            );
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}. Exiting.", e);
            std::process::exit(1);
        }
    };

    let desktop_config = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title(app_config.app.title.clone())
            .with_inner_size(LogicalSize::new(app_config.app.width, app_config.app.height)),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_config)
        .with_context(app_config)
        .launch(App);

    tracing::info!("Candle viewer finished.");
}

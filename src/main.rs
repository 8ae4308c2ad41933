//! Application entry point: translator keyboard demo host.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the translator ([`GeminiTranslator`]) from config.
//! 5. Build the [`KeyboardService`] (custom layout if configured).
//! 6. Run [`eframe::run_native`], which blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context;
use eframe::egui;
use translator_keyboard::{
    app::KeyboardApp,
    config::AppConfig,
    connection::EditorBuffer,
    keyboard::Layout,
    llm::{GeminiTranslator, Translator},
    service::KeyboardService,
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let vp = egui::ViewportBuilder::default()
        .with_inner_size([width, height])
        .with_min_inner_size([360.0, 320.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("translator keyboard starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime; only the translate task runs on it.
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Translator
    if config.translate.credential().is_none() {
        log::warn!("no API key configured; translations will be a placeholder");
    }
    let translator: Arc<dyn Translator> =
        Arc::new(GeminiTranslator::from_config(&config.translate));

    // 5. Keyboard service; fall back to QWERTY if the custom layout is bad.
    let service: KeyboardService<EditorBuffer> =
        match KeyboardService::from_config(&config, Arc::clone(&translator), rt.handle().clone()) {
            Ok(service) => service,
            Err(e) => {
                log::warn!("Could not load keyboard layout ({e}); using QWERTY");
                KeyboardService::new(
                    Arc::new(Layout::qwerty()),
                    translator,
                    config.translate.target_language.clone(),
                    rt.handle().clone(),
                )
            }
        };

    // 6. Run the window (blocks until closed)
    let app = KeyboardApp::new(service, config.ui.clone());
    eframe::run_native(
        "Translator Keyboard",
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    Ok(())
}

use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use flexistick::config::{default_config_path, AppConfig};
use flexistick::device::{EventPump, GuiDevice};
use flexistick::stick_view::collector::{CollectorHandle, CollectorSettings};
use flexistick::stick_view::tracker::StateTracker;
use flexistick::stick_view::JoystickState;
use flexistick::ui::FlexiStickUI;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Registry};

type LogLevelHandle = reload::Handle<LevelFilter, Registry>;

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = setup()?;

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let config = AppConfig::load_or_default(&config_path)?;
    set_log_level(&log_level, config.logging.level()?)?;
    info!("Using config {}", config_path.display());

    let device = GuiDevice::from_config(&config);
    let cancel = CancellationToken::new();

    let (event_tx, event_rx) = mpsc::channel(1000);
    let pump = EventPump::spawn(
        device.poller(),
        Duration::from_millis(config.device.poll_interval_ms),
        event_tx,
        cancel.clone(),
    );
    let simulated = StateTracker::spawn(
        JoystickState::with_source(device.name()),
        event_rx,
        cancel.clone(),
    );

    let hardware = if config.view.hardware {
        let settings = CollectorSettings {
            joystick_deadzone: config.view.joystick_deadzone,
            ..CollectorSettings::default()
        };
        match CollectorHandle::spawn(settings, cancel.clone()) {
            Ok(handle) => Some(handle.subscribe()),
            Err(e) => {
                error!("Hardware view disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    info!("Starting UI");
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([
            config.canvas.width as f32 + 320.0,
            config.canvas.height.max(420.0) as f32 + 60.0,
        ]),
        ..Default::default()
    };
    let result = eframe::run_native(
        "FlexiStick",
        native_options,
        Box::new(|cc| Ok(Box::new(FlexiStickUI::new(cc, device, simulated, hardware)))),
    );

    info!("UI closed, shutting down");
    cancel.cancel();
    if let Err(e) = pump.await {
        error!("Event pump task failed: {}", e);
    }
    result.map_err(|e| eyre!("UI failed: {}", e))
}

/// Installs error reporting and logging at INFO. The configured level is
/// applied later through the returned handle.
fn setup() -> Result<LogLevelHandle> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    Ok(setup_logging_env())
}

fn setup_logging_env() -> LogLevelHandle {
    let (filter, handle) = reload::Layer::new(LevelFilter::INFO);
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .pretty(),
        )
        .init();
    handle
}

fn set_log_level(handle: &LogLevelHandle, level: Level) -> Result<()> {
    handle
        .modify(|filter| *filter = LevelFilter::from_level(level))
        .map_err(|e| eyre!("Failed to apply log level {}: {}", level, e))
}

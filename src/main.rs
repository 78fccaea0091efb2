use anyhow::Context;
use clap::Parser;
use inputtape::cli::{Cli, CliPrompter};
use inputtape::log::{DeviceClass, LogStore};
use inputtape::session::{Command, SessionController};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inputtape=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn print_banner(device: DeviceClass) {
    match device {
        DeviceClass::Keyboard => println!("⌨️ Keyboard Recorder & Player ready."),
        DeviceClass::Mouse => println!("🖱️ Mouse Recorder & Player ready."),
    }
    println!("  Shift+E → Start/Stop recording");
    println!("  Shift+W → Play recording");
    println!("  Ctrl+Shift+Q → Force quit");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    tracing::info!("starting inputtape v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let device: DeviceClass = cli.device.into();
    let log_dir = cli
        .log_dir
        .unwrap_or_else(|| PathBuf::from(device.default_log_dir()));
    let store = LogStore::new(log_dir, device.log_prefix());

    print_banner(device);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _hook = inputtape::backend::spawn_input_hook(move |raw| {
        // The controller task may already be gone during shutdown
        let _ = tx.send(Command::Raw(raw));
    })
    .context("failed to spawn the input hook thread")?;

    let mut controller = SessionController::new(device, store, Box::new(CliPrompter));
    controller.run(&mut rx).await;

    // The hook thread blocks in the OS listener forever; terminating the
    // process is the only way to take it down.
    std::process::exit(0);
}

/// Interactive 2D sandbox of elastically colliding disks with toggleable
/// gravity/friction and time inversion driven by a bounded snapshot history.
///
/// Rigid-body dynamics are delegated to rapier2d and all windowing, input,
/// and drawing to eframe/egui; this crate is the orchestration around them.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

mod app;
mod config;
mod energy;
mod history;
mod physics;
mod sim;

use config::SimConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Elastic-disk sandbox with time inversion")]
struct Args {
    /// Optional TOML configuration file; built-in defaults are used when absent.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    info!(
        "starting with {} disks, history capacity {}, {}x{} box",
        config.particle_count,
        config.history_capacity,
        config.window_width,
        config.window_height
    );

    // Extra width for the control and graph side panels.
    let viewport = eframe::egui::ViewportBuilder::default()
        .with_inner_size([config.window_width + 480.0, config.window_height + 60.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Elastic Disks",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app::SimApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe exited with an error: {e}"))?;
    Ok(())
}

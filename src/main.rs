#![forbid(unsafe_code)]

mod constants;
mod export;
mod gui;
mod model;
mod persistence;
mod preview;
mod store;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use export::{default_filename, export_portfolio};
use persistence::SnapshotStore;
use preview::TemplateRenderer;
use store::Store;

/// Portfolio/resume builder with live preview and PDF export
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Args {
    /// Export the saved portfolio to a PDF at PATH (a directory or a
    /// .pdf filename) without opening the GUI
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let store = Store::init(SnapshotStore::new());

    match args.export {
        Some(path) => run_headless_export(store, path)?,
        None => gui::run_gui(store)?,
    }
    Ok(())
}

/// Export the persisted portfolio without a GUI session
fn run_headless_export(store: Store, path: PathBuf) -> Result<()> {
    let state = store.state();
    let output = if path.extension().is_some_and(|ext| ext == "pdf") {
        path
    } else {
        path.join(default_filename(
            &state.portfolio_data.personal_info.full_name,
        ))
    };

    let renderer =
        TemplateRenderer::from_system_fonts().context("Cannot render without system fonts")?;
    let layout = export_portfolio(
        &renderer,
        &state.portfolio_data,
        state.settings.selected_template,
        &output,
    )?;
    info!(
        path = %output.display(),
        pages = layout.page_count,
        "Headless export complete"
    );
    println!("{}", output.display());
    Ok(())
}

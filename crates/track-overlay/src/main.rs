mod error;
mod input;
mod overlay;
mod settings;

use clap::Parser;
use settings::Settings;
use std::process::ExitCode;
use track_overlay_lib::kml;

fn main() -> ExitCode {
    setup_logging();

    let settings = Settings::parse();
    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, defaulting to INFO when RUST_LOG is unset
fn setup_logging() {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(fmt_layer).init();
}

fn run(settings: &Settings) -> error::Result<()> {
    let fixes = input::read_fixes(settings)?;
    let document = overlay::build_document(settings, &fixes)?;

    if let Some(extent) = document.bounding_rect() {
        tracing::info!(
            "Overlay extent: lon {:.5}..{:.5}, lat {:.5}..{:.5}",
            extent.min().x,
            extent.max().x,
            extent.min().y,
            extent.max().y
        );
    }

    kml::write_kml_file(&document, &settings.output)?;
    Ok(())
}

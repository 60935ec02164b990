use track_overlay_lib::OverlayError;

/// Errors surfaced by the command line front end
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No usable fixes in input")]
    NoFixes,
}

pub type Result<T> = std::result::Result<T, CliError>;

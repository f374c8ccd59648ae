//! Command-line interface of `dandisets-linkml-status`

mod app;
mod types;

pub use app::StatusApp;
pub use types::{LogLevel, StatusCli, StatusCommand};

/// Main entry point for the CLI
///
/// # Errors
/// Returns error if the command fails.
pub async fn run() -> status_core::Result<()> {
    StatusApp::from_args().run().await
}

//! `dandisets-linkml-status` command-line interface
//!
//! Compares DANDI schemas exported from Pydantic with their `LinkML`
//! translations and reports the discrepancies.

use linkml_status::cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Errors are already reported by the application
    match cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

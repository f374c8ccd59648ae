//! CLI type definitions and enums

use crate::loader::SchemaFormat;
use crate::render::ReportFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Status of the DANDI schema `LinkML` translation
#[derive(Parser, Debug)]
#[command(
    name = "dandisets-linkml-status",
    version,
    about = "Compare Pydantic-derived DANDI schemas with their LinkML translations"
)]
pub struct StatusCli {
    /// Directory receiving report files
    #[arg(short = 'o', long, global = true)]
    pub output_dir_path: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long, global = true, value_enum, default_value_t = LogLevel::Warning)]
    pub log_level: LogLevel,

    /// YAML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: StatusCommand,
}

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Critical failures only
    Critical,
    /// Errors
    Error,
    /// Warnings and errors
    #[default]
    Warning,
    /// Progress information
    Info,
    /// Debugging detail
    Debug,
    /// Everything
    Notset,
}

impl LogLevel {
    /// `tracing` filter directive for this level
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            Self::Critical | Self::Error => "error",
            Self::Warning => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Notset => "trace",
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum StatusCommand {
    /// Compare a source schema with a target schema
    Compare {
        /// Source schema file
        #[arg(short, long)]
        source: PathBuf,
        /// Target schema file
        #[arg(short, long)]
        target: PathBuf,
        /// Format of the source schema
        #[arg(long, value_enum, default_value_t = SchemaFormat::Pydantic)]
        source_format: SchemaFormat,
        /// Format of the target schema
        #[arg(long, value_enum, default_value_t = SchemaFormat::Linkml)]
        target_format: SchemaFormat,
        /// Report format printed to standard output
        #[arg(short = 'f', long, value_enum)]
        format: Option<ReportFormat>,
    },

    /// Compare two sets of Pydantic validation errors
    DiffErrs {
        /// JSON file with the first set of errors
        errs1: PathBuf,
        /// JSON file with the second set of errors
        errs2: PathBuf,
        /// Count errors at different list positions together
        #[arg(long)]
        compress: bool,
    },

    /// Validate the metadata in dandiset manifests against exported JSON Schemas
    Manifests {
        /// Directory containing dandiset manifests
        manifest_path: PathBuf,
        /// JSON Schema of draft dandiset metadata
        #[arg(long)]
        dandiset_schema: PathBuf,
        /// JSON Schema of draft asset metadata
        #[arg(long)]
        asset_schema: PathBuf,
        /// JSON Schema of published dandiset metadata, defaults to the draft one
        #[arg(long)]
        published_dandiset_schema: Option<PathBuf>,
        /// JSON Schema of published asset metadata, defaults to the draft one
        #[arg(long)]
        published_asset_schema: Option<PathBuf>,
    },

    /// Compare two sets of reports on the same manifests
    DiffManifestsReports {
        /// Output directory of the first `manifests` run
        reports_dir1: PathBuf,
        /// Output directory of the second `manifests` run
        reports_dir2: PathBuf,
        /// Count errors at different list positions together
        #[arg(long)]
        compress: bool,
    },
}

//! Status CLI application.

use super::types::{StatusCli, StatusCommand};
use crate::config::StatusConfig;
use crate::compare_schema_files;
use crate::loader::SchemaFormat;
use crate::manifests::{
    ManifestReports, ManifestSchemaPaths, ManifestValidators, manifests_reports_diff_markdown,
    validate_manifests,
};
use crate::output::{
    write_errs_diff, write_manifest_reports, write_manifests_reports_diff, write_status_reports,
};
use crate::render::{ReportFormat, render};
use crate::validation::{errs_diff_markdown, parse_pydantic_errs};
use clap::Parser;
use status_core::prelude::*;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Output directory of `manifests` when none is configured
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

/// Main status CLI application
pub struct StatusApp {
    cli: StatusCli,
}

impl StatusApp {
    /// Create the application from command line arguments
    #[must_use]
    pub fn from_args() -> Self {
        Self::new(StatusCli::parse())
    }

    /// Create the application from parsed arguments
    #[must_use]
    pub fn new(cli: StatusCli) -> Self {
        Self { cli }
    }

    /// Run the application
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the command; it has already been
    /// logged and printed to standard error.
    pub async fn run(self) -> Result<()> {
        self.init_logging();
        debug!("Starting dandisets-linkml-status");

        match self.execute_command().await {
            Ok(()) => Ok(()),
            Err(err) => {
                error!("Command failed: {}", err);
                eprintln!("Error: {err}");
                Err(err)
            }
        }
    }

    /// Log to standard error at the requested level unless `RUST_LOG` is set
    fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.cli.log_level.directive()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    fn load_config(&self) -> Result<StatusConfig> {
        match &self.cli.config {
            Some(path) => StatusConfig::from_file(path),
            None => Ok(StatusConfig::default()),
        }
    }

    /// Output directory from the command line, else from the configuration
    fn output_dir(&self, config: &StatusConfig) -> Option<PathBuf> {
        self.cli
            .output_dir_path
            .clone()
            .or_else(|| config.output.dir.clone())
    }

    async fn execute_command(&self) -> Result<()> {
        let config = self.load_config()?;
        match &self.cli.command {
            StatusCommand::Compare {
                source,
                target,
                source_format,
                target_format,
                format,
            } => {
                let format = format.unwrap_or(config.output.format);
                self.compare_command(
                    &config,
                    (source.as_path(), *source_format),
                    (target.as_path(), *target_format),
                    format,
                )
                .await
            }
            StatusCommand::DiffErrs {
                errs1,
                errs2,
                compress,
            } => self.diff_errs_command(&config, errs1, errs2, *compress).await,
            StatusCommand::Manifests {
                manifest_path,
                dandiset_schema,
                asset_schema,
                published_dandiset_schema,
                published_asset_schema,
            } => {
                let schemas = ManifestSchemaPaths {
                    dandiset: dandiset_schema.clone(),
                    asset: asset_schema.clone(),
                    published_dandiset: published_dandiset_schema.clone(),
                    published_asset: published_asset_schema.clone(),
                };
                self.manifests_command(&config, manifest_path, &schemas).await
            }
            StatusCommand::DiffManifestsReports {
                reports_dir1,
                reports_dir2,
                compress,
            } => {
                self.diff_manifests_reports_command(&config, reports_dir1, reports_dir2, *compress)
                    .await
            }
        }
    }

    async fn compare_command(
        &self,
        config: &StatusConfig,
        source: (&Path, SchemaFormat),
        target: (&Path, SchemaFormat),
        format: ReportFormat,
    ) -> Result<()> {
        let report = compare_schema_files(source, target, config.diff_options()).await?;
        info!(
            "Found {} discrepancies between {} and {}",
            report.summary().total,
            source.0.display(),
            target.0.display()
        );

        let rendered = render(&report, format)?;
        if let Some(dir) = self.output_dir(config) {
            write_status_reports(&dir, &report).await?;
        }

        print!("{rendered}");
        Ok(())
    }

    async fn diff_errs_command(
        &self,
        config: &StatusConfig,
        errs1: &Path,
        errs2: &Path,
        compress: bool,
    ) -> Result<()> {
        let first = read_errs(errs1).await?;
        let second = read_errs(errs2).await?;
        let markdown = errs_diff_markdown(&first, &second, compress);

        if let Some(dir) = self.output_dir(config) {
            write_errs_diff(&dir, &markdown).await?;
        }

        print!("{markdown}");
        Ok(())
    }

    async fn manifests_command(
        &self,
        config: &StatusConfig,
        manifest_path: &Path,
        schemas: &ManifestSchemaPaths,
    ) -> Result<()> {
        let validators = ManifestValidators::from_files(schemas).await?;
        let reports = validate_manifests(manifest_path, &validators).await?;

        let output_dir = self
            .output_dir(config)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let dir = write_manifest_reports(&output_dir, &reports).await?;

        println!(
            "{} dandiset versions and {} assets failed validation; reports in {}",
            reports.dandiset_count(),
            reports.asset_count(),
            dir.display()
        );
        Ok(())
    }

    async fn diff_manifests_reports_command(
        &self,
        config: &StatusConfig,
        reports_dir1: &Path,
        reports_dir2: &Path,
        compress: bool,
    ) -> Result<()> {
        let (first, second) = tokio::try_join!(
            ManifestReports::read(reports_dir1),
            ManifestReports::read(reports_dir2)
        )?;
        let markdown = manifests_reports_diff_markdown(&first, &second, compress);

        if let Some(dir) = self.output_dir(config) {
            write_manifests_reports_diff(&dir, &markdown).await?;
        }

        print!("{markdown}");
        Ok(())
    }
}

async fn read_errs(path: &Path) -> Result<Vec<crate::validation::PydanticValidationErr>> {
    let location = path.display().to_string();
    let content = fs::read_to_string(path).await.map_err(|err| {
        StatusError::parse_at(format!("Failed to read validation errors: {err}"), &location)
    })?;
    parse_pydantic_errs(&content, &location)
}

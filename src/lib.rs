pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod machine;
pub mod provisioner;
pub mod validation;
pub mod variant;

mod serde_helpers;

pub use error::ProvisionerError;

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{FmtSubscriber, filter::LevelFilter};

use crate::catalog::{EnglishCatalog, MessageCatalog};
use crate::validation::Diagnostics;

pub fn init_logging(log_level: cli::LogLevel) -> Result<()> {
    let filter = match log_level {
        cli::LogLevel::Trace => LevelFilter::TRACE,
        cli::LogLevel::Debug => LevelFilter::DEBUG,
        cli::LogLevel::Info => LevelFilter::INFO,
        cli::LogLevel::Warn => LevelFilter::WARN,
        cli::LogLevel::Error => LevelFilter::ERROR,
    };

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(filter).finish(),
    )
    .context("failed to set global default tracing subscriber")
}

/// Loads, finalizes and validates a manifest, returning the merged report.
pub fn check_manifest(path: &camino::Utf8Path) -> Result<Diagnostics> {
    let mut manifest = config::load_manifest(path)
        .with_context(|| format!("failed to load manifest from {}", path))?;
    manifest.finalize();
    let report = manifest.validate().context("provisioner validation failed")?;
    Ok(report)
}

/// Logs every diagnostic in the report using the given catalog.
pub fn log_report(report: &Diagnostics, catalog: &dyn MessageCatalog) {
    for (label, found) in report {
        for diagnostic in found {
            error!("{}: {}", label, catalog.render(diagnostic));
        }
    }
}

pub fn run_validate(opts: &cli::ValidateArgs) -> Result<()> {
    let report = check_manifest(&opts.common.file)?;
    log_report(&report, &EnglishCatalog);

    let total = validation::count(&report);
    if total > 0 {
        return Err(ProvisionerError::Validation(format!(
            "{} diagnostic(s) reported for {}",
            total, opts.common.file
        ))
        .into());
    }

    info!("validation successful: {}", opts.common.file);
    Ok(())
}

pub fn run_finalize(opts: &cli::FinalizeArgs, out: &mut dyn Write) -> Result<()> {
    let mut manifest = config::load_manifest(&opts.common.file)
        .with_context(|| format!("failed to load manifest from {}", opts.common.file))?;
    manifest.finalize();

    let rendered = serde_yaml::to_string(&manifest.provisioners)
        .context("failed to serialize finalized provisioners")?;
    out.write_all(rendered.as_bytes())
        .context("failed to write finalized provisioners")?;
    Ok(())
}

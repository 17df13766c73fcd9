//! # Contactgate Static Export
//!
//! One-shot rendering of the contacts file into a standalone HTML page:
//! ingest the CSV, render every row into a flat table, write the document.
//! No grouping, no authentication, no database.
//!
//! ## Configuration
//!
//! - `CONTACTS_CSV_PATH`: input (default: resources/risultati_moka.csv)
//! - `EXPORT_OUTPUT_PATH`: output (default: docs/contacts.html)
//! - `CONTACTS_CSV_STRICT`: reject malformed rows (default: true)
//!
//! ## Example
//!
//! ```no_run
//! use contactgate_export::{export, ExportConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let summary = export(&ExportConfig::default())?;
//! println!("Wrote {} rows to {}", summary.rows, summary.output_path.display());
//! # Ok(())
//! # }
//! ```

use contactgate_shared::{
    contacts::{ingest, IngestError, ParseMode},
    render::{RenderError, Renderer},
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default input, relative to the working directory
pub const DEFAULT_CSV_PATH: &str = "resources/risultati_moka.csv";

/// Default output, relative to the working directory
pub const DEFAULT_OUTPUT_PATH: &str = "docs/contacts.html";

/// Export settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// CSV file to read
    pub csv_path: PathBuf,

    /// HTML file to write, overwritten if present
    pub output_path: PathBuf,

    /// How malformed rows are handled
    pub parse_mode: ParseMode,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            parse_mode: ParseMode::Strict,
        }
    }
}

impl ExportConfig {
    /// Loads settings from the environment, after a `.env` file if present
    pub fn from_env() -> Result<Self, ExportError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let parse_mode = match var("CONTACTS_CSV_STRICT") {
            Some(raw) => {
                let strict = raw.trim().parse::<bool>().map_err(|_| ExportError::Config {
                    key: "CONTACTS_CSV_STRICT",
                    value: raw.clone(),
                })?;
                ParseMode::from_strict(strict)
            }
            None => defaults.parse_mode,
        };

        Ok(Self {
            csv_path: var("CONTACTS_CSV_PATH").map(PathBuf::from).unwrap_or(defaults.csv_path),
            output_path: var("EXPORT_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            parse_mode,
        })
    }
}

/// What an export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Rows written to the table
    pub rows: usize,

    /// Size of the written document
    pub bytes: usize,

    /// Where the document was written
    pub output_path: PathBuf,
}

/// Error type for the export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A setting has a value that cannot be parsed
    #[error("{key} has an invalid value: {value:?}")]
    Config { key: &'static str, value: String },

    /// The contacts file is missing, unreadable or malformed
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The page could not be rendered
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The output could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs the export described by `config`
///
/// The input is fully read and rendered before the output is touched, so a
/// failed export never leaves a partial page behind.
///
/// # Errors
///
/// `Ingest` if the input cannot be read, `Render` if templating fails and
/// `Write` if the output or its directory cannot be written.
pub fn export(config: &ExportConfig) -> Result<ExportSummary, ExportError> {
    let rows = ingest(&config.csv_path, config.parse_mode)?;
    debug!(path = %config.csv_path.display(), rows = rows.len(), "Read contacts file");

    let html = Renderer::new()?.export_page(&rows)?;
    write_output(&config.output_path, &html)?;

    info!(
        input = %config.csv_path.display(),
        output = %config.output_path.display(),
        rows = rows.len(),
        "Export complete"
    );

    Ok(ExportSummary {
        rows: rows.len(),
        bytes: html.len(),
        output_path: config.output_path.clone(),
    })
}

fn write_output(path: &Path, html: &str) -> Result<(), ExportError> {
    let write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    fs::write(path, html).map_err(write_error)
}

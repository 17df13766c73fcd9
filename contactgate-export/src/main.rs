//! # Contactgate Static Export
//!
//! Renders the contacts file into a standalone HTML page for publishing.
//! No database and no server: read, render, write, exit.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p contactgate-export
//! CONTACTS_CSV_PATH=data/contacts.csv EXPORT_OUTPUT_PATH=site/index.html cargo run -p contactgate-export
//! ```

use anyhow::Context;
use contactgate_export::{export, ExportConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contactgate_export=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ExportConfig::from_env().context("Failed to load configuration")?;
    let summary = export(&config).context("Export failed")?;

    tracing::info!(
        rows = summary.rows,
        bytes = summary.bytes,
        "{} has been generated",
        summary.output_path.display()
    );

    Ok(())
}

//! Export service
//!
//! Runs the whole export: pages come from a [`Paginator`] over any
//! [`MediaSource`], and every record is handed to a [`PostExporter`].
//! Progress is accumulated into an [`ExportSummary`] rather than global state.
//!
//! # Example
//!
//! ```no_run
//! use libigexport::config::Config;
//! use libigexport::service::{run_export, ExportOptions};
//! use libigexport::source::graph::GraphClient;
//! use secrecy::SecretString;
//!
//! # async fn example() -> libigexport::Result<()> {
//! let config = Config::default();
//! let client = GraphClient::new(&config.api)?;
//! let token = SecretString::from("token".to_string());
//! let seed = client.seed_url("17841400000000000", &token)?;
//!
//! let options = ExportOptions::new("content/instagram", config.api.page_delay());
//! let summary = run_export(&client, seed, &options).await;
//! println!("{} posts processed", summary.written);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::ExportError;
use crate::exporter::{local_now, Clock, PostExporter};
use crate::paginator::Paginator;
use crate::source::MediaSource;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub page_delay: Duration,
    pub clock: Clock,
}

impl ExportOptions {
    pub fn new(out_dir: impl Into<PathBuf>, page_delay: Duration) -> Self {
        Self {
            out_dir: out_dir.into(),
            page_delay,
            clock: local_now,
        }
    }
}

/// Outcome of an export run
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Files written successfully
    pub written: usize,
    /// Records whose file could not be written
    pub failed: usize,
    /// Pages fetched successfully
    pub pages: usize,
    pub files: Vec<PathBuf>,
    /// The fetch error that ended pagination early, if any
    pub stopped_by: Option<ExportError>,
}

impl ExportSummary {
    /// True if every page was fetched and every file written
    pub fn is_complete(&self) -> bool {
        self.stopped_by.is_none() && self.failed == 0
    }
}

/// Fetch every page starting at `seed_url` and write one file per record
///
/// Fetch and decode errors stop the run and are reported in
/// `ExportSummary::stopped_by`; files written before that are kept. Write
/// errors are logged and counted in `ExportSummary::failed`.
pub async fn run_export<S: MediaSource + ?Sized>(
    source: &S,
    seed_url: String,
    options: &ExportOptions,
) -> ExportSummary {
    let exporter = PostExporter::new(options.out_dir.clone()).with_clock(options.clock);
    let mut paginator = Paginator::new(source, seed_url, options.page_delay);
    let mut summary = ExportSummary::default();

    while let Some(page) = paginator.next_page().await {
        let page = match page {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, page = paginator.pages_fetched() + 1, "Stopping export");
                summary.stopped_by = Some(e.into());
                break;
            }
        };

        for record in &page.records {
            match exporter.export(record) {
                Ok(path) => {
                    summary.written += 1;
                    summary.files.push(path);
                }
                Err(e) => {
                    warn!(error = %e, raw_id = %record.raw_id, "Skipping post");
                    summary.failed += 1;
                }
            }
        }
    }

    summary.pages = paginator.pages_fetched();
    info!(
        written = summary.written,
        failed = summary.failed,
        pages = summary.pages,
        out_dir = %exporter.out_dir().display(),
        "Export finished"
    );
    summary
}

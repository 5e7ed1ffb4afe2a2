//! Batch loading of evaluated ticket records.
//!
//! A failing record is reported and skipped; it never aborts the batch.

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, error, info};

use crate::fetch::{HttpClient, fetch_bytes};
use crate::model::EvaluatedTicket;
use crate::parser::parse_ticket;

/// Where a single ticket record is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketSource {
    File(PathBuf),
    Url(String),
}

impl fmt::Display for TicketSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketSource::File(path) => write!(f, "{}", path.display()),
            TicketSource::Url(url) => f.write_str(url),
        }
    }
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Turns CLI inputs into concrete sources.
///
/// URLs are kept as is. Existing directories expand to their `*.json` files
/// sorted by name. Other inputs are read as files, unless `base_url` is set
/// and no such path exists, in which case the input is a ticket id fetched
/// from `<base_url>/<id>.json`.
pub fn resolve_sources(inputs: &[String], base_url: Option<&str>) -> Result<Vec<TicketSource>> {
    let mut sources = Vec::new();

    for input in inputs {
        if is_url(input) {
            sources.push(TicketSource::Url(input.clone()));
            continue;
        }

        let path = Path::new(input);
        if path.is_dir() {
            sources.extend(json_files_in(path)?.into_iter().map(TicketSource::File));
        } else if path.exists() {
            sources.push(TicketSource::File(path.to_path_buf()));
        } else if let Some(base) = base_url {
            sources.push(TicketSource::Url(ticket_url(base, input)));
        } else {
            // Reported as a per-record failure at load time.
            sources.push(TicketSource::File(path.to_path_buf()));
        }
    }

    Ok(sources)
}

/// `<base>/<id>.json`, tolerating a trailing slash on `base` and an explicit
/// `.json` suffix on `id`.
pub fn ticket_url(base: &str, id: &str) -> String {
    let base = base.trim_end_matches('/');
    if id.ends_with(".json") {
        format!("{base}/{id}")
    } else {
        format!("{base}/{id}.json")
    }
}

fn json_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Reads and decodes one ticket record.
pub async fn load_ticket<C: HttpClient + ?Sized>(
    client: &C,
    source: &TicketSource,
) -> Result<EvaluatedTicket> {
    let bytes = match source {
        TicketSource::File(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        TicketSource::Url(url) => fetch_bytes(client, url)
            .await
            .with_context(|| format!("failed to fetch {url}"))?,
    };

    parse_ticket(&bytes).with_context(|| format!("failed to decode ticket from {source}"))
}

/// A source that could not be turned into a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub source: String,
    pub error: String,
}

/// Outcome of a batch load: every ticket that loaded, in source order, and
/// every source that did not.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tickets: Vec<EvaluatedTicket>,
    pub failures: Vec<LoadFailure>,
}

/// Loads all `sources` with at most `concurrency` reads in flight.
#[tracing::instrument(skip(client, sources), fields(source_count = sources.len()))]
pub async fn load_tickets(
    client: Arc<dyn HttpClient>,
    sources: Vec<TicketSource>,
    concurrency: usize,
) -> LoadReport {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = Vec::with_capacity(sources.len());

    for source in sources {
        let sem = semaphore.clone();
        let client = client.clone();
        let label = source.to_string();
        let span = tracing::info_span!("load_ticket", source = %label);

        let task = tokio::spawn(
            async move {
                let _permit = match sem.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return Err(anyhow::Error::new(e)),
                };
                load_ticket(client.as_ref(), &source).await
            }
            .instrument(span),
        );

        tasks.push((label, task));
    }

    let mut report = LoadReport::default();

    for (label, task) in tasks {
        let outcome = match task.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::Error::new(e)),
        };

        match outcome {
            Ok(ticket) => {
                debug!(
                    source = %label,
                    ticket_id = %ticket.id,
                    responses = ticket.responses.len(),
                    "Ticket loaded"
                );
                report.tickets.push(ticket);
            }
            Err(e) => {
                let message = format!("{e:#}");
                error!(source = %label, error = %message, "Failed to load ticket");
                report.failures.push(LoadFailure {
                    source: label,
                    error: message,
                });
            }
        }
    }

    info!(
        loaded = report.tickets.len(),
        failed = report.failures.len(),
        "Ticket batch loaded"
    );
    report
}

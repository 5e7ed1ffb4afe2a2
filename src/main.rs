//! CLI entry point for the ticket evaluation dashboard.
//!
//! Loads evaluated ticket records from files, directories or URLs, then
//! prints the aggregate view, a single ticket's chat replay, or a ticket list.

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use ticket_dash::{
    analyzers::aggregate,
    chat::to_chat_view,
    config::DashboardConfig,
    fetch::{ApiKey, BasicClient, HttpClient},
    loader::{LoadReport, load_tickets, resolve_sources},
    model::find_ticket,
    output::{render_chat, render_macro, render_ticket_list, write_agent_csv, write_analysis_json},
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ticket_dash")]
#[command(about = "Dashboard over evaluated support tickets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand that loads tickets.
#[derive(Args)]
struct SourceArgs {
    /// Ticket JSON files, directories of them, URLs, or ticket ids (with --base-url)
    #[arg(value_name = "SOURCE", required = true)]
    sources: Vec<String>,

    /// JSON config file (agent keywords, base URL, concurrency)
    #[arg(short, long)]
    config: Option<String>,

    /// Base URL serving `<id>.json` ticket records
    #[arg(long)]
    base_url: Option<String>,

    /// Extra case-insensitive sender fragment identifying a support agent
    #[arg(long = "agent-keyword", value_name = "KEYWORD")]
    agent_keywords: Vec<String>,

    /// Maximum number of sources loaded at once
    #[arg(long)]
    concurrency: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate all tickets into the macro overview
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Write the full analysis as JSON to this path
        #[arg(long)]
        json: Option<String>,

        /// Write the agent performance table as CSV to this path
        #[arg(long)]
        agents_csv: Option<String>,
    },
    /// Replay one ticket's conversation with agent/requester roles
    Chat {
        #[command(flatten)]
        source: SourceArgs,

        /// Id of the ticket to replay
        #[arg(short, long)]
        ticket: String,

        /// Show criterion verdicts under each evaluated message
        #[arg(short, long, default_value_t = false)]
        details: bool,
    },
    /// List loaded tickets
    List {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            json,
            agents_csv,
        } => {
            let (_, report) = load(&source).await?;
            let analysis = aggregate(report.tickets);

            info!(
                tickets = analysis.total_tickets,
                evaluated = analysis.evaluated_responses(),
                agents = analysis.agent_performance.len(),
                "Aggregation complete"
            );

            render_macro(&mut std::io::stdout().lock(), &analysis)?;

            if let Some(path) = json {
                write_analysis_json(&path, &analysis)?;
            }
            if let Some(path) = agents_csv {
                write_agent_csv(&path, &analysis)?;
            }
        }
        Commands::Chat {
            source,
            ticket,
            details,
        } => {
            let (config, report) = load(&source).await?;

            let found = find_ticket(&report.tickets, &ticket)
                .ok_or_else(|| anyhow!("ticket '{ticket}' not found among loaded tickets"))?;
            let chat = to_chat_view(found, &config.classifier());

            render_chat(&mut std::io::stdout().lock(), &chat, details)?;
        }
        Commands::List { source } => {
            let (_, report) = load(&source).await?;
            render_ticket_list(&mut std::io::stdout().lock(), &report.tickets)?;
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ticket_dash.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ticket_dash.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse::<Directive>()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse::<Directive>()?),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Resolves config and sources, then loads every ticket it can.
async fn load(args: &SourceArgs) -> Result<(DashboardConfig, LoadReport)> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    config.agent_keywords.extend(args.agent_keywords.iter().cloned());
    if let Some(base_url) = &args.base_url {
        config.base_url = Some(base_url.clone());
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency.max(1);
    }

    let sources = resolve_sources(&args.sources, config.base_url.as_deref())?;
    info!(sources = sources.len(), "Loading tickets");

    let client = http_client()?;
    let report = load_tickets(client, sources, config.concurrency).await;

    if !report.failures.is_empty() {
        warn!(
            failed = report.failures.len(),
            "Some tickets could not be loaded and were skipped"
        );
    }

    Ok((config, report))
}

/// Plain client, or one sending `Authorization: Bearer $TICKET_API_TOKEN`.
fn http_client() -> Result<Arc<dyn HttpClient>> {
    let basic = BasicClient::with_timeouts(Duration::from_secs(30), Duration::from_secs(10))?;
    let client: Arc<dyn HttpClient> = match std::env::var("TICKET_API_TOKEN") {
        Ok(token) if !token.is_empty() => Arc::new(ApiKey::bearer(basic, &token)?),
        _ => Arc::new(basic),
    };
    Ok(client)
}

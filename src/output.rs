//! Output formatting and persistence for ticket analyses.
//!
//! Renders the macro (aggregate) and micro (chat replay) views as plain
//! text, and exports the analysis as JSON or the agent table as CSV.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

use crate::analyzers::grade::{SCORE_RANGES, ScoreBand};
use crate::analyzers::types::TicketAnalysis;
use crate::analyzers::utility::parse_timestamp;
use crate::chat::TicketChat;
use crate::model::EvaluatedTicket;

const AGENT_NAME_WIDTH: usize = 20;

/// Formats an ISO timestamp as `15 Jan 2024 14:30` (UTC). Unparseable input
/// is returned unchanged.
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%-d %b %Y %H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// Rounds to the nearest integer, with halves going up (`66.5` -> `67`,
/// `-2.5` -> `-2`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Shortens long agent names to [`AGENT_NAME_WIDTH`] characters plus `...`.
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > AGENT_NAME_WIDTH {
        let short: String = name.chars().take(AGENT_NAME_WIDTH).collect();
        format!("{short}...")
    } else {
        name.to_string()
    }
}

/// Writes the aggregate view: headline figures, score distribution in bucket
/// order and the per-agent table.
pub fn render_macro<W: Write>(out: &mut W, analysis: &TicketAnalysis) -> Result<()> {
    writeln!(
        out,
        "Average score        {}/100",
        round_half_up(analysis.average_score)
    )?;
    writeln!(out, "Total tickets        {}", analysis.total_tickets)?;
    writeln!(
        out,
        "Avg response time    {}h",
        round_half_up(analysis.response_time_analysis.average_response_time)
    )?;
    writeln!(out, "Evaluated responses  {}", analysis.evaluated_responses())?;

    writeln!(out)?;
    writeln!(out, "Score distribution")?;
    for range in SCORE_RANGES {
        if let Some(count) = analysis.score_distribution.get(range) {
            writeln!(out, "  {range:>6}  {count}")?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{:<23}  {:>9}  {:>9}  {}",
        "Agent", "Responses", "Average", "Performance"
    )?;
    for (agent, perf) in &analysis.agent_performance {
        writeln!(
            out,
            "{:<23}  {:>9}  {:>5}/100  {}",
            truncate_name(agent),
            perf.count,
            round_half_up(perf.average_score),
            ScoreBand::from_score(perf.average_score)
        )?;
    }

    Ok(())
}

/// Writes one line per ticket: id, title, message count and creation date.
pub fn render_ticket_list<W: Write>(out: &mut W, tickets: &[EvaluatedTicket]) -> Result<()> {
    for ticket in tickets {
        writeln!(
            out,
            "{}  {}  ({} messages, {})",
            ticket.id,
            ticket.title,
            ticket.responses.len(),
            format_date(&ticket.header.creation_date)
        )?;
    }
    Ok(())
}

/// Writes the chat replay of one ticket. With `details`, each evaluated
/// message also lists its criterion verdicts.
pub fn render_chat<W: Write>(out: &mut W, chat: &TicketChat, details: bool) -> Result<()> {
    let header = &chat.header;
    writeln!(out, "#{} {}", chat.id, chat.title)?;
    writeln!(
        out,
        "Status: {}  Priority: {}  Type: {}  Source: {}",
        header.status,
        header.priority,
        header.ticket_type.as_deref().unwrap_or("-"),
        header.source
    )?;
    writeln!(
        out,
        "Requester: {}  Group: {}  Assignee: {}  Created: {}",
        header.request_by,
        header.group,
        header.assigned_to,
        format_date(&header.creation_date)
    )?;
    writeln!(
        out,
        "Topic: {}  Account: {}  Language: {}  Time spent: {} min",
        chat.details.topic,
        chat.details.account_type,
        chat.details.language,
        chat.details.total_time_spent
    )?;

    for message in &chat.messages {
        writeln!(out)?;
        let role = if message.is_agent { "agent" } else { "requester" };
        write!(
            out,
            "[{}] {} ({}) {}",
            message.id,
            message.sender,
            role,
            format_date(&message.date)
        )?;
        match &message.evaluation {
            Some(evaluation) => writeln!(
                out,
                "  score {}/100 ({})",
                evaluation.score,
                ScoreBand::from_score(evaluation.score)
            )?,
            None => writeln!(out)?,
        }

        for line in message.content.lines() {
            writeln!(out, "    {line}")?;
        }

        if details {
            if let Some(evaluation) = &message.evaluation {
                for verdict in &evaluation.evaluations {
                    writeln!(
                        out,
                        "      - {}: {}",
                        verdict.answer.label(),
                        verdict.justification
                    )?;
                }
            }
        }
    }

    Ok(())
}

/// Writes the full analysis as pretty-printed JSON to `path`.
pub fn write_analysis_json(path: &str, analysis: &TicketAnalysis) -> Result<()> {
    let body = serde_json::to_vec_pretty(analysis)?;
    std::fs::write(path, body).with_context(|| format!("failed to write {path}"))?;
    info!(path, "Analysis written");
    Ok(())
}

#[derive(Debug, Serialize)]
struct AgentRow<'a> {
    agent: &'a str,
    count: usize,
    average_score: f64,
    band: ScoreBand,
}

/// Writes one CSV row per agent, with a header row. Replaces any existing file.
pub fn write_agent_csv(path: &str, analysis: &TicketAnalysis) -> Result<()> {
    debug!(path, agents = analysis.agent_performance.len(), "Writing agent CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {path}"))?;

    for (agent, perf) in &analysis.agent_performance {
        writer.serialize(AgentRow {
            agent,
            count: perf.count,
            average_score: perf.average_score,
            band: ScoreBand::from_score(perf.average_score),
        })?;
    }
    writer.flush()?;

    Ok(())
}

//! Data model for evaluated support tickets.
//!
//! Mirrors the JSON records produced by the evaluation pipeline, one
//! document per ticket.

use serde::{Deserialize, Serialize};

/// Verdict given to a single rubric criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    #[serde(rename = "Oui")]
    Yes,
    #[serde(rename = "Non")]
    No,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Answer {
    pub fn label(&self) -> &'static str {
        match self {
            Answer::Yes => "Oui",
            Answer::No => "Non",
            Answer::NotApplicable => "N/A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketHeader {
    pub creation_date: String,
    pub source: String,
    pub request_by: String,
    pub status: String,
    #[serde(rename = "type")]
    pub ticket_type: Option<String>,
    pub priority: String,
    pub group: String,
    pub assigned_to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDetails {
    /// Minutes spent on the ticket.
    pub total_time_spent: f64,
    pub account_type: String,
    pub topic: String,
    pub language: String,
}

/// One message in a ticket conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketResponse {
    /// Free-text display name, not a normalized identity.
    pub sender: String,
    pub date: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

/// Scoring outcome for one response. `score` is expected in 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub evaluations: Vec<Response>,
    pub score: f64,
}

/// Criterion-level verdict inside an [`Evaluation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub answer: Answer,
    pub justification: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    Full,
    Partial,
    InstantFail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: CriterionKind,
    pub partial_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub full_score: f64,
    #[serde(default)]
    pub partial_scores: Vec<f64>,
    #[serde(default)]
    pub criteria: Vec<Criteria>,
}

/// Scoring rubric attached to a ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// A support ticket with its conversation and per-response scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedTicket {
    pub id: String,
    pub title: String,
    pub header: TicketHeader,
    pub details: TicketDetails,
    #[serde(default)]
    pub responses: Vec<TicketResponse>,
    #[serde(default)]
    pub grid: Grid,
}

/// First ticket in `tickets` whose id is `id`.
pub fn find_ticket<'a>(tickets: &'a [EvaluatedTicket], id: &str) -> Option<&'a EvaluatedTicket> {
    tickets.iter().find(|t| t.id == id)
}

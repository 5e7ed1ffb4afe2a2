//! Data types produced by the aggregation pipeline.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::EvaluatedTicket;

/// Evaluated-response count and mean score for one sender.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformance {
    pub count: usize,
    pub average_score: f64,
}

/// Elapsed time between consecutive messages, in hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeAnalysis {
    pub average_response_time: f64,
    /// Reserved; always emitted empty.
    pub response_time_distribution: BTreeMap<String, usize>,
}

/// Summary of a full batch of evaluated tickets, consumed by the macro view.
///
/// Recomputed wholesale on every [`aggregate`](super::aggregate::aggregate)
/// call; never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAnalysis {
    pub tickets: Vec<EvaluatedTicket>,
    pub total_tickets: usize,
    pub average_score: f64,
    /// Seeded with zero per rubric category of the first ticket, and not
    /// populated further.
    pub category_scores: BTreeMap<String, f64>,
    pub score_distribution: BTreeMap<String, usize>,
    pub agent_performance: BTreeMap<String, AgentPerformance>,
    pub response_time_analysis: ResponseTimeAnalysis,
}

impl TicketAnalysis {
    /// Total evaluated responses across all senders.
    pub fn evaluated_responses(&self) -> usize {
        self.agent_performance.values().map(|p| p.count).sum()
    }
}

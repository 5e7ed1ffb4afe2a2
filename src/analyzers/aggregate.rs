use crate::analyzers::grade::score_range;
use crate::analyzers::types::{AgentPerformance, ResponseTimeAnalysis, TicketAnalysis};
use crate::analyzers::utility::{hours_between, mean};
use crate::model::{EvaluatedTicket, Evaluation, TicketResponse};
use std::collections::BTreeMap;
use tracing::debug;

/// Running (sum, count) pair for one sender. Averages are only taken once the
/// whole batch has been folded.
#[derive(Debug, Default, Clone, Copy)]
struct AgentTally {
    count: usize,
    score_sum: f64,
}

/// Accumulator threaded through the fold over every response of every ticket.
#[derive(Debug, Default)]
struct Accumulator {
    total_score: f64,
    evaluated: usize,
    agents: BTreeMap<String, AgentTally>,
    distribution: BTreeMap<String, usize>,
    response_times: Vec<f64>,
    skipped_time_samples: usize,
}

impl Accumulator {
    fn absorb_ticket(self, ticket: &EvaluatedTicket) -> Self {
        ticket
            .responses
            .iter()
            .enumerate()
            .fold(self, |acc, (index, response)| match &response.evaluation {
                Some(evaluation) => {
                    let previous = index.checked_sub(1).map(|i| &ticket.responses[i]);
                    acc.absorb_evaluated(response, evaluation, previous)
                }
                None => acc,
            })
    }

    fn absorb_evaluated(
        mut self,
        response: &TicketResponse,
        evaluation: &Evaluation,
        previous: Option<&TicketResponse>,
    ) -> Self {
        let score = evaluation.score;
        self.total_score += score;
        self.evaluated += 1;

        let tally = self.agents.entry(response.sender.clone()).or_default();
        tally.count += 1;
        tally.score_sum += score;

        *self
            .distribution
            .entry(score_range(score).to_string())
            .or_default() += 1;

        // Preceding message counts whether or not it was evaluated itself.
        if let Some(previous) = previous {
            match hours_between(&previous.date, &response.date) {
                Some(hours) => self.response_times.push(hours),
                None => self.skipped_time_samples += 1,
            }
        }

        self
    }

    fn finish(self, tickets: Vec<EvaluatedTicket>) -> TicketAnalysis {
        if self.skipped_time_samples > 0 {
            debug!(
                skipped = self.skipped_time_samples,
                "Response-time samples skipped on unparseable dates"
            );
        }

        let average_score = if self.evaluated == 0 {
            0.0
        } else {
            self.total_score / self.evaluated as f64
        };

        let agent_performance = self
            .agents
            .into_iter()
            .map(|(sender, tally)| {
                let perf = AgentPerformance {
                    count: tally.count,
                    average_score: tally.score_sum / tally.count as f64,
                };
                (sender, perf)
            })
            .collect();

        let category_scores = seed_category_scores(&tickets);

        TicketAnalysis {
            total_tickets: tickets.len(),
            tickets,
            average_score,
            category_scores,
            score_distribution: self.distribution,
            agent_performance,
            response_time_analysis: ResponseTimeAnalysis {
                average_response_time: mean(&self.response_times),
                response_time_distribution: BTreeMap::new(),
            },
        }
    }
}

/// One zero entry per category on the first ticket's rubric. Category scores
/// are not otherwise computed.
fn seed_category_scores(tickets: &[EvaluatedTicket]) -> BTreeMap<String, f64> {
    tickets
        .first()
        .map(|t| {
            t.grid
                .categories
                .iter()
                .map(|c| (c.name.clone(), 0.0))
                .collect()
        })
        .unwrap_or_default()
}

/// Reduces a batch of evaluated tickets into a single [`TicketAnalysis`].
///
/// Traverses tickets in order, then responses in order. Only responses
/// carrying an evaluation contribute to the score average, the per-sender
/// performance, the decile distribution and the response-time samples.
/// A response-time sample is the gap in hours between an evaluated, non-first
/// response and the message right before it; samples whose dates cannot be
/// parsed are left out of the average.
///
/// Never fails: an empty batch or tickets without responses yield zeroes.
pub fn aggregate(tickets: Vec<EvaluatedTicket>) -> TicketAnalysis {
    let acc = tickets
        .iter()
        .fold(Accumulator::default(), Accumulator::absorb_ticket);
    acc.finish(tickets)
}

//! Ticket batch aggregation.
//!
//! Folds every evaluated response of a batch into averages, a decile score
//! distribution, per-sender performance and response-time statistics.

pub mod aggregate;
pub mod grade;
pub mod types;
pub mod utility;

pub use aggregate::aggregate;
pub use grade::{ScoreBand, score_range};
pub use types::{AgentPerformance, ResponseTimeAnalysis, TicketAnalysis};

//! JSON decoder for evaluated ticket records.

use anyhow::Result;

use crate::model::EvaluatedTicket;

/// Decodes one JSON-encoded [`EvaluatedTicket`] from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON or miss a required field.
pub fn parse_ticket(bytes: &[u8]) -> Result<EvaluatedTicket> {
    Ok(serde_json::from_slice(bytes)?)
}

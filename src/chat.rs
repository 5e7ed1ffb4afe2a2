//! Chat-replay projection of a single ticket.

use serde::Serialize;

use crate::model::{EvaluatedTicket, Evaluation, TicketDetails, TicketHeader};

/// Sender-name fragments that mark a message as coming from the support side.
pub const DEFAULT_AGENT_KEYWORDS: &[&str] = &["service", "client", "support", "tomcine", "thomas"];

/// Heuristic agent/requester classifier.
///
/// A sender is an agent when its name contains any keyword, compared
/// case-insensitively. Keywords are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleClassifier {
    keywords: Vec<String>,
}

impl RoleClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classifier = Self {
            keywords: Vec::new(),
        };
        classifier.extend(keywords);
        classifier
    }

    /// Adds keywords, skipping blanks and duplicates.
    pub fn extend<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !self.keywords.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_agent(&self, sender: &str) -> bool {
        let sender = sender.to_lowercase();
        self.keywords.iter().any(|k| sender.contains(k.as_str()))
    }
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT_KEYWORDS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// `<ticket id>-<index>`; unique within one ticket.
    pub id: String,
    pub sender: String,
    pub date: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    pub is_agent: bool,
}

/// One ticket reshaped for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketChat {
    pub id: String,
    pub title: String,
    pub header: TicketHeader,
    pub details: TicketDetails,
    pub messages: Vec<ChatMessage>,
}

/// Projects a ticket into its chat view: one message per response, same
/// order, each tagged with a synthetic id and an agent flag.
pub fn to_chat_view(ticket: &EvaluatedTicket, classifier: &RoleClassifier) -> TicketChat {
    let messages = ticket
        .responses
        .iter()
        .enumerate()
        .map(|(index, response)| ChatMessage {
            id: format!("{}-{}", ticket.id, index),
            sender: response.sender.clone(),
            date: response.date.clone(),
            content: response.content.clone(),
            evaluation: response.evaluation.clone(),
            is_agent: classifier.is_agent(&response.sender),
        })
        .collect();

    TicketChat {
        id: ticket.id.clone(),
        title: ticket.title.clone(),
        header: ticket.header.clone(),
        details: ticket.details.clone(),
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, Grid, Response, TicketResponse};

    #[test]
    fn test_default_keywords() {
        let classifier = RoleClassifier::default();

        assert!(classifier.is_agent("Service Client"));
        assert!(classifier.is_agent("Support Bot"));
        assert!(classifier.is_agent("Thomas Martin"));
        assert!(classifier.is_agent("tomcine"));
        assert!(!classifier.is_agent("Jane Doe"));
    }

    #[test]
    fn test_is_agent_case_insensitive() {
        let classifier = RoleClassifier::default();

        assert_eq!(
            classifier.is_agent("SUPPORT-TEAM"),
            classifier.is_agent("support-team")
        );
        assert!(classifier.is_agent("SUPPORT-TEAM"));
    }

    #[test]
    fn test_custom_keywords_replace_defaults() {
        let classifier = RoleClassifier::new(["Helpdesk", "  ", "helpdesk"]);

        assert_eq!(classifier.keywords(), &["helpdesk".to_string()]);
        assert!(classifier.is_agent("ACME HelpDesk"));
        assert!(!classifier.is_agent("Support Bot"));
    }

    #[test]
    fn test_extend_keywords() {
        let mut classifier = RoleClassifier::default();
        classifier.extend(["Alice"]);

        assert!(classifier.is_agent("alice b."));
        assert_eq!(classifier.keywords().len(), DEFAULT_AGENT_KEYWORDS.len() + 1);
    }

    #[test]
    fn test_empty_classifier_marks_nobody() {
        let classifier = RoleClassifier::new(Vec::<String>::new());
        assert!(!classifier.is_agent("Support"));
    }

    #[test]
    fn test_chat_view_preserves_order_and_content() {
        let ticket = create_ticket();
        let chat = to_chat_view(&ticket, &RoleClassifier::default());

        assert_eq!(chat.id, "36925759");
        assert_eq!(chat.title, ticket.title);
        assert_eq!(chat.header, ticket.header);
        assert_eq!(chat.details, ticket.details);
        assert_eq!(chat.messages.len(), ticket.responses.len());
        for (message, response) in chat.messages.iter().zip(&ticket.responses) {
            assert_eq!(message.content, response.content);
            assert_eq!(message.sender, response.sender);
            assert_eq!(message.date, response.date);
            assert_eq!(message.evaluation, response.evaluation);
        }
    }

    #[test]
    fn test_chat_view_ids_and_roles() {
        let chat = to_chat_view(&create_ticket(), &RoleClassifier::default());

        let ids: Vec<_> = chat.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["36925759-0", "36925759-1", "36925759-2"]);

        let roles: Vec<_> = chat.messages.iter().map(|m| m.is_agent).collect();
        assert_eq!(roles, vec![false, true, false]);
    }

    #[test]
    fn test_chat_view_empty_ticket() {
        let mut ticket = create_ticket();
        ticket.responses.clear();

        let chat = to_chat_view(&ticket, &RoleClassifier::default());
        assert!(chat.messages.is_empty());
    }

    #[test]
    fn test_chat_message_serializes_is_agent_camel_case() {
        let chat = to_chat_view(&create_ticket(), &RoleClassifier::default());
        let json = serde_json::to_value(&chat.messages[1]).unwrap();

        assert_eq!(json["isAgent"], true);
        assert_eq!(json["evaluation"]["score"], 85.0);

        let json = serde_json::to_value(&chat.messages[0]).unwrap();
        assert!(json.get("evaluation").is_none());
    }

    // Helper functions for tests
    fn create_ticket() -> EvaluatedTicket {
        EvaluatedTicket {
            id: "36925759".to_string(),
            title: "Invoice missing".to_string(),
            header: TicketHeader {
                creation_date: "2024-01-01T09:00:00Z".to_string(),
                source: "Email".to_string(),
                request_by: "Jane Doe".to_string(),
                status: "Closed".to_string(),
                ticket_type: Some("Request".to_string()),
                priority: "Normal".to_string(),
                group: "Level 1".to_string(),
                assigned_to: "Thomas".to_string(),
            },
            details: TicketDetails {
                total_time_spent: 12.0,
                account_type: "Pro".to_string(),
                topic: "Billing".to_string(),
                language: "fr".to_string(),
            },
            responses: vec![
                TicketResponse {
                    sender: "Jane Doe".to_string(),
                    date: "2024-01-01T09:00:00Z".to_string(),
                    content: "Where is my invoice?".to_string(),
                    evaluation: None,
                },
                TicketResponse {
                    sender: "Service Client".to_string(),
                    date: "2024-01-01T10:00:00Z".to_string(),
                    content: "It has been sent again.".to_string(),
                    evaluation: Some(Evaluation {
                        evaluations: vec![Response {
                            answer: Answer::No,
                            justification: "Polite greeting present".to_string(),
                        }],
                        score: 85.0,
                    }),
                },
                TicketResponse {
                    sender: "Jane Doe".to_string(),
                    date: "2024-01-01T11:00:00Z".to_string(),
                    content: "Thanks".to_string(),
                    evaluation: None,
                },
            ],
            grid: Grid::default(),
        }
    }
}

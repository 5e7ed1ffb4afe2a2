use std::env;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use ticket_dash::analyzers::aggregate;
use ticket_dash::chat::{RoleClassifier, to_chat_view};
use ticket_dash::fetch::BasicClient;
use ticket_dash::loader::{TicketSource, load_tickets, resolve_sources};
use ticket_dash::model::find_ticket;
use ticket_dash::parser::parse_ticket;

const SAMPLE: &[u8] = include_bytes!("fixtures/sample_ticket.json");

#[test]
fn test_full_pipeline() {
    let ticket = parse_ticket(SAMPLE).expect("Failed to parse ticket");
    let analysis = aggregate(vec![ticket]);

    assert_eq!(analysis.total_tickets, 1);
    assert!((analysis.average_score - 78.0).abs() < 1e-10);
    assert_eq!(analysis.evaluated_responses(), 2);
    assert_eq!(analysis.score_distribution["90-100"], 1);
    assert_eq!(analysis.score_distribution["60-69"], 1);
    // 2h then 4h.
    assert!((analysis.response_time_analysis.average_response_time - 3.0).abs() < 1e-10);
    assert_eq!(analysis.category_scores.len(), 2);
    assert_eq!(analysis.category_scores["Politesse"], 0.0);
    assert_eq!(analysis.category_scores["Résolution"], 0.0);

    let chat = to_chat_view(&analysis.tickets[0], &RoleClassifier::default());
    let roles: Vec<_> = chat.messages.iter().map(|m| m.is_agent).collect();
    assert_eq!(roles, vec![false, true, false, true]);
    assert_eq!(chat.messages[3].id, "36925759-3");
}

#[test]
fn test_aggregation_is_order_independent_for_agent_averages() {
    let ticket = parse_ticket(SAMPLE).unwrap();
    let mut other = ticket.clone();
    other.id = "other".to_string();
    other.responses.reverse();

    let forward = aggregate(vec![ticket.clone(), other.clone()]);
    let backward = aggregate(vec![other, ticket]);

    assert_eq!(forward.agent_performance, backward.agent_performance);
    assert_eq!(forward.score_distribution, backward.score_distribution);
}

#[test]
fn test_chat_for_ticket_picked_by_id() {
    let first = parse_ticket(SAMPLE).unwrap();
    let mut second = first.clone();
    second.id = "37238273".to_string();
    second.responses.truncate(1);
    let tickets = vec![first, second];

    let found = find_ticket(&tickets, "37238273").expect("ticket should be found");
    let chat = to_chat_view(found, &RoleClassifier::default());
    assert_eq!(chat.id, "37238273");
    assert_eq!(chat.messages.len(), 1);
    assert_eq!(chat.messages[0].id, "37238273-0");

    assert!(find_ticket(&tickets, "0").is_none());
}

#[tokio::test]
async fn test_load_tickets_skips_failures_and_keeps_order() {
    let dir = env::temp_dir().join("ticket_dash_it_load");
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    let mut second = parse_ticket(SAMPLE).unwrap();
    second.id = "37238273".to_string();
    fs::write(dir.join("a.json"), SAMPLE).unwrap();
    fs::write(dir.join("b.json"), "{ broken").unwrap();
    fs::write(dir.join("c.json"), serde_json::to_vec(&second).unwrap()).unwrap();

    let sources = resolve_sources(&[dir.display().to_string()], None).unwrap();
    assert_eq!(sources.len(), 3);

    let report = load_tickets(Arc::new(BasicClient::new()), sources, 2).await;

    let ids: Vec<_> = report.tickets.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["36925759", "37238273"]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].source.ends_with("b.json"));

    let analysis = aggregate(report.tickets);
    assert_eq!(analysis.total_tickets, 2);

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_load_tickets_unreachable_url_is_a_failure_not_an_abort() {
    let path = env::temp_dir().join("ticket_dash_it_single.json");
    fs::write(&path, SAMPLE).unwrap();

    let client =
        BasicClient::with_timeouts(Duration::from_secs(2), Duration::from_secs(1)).unwrap();
    let sources = vec![
        TicketSource::Url("http://127.0.0.1:1/missing.json".to_string()),
        TicketSource::File(path.clone()),
        TicketSource::File(env::temp_dir().join("ticket_dash_it_absent.json")),
    ];

    let report = load_tickets(Arc::new(client), sources, 4).await;

    assert_eq!(report.tickets.len(), 1);
    assert_eq!(report.failures.len(), 2);

    fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_load_empty_source_list() {
    let report = load_tickets(Arc::new(BasicClient::new()), vec![], 4).await;
    assert!(report.tickets.is_empty());
    assert!(report.failures.is_empty());

    let analysis = aggregate(report.tickets);
    assert_eq!(analysis.total_tickets, 0);
    assert_eq!(analysis.average_score, 0.0);
}

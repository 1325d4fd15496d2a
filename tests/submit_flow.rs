//! Integration tests for sharing a fact: the form's validation gate, the
//! insert round trip, and how the board takes in the created row.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use til::app::{App, FactForm};
use til::categories::{Category, CategoryFilter};
use til::store::{StoreClient, StoreConfig, StoreError};
use til::theme::ThemeVariant;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> StoreClient {
    StoreClient::new(StoreConfig {
        base_url: server.uri(),
        api_key: None,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn filled_form() -> FactForm {
    let mut form = FactForm::new();
    form.text = "Honey never spoils".to_string();
    form.source = "https://example.com/honey".to_string();
    form.category = Some(Category::Science);
    form
}

#[tokio::test]
async fn test_valid_draft_posts_and_lands_on_top_of_the_board() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/facts"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!([{
            "text": "Honey never spoils",
            "source": "https://example.com/honey",
            "category": "science"
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 99,
            "text": "Honey never spoils",
            "source": "https://example.com/honey",
            "category": "science",
            "votesInteresting": 0,
            "votesMindblow": 0,
            "votesFalse": 0,
            "createdIn": 2024
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(client_for(&server));
    let mut app = App::new(Arc::clone(&store), CategoryFilter::All, ThemeVariant::Dark);

    let draft = filled_form().draft().expect("complete draft");
    let created = store.insert_fact(&draft).await.unwrap();

    // The board shows the row the store created, not the local draft
    app.prepend_fact(created);
    assert_eq!(app.facts[0].id, 99);
    assert_eq!(app.facts[0].votes_interesting, 0);
    assert_eq!(app.selected_fact, 0);
}

#[tokio::test]
async fn test_incomplete_drafts_never_produce_a_post() {
    // Each missing or invalid field keeps the draft from materializing,
    // so nothing can reach the network
    let mut no_text = filled_form();
    no_text.text.clear();
    assert!(no_text.draft().is_none());

    let mut bad_source = filled_form();
    bad_source.source = "ftp://example.com/honey".to_string();
    assert!(bad_source.draft().is_none());

    let mut no_category = filled_form();
    no_category.category = None;
    assert!(no_category.draft().is_none());

    let mut too_long = filled_form();
    too_long.text = "x".repeat(201);
    assert!(too_long.draft().is_none());

    // The 200-char boundary itself still posts
    let mut at_limit = filled_form();
    at_limit.text = "x".repeat(200);
    assert!(at_limit.draft().is_some());
}

#[tokio::test]
async fn test_rejected_insert_leaves_board_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/facts"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(client_for(&server));
    let app = App::new(Arc::clone(&store), CategoryFilter::All, ThemeVariant::Dark);

    let draft = filled_form().draft().expect("complete draft");
    let result = store.insert_fact(&draft).await;

    assert!(matches!(result, Err(StoreError::HttpStatus(500))));
    assert!(app.facts.is_empty());
}

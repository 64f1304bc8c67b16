use serde_json::json;
use wikisum::errors::BotError;
use wikisum::wiki::{ArticleSource, WikiClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> WikiClient {
    WikiClient::new(format!("{}/w/api.php", server.uri())).unwrap()
}

#[tokio::test]
async fn test_search_returns_titles_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .and(query_param("srsearch", "turing award"))
        .and(query_param("srlimit", "1"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"search": [{"ns": 0, "title": "Turing Award", "pageid": 30906}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let titles = client.search("turing award", 1).await.unwrap();

    assert_eq!(titles, vec!["Turing Award".to_string()]);
}

#[tokio::test]
async fn test_search_without_hits_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"searchinfo": {"totalhits": 0}, "search": []}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(client.search("zzznotreal", 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_server_error_is_resolution_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.search("turing award", 1).await.unwrap_err();
    assert!(matches!(err, BotError::ResolutionError(_)), "{err:?}");
}

#[tokio::test]
async fn test_fetch_content_returns_extract() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "extracts"))
        .and(query_param("explaintext", "1"))
        .and(query_param("titles", "Turing Award"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"pages": [{
                "pageid": 30906,
                "ns": 0,
                "title": "Turing Award",
                "extract": "The ACM A. M. Turing Award is an annual prize."
            }]}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let text = client.fetch_content("Turing Award").await.unwrap();
    assert_eq!(text, "The ACM A. M. Turing Award is an annual prize.");
}

#[tokio::test]
async fn test_fetch_missing_page_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "extracts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {"pages": [{"ns": 0, "title": "Nope", "missing": true}]}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.fetch_content("Nope").await {
        Err(BotError::FetchError(msg)) => assert!(msg.contains("does not exist")),
        other => panic!("Expected FetchError, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_api_error_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "maxlag", "info": "Waiting for a database server"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.fetch_content("Turing Award").await {
        Err(BotError::FetchError(msg)) => assert!(msg.contains("maxlag")),
        other => panic!("Expected FetchError, got: {other:?}"),
    }
}

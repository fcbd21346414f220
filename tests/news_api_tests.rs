use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newsdesk::config::Config;
use newsdesk::news_api::{NewsApiError, NewsClient};

mod test_helpers {
    use super::*;

    pub const API_KEY: &str = "test-key";

    pub fn client_for(server: &MockServer) -> NewsClient {
        NewsClient::new(&Config::for_upstream(&server.uri(), API_KEY))
    }

    pub fn articles(count: usize) -> Vec<serde_json::Value> {
        (0..count)
            .map(|i| {
                json!({
                    "source": {"id": null, "name": "Example Times"},
                    "author": format!("Author {i}"),
                    "title": format!("Story {i}"),
                    "description": "A story",
                    "url": format!("https://example.com/{i}"),
                    "urlToImage": null,
                    "publishedAt": "2024-01-03T10:00:00Z",
                    "content": "Body"
                })
            })
            .collect()
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_everything_sends_expected_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("q", "rust & go"))
        .and(query_param("pageSize", "20"))
        .and(query_param("page", "3"))
        .and(query_param("sortBy", "publishedAt"))
        .and(query_param("language", "en"))
        .and(header("X-Api-Key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 47,
            "articles": articles(3)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server).everything("rust & go", 20, 3).await.unwrap();
    assert_eq!(results.status, "ok");
    assert_eq!(results.total_results, 47);
    assert_eq!(results.articles.len(), 3);
    assert_eq!(results.articles[2].title, "Story 2");
}

#[tokio::test]
async fn test_api_key_stays_out_of_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 0,
            "articles": []
        })))
        .mount(&server)
        .await;

    client_for(&server).everything("rust", 20, 1).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.as_str().contains(API_KEY));
}

#[tokio::test]
async fn test_top_headlines_uses_fixed_source() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("sources", "bbc-news"))
        .and(header("X-Api-Key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 10,
            "articles": articles(10)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server).top_headlines().await.unwrap();
    assert_eq!(results.total_results, 10);
    assert_eq!(results.articles.len(), 10);
}

#[tokio::test]
async fn test_non_200_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "status": "error",
            "code": "rateLimited",
            "message": "Too many requests"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).top_headlines().await.unwrap_err();
    match err {
        NewsApiError::Status(status) => assert_eq!(status.as_u16(), 429),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).everything("rust", 20, 1).await.unwrap_err();
    assert!(matches!(err, NewsApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error() {
    // Port 1 is reserved and nothing listens on it locally.
    let client = NewsClient::new(&Config::for_upstream("http://127.0.0.1:1", API_KEY));

    let err = client.top_headlines().await.unwrap_err();
    assert!(matches!(err, NewsApiError::Transport(_)));
}

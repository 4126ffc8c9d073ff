//! Tests for client module

#[cfg(test)]
mod tests {
    use crate::client::http::extract_detail;
    use crate::client::{ApiClient, MockApi, SentimentApi};
    use crate::config::ApiConfig;
    use crate::error::ClientError;
    use crate::types::Sentiment;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn build_client(url: String) -> ApiClient {
        ApiClient::with_timeout(&url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = ApiClient::new("/").err().unwrap();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_from_config() {
        let client = ApiClient::from_config(&ApiConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_extract_detail_string() {
        assert_eq!(
            extract_detail(r#"{"detail":"Câu quá ngắn!"}"#).as_deref(),
            Some("Câu quá ngắn!")
        );
    }

    #[test]
    fn test_extract_detail_validation_items() {
        let body = r#"{"detail":[
            {"loc":["body","text"],"msg":"field required","type":"value_error.missing"},
            {"loc":["query","limit"],"msg":"ensure this value is less than or equal to 200"}
        ]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; ensure this value is less than or equal to 200")
        );
    }

    #[test]
    fn test_extract_detail_missing_or_garbage() {
        assert_eq!(extract_detail(r#"{"error":"boom"}"#), None);
        assert_eq!(extract_detail(r#"{"detail":""}"#), None);
        assert_eq!(extract_detail("<html>502 Bad Gateway</html>"), None);
    }

    #[tokio::test]
    async fn test_classify_posts_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/sentiment")
            .match_body(Matcher::Json(json!({"text": "Hôm nay tôi rất vui"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "text": "Hôm nay tôi rất vui",
                    "sentiment": "POSITIVE",
                    "confidence": 0.97,
                    "created_at": "2024-01-01T00:00:00Z"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = build_client(server.url());
        let result = client.classify("Hôm nay tôi rất vui").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.confidence, 0.97);
        assert_eq!(result.id, None);
    }

    #[tokio::test]
    async fn test_classify_rejection_carries_detail() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/sentiment")
            .with_status(400)
            .with_body(r#"{"detail":"Câu quá ngắn! Hãy nhập tối thiểu 4 ký tự."}"#)
            .create_async()
            .await;

        let client = build_client(server.url());
        let err = client.classify("abcd").await.unwrap_err();

        match &err {
            ClientError::Rejected { status, detail } => {
                assert_eq!(*status, 400);
                assert_eq!(detail.as_deref(), Some("Câu quá ngắn! Hãy nhập tối thiểu 4 ký tự."));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.user_message(), "Câu quá ngắn! Hãy nhập tối thiểu 4 ký tự.");
    }

    #[tokio::test]
    async fn test_classify_server_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/sentiment")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let client = build_client(server.url());
        let err = client.classify("câu thử nghiệm").await.unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 500, detail: None }));
    }

    #[tokio::test]
    async fn test_classify_bad_body_is_json_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/sentiment")
            .with_status(200)
            .with_body(r#"{"text":"x","sentiment":"HAPPY","confidence":1,"created_at":"now"}"#)
            .create_async()
            .await;

        let client = build_client(server.url());
        let err = client.classify("câu thử nghiệm").await.unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
    }

    #[tokio::test]
    async fn test_fetch_history_sends_limit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/history")
            .match_query(Matcher::UrlEncoded("limit".into(), "20".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {"id": 2, "text": "Tôi buồn", "sentiment": "NEGATIVE", "confidence": 0.8, "created_at": "2024-01-02T00:00:00"},
                    {"id": 1, "text": "Bình thường", "sentiment": "NEUTRAL", "confidence": 0.6, "created_at": "2024-01-01T00:00:00"}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let client = build_client(server.url());
        let history = client.fetch_history(20).await.unwrap();

        mock.assert_async().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, Some(2));
        assert_eq!(history[1].sentiment, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_fetch_history_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/history")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = build_client(server.url());
        assert!(client.fetch_history(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/health")
            .with_status(200)
            .with_body(r#"{"status":"ok","timestamp":"2024-01-01T00:00:00+00:00"}"#)
            .create_async()
            .await;

        let client = build_client(server.url());
        assert!(client.health().await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = build_client("http://127.0.0.1:1".to_string());
        let err = client.fetch_history(20).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert_eq!(err.user_message(), crate::error::FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_mock_api_stores_classifications() {
        let api = MockApi::new();
        let first = api.classify("Hôm nay tôi rất vui").await.unwrap();
        api.classify("Tôi ghét trời mưa").await.unwrap();

        assert_eq!(first.sentiment, Sentiment::Positive);
        assert_eq!(first.id, None);

        let history = api.fetch_history(1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "Tôi ghét trời mưa");
        assert_eq!(history[0].sentiment, Sentiment::Negative);
        assert_eq!(history[0].id, Some(2));
        assert_eq!(api.classify_calls(), 2);
        assert_eq!(api.history_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_api_queued_failures() {
        let api = MockApi::new();
        api.fail_next_classify(ClientError::Server { status: 503, detail: None });

        assert!(api.classify("câu đầu tiên").await.is_err());
        assert!(api.classify("câu thứ hai").await.is_ok());
    }
}

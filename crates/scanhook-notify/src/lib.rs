mod client;

pub use client::{NotifyError, WebhookClient};

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use scanhook_types::TRIGGER_NAME;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn authority(server: &MockServer) -> String {
        server.address().to_string()
    }

    fn client(server: &MockServer, token: Option<&str>) -> WebhookClient {
        WebhookClient::new(
            &authority(server),
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_url_shape() {
        let client = WebhookClient::new("127.0.0.1:9450", None, Duration::from_secs(1)).unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:9450/webhook");
    }

    #[tokio::test]
    async fn test_posts_payload_with_raw_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .and(header("content-type", "application/json"))
            .and(header("authorization", "s3cret"))
            .and(body_json(json!({
                "trigger": "SAMMI OCR",
                "value": "Hello, world"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server, Some("s3cret"))
            .send("Hello, world")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_no_authorization_or_expect_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        client(&server, Some("")).send("text").await.unwrap();
        client(&server, None).send("text").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        for request in requests {
            assert!(request.headers.get("authorization").is_none());
            assert!(request.headers.get("expect").is_none());
        }
    }

    #[tokio::test]
    async fn test_special_characters_are_escaped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let text = "line one\nline \"two\"\t\\ 日本語 {\"a\":1}";
        client(&server, None).send(text).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body, json!({ "trigger": TRIGGER_NAME, "value": text }));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad password"))
            .mount(&server)
            .await;

        let err = client(&server, Some("wrong")).send("text").await.unwrap_err();
        match err {
            NotifyError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "bad password");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = WebhookClient::new(
            &format!("127.0.0.1:{port}"),
            None,
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.send("text").await.unwrap_err();
        assert!(matches!(err, NotifyError::Request { .. }));
    }
}

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use scanhook_types::WebhookPayload;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to send webhook to {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("webhook {url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
}

/// Posts recognized text to the automation tool's webhook
#[derive(Clone)]
pub struct WebhookClient {
    url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl WebhookClient {
    /// `authority` is `host:port`; requests go to `http://<authority>/webhook`
    pub fn new(
        authority: &str,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        // reqwest never sends `Expect: 100-continue`, which the receiver rejects
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(NotifyError::Client)?;

        Ok(Self {
            url: format!("http://{}/webhook", authority),
            auth_token: auth_token.filter(|token| !token.is_empty()),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Deliver `text` as a single webhook event
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let payload = WebhookPayload::new(text);

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(token) = &self.auth_token {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await.map_err(|source| NotifyError::Request {
            url: self.url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                url: self.url.clone(),
                status,
                body,
            });
        }

        tracing::debug!("Webhook {} answered {}", self.url, status);
        Ok(())
    }
}

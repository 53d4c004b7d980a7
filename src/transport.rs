use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::Result;

/// Echo of the request that produced a response, kept for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEcho {
    pub method: String,
    pub url: String,
}

/// Response from a transport call
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body, read to completion
    pub body: String,

    /// Echo of the originating request. Some client stacks hand back a
    /// response without this even on a clean round-trip; absence combined
    /// with a failing status must never be treated as success.
    pub request: Option<RequestEcho>,
}

impl TransportResponse {
    /// Whether the status code is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The minimal HTTP surface the collector needs from a client
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a form-encoded POST, used for administrative commands
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<TransportResponse>;

    /// Issue a raw-body POST, used for data writes
    async fn post(&self, url: &str, content_type: &str, body: Vec<u8>)
    -> Result<TransportResponse>;
}

/// Production transport over a reqwest client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn convert(resp: reqwest::Response) -> Result<TransportResponse> {
        let status = resp.status().as_u16();
        let url = resp.url().to_string();
        let body = resp.text().await?;

        Ok(TransportResponse {
            status,
            body,
            request: Some(RequestEcho {
                method: "POST".to_string(),
                url,
            }),
        })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<TransportResponse> {
        let resp = self.client.post(url).form(form).send().await?;
        Self::convert(resp).await
    }

    async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<TransportResponse> {
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        Self::convert(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success_bounds() {
        let mut resp = TransportResponse {
            status: 200,
            body: String::new(),
            request: None,
        };
        assert!(resp.is_success());

        resp.status = 204;
        assert!(resp.is_success());

        resp.status = 299;
        assert!(resp.is_success());

        resp.status = 199;
        assert!(!resp.is_success());

        resp.status = 300;
        assert!(!resp.is_success());

        resp.status = 500;
        assert!(!resp.is_success());
    }
}

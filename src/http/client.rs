//! HTTP client shared by every probe, exploit and export request

use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use anyhow::Result;
use reqwest::{redirect::Policy, Client};
use std::time::{Duration, Instant};

/// Per-request timeout used against metadata services and webhooks
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(Policy::none())
            .timeout(timeout)
            .no_proxy()
            .build()?;

        Ok(Self { client })
    }

    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse> {
        let start = Instant::now();

        let mut request = self
            .client
            .request(req.method, req.url)
            .headers(req.headers);

        if let Some(body) = req.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            body,
            elapsed_ms: start.elapsed().as_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_execute_collects_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/"))
            .and(header("Metadata", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_string("meta-data\nuser-data"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(DEFAULT_TIMEOUT).unwrap();
        let mut req = HttpRequest::get(Url::parse(&format!("{}/latest/", server.uri())).unwrap());
        req.set_header("Metadata", "true");

        let resp = client.execute(req).await.unwrap();

        assert!(resp.is_ok());
        assert_eq!(resp.body_text(), "meta-data\nuser-data");
    }

    #[tokio::test]
    async fn test_redirects_are_not_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/moved"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
            .mount(&server)
            .await;

        let client = HttpClient::new(DEFAULT_TIMEOUT).unwrap();
        let req = HttpRequest::get(Url::parse(&format!("{}/moved", server.uri())).unwrap());

        let resp = client.execute(req).await.unwrap();

        assert_eq!(resp.status, 302);
        assert!(!resp.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let client = HttpClient::new(Duration::from_millis(200)).unwrap();
        // Port 9 (discard) on loopback is closed in test environments
        let req = HttpRequest::get(Url::parse("http://127.0.0.1:9/").unwrap());

        assert!(client.execute(req).await.is_err());
    }
}

//! Provider-specific handling of a successful check response

use crate::cloud::error::CheckError;
use crate::cloud::provider::PostProcessor;
use crate::http::client::HttpClient;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use url::Url;

impl PostProcessor {
    /// Turn the response of `check` (fetched from `url`) into the stored value
    pub async fn apply(
        &self,
        client: &HttpClient,
        check: &str,
        url: &Url,
        response: &HttpResponse,
    ) -> Result<String, CheckError> {
        match self {
            PostProcessor::RoleChain { checks } if checks.contains(check) => {
                chain_role(client, url, response)
                    .await
                    .map_err(|e| CheckError::ChainedRequest(Box::new(e)))
            }
            _ => Ok(response.body_text()),
        }
    }
}

/// The first line of the body names a role; fetch `url + role` without any
/// provider headers and return that body.
async fn chain_role(
    client: &HttpClient,
    url: &Url,
    response: &HttpResponse,
) -> Result<String, CheckError> {
    let body = response.body_text();
    let role = body
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| CheckError::EmptyRole {
            url: url.to_string(),
        })?;

    let derived = format!("{}{}", url, role);
    let derived_url = Url::parse(&derived).map_err(|_| CheckError::InvalidUrl(derived.clone()))?;

    tracing::debug!("Chaining role '{}' to {}", role, derived_url);

    let resp = client
        .execute(HttpRequest::get(derived_url))
        .await
        .map_err(|e| CheckError::request(&derived, e))?;

    if !resp.is_ok() {
        return Err(CheckError::Status {
            url: derived,
            status: resp.status,
        });
    }

    Ok(resp.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::client::DEFAULT_TIMEOUT;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn response(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: body.as_bytes().to_vec(),
            elapsed_ms: 0,
        }
    }

    fn role_chain() -> PostProcessor {
        PostProcessor::RoleChain {
            checks: ["meta_token".to_string()].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn test_passthrough_returns_body_verbatim() {
        let client = HttpClient::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse("http://169.254.169.254/computeMetadata/v1/?recursive=true").unwrap();
        let raw = "{\"instance\": {\"id\": 42}}\n";

        let value = PostProcessor::Passthrough
            .apply(&client, "all", &url, &response(raw))
            .await
            .unwrap();

        assert_eq!(value, raw);
    }

    #[tokio::test]
    async fn test_role_chain_requests_url_plus_role() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/meta-data/iam/security-credentials/my-role"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"AccessKeyId\":\"ASIA\"}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse(&format!(
            "{}/latest/meta-data/iam/security-credentials/",
            server.uri()
        ))
        .unwrap();

        let value = role_chain()
            .apply(&client, "meta_token", &url, &response("my-role"))
            .await
            .unwrap();

        assert_eq!(value, "{\"AccessKeyId\":\"ASIA\"}");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), format!("{}my-role", url.path()));
    }

    #[tokio::test]
    async fn test_role_chain_inserts_no_separator() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest/meta-data/iammy-role"))
            .respond_with(ResponseTemplate::new(200).set_body_string("creds"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse(&format!("{}/latest/meta-data/iam", server.uri())).unwrap();

        let value = role_chain()
            .apply(&client, "meta_token", &url, &response("my-role\n"))
            .await
            .unwrap();

        assert_eq!(value, "creds");
    }

    #[tokio::test]
    async fn test_role_chain_only_applies_to_named_checks() {
        let client = HttpClient::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse("http://127.0.0.1:9/latest/meta-data/hostname").unwrap();

        let value = role_chain()
            .apply(&client, "hostname", &url, &response("ip-10-0-0-1"))
            .await
            .unwrap();

        assert_eq!(value, "ip-10-0-0-1");
    }

    #[tokio::test]
    async fn test_role_chain_second_hop_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/creds/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse(&format!("{}/creds/", server.uri())).unwrap();

        let err = role_chain()
            .apply(&client, "meta_token", &url, &response("gone"))
            .await
            .unwrap_err();

        match err {
            CheckError::ChainedRequest(inner) => {
                assert!(matches!(*inner, CheckError::Status { status: 404, .. }))
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_role_chain_empty_body() {
        let client = HttpClient::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse("http://127.0.0.1:9/creds/").unwrap();

        let err = role_chain()
            .apply(&client, "meta_token", &url, &response("  \n"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckError::ChainedRequest(ref inner) if matches!(**inner, CheckError::EmptyRole { .. })
        ));
    }
}

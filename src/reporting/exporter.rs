//! Report delivery to stdout and an optional webhook

use crate::http::client::HttpClient;
use crate::http::request::HttpRequest;
use crate::reporting::json;
use crate::reporting::model::EnumerationReport;
use url::Url;

pub struct Exporter {
    client: HttpClient,
}

impl Exporter {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// POST the report to `webhook` if set, then print it unless `silent`.
    /// Webhook failures are logged and never fail the export.
    pub async fn export(
        &self,
        report: &EnumerationReport,
        webhook: Option<&Url>,
        silent: bool,
    ) -> anyhow::Result<()> {
        let rendered = json::render(report)?;

        if let Some(webhook) = webhook {
            self.deliver(webhook, &rendered).await;
        }

        if !silent {
            println!("{}", rendered);
        }

        Ok(())
    }

    /// Send the report, ignoring whatever the webhook answers
    pub async fn deliver(&self, webhook: &Url, rendered: &str) -> bool {
        let req = HttpRequest::post_json(webhook.clone(), rendered.to_string());

        match self.client.execute(req).await {
            Ok(resp) => {
                tracing::info!("Report delivered to webhook (status {})", resp.status);
                true
            }
            Err(e) => {
                tracing::warn!("Error from webhook: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::client::DEFAULT_TIMEOUT;
    use crate::reporting::model::{EnvType, HostIdentity};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn report() -> EnumerationReport {
        EnumerationReport::new(HostIdentity {
            hostname: Some("probe-host".to_string()),
            env_type: EnvType::Vm,
        })
    }

    #[tokio::test]
    async fn test_webhook_receives_json_report() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(500).set_body_string("ignored"))
            .expect(1)
            .mount(&server)
            .await;

        let exporter = Exporter::new(HttpClient::new(DEFAULT_TIMEOUT).unwrap());
        let webhook = Url::parse(&format!("{}/hook", server.uri())).unwrap();

        exporter.export(&report(), Some(&webhook), true).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: EnumerationReport = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body, report());
    }

    #[tokio::test]
    async fn test_webhook_failure_does_not_fail_export() {
        let exporter = Exporter::new(HttpClient::new(DEFAULT_TIMEOUT).unwrap());
        let webhook = Url::parse("http://127.0.0.1:9/hook").unwrap();

        assert!(!exporter.deliver(&webhook, "{}").await);
        assert!(exporter.export(&report(), Some(&webhook), true).await.is_ok());
    }
}

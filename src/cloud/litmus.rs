//! Reachability test for a provider's metadata service

use crate::cloud::provider::{ConfirmedEndpoint, ProviderProfile};
use crate::http::client::HttpClient;
use crate::http::request::HttpRequest;

pub struct LitmusProbe<'a> {
    client: &'a HttpClient,
}

impl<'a> LitmusProbe<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Try each candidate base URL in order and return the first one whose
    /// litmus path answers 200. Candidates after it are never requested.
    pub async fn test(&self, profile: &ProviderProfile) -> Option<ConfirmedEndpoint> {
        for base in &profile.candidate_base_urls {
            let url = match ProviderProfile::join(base, &profile.litmus_path) {
                Ok(u) => u,
                Err(e) => {
                    tracing::warn!("Skipping candidate for {}: {}", profile.id, e);
                    continue;
                }
            };

            let req = HttpRequest::get(url.clone()).with_headers(&profile.required_headers);

            match self.client.execute(req).await {
                Ok(resp) if resp.is_ok() => {
                    tracing::info!(
                        "Metadata endpoint for {} is live at {} ({}ms)",
                        profile.id,
                        base,
                        resp.elapsed_ms
                    );
                    return Some(ConfirmedEndpoint {
                        provider: profile.id.clone(),
                        base_url: base.clone(),
                    });
                }
                Ok(resp) => {
                    tracing::debug!("Litmus {} answered with status {}", url, resp.status);
                }
                Err(e) => {
                    tracing::debug!("Litmus {} failed: {}", url, e);
                }
            }
        }

        None
    }
}

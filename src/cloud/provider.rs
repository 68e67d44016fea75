//! Provider profiles describing one cloud metadata service each

use crate::cloud::error::CheckError;
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

/// How the raw body of a successful check becomes the stored value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessor {
    /// Store the decoded body as-is
    Passthrough,

    /// For the named checks the body is a role name; the stored value is the
    /// body of a second request to `original_url + role`
    RoleChain { checks: BTreeSet<String> },
}

/// Static description of a cloud provider's metadata service
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Short identifier used on the command line (`aws`, `gcp`, ...)
    pub id: String,

    /// Human-readable provider name
    pub name: String,

    /// Base URLs tried in order during the litmus test
    pub candidate_base_urls: Vec<String>,

    /// Suffix appended to a base URL for the litmus test
    pub litmus_path: String,

    /// Headers sent on every litmus and check request. Empty when the
    /// provider needs none.
    pub required_headers: BTreeMap<String, String>,

    /// Check name -> URL suffix
    pub target_paths: BTreeMap<String, String>,

    pub post_processor: PostProcessor,
}

impl ProviderProfile {
    pub fn new(id: &str, name: &str, candidate_base_urls: &[&str], litmus_path: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            candidate_base_urls: candidate_base_urls.iter().map(|s| s.to_string()).collect(),
            litmus_path: litmus_path.to_string(),
            required_headers: BTreeMap::new(),
            target_paths: BTreeMap::new(),
            post_processor: PostProcessor::Passthrough,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.required_headers
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn target(mut self, check: &str, suffix: &str) -> Self {
        self.target_paths
            .insert(check.to_string(), suffix.to_string());
        self
    }

    pub fn post_processor(mut self, post_processor: PostProcessor) -> Self {
        self.post_processor = post_processor;
        self
    }

    /// Concatenate a base URL and a suffix. No separator is inserted.
    pub fn join(base: &str, suffix: &str) -> Result<Url, CheckError> {
        let raw = format!("{}{}", base, suffix);
        Url::parse(&raw).map_err(|_| CheckError::InvalidUrl(raw))
    }

    /// Check the structural invariants of the profile
    pub fn validate(&self) -> Result<(), String> {
        if self.candidate_base_urls.is_empty() {
            return Err(format!("provider '{}' has no candidate base URL", self.id));
        }

        for base in &self.candidate_base_urls {
            Self::join(base, &self.litmus_path).map_err(|e| e.to_string())?;
            for (check, suffix) in &self.target_paths {
                Self::join(base, suffix)
                    .map_err(|e| format!("check '{}' of '{}': {}", check, self.id, e))?;
            }
        }

        if let PostProcessor::RoleChain { checks } = &self.post_processor {
            if let Some(unknown) = checks.iter().find(|c| !self.target_paths.contains_key(*c)) {
                return Err(format!(
                    "provider '{}' chains unknown check '{}'",
                    self.id, unknown
                ));
            }
        }

        Ok(())
    }
}

/// A candidate base URL that passed the litmus test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedEndpoint {
    pub provider: String,
    pub base_url: String,
}

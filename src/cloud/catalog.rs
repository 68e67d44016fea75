//! Built-in registry of cloud metadata services

use crate::cloud::error::ProbeError;
use crate::cloud::provider::{PostProcessor, ProviderProfile};
use std::sync::{Arc, LazyLock};

static BUILTIN: LazyLock<Arc<ProviderCatalog>> =
    LazyLock::new(|| Arc::new(ProviderCatalog::new(builtin_profiles())));

/// Read-only provider registry. Iteration follows insertion order.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    profiles: Vec<ProviderProfile>,
}

impl ProviderCatalog {
    /// Build a catalog, dropping profiles that break their invariants
    pub fn new(profiles: Vec<ProviderProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .filter(|p| match p.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Ignoring provider profile: {}", e);
                    false
                }
            })
            .collect();

        Self { profiles }
    }

    /// The process-wide catalog of supported providers
    pub fn builtin() -> Arc<ProviderCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Find a profile by identifier (case-insensitive)
    pub fn lookup(&self, id: &str) -> Result<&ProviderProfile, ProbeError> {
        let wanted = id.trim();
        self.profiles
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ProbeError::ProviderNotFound(wanted.to_string()))
    }

    pub fn profiles(&self) -> &[ProviderProfile] {
        &self.profiles
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.id.as_str())
    }
}

fn builtin_profiles() -> Vec<ProviderProfile> {
    vec![aws(), gcp(), digitalocean(), azure()]
}

fn aws() -> ProviderProfile {
    ProviderProfile::new(
        "aws",
        "Amazon Web Services",
        &[
            "http://169.254.169.254",
            "http://[fd00:ec2::254]",
            "http://instance-data",
        ],
        "/latest/",
    )
    .target("hostname", "/latest/meta-data/hostname")
    .target("instance_identity", "/latest/dynamic/instance-identity/document")
    .target("user_data", "/latest/user-data")
    .target("meta_token", "/latest/meta-data/iam/security-credentials/")
    .target("user_token", "/latest/user-data/iam/security-credentials/")
    .post_processor(PostProcessor::RoleChain {
        checks: ["meta_token", "user_token"]
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

fn gcp() -> ProviderProfile {
    ProviderProfile::new(
        "gcp",
        "Google Cloud Platform",
        &[
            "http://169.254.169.254",
            "http://metadata.google.internal",
            "http://metadata",
        ],
        "/computeMetadata/v1/",
    )
    .header("Metadata-Flavor", "Google")
    .target("all", "/computeMetadata/v1/?recursive=true")
    .target(
        "token",
        "/computeMetadata/v1/instance/service-accounts/default/token",
    )
}

fn digitalocean() -> ProviderProfile {
    ProviderProfile::new(
        "do",
        "DigitalOcean",
        &["http://169.254.169.254"],
        "/metadata/v1/",
    )
    .target("all", "/metadata/v1.json")
    .target("user_data", "/metadata/v1/user-data")
}

fn azure() -> ProviderProfile {
    ProviderProfile::new(
        "azure",
        "Microsoft Azure",
        &["http://169.254.169.254"],
        "/metadata/instance?api-version=2021-02-01",
    )
    .header("Metadata", "true")
    .target("instance", "/metadata/instance?api-version=2021-02-01")
    .target(
        "token",
        "/metadata/identity/oauth2/token?api-version=2018-02-01&resource=https://management.azure.com/",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_are_valid() {
        let catalog = ProviderCatalog::builtin();
        for profile in catalog.profiles() {
            profile.validate().unwrap();
        }
    }

    #[test]
    fn test_builtin_order_is_stable() {
        let catalog = ProviderCatalog::builtin();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["aws", "gcp", "do", "azure"]);
    }

    #[test]
    fn test_invalid_profiles_are_dropped() {
        let catalog = ProviderCatalog::new(vec![
            ProviderProfile::new("empty", "Empty", &[], "/"),
            ProviderProfile::new("ok", "Ok", &["http://127.0.0.1"], "/"),
        ]);

        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["ok"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = ProviderCatalog::builtin();
        assert_eq!(catalog.lookup("GCP").unwrap().id, "gcp");
        assert_eq!(catalog.lookup(" azure ").unwrap().id, "azure");
    }

    #[test]
    fn test_lookup_unknown_provider() {
        let catalog = ProviderCatalog::builtin();
        assert_eq!(
            catalog.lookup("nonexistent").unwrap_err(),
            ProbeError::ProviderNotFound("nonexistent".to_string())
        );
    }

    #[test]
    fn test_aws_chains_role_checks() {
        let catalog = ProviderCatalog::builtin();
        let aws = catalog.lookup("aws").unwrap();
        match &aws.post_processor {
            PostProcessor::RoleChain { checks } => {
                assert!(checks.contains("meta_token"));
                assert!(checks.contains("user_token"));
                assert!(!checks.contains("hostname"));
            }
            other => panic!("unexpected post processor {:?}", other),
        }
    }

    #[test]
    fn test_header_requirements() {
        let catalog = ProviderCatalog::builtin();
        assert_eq!(
            catalog.lookup("gcp").unwrap().required_headers.get("Metadata-Flavor"),
            Some(&"Google".to_string())
        );
        assert_eq!(
            catalog.lookup("azure").unwrap().required_headers.get("Metadata"),
            Some(&"true".to_string())
        );
        assert!(catalog.lookup("aws").unwrap().required_headers.is_empty());
    }
}

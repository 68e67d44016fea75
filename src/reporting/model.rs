use crate::core::capability::Capability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Check name -> recovered value
pub type ResultSet = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnvType {
    Container,
    Vm,
}

impl std::fmt::Display for EnvType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvType::Container => write!(f, "container"),
            EnvType::Vm => write!(f, "vm"),
        }
    }
}

/// Facts about the host the probe runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub hostname: Option<String>,
    pub env_type: EnvType,
}

/// Everything recovered during one run. Categories that did not run are null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnumerationReport {
    pub hostname: Option<String>,

    #[serde(rename = "env")]
    pub env_type: EnvType,

    /// Identifier of the cloud provider confirmed during the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(rename = "ssrf_results")]
    pub results: BTreeMap<String, Option<ResultSet>>,
}

impl EnumerationReport {
    pub fn new(identity: HostIdentity) -> Self {
        Self {
            hostname: identity.hostname,
            env_type: identity.env_type,
            provider: None,
            results: Capability::ALL
                .iter()
                .map(|c| (c.as_str().to_string(), None))
                .collect(),
        }
    }

    pub fn category(&self, cap: Capability) -> Option<&ResultSet> {
        self.results.get(cap.as_str()).and_then(Option::as_ref)
    }
}

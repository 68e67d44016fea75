//! Cloud Metadata Probe-and-Exploit Engine
//!
//! Detects which cloud provider's instance metadata service is reachable from
//! the current host and harvests the sensitive paths it exposes.
//!
//! ## Flow
//!
//! 1. **Catalog**: static per-provider profiles (base URLs, headers, paths)
//! 2. **Litmus**: confirm a candidate base URL answers 200 on the litmus path
//! 3. **Exploit**: request every target path of the confirmed provider
//! 4. **Post-process**: passthrough, or chain a role name into a second request (AWS)
//!
//! In discovery mode the first provider to pass its litmus test wins; a host
//! belongs to at most one cloud. A failing check only shrinks the result set.

pub mod catalog;
pub mod error;
pub mod exploit;
pub mod litmus;
pub mod postprocess;
pub mod prober;
pub mod provider;

use crate::http::client::DEFAULT_TIMEOUT;

pub use catalog::ProviderCatalog;
pub use error::ProbeError;
pub use prober::{CloudProber, ProbeMode};

/// Cloud probing configuration
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Per-request timeout (ms)
    pub timeout_ms: u64,

    /// Maximum providers litmus-tested at once in discovery mode
    pub concurrency: usize,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            concurrency: 4,
        }
    }
}

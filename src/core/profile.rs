//! Set of enumeration categories enabled for a run

use crate::core::capability::Capability;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanProfile {
    pub enabled: BTreeSet<Capability>,
}

impl ScanProfile {
    /// Create a profile with every category enabled
    pub fn all() -> Self {
        Self {
            enabled: Capability::ALL.into_iter().collect(),
        }
    }

    pub fn disable(&mut self, cap: Capability) {
        self.enabled.remove(&cap);
    }

    pub fn has(&self, cap: Capability) -> bool {
        self.enabled.contains(&cap)
    }
}

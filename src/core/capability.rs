//! Enumeration categories

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    Cloud, // Cloud metadata services
    Net,   // Internal network endpoints
    Env,   // Environment variables
}

impl Capability {
    pub const ALL: [Capability; 3] = [Capability::Cloud, Capability::Net, Capability::Env];

    /// Key of this category in the report
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Cloud => "cloud",
            Capability::Net => "net",
            Capability::Env => "env",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

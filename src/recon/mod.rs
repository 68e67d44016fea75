//! Passive host reconnaissance: identity, environment and internal endpoints.
//! Nothing here touches the network.

pub mod env;
pub mod identity;
pub mod net;

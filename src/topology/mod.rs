//! Ring topology module.
//!
//! This module maps a ring size onto physical link endpoints and builds the
//! cyclic link configuration passed to the job scripts.

pub mod types;
pub mod ring;

// Re-export key types and functions for easier access
pub use types::{Channel, DeviceId, LinkEndpoint, NodeId, RingError, RingLink, RingSize};
pub use ring::{build, RingLinkConfig};

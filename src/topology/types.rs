//! Topology type definitions.
//!
//! Endpoints are packed three per physical node: endpoint `i` lives on node
//! `i / 3`, device slot `i % 3`.

use std::fmt;

/// Number of link endpoints (device slots) hosted by one node
pub const ENDPOINTS_PER_NODE: usize = 3;

/// Prefix of a rendered node name (`n00`, `n01`, ...)
pub const NODE_PREFIX: &str = "n";

/// Prefix of a rendered device slot name (`acl0`, `acl1`, `acl2`)
pub const DEVICE_PREFIX: &str = "acl";

/// Flag that introduces one link in the generated configuration
pub const LINK_FLAG: &str = "--fpgalink";

/// Errors raised while constructing ring topology values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    #[error("Ring size must be a positive integer, got {0}")]
    NonPositiveSize(i64),

    #[error("Endpoint index {index} is outside a ring of size {size}")]
    EndpointOutOfRange { index: usize, size: usize },
}

/// Number of link endpoints in a ring. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RingSize(usize);

impl RingSize {
    /// Validate a raw integer as a ring size
    pub fn new(n: i64) -> Result<Self, RingError> {
        if n < 1 {
            return Err(RingError::NonPositiveSize(n));
        }
        usize::try_from(n)
            .map(Self)
            .map_err(|_| RingError::NonPositiveSize(n))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Number of physical nodes needed to host this ring, `ceil(N / 3)`
    pub fn node_count(self) -> usize {
        self.0.div_ceil(ENDPOINTS_PER_NODE)
    }

    /// Index of the endpoint feeding into `index`, wrapping at zero.
    pub fn predecessor(self, index: usize) -> usize {
        (index + self.0 - 1) % self.0
    }

    /// Index of the endpoint that `index` feeds into, wrapping at the end.
    pub fn successor(self, index: usize) -> usize {
        (index + 1) % self.0
    }

    /// Physical location of endpoint `index`
    pub fn locate(self, index: usize) -> Result<(NodeId, DeviceId), RingError> {
        if index >= self.0 {
            return Err(RingError::EndpointOutOfRange { index, size: self.0 });
        }
        Ok((NodeId::of_endpoint(index), DeviceId::of_endpoint(index)))
    }
}

impl TryFrom<i64> for RingSize {
    type Error = RingError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl fmt::Display for RingSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical node hosting up to three endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn of_endpoint(index: usize) -> Self {
        Self(index / ENDPOINTS_PER_NODE)
    }
}

impl fmt::Display for NodeId {
    /// Zero-padded to two digits, wider values are printed in full.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", NODE_PREFIX, self.0)
    }
}

/// One of the three device slots on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(pub usize);

impl DeviceId {
    pub fn of_endpoint(index: usize) -> Self {
        Self(index % ENDPOINTS_PER_NODE)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DEVICE_PREFIX, self.0)
    }
}

/// Directional sub-port of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Outgoing side of a link
    Ch0,
    /// Incoming side of a link
    Ch1,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Ch0 => f.write_str("ch0"),
            Channel::Ch1 => f.write_str("ch1"),
        }
    }
}

/// A physical link port: node, device slot and channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkEndpoint {
    pub node: NodeId,
    pub device: DeviceId,
    pub channel: Channel,
}

impl LinkEndpoint {
    pub fn new(index: usize, channel: Channel) -> Self {
        Self {
            node: NodeId::of_endpoint(index),
            device: DeviceId::of_endpoint(index),
            channel,
        }
    }

    /// The (node, device) identity of this endpoint, ignoring the channel
    pub fn location(&self) -> (NodeId, DeviceId) {
        (self.node, self.device)
    }
}

impl fmt::Display for LinkEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.node, self.device, self.channel)
    }
}

/// Directed link from an endpoint's outgoing channel to its predecessor's
/// incoming channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingLink {
    pub source: LinkEndpoint,
    pub target: LinkEndpoint,
}

impl RingLink {
    pub fn new(source_index: usize, target_index: usize) -> Self {
        Self {
            source: LinkEndpoint::new(source_index, Channel::Ch0),
            target: LinkEndpoint::new(target_index, Channel::Ch1),
        }
    }
}

impl fmt::Display for RingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}-{}", LINK_FLAG, self.source, self.target)
    }
}

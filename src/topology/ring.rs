//! Ring link configuration.
//!
//! Builds the closed cycle of links for a ring of `N` endpoints. Link `i`
//! connects endpoint `i`'s outgoing channel to the incoming channel of its
//! predecessor `(i - 1 + N) mod N`, so endpoint 0 closes the ring onto
//! endpoint `N - 1`.

use crate::topology::types::{LinkEndpoint, NodeId, DeviceId, RingError, RingLink, RingSize};
use crate::utils::escape::escape_path;
use std::collections::HashSet;
use std::fmt;

/// Ordered links forming one closed cycle over every endpoint of a ring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingLinkConfig {
    size: RingSize,
    links: Vec<RingLink>,
}

/// Build the link configuration for a ring of `n` endpoints
///
/// # Arguments
/// * `n` - Requested ring size, must be at least 1
///
/// # Returns
/// The links in endpoint order, or `RingError::NonPositiveSize` when `n < 1`
///
/// # Examples
/// ```
/// use ringsub::topology::build;
///
/// let ring = build(1).unwrap();
/// assert_eq!(ring.to_string(), "--fpgalink=n00:acl0:ch0-n00:acl0:ch1 ");
/// ```
pub fn build(n: i64) -> Result<RingLinkConfig, RingError> {
    RingSize::new(n).map(RingLinkConfig::new)
}

impl RingLinkConfig {
    pub fn new(size: RingSize) -> Self {
        let links = (0..size.get())
            .map(|i| RingLink::new(i, size.predecessor(i)))
            .collect();
        Self { size, links }
    }

    pub fn size(&self) -> RingSize {
        self.size
    }

    /// Number of nodes spanned by the ring, `ceil(N / 3)`
    pub fn node_count(&self) -> usize {
        self.size.node_count()
    }

    pub fn links(&self) -> &[RingLink] {
        &self.links
    }

    /// Source endpoints of every link, in endpoint order
    pub fn endpoints(&self) -> impl Iterator<Item = &LinkEndpoint> {
        self.links.iter().map(|link| &link.source)
    }

    /// Raw form handed to the job script: every link followed by one space
    pub fn to_arg_string(&self) -> String {
        self.to_string()
    }

    /// URL-path escaped form of [`Self::to_arg_string`]
    pub fn to_escaped_string(&self) -> String {
        escape_path(&self.to_arg_string())
    }

    /// Follow predecessor links starting at endpoint `start` until an
    /// endpoint repeats. Returns the locations visited, in order.
    pub fn predecessor_walk(&self, start: usize) -> Vec<(NodeId, DeviceId)> {
        let mut visited = Vec::new();
        let mut seen = HashSet::new();
        let mut current = start;

        while let Some(link) = self.links.get(current) {
            let location = link.source.location();
            if !seen.insert(location) {
                break;
            }
            visited.push(location);
            current = self.size.predecessor(current);
            // The target recorded in the link must be the endpoint we step to
            if link.target.location() != (NodeId::of_endpoint(current), DeviceId::of_endpoint(current)) {
                break;
            }
        }

        visited
    }

    /// True when the links form exactly one cycle through all endpoints:
    /// every location is a source once and a target once, and walking
    /// predecessors from endpoint 0 reaches all of them.
    pub fn is_single_cycle(&self) -> bool {
        let n = self.size.get();
        if self.links.len() != n {
            return false;
        }

        let sources: HashSet<_> = self.links.iter().map(|l| l.source.location()).collect();
        let targets: HashSet<_> = self.links.iter().map(|l| l.target.location()).collect();
        if sources.len() != n || targets.len() != n || sources != targets {
            return false;
        }

        self.predecessor_walk(0).len() == n
    }
}

impl fmt::Display for RingLinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for link in &self.links {
            write!(f, "{} ", link)?;
        }
        Ok(())
    }
}

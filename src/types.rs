// IptablesSynth: Per-router packet filter synthesis for multi-subnet networks
// Copyright (C) 2026 The IptablesSynth Authors
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Module containing all type definitions shared by the topology, the synthesis and the export.

use std::{fmt, net::Ipv4Addr};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Router identification, as assigned in the scenario file.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouterId(pub u32);

impl fmt::Display for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RouterId {
    fn from(x: u32) -> Self {
        Self(x)
    }
}

/// Subnet identification, as assigned in the scenario file.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubnetId(pub u32);

impl fmt::Display for SubnetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SubnetId {
    fn from(x: u32) -> Self {
        Self(x)
    }
}

/// Key of a node in the topology graph. Routers and subnets live in separate id spaces, so a
/// router and a subnet may carry the same number without referring to the same node.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub enum NodeKey {
    /// A router node
    Router(RouterId),
    /// A subnet node
    Subnet(SubnetId),
}

impl NodeKey {
    /// Returns `true` if the key refers to a router.
    pub fn is_router(&self) -> bool {
        matches!(self, Self::Router(_))
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Router(r) => write!(f, "r{r}"),
            Self::Subnet(s) => write!(f, "s{s}"),
        }
    }
}

/// Interface of a router towards a subnet. This is stored on each link of the topology, and in the
/// interface table of each router.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interface {
    /// Router-local name of the interface (e.g., `eth0`).
    pub id: String,
    /// Address of the router on that interface.
    pub ip: Ipv4Addr,
}

/// Transport protocol of a communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
    /// ICMP, which has no ports.
    Icmp,
}

impl Protocol {
    /// Returns `true` if the protocol knows source and destination ports.
    pub fn has_ports(&self) -> bool {
        !matches!(self, Self::Icmp)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Icmp => "icmp",
        })
    }
}

/// Whether replies (and for ICMP, requests from the other side) are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Only traffic from the source to the target subnet
    Unidirectional,
    /// Traffic from the source to the target, plus the reverse direction.
    Bidirectional,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unidirectional => "unidirectional",
            Self::Bidirectional => "bidirectional",
        })
    }
}

/// Inclusive range of ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    /// First port in the range
    pub start: u16,
    /// Last port in the range
    pub end: u16,
}

impl PortRange {
    /// Create a new port range
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Deserialize an identifier that is either a JSON string or a JSON number into a `String`.
pub(crate) fn deserialize_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Name {
        Text(String),
        Number(u64),
    }

    Ok(match Name::deserialize(deserializer)? {
        Name::Text(s) => s,
        Name::Number(n) => n.to_string(),
    })
}

/// Error thrown while building the topology or while synthesizing rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthError {
    /// The scenario description is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    /// There is no path between the two subnets of a communication.
    #[error("No path from subnet {from} to subnet {to}")]
    Unreachable {
        /// Source subnet of the communication
        from: SubnetId,
        /// Target subnet of the communication
        to: SubnetId,
    },
}

/// Inconsistencies in the scenario description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Router is defined twice.
    #[error("Router {0} is defined multiple times")]
    DuplicateRouter(RouterId),
    /// Subnet is defined twice.
    #[error("Subnet {0} is defined multiple times")]
    DuplicateSubnet(SubnetId),
    /// The prefix length of a subnet is larger than 32.
    #[error("Subnet {0} has an invalid prefix length {1}")]
    InvalidPrefix(SubnetId, u8),
    /// A link references a router that does not exist.
    #[error("Link to subnet {1} references the unknown router {0}")]
    UnknownRouter(RouterId, SubnetId),
    /// A link or a communication references a subnet that does not exist.
    #[error("Unknown subnet {0}")]
    UnknownSubnet(SubnetId),
    /// The router is connected to the same subnet twice.
    #[error("Router {0} is connected to subnet {1} multiple times")]
    DuplicateLink(RouterId, SubnetId),
    /// The router uses the same interface for two links.
    #[error("Router {0} uses interface {1} for multiple links")]
    DuplicateInterface(RouterId, String),
    /// A tcp or udp communication does not specify all port ranges.
    #[error("The {0} communication from subnet {1} to subnet {2} is missing its port ranges")]
    MissingPorts(Protocol, SubnetId, SubnetId),
}

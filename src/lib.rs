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

//! # IptablesSynth: Per-router packet filter synthesis
//!
//! This library generates the `iptables` configuration of every router in a network, such that
//! exactly the declared communications between subnets are allowed, and everything else is
//! dropped.
//!
//! ## Structure
//! - The module [`scenario`] reads the input files, describing the network (routers, subnets and
//!   links) and the allowed communications.
//! - The module [`topology`] builds the bipartite graph of routers and subnets
//!   ([`topology::Topology`]) and computes the path of a communication
//!   ([`topology::Topology::path`]).
//! - The module [`synthesis`] generates the rules for each router along the path of every
//!   communication ([`synthesize`] and [`synthesize_scenario`]).
//! - The module [`rules`] contains the rule set of all routers, and the module [`export`] writes it
//!   in the format of `iptables-restore`.
//!
//! ## Example
//!
//! ```
//! use iptables_synth::{scenario::Scenario, synthesize_scenario, types::RouterId};
//!
//! let scenario: Scenario = r#"{
//!     "network": {
//!         "routers": [{"id": 1}],
//!         "subnets": [
//!             {"id": 10, "address": "10.0.0.0", "prefix": 24},
//!             {"id": 20, "address": "10.0.1.0", "prefix": 24}
//!         ],
//!         "links": [
//!             {"routerId": 1, "subnetId": 10, "interfaceId": "eth0", "ip": "10.0.0.1"},
//!             {"routerId": 1, "subnetId": 20, "interfaceId": "eth1", "ip": "10.0.1.1"}
//!         ]
//!     },
//!     "communications": [{
//!         "sourceSubnetId": 10, "targetSubnetId": 20, "protocol": "icmp",
//!         "direction": "unidirectional"
//!     }]
//! }"#.parse()?;
//!
//! let rules = synthesize_scenario(&scenario)?;
//! let router = rules.get(RouterId(1)).unwrap();
//! assert_eq!(
//!     router.filter().rules()[0].to_string(),
//!     "-A FORWARD -p icmp -s 10.0.0.0/24 -d 10.0.1.0/24 -i eth0 -o eth1 \
//!      -m state --state NEW,ESTABLISHED -j ACCEPT"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod export;
mod formatter;
pub mod rules;
pub mod scenario;
pub mod synthesis;
pub mod topology;
pub mod types;
#[cfg(test)]
mod test;

pub use formatter::TopologyFormatter;
pub use synthesis::{synthesize, synthesize_scenario};

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

//! Data structures for filter rules and the per-router rule set.
//!
//! Each router owns two tables, `nat` and `filter`, which are serialized in the format read by
//! `iptables-restore`. Rules are only ever appended to the `FORWARD` chain of the `filter` table,
//! and their order is preserved, since iptables uses first-match semantics.

use std::{collections::BTreeMap, fmt};

use ipnet::Ipv4Net;

use crate::{
    topology::Topology,
    types::{PortRange, Protocol, RouterId},
};

/// Connection-tracking state matched by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnState {
    /// New connections, as well as packets of already established connections.
    NewEstablished,
    /// Only packets of already established connections.
    Established,
}

impl fmt::Display for ConnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NewEstablished => "NEW,ESTABLISHED",
            Self::Established => "ESTABLISHED",
        })
    }
}

/// A rule in the `FORWARD` chain that accepts matching packets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterRule {
    /// Protocol to match
    pub protocol: Protocol,
    /// Source and destination port ranges. This is `None` for ICMP.
    pub ports: Option<(PortRange, PortRange)>,
    /// Source network
    pub source: Ipv4Net,
    /// Destination network
    pub destination: Ipv4Net,
    /// Interface on which the packet enters the router
    pub ingress: String,
    /// Interface on which the packet leaves the router
    pub egress: String,
    /// Connection-tracking state to match
    pub state: ConnState,
}

impl FilterRule {
    /// Create the rule for the opposite direction, swapping networks, ports and interfaces.
    pub fn reversed(&self, state: ConnState) -> Self {
        Self {
            protocol: self.protocol,
            ports: self.ports.map(|(s, d)| (d, s)),
            source: self.destination,
            destination: self.source,
            ingress: self.egress.clone(),
            egress: self.ingress.clone(),
            state,
        }
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-A FORWARD -p {}", self.protocol)?;
        if let Some((sport, dport)) = self.ports {
            write!(f, " --sport {sport} --dport {dport}")?;
        }
        write!(
            f,
            " -s {} -d {} -i {} -o {} -m state --state {} -j ACCEPT",
            self.source, self.destination, self.ingress, self.egress, self.state
        )
    }
}

/// Default policy of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Accept everything that is not matched
    Accept,
    /// Drop everything that is not matched
    Drop,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accept => "ACCEPT",
            Self::Drop => "DROP",
        })
    }
}

/// A table with its chain policies and rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: &'static str,
    policies: Vec<(&'static str, Policy)>,
    rules: Vec<FilterRule>,
}

impl Table {
    /// The `nat` table, accepting everything.
    fn nat() -> Self {
        Self {
            name: "nat",
            policies: vec![
                ("OUTPUT", Policy::Accept),
                ("PREROUTING", Policy::Accept),
                ("POSTROUTING", Policy::Accept),
            ],
            rules: Vec::new(),
        }
    }

    /// The `filter` table, dropping everything by default.
    fn filter() -> Self {
        Self {
            name: "filter",
            policies: vec![
                ("INPUT", Policy::Drop),
                ("OUTPUT", Policy::Drop),
                ("FORWARD", Policy::Drop),
            ],
            rules: Vec::new(),
        }
    }

    /// Rules of the table, in insertion order.
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "* {}", self.name)?;
        for (chain, policy) in self.policies.iter() {
            writeln!(f, ":{chain} {policy} [0:0]")?;
        }
        for rule in self.rules.iter() {
            writeln!(f, "{rule}")?;
        }
        writeln!(f)?;
        writeln!(f, "COMMIT")
    }
}

/// Both tables of a single router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterRules {
    nat: Table,
    filter: Table,
}

impl Default for RouterRules {
    fn default() -> Self {
        Self {
            nat: Table::nat(),
            filter: Table::filter(),
        }
    }
}

impl RouterRules {
    /// The `nat` table
    pub fn nat(&self) -> &Table {
        &self.nat
    }

    /// The `filter` table
    pub fn filter(&self) -> &Table {
        &self.filter
    }

    /// All tables, in the order in which they are written.
    pub fn tables(&self) -> [&Table; 2] {
        [&self.nat, &self.filter]
    }
}

/// Serializes the tables in the format of `iptables-restore`, separating tables by an empty line.
impl fmt::Display for RouterRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, table) in self.tables().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{table}")?;
        }
        Ok(())
    }
}

/// Rules of all routers in the network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    routers: BTreeMap<RouterId, RouterRules>,
}

impl RuleSet {
    /// Create the rule set with the default tables for every router in the topology.
    pub fn new(topo: &Topology) -> Self {
        Self {
            routers: topo
                .routers()
                .iter()
                .map(|r| (*r, RouterRules::default()))
                .collect(),
        }
    }

    /// Append a rule to the `filter` table of the router.
    pub fn push(&mut self, router: RouterId, rule: FilterRule) {
        log::trace!("r{router}: {rule}");
        self.routers.entry(router).or_default().filter.rules.push(rule);
    }

    /// Get the rules of a router.
    pub fn get(&self, router: RouterId) -> Option<&RouterRules> {
        self.routers.get(&router)
    }

    /// Iterate over all routers and their rules, ordered by router id.
    pub fn iter(&self) -> impl Iterator<Item = (RouterId, &RouterRules)> {
        self.routers.iter().map(|(r, rules)| (*r, rules))
    }

    /// Number of routers in the rule set.
    pub fn len(&self) -> usize {
        self.routers.len()
    }

    /// Returns `true` if the rule set contains no router.
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }
}

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

//! Formatting things that reference nodes of the topology.

use itertools::Itertools;

use crate::{
    scenario::Communication,
    topology::Topology,
    types::{Direction, NodeKey},
};

/// Trait to format a type that contains node keys, using the topology to resolve them.
pub trait TopologyFormatter<'a, 't> {
    /// Type that is returned, which implements `std::fmt::Display`.
    type Formatter;

    /// Return a struct that can be formatted and displayed.
    fn fmt(&'a self, topo: &'t Topology) -> Self::Formatter;
}

impl<'a, 't> TopologyFormatter<'a, 't> for NodeKey {
    type Formatter = String;

    fn fmt(&'a self, topo: &'t Topology) -> Self::Formatter {
        match self {
            NodeKey::Router(_) => self.to_string(),
            NodeKey::Subnet(s) => match topo.subnet(*s) {
                Ok(subnet) => format!("{self} ({})", subnet.network),
                Err(_) => format!("{self} (?)"),
            },
        }
    }
}

impl<'a, 't> TopologyFormatter<'a, 't> for [NodeKey] {
    type Formatter = String;

    fn fmt(&'a self, topo: &'t Topology) -> Self::Formatter {
        self.iter().map(|k| k.fmt(topo)).join(" -> ")
    }
}

impl<'a, 't> TopologyFormatter<'a, 't> for Communication {
    type Formatter = String;

    fn fmt(&'a self, topo: &'t Topology) -> Self::Formatter {
        let ports = match self.port_ranges() {
            Ok(Some((s, d))) => format!(" {s} => {d}"),
            _ => String::new(),
        };
        format!(
            "{} {} {} {}{ports}",
            self.protocol,
            NodeKey::Subnet(self.source_subnet_id).fmt(topo),
            match self.direction {
                Direction::Unidirectional => "=>",
                Direction::Bidirectional => "<=>",
            },
            NodeKey::Subnet(self.target_subnet_id).fmt(topo),
        )
    }
}

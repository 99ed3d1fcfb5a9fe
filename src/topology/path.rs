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

//! Path resolution between two subnets.

use petgraph::algo::astar;

use super::Topology;
use crate::types::{ConfigurationError, NodeKey, RouterId, SubnetId, SynthError};

impl Topology {
    /// Compute the shortest path (in number of hops) from the `source` subnet to the `target`
    /// subnet, including both end points. Since there are no links between two routers, the path
    /// alternates between subnets and routers, starting and ending at a subnet. If `source` and
    /// `target` are equal, the path only contains that subnet.
    ///
    /// Returns [`SynthError::Unreachable`] if there is no path between both subnets.
    pub fn path(&self, source: SubnetId, target: SubnetId) -> Result<Vec<NodeKey>, SynthError> {
        let src_idx = self
            .index(NodeKey::Subnet(source))
            .ok_or(ConfigurationError::UnknownSubnet(source))?;
        let dst_idx = self
            .index(NodeKey::Subnet(target))
            .ok_or(ConfigurationError::UnknownSubnet(target))?;

        if src_idx == dst_idx {
            return Ok(vec![NodeKey::Subnet(source)]);
        }

        let (_, path) = astar(&self.graph, src_idx, |n| n == dst_idx, |_| 1u32, |_| 0)
            .ok_or(SynthError::Unreachable {
                from: source,
                to: target,
            })?;

        Ok(path
            .into_iter()
            .filter_map(|idx| self.graph.node_weight(idx))
            .map(|node| node.key())
            .collect())
    }
}

/// Iterate over all routers on a path, together with the subnet before (last hop) and after (next
/// hop) each router. The end points of a path are subnets, so they are never yielded.
pub fn hops(path: &[NodeKey]) -> impl Iterator<Item = (SubnetId, RouterId, SubnetId)> + '_ {
    path.windows(3).filter_map(|w| match (w[0], w[1], w[2]) {
        (NodeKey::Subnet(last), NodeKey::Router(router), NodeKey::Subnet(next)) => {
            Some((last, router, next))
        }
        _ => None,
    })
}

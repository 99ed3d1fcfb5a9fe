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

//! This module contains the topology of the network. The topology is an undirected bipartite
//! graph, where every node is either a router or a subnet, and every edge is a link connecting a
//! router to a subnet. Each router additionally stores the interface towards each of its
//! neighboring subnets.
//!
//! The topology is built once for each scenario and is read-only afterwards.

use std::collections::{hash_map::Entry, HashMap};

use ipnet::Ipv4Net;
use petgraph::{graph::NodeIndex, Graph, Undirected};

use crate::{
    scenario::NetworkDescription,
    types::{ConfigurationError, Interface, NodeKey, RouterId, SubnetId, SynthError},
};

mod path;

pub use path::hops;

/// Index type used in the topology graph.
pub(crate) type IndexType = u32;
/// The topology graph. Edges carry the interface of the router towards the subnet.
pub type TopologyGraph = Graph<Node, Interface, Undirected, IndexType>;

/// A node in the topology graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A router
    Router(RouterNode),
    /// A subnet
    Subnet(SubnetNode),
}

impl Node {
    /// Get the key of the node.
    pub fn key(&self) -> NodeKey {
        match self {
            Node::Router(r) => NodeKey::Router(r.id),
            Node::Subnet(s) => NodeKey::Subnet(s.id),
        }
    }
}

/// A router node, including the interfaces towards all neighboring subnets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterNode {
    /// Id of the router
    pub id: RouterId,
    ifaces: HashMap<SubnetId, Interface>,
}

impl RouterNode {
    /// Get the interface of the router towards a neighboring subnet, or `None` if the router is
    /// not attached to that subnet.
    pub fn iface(&self, subnet: SubnetId) -> Option<&Interface> {
        self.ifaces.get(&subnet)
    }

    /// Iterate over all interfaces of the router, in no particular order.
    pub fn ifaces(&self) -> impl Iterator<Item = (SubnetId, &Interface)> {
        self.ifaces.iter().map(|(s, i)| (*s, i))
    }
}

/// A subnet node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetNode {
    /// Id of the subnet
    pub id: SubnetId,
    /// Network address and prefix length, exactly as written in the scenario.
    pub network: Ipv4Net,
}

/// The network topology.
#[derive(Debug, Clone)]
pub struct Topology {
    graph: TopologyGraph,
    nodes: HashMap<NodeKey, NodeIndex<IndexType>>,
    routers: Vec<RouterId>,
}

impl Topology {
    /// Build the topology from the network description. Every link must reference an existing
    /// router and an existing subnet, otherwise a [`ConfigurationError`] is returned.
    pub fn new(desc: &NetworkDescription) -> Result<Self, SynthError> {
        let mut graph = TopologyGraph::default();
        let mut nodes = HashMap::new();
        let mut routers = Vec::with_capacity(desc.routers.len());

        for router in desc.routers.iter() {
            let key = NodeKey::Router(router.id);
            if nodes.contains_key(&key) {
                return Err(ConfigurationError::DuplicateRouter(router.id).into());
            }
            let idx = graph.add_node(Node::Router(RouterNode {
                id: router.id,
                ifaces: HashMap::new(),
            }));
            nodes.insert(key, idx);
            routers.push(router.id);
        }

        for subnet in desc.subnets.iter() {
            let key = NodeKey::Subnet(subnet.id);
            if nodes.contains_key(&key) {
                return Err(ConfigurationError::DuplicateSubnet(subnet.id).into());
            }
            let network = Ipv4Net::new(subnet.address, subnet.prefix)
                .map_err(|_| ConfigurationError::InvalidPrefix(subnet.id, subnet.prefix))?;
            let idx = graph.add_node(Node::Subnet(SubnetNode {
                id: subnet.id,
                network,
            }));
            nodes.insert(key, idx);
        }

        for link in desc.links.iter() {
            let r_idx = *nodes
                .get(&NodeKey::Router(link.router_id))
                .ok_or(ConfigurationError::UnknownRouter(link.router_id, link.subnet_id))?;
            let s_idx = *nodes
                .get(&NodeKey::Subnet(link.subnet_id))
                .ok_or(ConfigurationError::UnknownSubnet(link.subnet_id))?;
            let iface = Interface {
                id: link.interface_id.clone(),
                ip: link.ip,
            };

            if let Some(Node::Router(router)) = graph.node_weight_mut(r_idx) {
                if router.ifaces.values().any(|i| i.id == iface.id) {
                    return Err(
                        ConfigurationError::DuplicateInterface(link.router_id, iface.id).into(),
                    );
                }
                match router.ifaces.entry(link.subnet_id) {
                    Entry::Occupied(_) => {
                        return Err(ConfigurationError::DuplicateLink(
                            link.router_id,
                            link.subnet_id,
                        )
                        .into())
                    }
                    Entry::Vacant(e) => {
                        e.insert(iface.clone());
                    }
                }
            }

            graph.add_edge(r_idx, s_idx, iface);
        }

        log::debug!(
            "Built topology with {} routers, {} subnets and {} links",
            routers.len(),
            desc.subnets.len(),
            graph.edge_count()
        );

        Ok(Self {
            graph,
            nodes,
            routers,
        })
    }

    /// Returns a reference to the underlying graph.
    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    /// All routers, in the order in which they appear in the scenario.
    pub fn routers(&self) -> &[RouterId] {
        &self.routers
    }

    /// Get the router with the given id.
    pub fn router(&self, id: RouterId) -> Option<&RouterNode> {
        match self.node(NodeKey::Router(id)) {
            Some(Node::Router(r)) => Some(r),
            _ => None,
        }
    }

    /// Get the subnet with the given id.
    pub fn subnet(&self, id: SubnetId) -> Result<&SubnetNode, ConfigurationError> {
        match self.node(NodeKey::Subnet(id)) {
            Some(Node::Subnet(s)) => Ok(s),
            _ => Err(ConfigurationError::UnknownSubnet(id)),
        }
    }

    /// Get the interface of a router towards one of its neighboring subnets.
    pub fn iface(&self, router: RouterId, subnet: SubnetId) -> Option<&Interface> {
        self.router(router).and_then(|r| r.iface(subnet))
    }

    /// Get the node for a key.
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes
            .get(&key)
            .and_then(|idx| self.graph.node_weight(*idx))
    }

    /// Get the graph index of a node.
    pub(crate) fn index(&self, key: NodeKey) -> Option<NodeIndex<IndexType>> {
        self.nodes.get(&key).copied()
    }

    /// Number of links in the topology.
    pub fn num_links(&self) -> usize {
        self.graph.edge_count()
    }
}

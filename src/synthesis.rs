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

//! Rule synthesis. For every communication, this module computes the path through the network and
//! generates the rules on each router along that path.

use itertools::Itertools;

use crate::{
    formatter::TopologyFormatter,
    rules::{ConnState, FilterRule, RuleSet},
    scenario::{Communication, Scenario},
    topology::{hops, Topology},
    types::{ConfigurationError, Direction, Protocol, SynthError},
};

/// Generate the rules for a single communication and append them to the rule set. For each router
/// on the path, this adds the forward rule, followed by the reverse rule if the communication is
/// bidirectional. Returns the number of rules that were added.
///
/// The reverse rule of a TCP or UDP communication only matches established connections, since the
/// target may only reply. ICMP has no connection, so the reverse rule also accepts new packets.
pub fn synthesize(
    topo: &Topology,
    comm: &Communication,
    rules: &mut RuleSet,
) -> Result<usize, SynthError> {
    let ports = comm.port_ranges()?;
    let source = topo.subnet(comm.source_subnet_id)?.network;
    let destination = topo.subnet(comm.target_subnet_id)?.network;

    let path = topo.path(comm.source_subnet_id, comm.target_subnet_id)?;
    log::debug!("{}: {}", comm.fmt(topo), path.fmt(topo));

    let reverse_state = match (comm.direction, comm.protocol) {
        (Direction::Unidirectional, _) => None,
        (Direction::Bidirectional, Protocol::Icmp) => Some(ConnState::NewEstablished),
        (Direction::Bidirectional, Protocol::Tcp | Protocol::Udp) => Some(ConnState::Established),
    };

    // compute all rules first, such that a broken path does not leave a partial result behind.
    let mut new_rules = Vec::new();
    for (last_hop, router, next_hop) in hops(&path) {
        let ingress = topo
            .iface(router, last_hop)
            .ok_or(ConfigurationError::UnknownSubnet(last_hop))?;
        let egress = topo
            .iface(router, next_hop)
            .ok_or(ConfigurationError::UnknownSubnet(next_hop))?;

        let forward = FilterRule {
            protocol: comm.protocol,
            ports,
            source,
            destination,
            ingress: ingress.id.clone(),
            egress: egress.id.clone(),
            state: ConnState::NewEstablished,
        };
        let reverse = reverse_state.map(|state| forward.reversed(state));

        new_rules.push((router, forward));
        new_rules.extend(reverse.map(|r| (router, r)));
    }

    let num_rules = new_rules.len();
    new_rules
        .into_iter()
        .for_each(|(router, rule)| rules.push(router, rule));
    Ok(num_rules)
}

/// Build the topology of the scenario and generate the rules for all its communications, in the
/// order in which they appear in the scenario.
pub fn synthesize_scenario(scenario: &Scenario) -> Result<RuleSet, SynthError> {
    let topo = Topology::new(&scenario.network)?;
    let mut rules = RuleSet::new(&topo);
    let num_rules: usize = scenario
        .communications
        .iter()
        .map(|comm| synthesize(&topo, comm, &mut rules))
        .fold_ok(0, |acc, n| acc + n)?;
    log::debug!(
        "Generated {num_rules} rules for {} communications on {} routers",
        scenario.communications.len(),
        rules.len()
    );
    Ok(rules)
}

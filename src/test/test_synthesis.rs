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

//! Tests for generating the rules of communications.

use pretty_assertions::assert_eq;
use test_log::test;

use super::{campus, chain, comm, network};
use crate::{
    rules::{ConnState, RuleSet},
    synthesize, synthesize_scenario,
    topology::Topology,
    types::{ConfigurationError, Direction, Protocol, RouterId, SubnetId, SynthError},
};

/// Rules of a router as strings.
fn rule_strings(rules: &RuleSet, router: u32) -> Vec<String> {
    rules
        .get(RouterId(router))
        .unwrap()
        .filter()
        .rules()
        .iter()
        .map(|r| r.to_string())
        .collect()
}

#[test]
fn single_router_example() {
    let topo = Topology::new(&network(
        &[1],
        &[(10, "10.0.0.0", 24), (20, "10.0.1.0", 24)],
        &[(1, 10, "eth0", "10.0.0.1"), (1, 20, "eth1", "10.0.1.1")],
    ))
    .unwrap();
    let mut rules = RuleSet::new(&topo);
    let c = comm(10, 20, Protocol::Tcp, Direction::Unidirectional);

    assert_eq!(synthesize(&topo, &c, &mut rules).unwrap(), 1);
    assert_eq!(
        rule_strings(&rules, 1),
        vec![
            "-A FORWARD -p tcp --sport 1:65535 --dport 80:80 -s 10.0.0.0/24 -d 10.0.1.0/24 \
             -i eth0 -o eth1 -m state --state NEW,ESTABLISHED -j ACCEPT"
        ]
    );
}

#[test]
fn unidirectional_one_rule_per_router() {
    let topo = Topology::new(&chain(5)).unwrap();
    for protocol in [Protocol::Tcp, Protocol::Udp, Protocol::Icmp] {
        let mut rules = RuleSet::new(&topo);
        let c = comm(1, 6, protocol, Direction::Unidirectional);
        assert_eq!(synthesize(&topo, &c, &mut rules).unwrap(), 5);
        for router in 1..=5 {
            let router_rules = rules.get(RouterId(router)).unwrap().filter().rules();
            assert_eq!(router_rules.len(), 1);
            assert_eq!(router_rules[0].state, ConnState::NewEstablished);
            assert_eq!(router_rules[0].ingress, "left");
            assert_eq!(router_rules[0].egress, "right");
        }
    }
}

#[test]
fn bidirectional_forward_then_reverse() {
    let topo = Topology::new(&chain(3)).unwrap();
    let mut rules = RuleSet::new(&topo);
    let c = comm(4, 1, Protocol::Udp, Direction::Bidirectional);
    assert_eq!(synthesize(&topo, &c, &mut rules).unwrap(), 6);

    for router in 1..=3 {
        let router_rules = rules.get(RouterId(router)).unwrap().filter().rules();
        assert_eq!(router_rules.len(), 2);
        let (forward, reverse) = (&router_rules[0], &router_rules[1]);
        assert_eq!(forward.source, "10.0.4.0/24".parse::<ipnet::Ipv4Net>().unwrap());
        assert_eq!(forward.destination, "10.0.1.0/24".parse::<ipnet::Ipv4Net>().unwrap());
        assert_eq!((forward.ingress.as_str(), forward.egress.as_str()), ("right", "left"));
        assert_eq!(forward.state, ConnState::NewEstablished);
        assert_eq!(reverse, &forward.reversed(ConnState::Established));
    }

    assert_eq!(
        rule_strings(&rules, 2),
        vec![
            "-A FORWARD -p udp --sport 1:65535 --dport 80:80 -s 10.0.4.0/24 -d 10.0.1.0/24 \
             -i right -o left -m state --state NEW,ESTABLISHED -j ACCEPT",
            "-A FORWARD -p udp --sport 80:80 --dport 1:65535 -s 10.0.1.0/24 -d 10.0.4.0/24 \
             -i left -o right -m state --state ESTABLISHED -j ACCEPT",
        ]
    );
}

#[test]
fn reverse_state_depends_on_protocol() {
    let topo = Topology::new(&chain(1)).unwrap();
    for (protocol, state) in [
        (Protocol::Tcp, ConnState::Established),
        (Protocol::Udp, ConnState::Established),
        (Protocol::Icmp, ConnState::NewEstablished),
    ] {
        let mut rules = RuleSet::new(&topo);
        let c = comm(1, 2, protocol, Direction::Bidirectional);
        synthesize(&topo, &c, &mut rules).unwrap();
        let router_rules = rules.get(RouterId(1)).unwrap().filter().rules();
        assert_eq!(router_rules[0].state, ConnState::NewEstablished);
        assert_eq!(router_rules[1].state, state);
    }
}

#[test]
fn icmp_rules_have_no_ports() {
    let topo = Topology::new(&chain(2)).unwrap();
    let mut rules = RuleSet::new(&topo);
    synthesize(&topo, &comm(1, 3, Protocol::Icmp, Direction::Bidirectional), &mut rules).unwrap();
    synthesize(&topo, &comm(1, 3, Protocol::Tcp, Direction::Bidirectional), &mut rules).unwrap();
    synthesize(&topo, &comm(3, 1, Protocol::Udp, Direction::Unidirectional), &mut rules).unwrap();

    for (_, router_rules) in rules.iter() {
        for rule in router_rules.filter().rules() {
            let line = rule.to_string();
            let has_ports = line.contains("--sport") && line.contains("--dport");
            let has_any_port = line.contains("--sport") || line.contains("--dport");
            match rule.protocol {
                Protocol::Icmp => assert!(!has_any_port, "{line}"),
                Protocol::Tcp | Protocol::Udp => assert!(has_ports, "{line}"),
            }
        }
    }

    // ports in the scenario are ignored for ICMP.
    let mut c = comm(1, 3, Protocol::Icmp, Direction::Unidirectional);
    c.source_port_start = Some(0);
    c.target_port_end = Some(0);
    let mut rules = RuleSet::new(&topo);
    synthesize(&topo, &c, &mut rules).unwrap();
    assert_eq!(
        rule_strings(&rules, 1),
        vec![
            "-A FORWARD -p icmp -s 10.0.1.0/24 -d 10.0.3.0/24 -i left -o right \
             -m state --state NEW,ESTABLISHED -j ACCEPT"
        ]
    );
}

#[test]
fn self_loop_yields_no_rules() {
    let topo = Topology::new(&campus().network).unwrap();
    let mut rules = RuleSet::new(&topo);
    let c = comm(20, 20, Protocol::Tcp, Direction::Bidirectional);
    assert_eq!(synthesize(&topo, &c, &mut rules).unwrap(), 0);
    assert_eq!(rules, RuleSet::new(&topo));
}

#[test]
fn missing_ports() {
    let topo = Topology::new(&chain(1)).unwrap();
    let mut rules = RuleSet::new(&topo);
    let mut c = comm(1, 2, Protocol::Tcp, Direction::Unidirectional);
    c.target_port_end = None;
    assert_eq!(
        synthesize(&topo, &c, &mut rules).unwrap_err(),
        SynthError::Configuration(ConfigurationError::MissingPorts(
            Protocol::Tcp,
            SubnetId(1),
            SubnetId(2)
        ))
    );
    assert_eq!(rules, RuleSet::new(&topo));
}

#[test]
fn unreachable_communication() {
    let topo = Topology::new(&campus().network).unwrap();
    let mut rules = RuleSet::new(&topo);
    let c = comm(50, 10, Protocol::Icmp, Direction::Bidirectional);
    assert_eq!(
        synthesize(&topo, &c, &mut rules).unwrap_err(),
        SynthError::Unreachable {
            from: SubnetId(50),
            to: SubnetId(10)
        }
    );
    assert_eq!(rules, RuleSet::new(&topo));
}

#[test]
fn unreachable_aborts_scenario() {
    let mut scenario = campus();
    scenario
        .communications
        .push(comm(10, 50, Protocol::Tcp, Direction::Unidirectional));
    assert_eq!(
        synthesize_scenario(&scenario).unwrap_err(),
        SynthError::Unreachable {
            from: SubnetId(10),
            to: SubnetId(50)
        }
    );
}

#[test]
fn rules_keep_communication_order() {
    let rules = synthesize_scenario(&campus()).unwrap();
    assert_eq!(rules.len(), 4);
    assert_eq!(
        rule_strings(&rules, 1),
        vec![
            "-A FORWARD -p tcp --sport 1024:65535 --dport 80:80 -s 10.0.10.0/24 -d 10.0.30.0/24 \
             -i eth0 -o eth1 -m state --state NEW,ESTABLISHED -j ACCEPT",
            "-A FORWARD -p tcp --sport 80:80 --dport 1024:65535 -s 10.0.30.0/24 -d 10.0.10.0/24 \
             -i eth1 -o eth0 -m state --state ESTABLISHED -j ACCEPT",
            "-A FORWARD -p udp --sport 53:53 --dport 1024:65535 -s 10.0.40.0/24 -d 10.0.10.0/24 \
             -i eth1 -o eth0 -m state --state NEW,ESTABLISHED -j ACCEPT",
        ]
    );
    assert_eq!(
        rule_strings(&rules, 3),
        vec![
            "-A FORWARD -p udp --sport 53:53 --dport 1024:65535 -s 10.0.40.0/24 -d 10.0.10.0/24 \
             -i eth1 -o eth0 -m state --state NEW,ESTABLISHED -j ACCEPT",
            "-A FORWARD -p icmp -s 10.0.30.0/24 -d 10.0.40.0/24 -i eth0 -o eth1 \
             -m state --state NEW,ESTABLISHED -j ACCEPT",
            "-A FORWARD -p icmp -s 10.0.40.0/24 -d 10.0.30.0/24 -i eth1 -o eth0 \
             -m state --state NEW,ESTABLISHED -j ACCEPT",
        ]
    );
    assert!(rule_strings(&rules, 4).is_empty());
}

#[test]
fn duplicate_communications_accumulate() {
    let topo = Topology::new(&chain(1)).unwrap();
    let mut rules = RuleSet::new(&topo);
    let c = comm(1, 2, Protocol::Tcp, Direction::Unidirectional);
    synthesize(&topo, &c, &mut rules).unwrap();
    synthesize(&topo, &c, &mut rules).unwrap();
    let lines = rule_strings(&rules, 1);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], lines[1]);
}

#[test]
fn nat_table_is_never_modified() {
    let topo = Topology::new(&campus().network).unwrap();
    let empty = RuleSet::new(&topo);
    let rules = synthesize_scenario(&campus()).unwrap();
    for (router, router_rules) in rules.iter() {
        assert_eq!(router_rules.nat(), empty.get(router).unwrap().nat());
        assert!(router_rules.nat().rules().is_empty());
    }
}

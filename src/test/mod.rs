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

//! Test module, containing shared scenarios.
//!
//! # Campus scenario (`files/campus.json`)
//!
//! ```text
//! s10 ---- r1 ---- s20 ---- r2 ---- s30
//!                   |
//!                   r3 ---- s40
//!
//! s50 ---- r4
//! ```

mod test_synthesis;

use crate::{
    scenario::{
        Communication, LinkDescription, NetworkDescription, RouterDescription, Scenario,
        SubnetDescription,
    },
    types::{Direction, Protocol},
};

/// Get the campus scenario.
pub(crate) fn campus() -> Scenario {
    include_str!("files/campus.json").parse().unwrap()
}

/// Build a network description. Links are given as `(router, subnet, interface, ip)`.
pub(crate) fn network(
    routers: &[u32],
    subnets: &[(u32, &str, u8)],
    links: &[(u32, u32, &str, &str)],
) -> NetworkDescription {
    NetworkDescription {
        routers: routers
            .iter()
            .map(|id| RouterDescription { id: (*id).into() })
            .collect(),
        subnets: subnets
            .iter()
            .map(|(id, address, prefix)| SubnetDescription {
                id: (*id).into(),
                address: address.parse().unwrap(),
                prefix: *prefix,
            })
            .collect(),
        links: links
            .iter()
            .map(|(r, s, iface, ip)| LinkDescription {
                router_id: (*r).into(),
                subnet_id: (*s).into(),
                interface_id: iface.to_string(),
                ip: ip.parse().unwrap(),
            })
            .collect(),
    }
}

/// Build a communication. ICMP communications have no ports, all others use `1:65535 -> 80:80`.
pub(crate) fn comm(
    source: u32,
    target: u32,
    protocol: Protocol,
    direction: Direction,
) -> Communication {
    let (sport, dport) = if protocol.has_ports() {
        ((Some(1), Some(65535)), (Some(80), Some(80)))
    } else {
        ((None, None), (None, None))
    };
    Communication {
        source_subnet_id: source.into(),
        target_subnet_id: target.into(),
        protocol,
        source_port_start: sport.0,
        source_port_end: sport.1,
        target_port_start: dport.0,
        target_port_end: dport.1,
        direction,
    }
}

/// A chain of `n` routers, where router `i` connects subnet `i` with subnet `i + 1`. Subnet `i`
/// has the address `10.0.<i>.0/24`.
pub(crate) fn chain(n: u32) -> NetworkDescription {
    let routers: Vec<u32> = (1..=n).collect();
    let addresses: Vec<String> = (1..=n + 1).map(|i| format!("10.0.{i}.0")).collect();
    let subnets: Vec<(u32, &str, u8)> = (1..=n + 1)
        .map(|i| (i, addresses[(i - 1) as usize].as_str(), 24))
        .collect();
    let ips: Vec<(String, String)> = (1..=n)
        .map(|i| (format!("10.0.{i}.254"), format!("10.0.{}.1", i + 1)))
        .collect();
    let links: Vec<(u32, u32, &str, &str)> = (1..=n)
        .flat_map(|i| {
            let (left, right) = &ips[(i - 1) as usize];
            [
                (i, i, "left", left.as_str()),
                (i, i + 1, "right", right.as_str()),
            ]
        })
        .collect();
    network(&routers, &subnets, &links)
}

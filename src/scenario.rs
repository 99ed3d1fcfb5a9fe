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

//! Module for reading scenario files. A scenario describes the network (routers, subnets and the
//! links between them) and all communications that should be allowed.

use std::{
    fs,
    net::Ipv4Addr,
    path::{Path, PathBuf},
    str::FromStr,
};

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{
    deserialize_name, ConfigurationError, Direction, PortRange, Protocol, RouterId, SubnetId,
};

lazy_static! {
    static ref SCENARIO_FILENAME: Regex = Regex::new(r"^(\d+)\.json$").unwrap();
}

/// A complete scenario, as read from a single input file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    /// Description of the network topology.
    pub network: NetworkDescription,
    /// All communications that should be allowed, in the order in which rules are generated.
    pub communications: Vec<Communication>,
}

/// Description of the network topology.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkDescription {
    /// All routers
    pub routers: Vec<RouterDescription>,
    /// All subnets
    pub subnets: Vec<SubnetDescription>,
    /// All links, each connecting a router to a subnet.
    pub links: Vec<LinkDescription>,
}

/// A router in the scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RouterDescription {
    /// Id of the router
    pub id: RouterId,
}

/// A subnet in the scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SubnetDescription {
    /// Id of the subnet
    pub id: SubnetId,
    /// Network address
    pub address: Ipv4Addr,
    /// Prefix length
    pub prefix: u8,
}

/// A link between a router and a subnet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDescription {
    /// The router of the link
    pub router_id: RouterId,
    /// The subnet of the link
    pub subnet_id: SubnetId,
    /// Name of the interface on the router (unique per router).
    #[serde(deserialize_with = "deserialize_name")]
    pub interface_id: String,
    /// Address of the router on that interface.
    pub ip: Ipv4Addr,
}

/// A communication that should be allowed by the routers on its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communication {
    /// Subnet from which traffic originates
    pub source_subnet_id: SubnetId,
    /// Subnet to which traffic is sent
    pub target_subnet_id: SubnetId,
    /// Transport protocol
    pub protocol: Protocol,
    /// First source port (ignored for ICMP)
    #[serde(default)]
    pub source_port_start: Option<u16>,
    /// Last source port (ignored for ICMP)
    #[serde(default)]
    pub source_port_end: Option<u16>,
    /// First destination port (ignored for ICMP)
    #[serde(default)]
    pub target_port_start: Option<u16>,
    /// Last destination port (ignored for ICMP)
    #[serde(default)]
    pub target_port_end: Option<u16>,
    /// Whether the reverse direction is allowed as well.
    pub direction: Direction,
}

impl Communication {
    /// Returns `true` if source and target are the same subnet.
    pub fn is_self_loop(&self) -> bool {
        self.source_subnet_id == self.target_subnet_id
    }

    /// Returns the source and target port ranges. For ICMP, this returns `Ok(None)`. For TCP and
    /// UDP, all four ports must be present.
    pub fn port_ranges(&self) -> Result<Option<(PortRange, PortRange)>, ConfigurationError> {
        if !self.protocol.has_ports() {
            return Ok(None);
        }
        match (
            self.source_port_start,
            self.source_port_end,
            self.target_port_start,
            self.target_port_end,
        ) {
            (Some(ss), Some(se), Some(ts), Some(te)) => {
                Ok(Some((PortRange::new(ss, se), PortRange::new(ts, te))))
            }
            _ => Err(ConfigurationError::MissingPorts(
                self.protocol,
                self.source_subnet_id,
                self.target_subnet_id,
            )),
        }
    }
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }
}

impl FromStr for Scenario {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

/// A scenario file found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioFile {
    /// Number of the scenario, taken from the filename.
    pub id: u64,
    /// Path to the file
    pub path: PathBuf,
}

/// List all scenario files (named `<id>.json`) in a directory, sorted by their id. Other files are
/// ignored. Two files with the same id (e.g., `7.json` and `007.json`) are an error.
pub fn scenario_files(dir: impl AsRef<Path>) -> Result<Vec<ScenarioFile>, LoadError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let id = SCENARIO_FILENAME
            .captures(name)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok());
        match id {
            Some(id) if path.is_file() => files.push(ScenarioFile { id, path }),
            _ => log::warn!("Skipping {}: not a scenario file", path.display()),
        }
    }
    files.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.path.cmp(&b.path)));
    if let Some((a, b)) = files.iter().tuple_windows().find(|(a, b)| a.id == b.id) {
        return Err(LoadError::DuplicateId(a.id, a.path.clone(), b.path.clone()));
    }
    Ok(files)
}

/// Error thrown while reading scenario files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O Error
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Cannot parse the JSON file.
    #[error("Cannot parse the scenario: {0}")]
    Json(#[from] serde_json::Error),
    /// Two scenario files have the same id, and would be written to the same output directory.
    #[error("Scenario {0} is defined twice: {} and {}", .1.display(), .2.display())]
    DuplicateId(u64, PathBuf, PathBuf),
}

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

//! This module contains the code for reading the configuration of the grading client.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::GraderError;

/// Environment variable pointing to the configuration file, used if no file is given explicitly.
pub const CONFIG_ENV_VAR: &str = "GRADER_CONFIG";

/// Configuration of the grading service. All fields are optional in the configuration file, and
/// fall back to the values of the course's verification service.
///
/// ```toml
/// server = "https://course.netsec.inf.ethz.ch//iptables"
/// submit_path = "/submit"
/// result_path = "/result"
/// poll_interval_secs = 1
/// rate_limit_backoff_secs = 5
/// total_routers = 167
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    /// Base URL of the verification service
    pub server: String,
    /// Path (appended to `server`) to which files are submitted.
    pub submit_path: String,
    /// Path (appended to `server`) from which results are fetched.
    pub result_path: String,
    /// Time to wait between two requests for a result that is still processing.
    pub poll_interval_secs: u64,
    /// Time to wait before submitting again when the server reports a rate limit.
    pub rate_limit_backoff_secs: u64,
    /// Number of routers across all test cases, used to compute the grade.
    pub total_routers: usize,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            server: "https://course.netsec.inf.ethz.ch//iptables".to_string(),
            submit_path: "/submit".to_string(),
            result_path: "/result".to_string(),
            poll_interval_secs: 1,
            rate_limit_backoff_secs: 5,
            total_routers: 167,
        }
    }
}

impl GraderConfig {
    /// Parse the configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GraderError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the configuration from `path`, or from the file in the environment variable
    /// [`CONFIG_ENV_VAR`] if `path` is `None`. If neither is given, the default configuration is
    /// used.
    pub fn load(path: Option<&Path>) -> Result<Self, GraderError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        match path {
            Some(path) => {
                log::debug!("Reading the grader configuration from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Full URL for submitting files
    pub fn submit_url(&self) -> String {
        format!("{}{}", self.server, self.submit_path)
    }

    /// Full URL for fetching results
    pub fn result_url(&self) -> String {
        format!("{}{}", self.server, self.result_path)
    }

    /// Time to wait between two polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Time to wait after the server responded with `429 Too Many Requests`.
    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_secs(self.rate_limit_backoff_secs)
    }
}

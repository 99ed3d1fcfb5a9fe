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

//! This library submits the generated rule files to the verification service of the course, and
//! computes the resulting score.
//!
//! # Workflow
//!
//! 1. Every router file of every test case in the solution directory is uploaded
//!    ([`GraderClient::submit_all`] or [`GraderClient::submit`]). The server answers with a
//!    submission id. If the server is rate-limiting, the client waits and tries again.
//! 2. For each submission, the client polls the server until the submission is processed
//!    ([`GraderClient::results`]).
//! 3. The verdicts are summarized into a [`Report`], counting the routers whose rules are
//!    equivalent to the reference solution.
//!
//! # Configuration
//!
//! The service is described by a [`GraderConfig`]. It is read from a TOML file, either given
//! explicitly or through the environment variable `GRADER_CONFIG`. Without any file, the default
//! configuration points to the course's service.

#![deny(missing_docs, missing_debug_implementations)]

use thiserror::Error;

mod client;
pub mod config;
pub mod discovery;
pub mod report;

#[cfg(test)]
mod test;

pub use client::{GraderClient, SubmissionId, Submissions};
pub use config::GraderConfig;
pub use discovery::Name;
pub use report::{Report, Results, Verdict};

/// Error type thrown while grading.
#[derive(Debug, Error)]
pub enum GraderError {
    /// I/O Error
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Cannot parse the configuration file
    #[error("Cannot parse the configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// The server responded with something unexpected.
    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),
}

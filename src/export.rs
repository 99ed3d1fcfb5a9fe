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

//! Writing the rule set to disk, one file per router.

use std::{
    fs::{create_dir_all, remove_file, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use thiserror::Error;

use crate::{
    rules::{RouterRules, RuleSet},
    types::RouterId,
};

/// Write the rules of a single router into `dir`, using the router id as filename. An existing
/// file is removed first, so the file is always replaced entirely. Returns the path of the file.
pub fn write_router(
    dir: impl AsRef<Path>,
    router: RouterId,
    rules: &RouterRules,
) -> Result<PathBuf, std::io::Error> {
    let file = dir.as_ref().join(router.to_string());
    if file.exists() {
        remove_file(&file)?;
    }
    let mut f = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&file)?;
    write!(f, "{rules}")?;
    Ok(file)
}

/// Write the rules of all routers into `dir`, creating the directory if necessary. A router whose
/// file cannot be written does not prevent writing the others. Returns the number of files written.
pub fn write_rule_set(dir: impl AsRef<Path>, rules: &RuleSet) -> Result<usize, ExportError> {
    let dir = dir.as_ref();
    create_dir_all(dir).map_err(|e| ExportError::OutputDir(dir.to_path_buf(), e))?;

    let mut failed = Vec::new();
    let mut written = 0;
    for (router, router_rules) in rules.iter() {
        match write_router(dir, router, router_rules) {
            Ok(file) => {
                log::trace!("Wrote {}", file.display());
                written += 1;
            }
            Err(e) => {
                log::error!("Cannot write the rules of router {router}: {e}");
                failed.push(router);
            }
        }
    }

    if failed.is_empty() {
        Ok(written)
    } else {
        Err(ExportError::Routers(failed))
    }
}

/// Error thrown while writing the rule set.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output directory cannot be created.
    #[error("Cannot create the output directory {}: {1}", .0.display())]
    OutputDir(PathBuf, #[source] std::io::Error),
    /// The files of some routers could not be written.
    #[error("Cannot write the rules of routers {}", .0.iter().join(", "))]
    Routers(Vec<RouterId>),
}

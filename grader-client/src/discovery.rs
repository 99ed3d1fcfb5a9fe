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

//! Finding the generated rule files in the solution directory. The solution directory contains one
//! sub-directory per test case, and each test case contains one file per router, named by the
//! router id.

use std::{fmt, path::Path};

use itertools::Itertools;

/// Name of a test case or a router. Names that are numbers are ordered numerically, and before all
/// other names. The original text is kept, so `007` still refers to the directory `007`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Name {
    /// A numeric name, with its value and its text as found on disk.
    Number(u64, String),
    /// Any other name
    Text(String),
}

impl Name {
    /// Returns `true` if the name is a number.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(n) => Self::Number(n, s.to_string()),
            Err(_) => Self::Text(s.to_string()),
        }
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(_, s) | Self::Text(s) => f.write_str(s),
        }
    }
}

/// Read all entries of a directory, returning the names of those matching the filter.
fn list_dir(
    dir: &Path,
    filter: impl Fn(&std::fs::FileType) -> bool,
) -> Result<Vec<String>, std::io::Error> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if filter(&entry.file_type()?) {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

/// List all test cases in the solution directory (all its sub-directories), in number-aware order.
pub fn testcases(solution_dir: impl AsRef<Path>) -> Result<Vec<Name>, std::io::Error> {
    Ok(list_dir(solution_dir.as_ref(), |t| t.is_dir())?
        .into_iter()
        .map(Name::from)
        .sorted()
        .collect())
}

/// List all routers of a test case directory, in numerical order. Files whose name is not a number
/// are ignored.
pub fn routers(testcase_dir: impl AsRef<Path>) -> Result<Vec<Name>, std::io::Error> {
    Ok(list_dir(testcase_dir.as_ref(), |t| t.is_file())?
        .into_iter()
        .map(Name::from)
        .filter(Name::is_number)
        .sorted()
        .collect())
}

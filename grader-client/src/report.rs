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

//! Verdicts of the verification service, and the score computed from them.

use std::{collections::BTreeMap, fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::{discovery::Name, GraderError};

/// Equivalence message of a router whose rules are correct.
pub const EQUIVALENT: &str = "Equivalent.";

/// Status of a submission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The server is still checking the submission.
    Processing,
    /// The server has checked the submission.
    Success,
    /// Any other status, which is unexpected.
    #[serde(other)]
    Unknown,
}

/// Response of the verification service for a single submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Verdict {
    /// Status of the submission
    pub status: Status,
    /// Result of the equivalence check, only present once the status is `success`.
    #[serde(default)]
    pub equivalence: Option<String>,
}

impl Verdict {
    /// Returns `true` if the submitted rules are equivalent to the reference solution.
    pub fn is_equivalent(&self) -> bool {
        self.equivalence.as_deref() == Some(EQUIVALENT)
    }
}

/// Verdicts of all routers, grouped by test case.
pub type Results = BTreeMap<Name, BTreeMap<Name, Verdict>>;

/// Score of a single test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestcaseScore {
    /// Name of the test case
    pub testcase: Name,
    /// Number of routers with equivalent rules
    pub correct: usize,
    /// Number of routers in the test case
    pub routers: usize,
}

impl TestcaseScore {
    /// Fraction of correct routers in this test case
    pub fn score(&self) -> f64 {
        if self.routers == 0 {
            0.0
        } else {
            self.correct as f64 / self.routers as f64
        }
    }
}

/// Summary of all verdicts.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Score of each test case, in number-aware order.
    pub testcases: Vec<TestcaseScore>,
    /// Number of correct routers across all test cases.
    pub correct: usize,
    /// Number of routers across all test cases.
    pub max_score: usize,
}

impl Report {
    /// Compute the report from the verdicts. `max_score` is the total number of routers of all
    /// test cases, which may be larger than the number of submitted routers.
    pub fn new(results: &Results, max_score: usize) -> Self {
        let testcases: Vec<TestcaseScore> = results
            .iter()
            .map(|(testcase, verdicts)| TestcaseScore {
                testcase: testcase.clone(),
                correct: verdicts.values().filter(|v| v.is_equivalent()).count(),
                routers: verdicts.len(),
            })
            .collect();
        let correct = testcases.iter().map(|t| t.correct).sum();
        Self {
            testcases,
            correct,
            max_score,
        }
    }

    /// Fraction of correct routers, between 0 and 1.
    pub fn score(&self) -> f64 {
        if self.max_score == 0 {
            0.0
        } else {
            self.correct as f64 / self.max_score as f64
        }
    }

    /// Project grade, between 1 and 6.
    pub fn grade(&self) -> f64 {
        self.score() * 5.0 + 1.0
    }

    /// Write the summary as JSON to a file, overwriting it if it exists.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), GraderError> {
        #[derive(Serialize)]
        struct OverallResult {
            score: usize,
            max_score: usize,
        }
        #[derive(Serialize)]
        struct Summary {
            #[serde(rename = "overall-result")]
            overall_result: OverallResult,
        }

        let summary = Summary {
            overall_result: OverallResult {
                score: self.correct,
                max_score: self.max_score,
            },
        };
        std::fs::write(path, serde_json::to_string(&summary)?)?;
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in self.testcases.iter() {
            writeln!(f, "Score for testcase {}: {:.2}", t.testcase, t.score())?;
        }
        writeln!(
            f,
            "You correctly generated config files for {} out of {} routers",
            self.correct, self.max_score
        )?;
        writeln!(f, "This corresponds to a score of {:.2}/1", self.score())?;
        writeln!(
            f,
            "This corresponds to a project grade of {:.2}/6",
            self.grade()
        )
    }
}

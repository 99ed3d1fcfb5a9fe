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

//! HTTP client for submitting rule files and fetching the verdicts.
//!
//! Submission ids, per-router verdicts and the waiting indicator are printed to stdout as the
//! user-facing output of the `evaluate` binary. Diagnostics (rate limiting, skipped test cases) go
//! through `log`.

use std::{collections::BTreeMap, io::Write, path::Path};

use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;

use crate::{
    config::GraderConfig,
    discovery::{self, Name},
    report::{Results, Status, Verdict},
    GraderError,
};

/// Identifier of a submission, as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionId(pub String);

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Submission ids of all routers, grouped by test case.
pub type Submissions = BTreeMap<Name, BTreeMap<Name, SubmissionId>>;

/// Response to a submission
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    /// Id of the new submission, either a string or a number.
    submission_id: serde_json::Value,
}

/// Client of the verification service.
#[derive(Debug, Clone)]
pub struct GraderClient {
    /// The HTTP client, reused for all requests.
    http: Client,
    /// Configuration of the service
    config: GraderConfig,
}

impl GraderClient {
    /// Create a new client for the service described in `config`.
    pub fn new(config: GraderConfig) -> Result<Self, GraderError> {
        Ok(Self {
            http: Client::builder().build()?,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &GraderConfig {
        &self.config
    }

    /// Submit the rule file of a single router. If the server responds with `429 Too Many
    /// Requests`, wait for the configured backoff and try again.
    pub async fn submit_file(
        &self,
        testcase: &Name,
        router: &Name,
        file: &Path,
    ) -> Result<SubmissionId, GraderError> {
        let content = tokio::fs::read(file).await?;
        let query = [
            ("testcase", testcase.to_string()),
            ("router", router.to_string()),
        ];

        let response = loop {
            let form = multipart::Form::new().part(
                "file",
                multipart::Part::bytes(content.clone()).file_name(router.to_string()),
            );
            let response = self
                .http
                .post(self.config.submit_url())
                .query(&query)
                .multipart(form)
                .send()
                .await?;
            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                log::warn!(
                    "Rate limit reached, retrying in {}s",
                    self.config.rate_limit_backoff_secs
                );
                tokio::time::sleep(self.config.rate_limit_backoff()).await;
            } else {
                break response;
            }
        };

        let body = response.text().await?;
        let id = match serde_json::from_str::<SubmitResponse>(&body) {
            Ok(SubmitResponse {
                submission_id: serde_json::Value::String(s),
            }) => s,
            Ok(SubmitResponse {
                submission_id: serde_json::Value::Number(n),
            }) => n.to_string(),
            _ => return Err(GraderError::UnexpectedResponse(body)),
        };

        println!("Testcase {testcase}, router {router} has submission id: {id}");
        Ok(SubmissionId(id))
    }

    /// Submit all routers of the given test cases. Test cases that are not a directory in
    /// `solution_dir` are skipped.
    pub async fn submit(
        &self,
        solution_dir: impl AsRef<Path>,
        testcases: &[Name],
    ) -> Result<Submissions, GraderError> {
        let solution_dir = solution_dir.as_ref();
        let mut submissions = Submissions::new();
        for testcase in testcases {
            let testcase_dir = solution_dir.join(testcase.to_string());
            if !testcase_dir.is_dir() {
                log::warn!("Skipping {}: not a directory", testcase_dir.display());
                continue;
            }
            let ids = submissions.entry(testcase.clone()).or_default();
            for router in discovery::routers(&testcase_dir)? {
                let file = testcase_dir.join(router.to_string());
                let id = self.submit_file(testcase, &router, &file).await?;
                ids.insert(router, id);
            }
        }
        Ok(submissions)
    }

    /// Submit all test cases found in `solution_dir`.
    pub async fn submit_all(
        &self,
        solution_dir: impl AsRef<Path>,
    ) -> Result<Submissions, GraderError> {
        let testcases = discovery::testcases(solution_dir.as_ref())?;
        self.submit(solution_dir, &testcases).await
    }

    /// Wait until the server has checked the submission, and return its verdict. While waiting,
    /// a progress indicator is printed.
    pub async fn result(&self, id: &SubmissionId) -> Result<Verdict, GraderError> {
        let mut waiting = false;
        let verdict = loop {
            let body = self
                .http
                .get(self.config.result_url())
                .query(&[("submission_id", &id.0)])
                .send()
                .await?
                .text()
                .await?;
            let verdict: Verdict = serde_json::from_str(&body)
                .map_err(|_| GraderError::UnexpectedResponse(body.clone()))?;

            if verdict.status != Status::Processing {
                break verdict;
            }

            let mut stdout = std::io::stdout();
            if waiting {
                write!(stdout, ".")?;
            } else {
                write!(stdout, "Server not done, waiting ")?;
                waiting = true;
            }
            stdout.flush()?;
            tokio::time::sleep(self.config.poll_interval()).await;
        };

        if waiting {
            println!();
        }

        match verdict.status {
            Status::Success => Ok(verdict),
            _ => Err(GraderError::UnexpectedResponse(format!("{verdict:?}"))),
        }
    }

    /// Fetch the verdicts of all submissions.
    pub async fn results(&self, submissions: &Submissions) -> Result<Results, GraderError> {
        let mut results = Results::new();
        for (testcase, ids) in submissions {
            let verdicts = results.entry(testcase.clone()).or_default();
            for (router, id) in ids {
                let verdict = self.result(id).await?;
                println!(
                    "Testcase: {testcase}, Router: {router} is {}",
                    verdict.equivalence.as_deref().unwrap_or("?")
                );
                verdicts.insert(router.clone(), verdict);
            }
        }
        Ok(results)
    }
}

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

use std::path::PathBuf;

use clap::Parser;
use grader_client::{GraderClient, GraderConfig, Name, Report};

/// Submit the generated rule files to the verification service and print the resulting score.
#[derive(Debug, Parser)]
struct Cli {
    /// Test cases to submit. By default, all test cases in the solution directory are submitted.
    #[clap(value_name = "TESTCASE")]
    testcases: Vec<String>,
    /// Directory containing one sub-directory per test case, as written by `iptables-synth`.
    #[clap(long = "solution_dir", short = 's', default_value = "outputs")]
    solution_dir: PathBuf,
    /// Write the overall result as JSON into this file.
    #[clap(long = "output_file", short = 'o')]
    output_file: Option<PathBuf>,
    /// Configuration file of the verification service. Falls back to `$GRADER_CONFIG`, and then
    /// to the default service.
    #[clap(long = "config", short = 'c')]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();
    let config = GraderConfig::load(args.config.as_deref())?;
    let client = GraderClient::new(config)?;

    let submissions = if args.testcases.is_empty() {
        client.submit_all(&args.solution_dir).await?
    } else {
        let testcases: Vec<Name> = args.testcases.into_iter().map(Name::from).collect();
        client.submit(&args.solution_dir, &testcases).await?
    };

    let results = client.results(&submissions).await?;
    let report = Report::new(&results, client.config().total_routers);
    print!("{report}");

    if let Some(file) = args.output_file {
        report.write_json(file)?;
    }

    Ok(())
}

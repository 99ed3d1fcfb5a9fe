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

use std::path::{Path, PathBuf};

use clap::Parser;
use itertools::Itertools;
use rayon::prelude::*;

use iptables_synth::{
    export::write_rule_set,
    scenario::{scenario_files, Scenario, ScenarioFile},
    synthesize_scenario,
};

/// Generate the iptables configuration of all routers for each scenario in the input directory.
#[derive(Debug, Parser)]
struct Cli {
    /// The path to the directory with input files (named `<id>.json`).
    #[clap(short = 'i', long = "input", default_value = "inputs/")]
    input: PathBuf,
    /// The path to the directory where output files will be written to. The rules of router `r` in
    /// scenario `n` are written to `<output>/<n>/<r>`.
    #[clap(short = 'o', long = "output", default_value = "outputs/")]
    output: PathBuf,
    /// Only process the scenarios with these ids. By default, all scenarios are processed.
    scenarios: Vec<u64>,
}

/// Error type of a single scenario
type ScenarioResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();

    let mut files = scenario_files(&args.input)?;
    if !args.scenarios.is_empty() {
        for id in args.scenarios.iter() {
            if !files.iter().any(|f| f.id == *id) {
                log::warn!("Scenario {id} does not exist in {}", args.input.display());
            }
        }
        files.retain(|f| args.scenarios.contains(&f.id));
    }

    // scenarios are independent of each other, and can thus be processed in parallel.
    let failed: Vec<u64> = files
        .par_iter()
        .filter_map(|file| match run(file, &args.output) {
            Ok(num_routers) => {
                log::info!("Scenario {}: wrote rules for {num_routers} routers", file.id);
                None
            }
            Err(e) => {
                log::error!("Scenario {}: {e}", file.id);
                Some(file.id)
            }
        })
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Failed to process the scenarios {}",
            failed.iter().sorted().join(", ")
        )
        .into())
    }
}

/// Read a scenario, generate the rules and write them to `<output>/<id>`.
fn run(file: &ScenarioFile, output: &Path) -> ScenarioResult<usize> {
    let scenario = Scenario::from_file(&file.path)?;
    let rules = synthesize_scenario(&scenario)?;
    Ok(write_rule_set(output.join(file.id.to_string()), &rules)?)
}

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

use maplit::btreemap;
use pretty_assertions::assert_eq;

use crate::{
    discovery::Name,
    report::{Report, Results, Status, TestcaseScore, Verdict},
};

fn verdict(equivalent: bool) -> Verdict {
    Verdict {
        status: Status::Success,
        equivalence: Some(if equivalent {
            "Equivalent.".to_string()
        } else {
            "Not equivalent.".to_string()
        }),
    }
}

fn results() -> Results {
    btreemap! {
        Name::from("1") => btreemap! {
            Name::from("1") => verdict(true),
            Name::from("2") => verdict(false),
        },
        Name::from("2") => btreemap! {
            Name::from("1") => verdict(true),
            Name::from("2") => verdict(true),
            Name::from("3") => verdict(true),
            Name::from("4") => verdict(false),
        },
    }
}

#[test]
fn parse_verdicts() {
    let processing: Verdict = serde_json::from_str(r#"{"status": "processing"}"#).unwrap();
    assert_eq!(processing.status, Status::Processing);
    assert!(!processing.is_equivalent());

    let done: Verdict = serde_json::from_str(
        r#"{"status": "success", "testcase": 1, "router": "2", "equivalence": "Equivalent."}"#,
    )
    .unwrap();
    assert_eq!(done.status, Status::Success);
    assert!(done.is_equivalent());

    let failed: Verdict = serde_json::from_str(r#"{"status": "error"}"#).unwrap();
    assert_eq!(failed.status, Status::Unknown);
}

#[test]
fn report_scores() {
    let report = Report::new(&results(), 10);
    assert_eq!(
        report.testcases,
        vec![
            TestcaseScore {
                testcase: Name::from("1"),
                correct: 1,
                routers: 2
            },
            TestcaseScore {
                testcase: Name::from("2"),
                correct: 3,
                routers: 4
            },
        ]
    );
    assert_eq!(report.testcases[0].score(), 0.5);
    assert_eq!(report.testcases[1].score(), 0.75);
    assert_eq!(report.correct, 4);
    assert_eq!(report.score(), 0.4);
    assert_eq!(report.grade(), 3.0);
}

#[test]
fn report_display() {
    let report = Report::new(&results(), 10);
    assert_eq!(
        report.to_string(),
        "Score for testcase 1: 0.50\n\
         Score for testcase 2: 0.75\n\
         You correctly generated config files for 4 out of 10 routers\n\
         This corresponds to a score of 0.40/1\n\
         This corresponds to a project grade of 3.00/6\n"
    );
}

#[test]
fn report_json() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("result.json");
    Report::new(&results(), 167).write_json(&file).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"overall-result": {"score": 4, "max_score": 167}})
    );
}

#[test]
fn empty_report() {
    let report = Report::new(&Results::new(), 0);
    assert_eq!(report.correct, 0);
    assert_eq!(report.score(), 0.0);
    assert_eq!(report.grade(), 1.0);
}

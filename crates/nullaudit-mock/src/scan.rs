//! Keyword scanner
//!
//! "Detection" here is plain substring matching, line by line. It exists so the
//! dashboard has something to show for a submitted contract; it is not analysis.

use nullaudit_domain::{Priority, ScanFinding, ScanReport};
use std::collections::BTreeMap;

struct Detector {
    name: &'static str,
    title: &'static str,
    severity: Priority,
    keywords: &'static [&'static str],
}

const DETECTORS: &[Detector] = &[
    Detector {
        name: "controlled-delegatecall",
        title: "Unsafe delegatecall",
        severity: Priority::Critical,
        keywords: &["delegatecall"],
    },
    Detector {
        name: "suicidal",
        title: "Contract can self-destruct",
        severity: Priority::Critical,
        keywords: &["selfdestruct", "suicide("],
    },
    Detector {
        name: "reentrancy-eth",
        title: "External call with value",
        severity: Priority::High,
        keywords: &[".call{value", ".call.value("],
    },
    Detector {
        name: "tx-origin",
        title: "Authorization through tx.origin",
        severity: Priority::High,
        keywords: &["tx.origin"],
    },
    Detector {
        name: "unchecked-send",
        title: "Unchecked send",
        severity: Priority::Medium,
        keywords: &[".send("],
    },
    Detector {
        name: "weak-prng",
        title: "Weak randomness source",
        severity: Priority::Medium,
        keywords: &["block.timestamp", "blockhash("],
    },
    Detector {
        name: "unchecked-arithmetic",
        title: "Unchecked arithmetic block",
        severity: Priority::Medium,
        keywords: &["unchecked {", "unchecked{"],
    },
    Detector {
        name: "assembly",
        title: "Inline assembly",
        severity: Priority::Low,
        keywords: &["assembly {", "assembly{"],
    },
    Detector {
        name: "solc-version",
        title: "Outdated or floating compiler version",
        severity: Priority::Low,
        keywords: &["pragma solidity ^0.4", "pragma solidity ^0.5", "pragma solidity ^0.6"],
    },
];

/// Scan source text and report every (detector, line) hit in source order
///
/// A detector reports at most once per line, naming the first of its keywords
/// found there.
///
/// # Examples
///
/// ```
/// use nullaudit_domain::Priority;
/// use nullaudit_mock::scan_source;
///
/// let report = scan_source("require(tx.origin == owner);");
/// assert_eq!(report.findings.len(), 1);
/// assert_eq!(report.findings[0].severity, Priority::High);
/// ```
pub fn scan_source(code: &str) -> ScanReport {
    let mut findings = Vec::new();
    let mut lines_scanned = 0;

    for (idx, line) in code.lines().enumerate() {
        lines_scanned += 1;
        for detector in DETECTORS {
            if let Some(keyword) = detector.keywords.iter().find(|k| line.contains(*k)) {
                findings.push(ScanFinding {
                    detector: detector.name.to_string(),
                    title: detector.title.to_string(),
                    severity: detector.severity,
                    line: (idx + 1) as u32,
                    matched: keyword.to_string(),
                });
            }
        }
    }

    let mut summary: BTreeMap<Priority, usize> = Priority::ALL.iter().map(|p| (*p, 0)).collect();
    for finding in &findings {
        *summary.entry(finding.severity).or_insert(0) += 1;
    }

    ScanReport {
        lines_scanned,
        findings,
        summary,
    }
}

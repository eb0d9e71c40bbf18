//! Perft runs and suite checks.

use std::time::Instant;

use chess_engine::{perft, perft_divide, InvalidFen, Position};
use serde::Serialize;
use tracing::{error, info};

use crate::config::SuiteConfig;

/// Node count below one root move.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DivideEntry {
    #[serde(rename = "move")]
    pub uci: String,
    pub nodes: u64,
}

/// Result of a single perft run, printable as text or JSON.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PerftReport {
    pub fen: String,
    pub depth: u32,
    pub nodes: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub divide: Vec<DivideEntry>,
}

impl PerftReport {
    /// Plain text rendering: one `move: nodes` line per root move when
    /// divided, then the total.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.divide {
            out.push_str(&format!("{}: {}\n", entry.uci, entry.nodes));
        }
        if !self.divide.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("Nodes searched: {}", self.nodes));
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs perft on `fen` (variant prefix allowed) to `depth`.
pub fn run(fen: &str, depth: u32, divide: bool) -> Result<PerftReport, InvalidFen> {
    let position = Position::from_fen(fen)?;
    let started = Instant::now();

    let (nodes, divide) = if divide {
        let entries: Vec<DivideEntry> = perft_divide(&position, depth)
            .into_iter()
            .map(|(uci, nodes)| DivideEntry { uci, nodes })
            .collect();
        (entries.iter().map(|e| e.nodes).sum(), entries)
    } else {
        (perft(&position, depth), Vec::new())
    };

    info!(depth, nodes, elapsed_ms = started.elapsed().as_millis() as u64, "perft finished");
    Ok(PerftReport {
        fen: fen.to_string(),
        depth,
        nodes,
        divide,
    })
}

/// A depth whose count differs from the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub depth: u32,
    pub expected: u64,
    pub actual: u64,
}

/// Outcome of checking one suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteOutcome {
    Passed { depths: usize },
    Failed(Vec<Mismatch>),
    InvalidFen(String),
}

impl SuiteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SuiteOutcome::Passed { .. })
    }
}

/// Checks every expected depth of one suite.
pub fn check_suite(name: &str, suite: &SuiteConfig) -> SuiteOutcome {
    let position = match Position::from_fen(&suite.fen) {
        Ok(position) => position,
        Err(e) => {
            error!(suite = name, "{}", e);
            return SuiteOutcome::InvalidFen(e.to_string());
        }
    };

    let mut mismatches = Vec::new();
    for (index, &expected) in suite.expected.iter().enumerate() {
        let depth = index as u32 + 1;
        let actual = perft(&position, depth);
        if actual == expected {
            info!(suite = name, depth, nodes = actual, "ok");
        } else {
            error!(suite = name, depth, expected, actual, "perft mismatch");
            mismatches.push(Mismatch {
                depth,
                expected,
                actual,
            });
        }
    }

    if mismatches.is_empty() {
        SuiteOutcome::Passed {
            depths: suite.expected.len(),
        }
    } else {
        SuiteOutcome::Failed(mismatches)
    }
}

// File: src/summary.rs
use crate::core::types::Resolution;
use crossterm::style::Stylize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{self, Write};

/// How many unresolved runs the terminal summary lists before eliding.
pub const UNRESOLVED_DISPLAY_LIMIT: usize = 20;

/// Tallies for one pass over a record list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Tokens read from the record list.
    pub tokens: usize,
    /// Artifacts written.
    pub converted: usize,
    /// Tokens without any letters.
    pub no_op: usize,
    /// Tokens with at least one unknown run.
    pub failed: usize,
    /// Tokens that converted but cannot be used as a file name.
    pub rejected: usize,
    /// Tokens that converted but whose artifact could not be written.
    #[serde(default)]
    pub write_failed: usize,
    pub runs_total: usize,
    pub runs_resolved: usize,
    /// Percentage of runs found in the dictionary.
    pub conversion_rate: f64,
    /// Unknown runs, deduplicated, in first-seen order.
    pub unresolved: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for one token. `runs` is the number of letter runs in the
    /// token and `unresolved_runs` the ones missing from the dictionary.
    pub fn record(&mut self, resolution: &Resolution, runs: usize, unresolved_runs: &[&str]) {
        self.tokens += 1;
        match resolution {
            Resolution::Converted(_) => self.converted += 1,
            Resolution::NoOp => self.no_op += 1,
            Resolution::Unresolved { .. } => self.failed += 1,
        }

        self.runs_total += runs;
        self.runs_resolved += runs.saturating_sub(unresolved_runs.len());
        for run in unresolved_runs {
            if self.seen.insert((*run).to_string()) {
                self.unresolved.push((*run).to_string());
            }
        }

        self.conversion_rate = if self.runs_total > 0 {
            self.runs_resolved as f64 / self.runs_total as f64 * 100.0
        } else {
            0.0
        };
    }

    /// Moves a token counted as converted over to `rejected`.
    pub fn reject_last_conversion(&mut self) {
        self.converted = self.converted.saturating_sub(1);
        self.rejected += 1;
    }

    /// Moves a token counted as converted over to `write_failed`.
    pub fn fail_last_write(&mut self) {
        self.converted = self.converted.saturating_sub(1);
        self.write_failed += 1;
    }

    /// Writes the human-readable summary.
    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", "--- Conversion summary ---".bold())?;
        writeln!(out, "Tokens read: {}", self.tokens)?;
        writeln!(out, "Artifacts written: {}", self.converted)?;
        writeln!(out, "Skipped (no pinyin): {}", self.no_op)?;
        writeln!(out, "Skipped (unresolved): {}", self.failed)?;
        if self.rejected > 0 {
            writeln!(out, "Skipped (unusable file name): {}", self.rejected)?;
        }
        if self.write_failed > 0 {
            writeln!(
                out,
                "{}",
                format!("Artifacts that could not be written: {}", self.write_failed).red()
            )?;
        }
        if self.runs_total > 0 {
            writeln!(
                out,
                "Pinyin resolved: {}/{} ({:.2}%)",
                self.runs_resolved, self.runs_total, self.conversion_rate
            )?;
        }

        if self.unresolved.is_empty() {
            if self.runs_total > 0 {
                writeln!(out, "{}", "Every pinyin run was found in the library.".green())?;
            }
            return Ok(());
        }

        writeln!(
            out,
            "{}",
            format!("{} pinyin runs not found in the library:", self.unresolved.len()).yellow()
        )?;
        for run in self.unresolved.iter().take(UNRESOLVED_DISPLAY_LIMIT) {
            writeln!(out, "  - {}", run)?;
        }
        if self.unresolved.len() > UNRESOLVED_DISPLAY_LIMIT {
            writeln!(
                out,
                "  ... and {} more",
                self.unresolved.len() - UNRESOLVED_DISPLAY_LIMIT
            )?;
        }
        Ok(())
    }
}

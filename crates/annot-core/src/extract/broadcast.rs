//! Field-aligned record construction with the broadcast rule.
//!
//! Each field pattern is matched independently within a candidate, then the
//! per-field match lists are aligned by row index: row `i` takes match `i`
//! of every field that has one. A field that matched exactly once is
//! broadcast across every row; rows past the end of a shorter match list
//! fall back to the field default. A field that matched more than once but
//! fewer times than the longest list gets its default for the remaining
//! rows; its extra matches are not stretched or repeated. That asymmetry
//! is the intended alignment rule, not an oversight.

use regex::Regex;

use crate::error::ExtractError;
use crate::models::record::Record;
use crate::models::schema::Field;
use crate::worker::cancel::CancelToken;

/// Candidate length in bytes above which matching also polls for
/// cancellation between field scans.
const LARGE_CANDIDATE_BYTES: usize = 64 * 1024;

/// Per-field pattern state, compiled once per run.
#[derive(Debug)]
enum FieldPattern {
    /// Empty pattern: never attempted, the field always takes its default.
    Unset,
    Compiled(Regex),
}

/// Applies one compiled pattern per field to candidates, aligning the
/// independent match lists into records.
#[derive(Debug)]
pub struct BroadcastMatcher<'a> {
    fields: &'a [Field],
    patterns: Vec<FieldPattern>,
}

impl<'a> BroadcastMatcher<'a> {
    /// Compile `field_patterns` against `fields`.
    ///
    /// Only the first `fields.len()` patterns are used; fields without a
    /// pattern always take their default. An invalid pattern fails the
    /// whole compilation, reported with its pattern-set index (field `j`
    /// lives at `j + 1`, after the master pattern).
    pub fn compile(fields: &'a [Field], field_patterns: &[String]) -> Result<Self, ExtractError> {
        let mut patterns = Vec::with_capacity(fields.len());
        for j in 0..fields.len() {
            let pattern = field_patterns.get(j).map(String::as_str).unwrap_or("");
            if pattern.is_empty() {
                patterns.push(FieldPattern::Unset);
            } else {
                let regex = Regex::new(pattern).map_err(|e| ExtractError::PatternSyntax {
                    index: j + 1,
                    message: e.to_string(),
                })?;
                patterns.push(FieldPattern::Compiled(regex));
            }
        }
        Ok(Self { fields, patterns })
    }

    /// Extract every aligned record from one candidate.
    ///
    /// Returns one record per row up to the longest match list, or an empty
    /// list when no field matched at all. Returns `None` when `cancel`
    /// fired while scanning a large candidate; nothing partial is ever
    /// handed back.
    pub fn records_for(&self, candidate: &str, cancel: &CancelToken) -> Option<Vec<Record>> {
        let poll = candidate.len() > LARGE_CANDIDATE_BYTES;

        let mut match_lists: Vec<Vec<&str>> = Vec::with_capacity(self.patterns.len());
        for pattern in &self.patterns {
            if poll && cancel.is_cancelled() {
                return None;
            }
            let matches = match pattern {
                FieldPattern::Unset => Vec::new(),
                FieldPattern::Compiled(regex) => {
                    regex.find_iter(candidate).map(|m| m.as_str()).collect()
                }
            };
            match_lists.push(matches);
        }

        let max_match_count = match_lists.iter().map(Vec::len).max().unwrap_or(0);
        if max_match_count == 0 {
            return Some(Vec::new());
        }

        let mut records = Vec::with_capacity(max_match_count);
        for row in 0..max_match_count {
            let mut record = Record::new();
            for (field, matches) in self.fields.iter().zip(&match_lists) {
                let value = if matches.len() > row {
                    matches[row]
                } else if matches.len() == 1 {
                    // Single match: broadcast to every row.
                    matches[0]
                } else {
                    field.default.as_str()
                };
                record.push(&field.name, value);
            }
            records.push(record);
        }
        Some(records)
    }
}

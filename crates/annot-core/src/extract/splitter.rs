//! Candidate splitting with the master pattern.

use regex::Regex;
use tracing::debug;

use crate::error::ExtractError;

/// Result of applying the master pattern to the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterSplit {
    /// Matched substrings in text order, possibly truncated.
    pub candidates: Vec<String>,
    /// True match count, before truncation.
    pub total_matches: usize,
}

impl MasterSplit {
    /// Whether the candidate list was cut short by a preview limit.
    pub fn is_truncated(&self) -> bool {
        self.candidates.len() < self.total_matches
    }
}

/// Apply `master_pattern` to `text`, collecting matched substrings in order.
///
/// `limit` caps the returned candidates for interactive display; the true
/// match count is always counted in full. Commit extraction passes `None`
/// and receives every match. An empty master pattern is never attempted and
/// yields zero candidates.
pub fn split_candidates(
    text: &str,
    master_pattern: &str,
    limit: Option<usize>,
) -> Result<MasterSplit, ExtractError> {
    if master_pattern.is_empty() {
        return Ok(MasterSplit {
            candidates: Vec::new(),
            total_matches: 0,
        });
    }

    let master = Regex::new(master_pattern).map_err(|e| ExtractError::PatternSyntax {
        index: 0,
        message: e.to_string(),
    })?;

    let mut candidates = Vec::new();
    let mut total_matches = 0;
    for found in master.find_iter(text) {
        total_matches += 1;
        if limit.is_none_or(|cap| candidates.len() < cap) {
            candidates.push(found.as_str().to_string());
        }
    }

    debug!(total_matches, kept = candidates.len(), "master pattern applied");

    Ok(MasterSplit {
        candidates,
        total_matches,
    })
}

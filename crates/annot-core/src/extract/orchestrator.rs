//! Run orchestration: candidate iteration, cancellation, and progress.

use std::time::Instant;

use tracing::debug;

use crate::error::ExtractError;
use crate::models::annotation::AnnotationType;
use crate::models::record::{CandidateGroup, RunOutcome, RunOutput};
use crate::worker::cancel::CancelToken;

use super::broadcast::BroadcastMatcher;
use super::progress::{ProgressSink, ProgressTracker};
use super::splitter::{split_candidates, MasterSplit};

/// One extraction request: an owned snapshot of everything a run needs.
///
/// The snapshot is moved into the worker task, so concurrent edits on the
/// submitting side can never race a running extraction.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Source text to annotate.
    pub text: String,
    /// Annotation type supplying the schema and pattern set.
    pub annotation: AnnotationType,
    /// Candidate cap for interactive previews; `None` visits every match.
    pub preview_limit: Option<usize>,
}

/// Execute one full extraction run.
///
/// Candidates are visited in text order; cancellation is checked before
/// each one. On cancellation all accumulated groups are discarded and
/// `RunOutcome::Aborted` is returned; partial output is never published.
/// Progress is reported after each candidate and reaches 100 exactly once,
/// immediately so when there are no candidates at all.
pub fn run_extraction(
    request: &ExtractionRequest,
    cancel: &CancelToken,
    progress: &dyn ProgressSink,
) -> Result<RunOutcome, ExtractError> {
    let started = Instant::now();

    let annotation = &request.annotation;
    if annotation.fields.is_empty() {
        return Err(ExtractError::EmptySchema);
    }

    let MasterSplit {
        candidates,
        total_matches,
    } = split_candidates(
        &request.text,
        annotation.master_pattern(),
        request.preview_limit,
    )?;
    let matcher = BroadcastMatcher::compile(&annotation.fields, annotation.field_patterns())?;

    let mut tracker = ProgressTracker::new(progress);
    let total = candidates.len();
    if total == 0 {
        tracker.finish();
        return Ok(RunOutcome::Completed(RunOutput {
            groups: Vec::new(),
            total_candidates: total_matches,
            processing_time_ms: started.elapsed().as_millis() as u64,
        }));
    }

    let mut groups = Vec::with_capacity(total);
    for (done, candidate) in candidates.into_iter().enumerate() {
        if cancel.is_cancelled() {
            debug!(completed = done, total, "extraction run aborted");
            return Ok(RunOutcome::Aborted);
        }

        let Some(records) = matcher.records_for(&candidate, cancel) else {
            debug!(completed = done, total, "extraction run aborted mid-candidate");
            return Ok(RunOutcome::Aborted);
        };
        groups.push(CandidateGroup { candidate, records });
        tracker.completed(done + 1, total);
    }

    let output = RunOutput {
        groups,
        total_candidates: total_matches,
        processing_time_ms: started.elapsed().as_millis() as u64,
    };
    debug!(
        candidates = output.groups.len(),
        records = output.record_count(),
        elapsed_ms = output.processing_time_ms,
        "extraction run completed"
    );
    Ok(RunOutcome::Completed(output))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use crate::models::schema::Field;

    use super::*;

    struct Recording(Mutex<Vec<u8>>);

    impl Recording {
        fn new() -> Self {
            Self(Mutex::new(Vec::new()))
        }

        fn seen(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ProgressSink for Recording {
        fn publish(&self, percent: u8) {
            self.0.lock().unwrap().push(percent);
        }
    }

    fn annotation(field_specs: &[(&str, &str)], patterns: &[&str]) -> AnnotationType {
        let mut annotation = AnnotationType::new("test");
        annotation.fields = field_specs
            .iter()
            .map(|(name, default)| Field::new(*name).with_default(*default))
            .collect();
        annotation.patterns = patterns.iter().map(|p| p.to_string()).collect();
        annotation
    }

    fn request(text: &str, annotation: AnnotationType) -> ExtractionRequest {
        ExtractionRequest {
            text: text.to_string(),
            annotation,
            preview_limit: None,
        }
    }

    fn completed(outcome: RunOutcome) -> RunOutput {
        match outcome {
            RunOutcome::Completed(output) => output,
            RunOutcome::Aborted => panic!("run was aborted"),
        }
    }

    #[test]
    fn test_groups_follow_candidate_order() {
        let req = request(
            "AB cd\nEF gh",
            annotation(&[("cat", ""), ("tag", "")], &["[A-Z]+ [a-z]+", "[A-Z]+", "[a-z]+"]),
        );
        let sink = Recording::new();

        let output = completed(run_extraction(&req, &CancelToken::new(), &sink).unwrap());

        assert_eq!(output.groups.len(), 2);
        assert_eq!(output.groups[0].candidate, "AB cd");
        assert_eq!(output.groups[0].records[0].get("cat"), Some("AB"));
        assert_eq!(output.groups[1].candidate, "EF gh");
        assert_eq!(output.groups[1].records[0].get("tag"), Some("gh"));
        assert_eq!(sink.seen(), vec![50, 100]);
    }

    #[test]
    fn test_empty_schema_is_an_error() {
        let req = request("text", annotation(&[], &["x"]));
        let result = run_extraction(&req, &CancelToken::new(), &Recording::new());
        assert_eq!(result, Err(ExtractError::EmptySchema));
    }

    #[test]
    fn test_zero_candidates_reports_100_immediately() {
        let req = request("no digits here", annotation(&[("n", "")], &["\\d+", "\\d"]));
        let sink = Recording::new();

        let output = completed(run_extraction(&req, &CancelToken::new(), &sink).unwrap());

        assert!(output.groups.is_empty());
        assert_eq!(output.total_candidates, 0);
        assert_eq!(sink.seen(), vec![100]);
    }

    #[test]
    fn test_preview_limit_truncates_but_reports_true_total() {
        let mut req = request("1 2 3 4 5", annotation(&[("n", "")], &["\\d", "\\d"]));
        req.preview_limit = Some(2);

        let output = completed(run_extraction(&req, &CancelToken::new(), &Recording::new()).unwrap());

        assert_eq!(output.groups.len(), 2);
        assert_eq!(output.total_candidates, 5);
        assert!(output.is_truncated());
    }

    #[test]
    fn test_master_syntax_error_propagates() {
        let req = request("text", annotation(&[("n", "")], &["[", "x"]));
        match run_extraction(&req, &CancelToken::new(), &Recording::new()) {
            Err(ExtractError::PatternSyntax { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected pattern syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_field_syntax_error_propagates() {
        let req = request("text", annotation(&[("n", "")], &["x", "["]));
        match run_extraction(&req, &CancelToken::new(), &Recording::new()) {
            Err(ExtractError::PatternSyntax { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected pattern syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_cancelled_before_start_aborts_silently() {
        let req = request("1 2 3", annotation(&[("n", "")], &["\\d", "\\d"]));
        let cancel = CancelToken::new();
        cancel.cancel();
        let sink = Recording::new();

        let outcome = run_extraction(&req, &cancel, &sink).unwrap();

        assert_eq!(outcome, RunOutcome::Aborted);
        assert!(sink.seen().is_empty());
    }

    #[test]
    fn test_mid_run_cancellation_discards_all_groups() {
        struct CancelAtHalf {
            cancel: CancelToken,
            seen: Mutex<Vec<u8>>,
        }

        impl ProgressSink for CancelAtHalf {
            fn publish(&self, percent: u8) {
                self.seen.lock().unwrap().push(percent);
                if percent >= 50 {
                    self.cancel.cancel();
                }
            }
        }

        let req = request("1 2 3 4", annotation(&[("n", "")], &["\\d", "\\d"]));
        let cancel = CancelToken::new();
        let sink = CancelAtHalf {
            cancel: cancel.clone(),
            seen: Mutex::new(Vec::new()),
        };

        let outcome = run_extraction(&req, &cancel, &sink).unwrap();

        assert_eq!(outcome, RunOutcome::Aborted);
        // Progress stopped right after the cancelling update; 100 was never
        // reached and no partial groups escaped.
        assert_eq!(*sink.seen.lock().unwrap(), vec![25, 50]);
    }

    #[test]
    fn test_identical_inputs_yield_identical_groups() {
        let req = request(
            "a1 b2 c3",
            annotation(&[("w", ""), ("n", "")], &["[a-z]\\d", "[a-z]", "\\d"]),
        );

        let first = completed(run_extraction(&req, &CancelToken::new(), &Recording::new()).unwrap());
        let second = completed(run_extraction(&req, &CancelToken::new(), &Recording::new()).unwrap());

        assert_eq!(first.groups, second.groups);
        assert_eq!(first.total_candidates, second.total_candidates);
    }
}

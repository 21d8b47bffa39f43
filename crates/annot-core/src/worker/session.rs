//! Interactive extraction session: the worker plus the committed result.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::ExtractError;
use crate::extract::orchestrator::{run_extraction, ExtractionRequest};
use crate::models::record::{RunOutcome, RunOutput};

use super::CancellableWorker;

/// Receives session events on the worker thread.
///
/// Every method defaults to a no-op so observers implement only what they
/// need.
pub trait SessionObserver: Send + Sync {
    /// A run reported progress (0–100, monotone, one terminal 100).
    fn on_progress(&self, _percent: u8) {}

    /// A run completed and its output became the committed result.
    fn on_committed(&self, _output: &RunOutput) {}

    /// A run or task failed. Superseded runs are not failures and are
    /// never reported here.
    fn on_error(&self, _error: &ExtractError) {}
}

/// Live extraction session.
///
/// Submits runs to a single cancellable worker and retains the output of
/// the last completed run. A newer request supersedes an older one;
/// superseded and failed runs leave the committed output untouched, so
/// observers always see the last good result.
pub struct ExtractionSession {
    worker: CancellableWorker,
    committed: Arc<Mutex<Option<RunOutput>>>,
    observer: Arc<dyn SessionObserver>,
}

impl ExtractionSession {
    /// Start a session delivering events to `observer`.
    pub fn new(observer: Arc<dyn SessionObserver>) -> Self {
        let committed = Arc::new(Mutex::new(None));
        let errors = observer.clone();
        let worker = CancellableWorker::spawn(Box::new(move |e| errors.on_error(e)));
        Self {
            worker,
            committed,
            observer,
        }
    }

    /// Submit a new extraction request, superseding any in-flight run.
    pub fn request(&self, request: ExtractionRequest) {
        let committed = self.committed.clone();
        let observer = self.observer.clone();
        self.worker.submit(move |cancel| {
            let progress_observer = observer.clone();
            let sink = move |percent: u8| progress_observer.on_progress(percent);
            match run_extraction(&request, cancel, &sink)? {
                RunOutcome::Completed(output) => {
                    *committed.lock().unwrap() = Some(output.clone());
                    observer.on_committed(&output);
                }
                RunOutcome::Aborted => {
                    debug!("superseded run discarded");
                }
            }
            Ok(())
        });
    }

    /// Ask the in-flight run, if any, to stop without submitting new work.
    pub fn cancel(&self) {
        self.worker.require_abort();
    }

    /// Snapshot of the last committed run output.
    pub fn committed(&self) -> Option<RunOutput> {
        self.committed.lock().unwrap().clone()
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(mut self) {
        self.worker.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Sender};
    use std::time::Duration;

    use crate::models::annotation::AnnotationType;
    use crate::models::schema::Field;

    use super::*;

    struct ChannelObserver {
        commits: Sender<RunOutput>,
        errors: Sender<ExtractError>,
    }

    impl SessionObserver for ChannelObserver {
        fn on_committed(&self, output: &RunOutput) {
            let _ = self.commits.send(output.clone());
        }

        fn on_error(&self, error: &ExtractError) {
            let _ = self.errors.send(error.clone());
        }
    }

    fn session() -> (
        ExtractionSession,
        mpsc::Receiver<RunOutput>,
        mpsc::Receiver<ExtractError>,
    ) {
        let (commit_tx, commit_rx) = mpsc::channel();
        let (err_tx, err_rx) = mpsc::channel();
        let session = ExtractionSession::new(Arc::new(ChannelObserver {
            commits: commit_tx,
            errors: err_tx,
        }));
        (session, commit_rx, err_rx)
    }

    fn request(text: &str, master: &str, field_pattern: &str) -> ExtractionRequest {
        let mut annotation = AnnotationType::new("test");
        annotation.fields.push(Field::new("value"));
        annotation.patterns = vec![master.to_string(), field_pattern.to_string()];
        ExtractionRequest {
            text: text.to_string(),
            annotation,
            preview_limit: None,
        }
    }

    #[test]
    fn test_completed_run_is_committed() {
        let (session, commits, _errors) = session();

        session.request(request("AB cd", "[A-Z]+", "[A-Z]+"));

        let output = commits.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(output.groups.len(), 1);
        assert_eq!(output.groups[0].records[0].get("value"), Some("AB"));
        assert_eq!(session.committed(), Some(output));
        session.shutdown();
    }

    #[test]
    fn test_failed_run_keeps_previous_commit() {
        let (session, commits, errors) = session();

        session.request(request("AB cd", "[A-Z]+", "[A-Z]+"));
        let first = commits.recv_timeout(Duration::from_secs(5)).unwrap();

        // Broken master pattern: the run errors and commits nothing.
        session.request(request("AB cd", "[", "x"));
        match errors.recv_timeout(Duration::from_secs(5)).unwrap() {
            ExtractError::PatternSyntax { index, .. } => assert_eq!(index, 0),
            other => panic!("expected pattern syntax error, got {other:?}"),
        }

        assert_eq!(session.committed(), Some(first));
        session.shutdown();
    }

    #[test]
    fn test_latest_request_wins() {
        let (session, commits, _errors) = session();

        session.request(request("one", "one", "one"));
        session.request(request("two", "two", "two"));

        // The first run may commit or be superseded depending on timing, but
        // the second run's output always arrives and always ends up
        // committed.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            let remaining = deadline
                .checked_duration_since(std::time::Instant::now())
                .expect("second request never committed");
            let output = commits.recv_timeout(remaining).unwrap();
            if output.groups.first().map(|g| g.candidate.as_str()) == Some("two") {
                break;
            }
        }

        let committed = session.committed().unwrap();
        assert_eq!(committed.groups[0].candidate, "two");
        session.shutdown();
    }
}

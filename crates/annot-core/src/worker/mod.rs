//! Single-flight background worker with preemptive task replacement.
//!
//! One dedicated thread executes submitted tasks one at a time. A new
//! submission requests abort of the in-flight task and replaces any task
//! still waiting in the single pending slot, so only the newest request
//! ever runs to completion. The editing thread never blocks on extraction.

pub mod cancel;
pub mod session;

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use tracing::{debug, info, warn};

use crate::error::ExtractError;

pub use cancel::CancelToken;
pub use session::{ExtractionSession, SessionObserver};

/// A unit of work executed on the worker thread.
pub type WorkerTask = Box<dyn FnOnce(&CancelToken) -> Result<(), ExtractError> + Send + 'static>;

/// Callback receiving task failures. The worker reports and keeps going; it
/// never dies with a failing task.
pub type ErrorSink = Box<dyn Fn(&ExtractError) + Send + Sync + 'static>;

struct Slot {
    pending: Option<WorkerTask>,
    terminate: bool,
}

struct Shared {
    slot: Mutex<Slot>,
    wake: Condvar,
    abort: CancelToken,
}

/// Single background worker executing extraction runs one at a time.
///
/// The abort flag and the pending-task slot are the only state shared with
/// submitters; everything a task needs is moved into it.
pub struct CancellableWorker {
    shared: Arc<Shared>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CancellableWorker {
    /// Spawn the worker thread. Task failures are delivered to `errors`.
    pub fn spawn(errors: ErrorSink) -> Self {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot {
                pending: None,
                terminate: false,
            }),
            wake: Condvar::new(),
            abort: CancelToken::new(),
        });

        let thread_shared = shared.clone();
        let handle = thread::spawn(move || worker_loop(&thread_shared, &errors));

        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Submit a task, preempting current work.
    ///
    /// Requests abort of the in-flight task at its next checkpoint and
    /// replaces any task still sitting in the pending slot; a replaced task
    /// never runs and produces no observable effect.
    pub fn submit(
        &self,
        task: impl FnOnce(&CancelToken) -> Result<(), ExtractError> + Send + 'static,
    ) {
        {
            let mut slot = self.shared.slot.lock().unwrap();
            self.shared.abort.cancel();
            if slot.pending.replace(Box::new(task)).is_some() {
                debug!("pending task replaced before it started");
            }
        }
        self.shared.wake.notify_one();
    }

    /// Request abort of the in-flight task without submitting new work.
    pub fn require_abort(&self) {
        self.shared.abort.cancel();
    }

    /// Stop the worker: abort current work, discard any pending task, and
    /// block until the worker thread exits.
    pub fn shutdown(&mut self) {
        self.require_abort();
        {
            let mut slot = self.shared.slot.lock().unwrap();
            slot.terminate = true;
            slot.pending = None;
        }
        self.shared.wake.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CancellableWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: &Shared, errors: &ErrorSink) {
    info!("extraction worker started");
    loop {
        let task = {
            let mut slot = shared.slot.lock().unwrap();
            loop {
                if slot.terminate {
                    info!("extraction worker shutting down");
                    return;
                }
                if let Some(task) = slot.pending.take() {
                    // Re-arm under the lock so a submission racing with this
                    // dequeue still aborts the fresh task at its first
                    // checkpoint.
                    shared.abort.reset();
                    break task;
                }
                slot = shared.wake.wait(slot).unwrap();
            }
        };

        match panic::catch_unwind(AssertUnwindSafe(|| task(&shared.abort))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "extraction task failed");
                errors(&e);
            }
            Err(_) => {
                let e = ExtractError::Unexpected("extraction task panicked".to_string());
                warn!(error = %e, "extraction task panicked");
                errors(&e);
            }
        }
    }
}

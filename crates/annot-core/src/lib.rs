//! Core library for regex-driven annotation extraction.
//!
//! This crate provides:
//! - Candidate splitting with a master pattern
//! - Field-aligned record construction with the broadcast rule
//! - Run orchestration with cooperative cancellation and ordered progress
//! - A single-flight background worker for live re-extraction while
//!   patterns are edited

pub mod error;
pub mod extract;
pub mod models;
pub mod worker;

pub use error::{AnnotError, ExtractError, Result};
pub use extract::{
    run_extraction, BroadcastMatcher, ExtractionRequest, MasterSplit, NullSink, ProgressSink,
    ProgressTracker,
};
pub use models::{
    AnnotConfig, AnnotationType, CandidateGroup, ExtractionConfig, Field, FieldType, Record,
    RecordEntry, RunOutcome, RunOutput,
};
pub use worker::{CancelToken, CancellableWorker, ExtractionSession, SessionObserver, WorkerTask};

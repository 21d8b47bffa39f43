//! Extraction pipeline: candidate splitting, field alignment, run
//! orchestration, and progress delivery.

pub mod broadcast;
pub mod orchestrator;
pub mod progress;
pub mod splitter;

pub use broadcast::BroadcastMatcher;
pub use orchestrator::{run_extraction, ExtractionRequest};
pub use progress::{NullSink, ProgressSink, ProgressTracker};
pub use splitter::{split_candidates, MasterSplit};

//! Data model: fields, annotation types, records, and configuration.

pub mod annotation;
pub mod config;
pub mod record;
pub mod schema;

pub use annotation::AnnotationType;
pub use config::{AnnotConfig, ExtractionConfig, OutputConfig};
pub use record::{CandidateGroup, Record, RecordEntry, RunOutcome, RunOutput};
pub use schema::{Field, FieldType};

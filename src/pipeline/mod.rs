pub mod job;
pub mod runner;
pub mod service;

pub use job::{IngestionJob, JobStage, ParseSummary, PipelineError, StageKind};
pub use runner::{Pipeline, PipelineOptions};
pub use service::{GeneratedDefinition, GeneratedPin, HttpSpecService, SpecDocument, SpecService};

//! Orchestration logic: the ingestion controller and metadata derivation.

pub mod controller;
pub mod extractor;

pub use controller::{IngestionController, Outcome, PipelineError};
pub use extractor::{DerivedMetadata, MetadataExtractor};

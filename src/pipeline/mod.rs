//! The metadata extraction pipeline.
//!
//! Extraction fans out across a worker pool, one task per image, with a
//! shared camera registry and a shared read-only override table. After
//! every task has joined, the registry is finalized with any camera
//! model overrides and persisted.

pub mod driver;
pub mod extract;
pub mod orchestrate;
pub mod registry;
pub mod report;

pub use driver::ExtractionDriver;
pub use extract::MetadataExtractor;
pub use orchestrate::{extract_metadata, extract_metadata_with};
pub use registry::CameraRegistry;
pub use report::{DriverOutcome, ExtractionReport, ImageFailure, RecordSource};

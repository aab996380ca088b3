//! Per-run accounting for the extraction pipeline.

use crate::core::MetadataError;
use std::time::Duration;

/// Where a returned metadata record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    /// Loaded from the dataset's EXIF cache.
    Cache,
    /// Freshly extracted from the image's sensor payload.
    Sensor,
}

/// One image's terminal extraction failure.
#[derive(Debug)]
pub struct ImageFailure {
    /// Identifier of the failed image.
    pub image: String,
    /// What went wrong.
    pub error: MetadataError,
}

/// Outcome of one driver pass over the image set.
#[derive(Debug, Default)]
pub struct DriverOutcome {
    /// Images freshly extracted this run.
    pub extracted: usize,
    /// Images served from the EXIF cache.
    pub cached: usize,
    /// Images whose extraction failed.
    pub failures: Vec<ImageFailure>,
}

/// Summary of a completed `extract_metadata` run.
#[derive(Debug)]
pub struct ExtractionReport {
    /// Number of images in the dataset.
    pub images: usize,
    /// Images freshly extracted this run.
    pub extracted: usize,
    /// Images served from the EXIF cache.
    pub cached: usize,
    /// Number of distinct camera models in the finalized registry.
    pub cameras: usize,
    /// Per-image failures, reported after the batch completed.
    pub failures: Vec<ImageFailure>,
    /// Wall-clock duration of the whole operation.
    pub elapsed: Duration,
}

impl ExtractionReport {
    /// Whether every image in the dataset produced a record.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

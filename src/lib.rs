//! # sfm-metadata
//!
//! EXIF metadata extraction and camera-model registry building for
//! structure-from-motion datasets.
//!
//! Given a photo collection, the crate extracts each image's camera
//! metadata (dimensions, make/model, orientation, focal length, GPS,
//! capture time), normalizes it into a canonical camera identity, and
//! produces a deduplicated registry of camera models for a downstream
//! reconstruction pipeline.
//!
//! ## Features
//!
//! - Concurrent per-image extraction over a rayon worker pool
//! - Idempotent caching: extracted records persist and short-circuit
//!   future runs
//! - User-supplied per-image field overrides and camera model overrides
//!   that take precedence over sensor-reported values
//! - Fail-soft batches: one image's decode failure never aborts the rest
//!
//! ## Modules
//!
//! * [`core`] - Error handling and configuration
//! * [`dataset`] - The dataset storage contract and its filesystem
//!   implementation
//! * [`domain`] - Metadata records, overrides, and camera models
//! * [`exif`] - The EXIF-decoding collaborator
//! * [`pipeline`] - Extraction, the shared registry, and orchestration
//! * [`utils`] - Image probing helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sfm_metadata::prelude::*;
//!
//! # fn main() -> Result<(), MetadataError> {
//! let data = FsDataset::open("path/to/dataset")?;
//! let report = extract_metadata(&data)?;
//!
//! println!(
//!     "{} images, {} cameras, {} failures",
//!     report.images,
//!     report.cameras,
//!     report.failures.len()
//! );
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod dataset;
pub mod domain;
pub mod exif;
pub mod pipeline;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use sfm_metadata::prelude::*;
/// ```
pub mod prelude {
    // Orchestration (essential)
    pub use crate::pipeline::{extract_metadata, extract_metadata_with, ExtractionReport};

    // Dataset access (essential)
    pub use crate::dataset::{DatasetStore, FsDataset};

    // Error handling (essential)
    pub use crate::core::{MetaResult, MetadataError};

    // Domain types
    pub use crate::domain::{CameraModel, MetadataRecord};

    // EXIF decoding
    pub use crate::exif::{ExifDecoder, KamadakExifDecoder};
}

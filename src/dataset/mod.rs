//! Dataset collaborator: the narrow I/O contract the pipeline consumes.
//!
//! The pipeline never touches persistence formats directly; everything it
//! reads or writes goes through [`DatasetStore`]. The filesystem
//! implementation lives in [`fs`], and tests substitute in-memory stores.

pub mod fs;

pub use fs::FsDataset;

use crate::core::{DatasetConfig, MetaResult};
use crate::domain::{CameraModel, CameraModelOverrides, ExifOverrides, MetadataRecord};
use std::collections::HashMap;

/// Storage contract for one photo dataset.
///
/// Implementations must be shareable across worker threads; all methods
/// take `&self` and the cache methods must be safe to call concurrently
/// for distinct images.
pub trait DatasetStore: Send + Sync {
    /// Configuration consulted during extraction.
    fn config(&self) -> &DatasetConfig;

    /// Lists the identifiers of every image in the dataset.
    fn images(&self) -> MetaResult<Vec<String>>;

    /// Reads the raw byte stream of an image.
    fn open_image_bytes(&self, image: &str) -> MetaResult<Vec<u8>>;

    /// Probes an image's pixel dimensions, returned as `(height, width)`.
    fn probe_image_dimensions(&self, image: &str) -> MetaResult<(u32, u32)>;

    /// Whether a cached metadata record exists for `image`.
    fn exif_exists(&self, image: &str) -> bool;

    /// Loads the cached metadata record for `image`.
    fn load_exif(&self, image: &str) -> MetaResult<MetadataRecord>;

    /// Persists the metadata record for `image`.
    fn save_exif(&self, image: &str, record: &MetadataRecord) -> MetaResult<()>;

    /// Whether a per-image override table exists.
    fn exif_overrides_exist(&self) -> bool;

    /// Loads the per-image override table.
    fn load_exif_overrides(&self) -> MetaResult<ExifOverrides>;

    /// Whether a camera model override source exists.
    fn camera_models_overrides_exist(&self) -> bool;

    /// Loads the camera model override source.
    fn load_camera_models_overrides(&self) -> MetaResult<CameraModelOverrides>;

    /// Persists the finalized camera model registry.
    fn save_camera_models(&self, models: &HashMap<String, CameraModel>) -> MetaResult<()>;

    /// Appends one `(operation, seconds)` line to the profiling log.
    fn append_profile(&self, operation: &str, seconds: f64) -> MetaResult<()>;
}

//! Shared configuration types for the extraction run.

use serde::{Deserialize, Serialize};

/// Centralized configuration for parallel processing behavior across the
/// extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of worker threads to use for parallel extraction.
    /// If None, rayon will use the default thread pool size (typically
    /// the number of available cores).
    /// Default: None (use rayon's default)
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Threshold for number of images to process sequentially (<= this
    /// uses sequential). Default: 1 (process a single image sequentially,
    /// use parallel for multiple images)
    #[serde(default = "ParallelPolicy::default_image_threshold")]
    pub image_threshold: usize,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of worker threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set the image processing threshold.
    pub fn with_image_threshold(mut self, threshold: usize) -> Self {
        self.image_threshold = threshold;
        self
    }

    /// Default value for image threshold.
    fn default_image_threshold() -> usize {
        1
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            image_threshold: Self::default_image_threshold(),
        }
    }
}

/// Dataset-level configuration consulted during extraction.
///
/// The `use_exif_size` flag decides whether sensor-reported dimensions are
/// trusted when they are present and positive; when it is off (or the
/// reported width is not positive) the dimension probe is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Whether EXIF-reported image dimensions are trusted when positive.
    /// Default: true
    #[serde(default = "DatasetConfig::default_use_exif_size")]
    pub use_exif_size: bool,

    /// Projection type stamped onto freshly extracted records.
    /// Default: "perspective"
    #[serde(default = "DatasetConfig::default_projection_type")]
    pub camera_projection_type: String,

    /// Focal prior used when a record carries no usable focal ratio.
    /// Default: 0.85
    #[serde(default = "DatasetConfig::default_focal_prior")]
    pub default_focal_prior: f64,

    /// Parallel processing policy for the extraction run.
    #[serde(default)]
    pub parallel_policy: ParallelPolicy,
}

impl DatasetConfig {
    /// Create a new DatasetConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether EXIF-reported dimensions are trusted.
    pub fn with_use_exif_size(mut self, use_exif_size: bool) -> Self {
        self.use_exif_size = use_exif_size;
        self
    }

    /// Set the projection type stamped onto fresh records.
    pub fn with_camera_projection_type(mut self, projection_type: impl Into<String>) -> Self {
        self.camera_projection_type = projection_type.into();
        self
    }

    /// Set the fallback focal prior.
    pub fn with_default_focal_prior(mut self, prior: f64) -> Self {
        self.default_focal_prior = prior;
        self
    }

    /// Set the parallel processing policy.
    pub fn with_parallel_policy(mut self, policy: ParallelPolicy) -> Self {
        self.parallel_policy = policy;
        self
    }

    fn default_use_exif_size() -> bool {
        true
    }

    fn default_projection_type() -> String {
        "perspective".to_string()
    }

    fn default_focal_prior() -> f64 {
        0.85
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            use_exif_size: Self::default_use_exif_size(),
            camera_projection_type: Self::default_projection_type(),
            default_focal_prior: Self::default_focal_prior(),
            parallel_policy: ParallelPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_policy_builder() {
        let policy = ParallelPolicy::new()
            .with_max_threads(Some(8))
            .with_image_threshold(4);

        assert_eq!(policy.max_threads, Some(8));
        assert_eq!(policy.image_threshold, 4);
    }

    #[test]
    fn test_parallel_policy_serialization() {
        let policy = ParallelPolicy::new()
            .with_max_threads(Some(4))
            .with_image_threshold(3);

        let serialized = serde_json::to_string(&policy).unwrap();
        let deserialized: ParallelPolicy = serde_json::from_str(&serialized).unwrap();

        assert_eq!(policy.max_threads, deserialized.max_threads);
        assert_eq!(policy.image_threshold, deserialized.image_threshold);
    }

    #[test]
    fn test_dataset_config_defaults() {
        let config: DatasetConfig = serde_json::from_str("{}").unwrap();

        assert!(config.use_exif_size);
        assert_eq!(config.camera_projection_type, "perspective");
        assert_eq!(config.default_focal_prior, 0.85);
        assert_eq!(config.parallel_policy.max_threads, None);
        assert_eq!(config.parallel_policy.image_threshold, 1);
    }

    #[test]
    fn test_dataset_config_partial_deserialization() {
        let config: DatasetConfig =
            serde_json::from_str(r#"{"use_exif_size": false}"#).unwrap();

        assert!(!config.use_exif_size);
        assert_eq!(config.camera_projection_type, "perspective");
    }
}

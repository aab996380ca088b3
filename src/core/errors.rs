//! Error types for the metadata extraction pipeline.
//!
//! This module defines the error taxonomy for the extraction run: EXIF
//! decode failures, dimension probe failures, malformed override sources,
//! and persistence failures, along with utility constructors for creating
//! these errors with appropriate context.

use thiserror::Error;

/// Convenient result alias for metadata operations.
pub type MetaResult<T> = Result<T, MetadataError>;

/// Enum representing the errors that can occur while extracting metadata.
///
/// Decode and probe failures carry the identifier of the image they
/// occurred on so a single image's failure can be reported without
/// aborting the rest of the batch.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The EXIF payload of an image could not be parsed.
    #[error("EXIF decode failed for {image}")]
    Decode {
        /// Identifier of the image whose EXIF payload was unparsable.
        image: String,
        /// The underlying decoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The fallback image-dimension probe failed.
    #[error("dimension probe failed for {image}")]
    DimensionProbe {
        /// Identifier of the image that could not be probed.
        image: String,
        /// The underlying probe error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An override source is malformed. Fatal to the run: extraction must
    /// not proceed without a trustworthy override table.
    #[error("malformed override source: {context}")]
    OverrideFormat {
        /// Which override source failed and how.
        context: String,
        /// The underlying parse error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A cache or registry read/write failed.
    #[error("persistence failed: {context}")]
    Persistence {
        /// What was being read or written.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Utility constructors mirroring the variants above.
impl MetadataError {
    /// Creates a MetadataError for an unparsable EXIF payload.
    ///
    /// # Arguments
    ///
    /// * `image` - Identifier of the image being decoded.
    /// * `error` - The underlying decoder error.
    pub fn decode(
        image: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            image: image.into(),
            source: Box::new(error),
        }
    }

    /// Creates a MetadataError for a failed dimension probe.
    ///
    /// # Arguments
    ///
    /// * `image` - Identifier of the image being probed.
    /// * `error` - The underlying probe error.
    pub fn dimension_probe(
        image: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DimensionProbe {
            image: image.into(),
            source: Box::new(error),
        }
    }

    /// Creates a MetadataError for a malformed override source.
    ///
    /// # Arguments
    ///
    /// * `context` - Which override source failed and how.
    /// * `error` - The underlying parse error.
    pub fn override_format(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::OverrideFormat {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a MetadataError for a failed cache or registry operation.
    ///
    /// # Arguments
    ///
    /// * `context` - What was being read or written.
    /// * `error` - The underlying error.
    pub fn persistence(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Persistence {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a MetadataError for a configuration problem.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

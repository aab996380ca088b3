//! Per-image metadata extraction.

use crate::core::MetaResult;
use crate::dataset::DatasetStore;
use crate::domain::{camera_from_metadata, camera_id, merge_field_overrides, ExifOverrides};
use crate::domain::MetadataRecord;
use crate::exif::ExifDecoder;
use crate::pipeline::registry::CameraRegistry;
use crate::pipeline::report::RecordSource;
use tracing::info;

/// Extracts (or loads) the metadata record for one image at a time.
///
/// Holds shared borrows of the dataset, the decoder, the read-only
/// override table, and the camera registry, so one extractor instance
/// can be driven from many worker threads at once.
pub struct MetadataExtractor<'a, D, E> {
    data: &'a D,
    decoder: &'a E,
    overrides: &'a ExifOverrides,
    registry: &'a CameraRegistry,
}

impl<'a, D: DatasetStore, E: ExifDecoder> MetadataExtractor<'a, D, E> {
    /// Creates an extractor over the given collaborators.
    pub fn new(
        data: &'a D,
        decoder: &'a E,
        overrides: &'a ExifOverrides,
        registry: &'a CameraRegistry,
    ) -> Self {
        Self {
            data,
            decoder,
            overrides,
            registry,
        }
    }

    /// Produces the metadata record for `image`.
    ///
    /// A cached record is returned unchanged: no override re-application
    /// and no re-derivation of dimensions. Otherwise the record is
    /// decoded, corrected, stamped with its camera identity, merged with
    /// any per-image override, and persisted so future runs short-circuit
    /// through the cache. Either way the record's camera identity is
    /// registered as a side effect.
    pub fn extract(&self, image: &str) -> MetaResult<(MetadataRecord, RecordSource)> {
        if self.data.exif_exists(image) {
            info!("Loading existing EXIF for {image}");
            let record = self.data.load_exif(image)?;
            self.register_camera(&record);
            return Ok((record, RecordSource::Cache));
        }

        info!("Extracting EXIF for {image}");
        let bytes = self.data.open_image_bytes(image)?;
        let mut record = self.decoder.decode(image, &bytes)?;

        let config = self.data.config();
        if record.width <= 0 || !config.use_exif_size {
            let (height, width) = self.data.probe_image_dimensions(image)?;
            record.height = i64::from(height);
            record.width = i64::from(width);
        }

        record.projection_type = config.camera_projection_type.clone();
        record.camera = camera_id(&record);

        if let Some(partial) = self.overrides.get(image) {
            record = merge_field_overrides(&record, partial)?;
        }

        self.data.save_exif(image, &record)?;
        self.register_camera(&record);
        Ok((record, RecordSource::Sensor))
    }

    fn register_camera(&self, record: &MetadataRecord) {
        self.registry.ensure(&record.camera, || {
            camera_from_metadata(record, self.data.config())
        });
    }
}

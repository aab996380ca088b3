//! Top-level orchestration of a metadata extraction run.

use crate::core::MetaResult;
use crate::dataset::DatasetStore;
use crate::exif::{ExifDecoder, KamadakExifDecoder};
use crate::pipeline::driver::ExtractionDriver;
use crate::pipeline::extract::MetadataExtractor;
use crate::pipeline::registry::CameraRegistry;
use crate::pipeline::report::ExtractionReport;
use std::time::Instant;
use tracing::{info, warn};

/// Extracts metadata for every image in the dataset using the default
/// EXIF decoder.
///
/// See [`extract_metadata_with`] for the full contract.
pub fn extract_metadata<D: DatasetStore>(data: &D) -> MetaResult<ExtractionReport> {
    extract_metadata_with(data, &KamadakExifDecoder::new())
}

/// Extracts metadata for every image in the dataset.
///
/// Sequence: load the per-image override table (empty when absent,
/// fatal when malformed) → run concurrent extraction over every image,
/// populating the shared camera registry → apply camera model overrides
/// (skipped when absent) → persist the finalized registry → append the
/// elapsed wall time to the profiling log.
///
/// Per-image failures do not abort the run; they are logged after the
/// batch and returned in the report. A failure to load an override
/// source or to persist the finalized registry aborts the run.
pub fn extract_metadata_with<D: DatasetStore, E: ExifDecoder>(
    data: &D,
    decoder: &E,
) -> MetaResult<ExtractionReport> {
    let started = Instant::now();

    let overrides = if data.exif_overrides_exist() {
        data.load_exif_overrides()?
    } else {
        Default::default()
    };

    let registry = CameraRegistry::new();
    let images = data.images()?;

    let outcome = {
        let extractor = MetadataExtractor::new(data, decoder, &overrides, &registry);
        let driver = ExtractionDriver::new(extractor, data.config().parallel_policy.clone());
        driver.run(&images)?
    };

    for failure in &outcome.failures {
        warn!(
            "Metadata extraction failed for {}: {}",
            failure.image, failure.error
        );
    }

    let camera_overrides = if data.camera_models_overrides_exist() {
        Some(data.load_camera_models_overrides()?)
    } else {
        None
    };
    let models = registry.finalize(camera_overrides);
    data.save_camera_models(&models)?;

    let elapsed = started.elapsed();
    data.append_profile("extract_metadata", elapsed.as_secs_f64())?;

    info!(
        "Extracted metadata for {} images ({} cameras, {} cached, {} failed) in {:.2}s",
        images.len(),
        models.len(),
        outcome.cached,
        outcome.failures.len(),
        elapsed.as_secs_f64()
    );

    Ok(ExtractionReport {
        images: images.len(),
        extracted: outcome.extracted,
        cached: outcome.cached,
        cameras: models.len(),
        failures: outcome.failures,
        elapsed,
    })
}

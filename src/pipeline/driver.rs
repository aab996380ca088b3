//! Concurrent fan-out of per-image extraction across a worker pool.

use crate::core::{MetaResult, MetadataError, ParallelPolicy};
use crate::dataset::DatasetStore;
use crate::exif::ExifDecoder;
use crate::pipeline::extract::MetadataExtractor;
use crate::pipeline::report::{DriverOutcome, ImageFailure, RecordSource};
use rayon::prelude::*;
use tracing::debug;

/// Drives extraction over the whole image set, one task per image.
///
/// Workers share the extractor's registry and override table; tasks never
/// wait on each other. A single image's failure is collected, not
/// propagated, so the rest of the batch always completes. The driver
/// joins every task before returning, which is the barrier the
/// finalize pass relies on.
pub struct ExtractionDriver<'a, D, E> {
    extractor: MetadataExtractor<'a, D, E>,
    policy: ParallelPolicy,
}

impl<'a, D: DatasetStore, E: ExifDecoder> ExtractionDriver<'a, D, E> {
    /// Creates a driver over an extractor and a parallelism policy.
    pub fn new(extractor: MetadataExtractor<'a, D, E>, policy: ParallelPolicy) -> Self {
        Self { extractor, policy }
    }

    /// Runs extraction for every image, returning per-image accounting.
    ///
    /// Small batches (at most `policy.image_threshold` images) run
    /// sequentially; larger ones fan out across rayon workers, either the
    /// global pool or a dedicated pool of `policy.max_threads` threads.
    pub fn run(&self, images: &[String]) -> MetaResult<DriverOutcome> {
        let use_parallel = images.len() > self.policy.image_threshold;

        let results: Vec<(String, MetaResult<RecordSource>)> = if use_parallel {
            debug!("Extracting metadata for {} images in parallel", images.len());
            match self.policy.max_threads {
                Some(threads) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .build()
                        .map_err(|e| {
                            MetadataError::config(format!("failed to build worker pool: {e}"))
                        })?;
                    pool.install(|| self.extract_parallel(images))
                }
                None => self.extract_parallel(images),
            }
        } else {
            debug!(
                "Extracting metadata for {} images sequentially",
                images.len()
            );
            images
                .iter()
                .map(|image| {
                    (
                        image.clone(),
                        self.extractor.extract(image).map(|(_, source)| source),
                    )
                })
                .collect()
        };

        let mut outcome = DriverOutcome::default();
        for (image, result) in results {
            match result {
                Ok(RecordSource::Sensor) => outcome.extracted += 1,
                Ok(RecordSource::Cache) => outcome.cached += 1,
                Err(error) => outcome.failures.push(ImageFailure { image, error }),
            }
        }
        Ok(outcome)
    }

    fn extract_parallel(&self, images: &[String]) -> Vec<(String, MetaResult<RecordSource>)> {
        images
            .par_iter()
            .map(|image| {
                (
                    image.clone(),
                    self.extractor.extract(image).map(|(_, source)| source),
                )
            })
            .collect()
    }
}

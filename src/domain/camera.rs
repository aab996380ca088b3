//! Camera identity derivation and camera model synthesis.
//!
//! A camera identity is a canonical string naming a distinct physical
//! camera/lens configuration; every image whose corrected metadata maps
//! to the same identity shares one [`CameraModel`] in the registry.

use crate::core::DatasetConfig;
use crate::domain::MetadataRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Intrinsic geometry descriptor for one camera identity.
///
/// The perspective model used by the downstream reconstruction pipeline:
/// a normalized focal length plus two radial distortion coefficients,
/// each with a prior the bundle adjustment regularizes toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraModel {
    /// Camera identity this descriptor belongs to. Carried in memory
    /// only; persisted registries key their entries by identity instead.
    #[serde(skip)]
    pub id: String,
    /// Projection type, e.g. `"perspective"`.
    pub projection_type: String,
    /// Sensor width in pixels.
    pub width: i64,
    /// Sensor height in pixels.
    pub height: i64,
    /// Focal length normalized by the larger sensor dimension.
    pub focal: f64,
    /// Prior for the focal length.
    pub focal_prior: f64,
    /// First radial distortion coefficient.
    pub k1: f64,
    /// Prior for `k1`.
    pub k1_prior: f64,
    /// Second radial distortion coefficient.
    pub k2: f64,
    /// Prior for `k2`.
    pub k2_prior: f64,
}

/// User-supplied camera model overrides, applied once after extraction.
///
/// At most one form is active per run: a single descriptor applied to
/// every identity in the registry, or a per-identity mapping applied
/// verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraModelOverrides {
    /// One descriptor for every camera identity; the identity is
    /// re-stamped onto each copy.
    All(CameraModel),
    /// Descriptors for specific camera identities, applied verbatim.
    PerCamera(HashMap<String, CameraModel>),
}

/// Derives the canonical camera identity for a corrected record.
///
/// Deterministic and pure: the identity is a function of make, model,
/// dimensions, projection type, and focal ratio. The make prefix is
/// stripped from the model when present, and the whole identity is
/// lowercased so sensor-side capitalization differences collapse.
pub fn camera_id(record: &MetadataRecord) -> String {
    let make = record.make.trim();
    let mut model = record.model.trim();
    if make != "unknown" {
        if let Some(stripped) = model.strip_prefix(make) {
            model = stripped.trim();
        }
    }

    let mut focal = record.focal_ratio.to_string();
    focal.truncate(6);

    format!(
        "v2 {} {} {} {} {} {}",
        make, model, record.width, record.height, record.projection_type, focal
    )
    .to_lowercase()
}

/// Synthesizes a camera model from one record of its identity.
///
/// Deterministic given equivalent inputs: any valid record of the same
/// camera identity synthesizes an equivalent model, which is what makes
/// the registry's first-writer race benign. Records without a usable
/// focal ratio fall back to the configured prior.
pub fn camera_from_metadata(record: &MetadataRecord, config: &DatasetConfig) -> CameraModel {
    let focal = if record.focal_ratio > 0.0 {
        record.focal_ratio
    } else {
        config.default_focal_prior
    };

    CameraModel {
        id: record.camera.clone(),
        projection_type: record.projection_type.clone(),
        width: record.width,
        height: record.height,
        focal,
        focal_prior: focal,
        k1: 0.0,
        k1_prior: 0.0,
        k2: 0.0,
        k2_prior: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(make: &str, model: &str, focal_ratio: f64) -> MetadataRecord {
        MetadataRecord {
            width: 4000,
            height: 3000,
            make: make.to_string(),
            model: model.to_string(),
            projection_type: "perspective".to_string(),
            focal_ratio,
            ..MetadataRecord::default()
        }
    }

    #[test]
    fn identity_is_lowercased_and_strips_make_prefix() {
        let id = camera_id(&record("Canon", "Canon EOS 5D", 0.85));
        assert_eq!(id, "v2 canon eos 5d 4000 3000 perspective 0.85");
    }

    #[test]
    fn identity_keeps_model_without_make_prefix() {
        let id = camera_id(&record("NIKON", "D750", 0.8));
        assert_eq!(id, "v2 nikon d750 4000 3000 perspective 0.8");
    }

    #[test]
    fn identity_truncates_long_focal_ratios() {
        let id = camera_id(&record("unknown", "unknown", 0.8555555));
        assert!(id.ends_with(" 0.8555"));
    }

    #[test]
    fn identity_is_deterministic() {
        let a = camera_id(&record("Sony", "ILCE-7M3", 0.75));
        let b = camera_id(&record("Sony", "ILCE-7M3", 0.75));
        assert_eq!(a, b);
    }

    #[test]
    fn synthesis_uses_record_focal_when_present() {
        let mut rec = record("Canon", "EOS 5D", 0.72);
        rec.camera = camera_id(&rec);
        let model = camera_from_metadata(&rec, &DatasetConfig::default());

        assert_eq!(model.id, rec.camera);
        assert_eq!(model.focal, 0.72);
        assert_eq!(model.focal_prior, 0.72);
        assert_eq!(model.width, 4000);
        assert_eq!(model.height, 3000);
        assert_eq!(model.k1, 0.0);
        assert_eq!(model.k2, 0.0);
    }

    #[test]
    fn synthesis_falls_back_to_configured_prior() {
        let rec = record("unknown", "unknown", 0.0);
        let config = DatasetConfig::default().with_default_focal_prior(0.9);
        let model = camera_from_metadata(&rec, &config);

        assert_eq!(model.focal, 0.9);
        assert_eq!(model.focal_prior, 0.9);
    }

    #[test]
    fn model_serialization_skips_identity() {
        let model = camera_from_metadata(&record("Canon", "EOS 5D", 0.85), &DatasetConfig::default());
        let text = serde_json::to_string(&model).unwrap();

        assert!(!text.contains("\"id\""));
        let restored: CameraModel = serde_json::from_str(&text).unwrap();
        assert_eq!(restored.id, "");
        assert_eq!(restored.focal, model.focal);
    }
}

//! Per-image metadata records and user-supplied field overrides.
//!
//! A [`MetadataRecord`] is the normalized form of one image's sensor
//! metadata: dimensions, camera identity, and the EXIF fields a
//! reconstruction pipeline cares about. The field set stays open through
//! `#[serde(flatten)]`, so overrides and cached records may carry fields
//! this crate does not interpret.

use crate::core::{MetaResult, MetadataError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// GPS position reported by the sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsInfo {
    /// Latitude in decimal degrees, negative south of the equator.
    pub latitude: f64,
    /// Longitude in decimal degrees, negative west of the meridian.
    pub longitude: f64,
    /// Altitude in meters, negative below sea level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Dilution of precision, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dop: Option<f64>,
}

/// Normalized metadata for one image.
///
/// `width`/`height` hold sensor-reported values until the extractor
/// corrects them; `camera` is empty until the canonical identity is
/// derived. Records are immutable once persisted: overrides are applied
/// at creation time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Image width in pixels. Sensor values may be zero or negative
    /// before the dimension fallback runs.
    pub width: i64,
    /// Image height in pixels.
    pub height: i64,
    /// Canonical camera identity, derived from the corrected record.
    #[serde(default)]
    pub camera: String,
    /// Camera manufacturer, `"unknown"` when unreported.
    #[serde(default = "MetadataRecord::unknown")]
    pub make: String,
    /// Camera model, `"unknown"` when unreported.
    #[serde(default = "MetadataRecord::unknown")]
    pub model: String,
    /// Projection type used for camera model synthesis.
    #[serde(default)]
    pub projection_type: String,
    /// EXIF orientation tag, 1 when unreported.
    #[serde(default = "MetadataRecord::default_orientation")]
    pub orientation: u32,
    /// Focal length as a fraction of the 35 mm-equivalent frame width,
    /// 0.0 when unknown.
    #[serde(default)]
    pub focal_ratio: f64,
    /// Capture time as unix seconds, 0.0 when unknown.
    #[serde(default)]
    pub capture_time: f64,
    /// GPS position, when the sensor reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<GpsInfo>,
    /// Fields this crate does not interpret, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataRecord {
    fn unknown() -> String {
        "unknown".to_string()
    }

    fn default_orientation() -> u32 {
        1
    }
}

impl Default for MetadataRecord {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            camera: String::new(),
            make: Self::unknown(),
            model: Self::unknown(),
            projection_type: String::new(),
            orientation: Self::default_orientation(),
            focal_ratio: 0.0,
            capture_time: 0.0,
            gps: None,
            extra: Map::new(),
        }
    }
}

/// Per-image field overrides: image identifier to partial record.
///
/// Loaded once at the start of a run and shared read-only by every
/// worker.
pub type ExifOverrides = HashMap<String, Map<String, Value>>;

/// Applies user-supplied field overrides to a record.
///
/// Pure, order-independent field replacement: every key present in the
/// override replaces the corresponding record field wholesale, keys
/// absent from the override are untouched, and no deep merge is
/// attempted. Nested values (such as `gps`) are replaced in their
/// entirety.
///
/// # Errors
///
/// Returns [`MetadataError::OverrideFormat`] when an override value
/// leaves the record untypeable (for example a string `width`).
pub fn merge_field_overrides(
    record: &MetadataRecord,
    overrides: &Map<String, Value>,
) -> MetaResult<MetadataRecord> {
    let value = serde_json::to_value(record)
        .map_err(|e| MetadataError::override_format("serializing record for merge", e))?;

    let mut fields = match value {
        Value::Object(fields) => fields,
        _ => {
            return Err(MetadataError::config(
                "metadata record did not serialize to an object",
            ));
        }
    };

    for (key, replacement) in overrides {
        fields.insert(key.clone(), replacement.clone());
    }

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| MetadataError::override_format("override value does not fit the record", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_record() -> MetadataRecord {
        MetadataRecord {
            width: 4000,
            height: 3000,
            camera: "v2 canon eos 5d 4000 3000 perspective 0.85".to_string(),
            make: "Canon".to_string(),
            model: "EOS 5D".to_string(),
            projection_type: "perspective".to_string(),
            orientation: 1,
            focal_ratio: 0.85,
            capture_time: 1_672_914_600.0,
            gps: Some(GpsInfo {
                latitude: 48.85,
                longitude: 2.35,
                altitude: Some(35.0),
                dop: None,
            }),
            extra: Map::new(),
        }
    }

    fn overrides(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn override_wins_for_present_keys() {
        let record = base_record();
        let merged = merge_field_overrides(
            &record,
            &overrides(&[("orientation", json!(6)), ("focal_ratio", json!(0.5))]),
        )
        .unwrap();

        assert_eq!(merged.orientation, 6);
        assert_eq!(merged.focal_ratio, 0.5);
    }

    #[test]
    fn absent_keys_are_untouched() {
        let record = base_record();
        let merged =
            merge_field_overrides(&record, &overrides(&[("orientation", json!(3))])).unwrap();

        assert_eq!(merged.width, record.width);
        assert_eq!(merged.height, record.height);
        assert_eq!(merged.make, record.make);
        assert_eq!(merged.camera, record.camera);
        assert_eq!(merged.gps, record.gps);
    }

    #[test]
    fn nested_values_are_replaced_wholesale() {
        // A gps override drops altitude entirely; no deep merge keeps it.
        let record = base_record();
        let merged = merge_field_overrides(
            &record,
            &overrides(&[("gps", json!({"latitude": 1.0, "longitude": 2.0}))]),
        )
        .unwrap();

        let gps = merged.gps.unwrap();
        assert_eq!(gps.latitude, 1.0);
        assert_eq!(gps.longitude, 2.0);
        assert_eq!(gps.altitude, None);
    }

    #[test]
    fn unknown_keys_land_in_extra() {
        let record = base_record();
        let merged =
            merge_field_overrides(&record, &overrides(&[("lens", json!("EF 50mm"))])).unwrap();

        assert_eq!(merged.extra.get("lens"), Some(&json!("EF 50mm")));
    }

    #[test]
    fn merge_is_independent_of_override_insertion_order() {
        let record = base_record();
        let forward =
            overrides(&[("orientation", json!(8)), ("model", json!("EOS 5D Mark IV"))]);
        let reverse =
            overrides(&[("model", json!("EOS 5D Mark IV")), ("orientation", json!(8))]);

        assert_eq!(
            merge_field_overrides(&record, &forward).unwrap(),
            merge_field_overrides(&record, &reverse).unwrap()
        );
    }

    #[test]
    fn untypeable_override_is_a_format_error() {
        let record = base_record();
        let result =
            merge_field_overrides(&record, &overrides(&[("width", json!("not a number"))]));

        assert!(matches!(
            result,
            Err(MetadataError::OverrideFormat { .. })
        ));
    }

    #[test]
    fn record_round_trips_through_json() {
        let mut record = base_record();
        record
            .extra
            .insert("iso".to_string(), json!(100));

        let text = serde_json::to_string(&record).unwrap();
        let restored: MetadataRecord = serde_json::from_str(&text).unwrap();

        assert_eq!(restored, record);
    }
}

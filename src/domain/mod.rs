//! Domain types: metadata records, overrides, and camera models.

pub mod camera;
pub mod metadata;

pub use camera::{camera_from_metadata, camera_id, CameraModel, CameraModelOverrides};
pub use metadata::{merge_field_overrides, ExifOverrides, GpsInfo, MetadataRecord};

//! Default implementation of the [`ExifDecoder`] trait used by the
//! extraction pipeline.
//!
//! Decoding is delegated to the `kamadak-exif` crate; this module only
//! maps decoded fields onto a [`MetadataRecord`]. Missing fields fall
//! back to the record defaults (`"unknown"` make/model, zero dimensions,
//! orientation 1) so the extractor's dimension fallback and identity
//! derivation can run on sparse payloads.

use crate::core::{MetaResult, MetadataError};
use crate::domain::{GpsInfo, MetadataRecord};
use exif::{Exif, In, Tag, Value};
use std::io::Cursor;

/// Decodes raw EXIF fields from an image's byte stream.
///
/// The trait is the seam between the pipeline and the EXIF-decoding
/// collaborator: tests substitute canned decoders, production uses
/// [`KamadakExifDecoder`].
pub trait ExifDecoder: Send + Sync {
    /// Decodes the EXIF payload of `bytes` into a metadata record.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Decode`] carrying `image` when the
    /// payload cannot be parsed.
    fn decode(&self, image: &str, bytes: &[u8]) -> MetaResult<MetadataRecord>;
}

/// Production EXIF decoder backed by `kamadak-exif`.
#[derive(Debug, Default)]
pub struct KamadakExifDecoder;

impl KamadakExifDecoder {
    /// Creates a new decoder.
    pub fn new() -> Self {
        Self
    }
}

impl ExifDecoder for KamadakExifDecoder {
    fn decode(&self, image: &str, bytes: &[u8]) -> MetaResult<MetadataRecord> {
        let mut cursor = Cursor::new(bytes);
        let exif = exif::Reader::new()
            .read_from_container(&mut cursor)
            .map_err(|e| MetadataError::decode(image, e))?;

        let mut record = MetadataRecord::default();

        if let Some(make) = string_field(&exif, Tag::Make) {
            record.make = make;
        }
        if let Some(model) = string_field(&exif, Tag::Model) {
            record.model = model;
        }

        record.width = uint_field(&exif, Tag::PixelXDimension)
            .or_else(|| uint_field(&exif, Tag::ImageWidth))
            .map(i64::from)
            .unwrap_or(0);
        record.height = uint_field(&exif, Tag::PixelYDimension)
            .or_else(|| uint_field(&exif, Tag::ImageLength))
            .map(i64::from)
            .unwrap_or(0);

        if let Some(orientation) = uint_field(&exif, Tag::Orientation) {
            record.orientation = orientation;
        }

        // Focal length normalized against the 35 mm-equivalent frame width.
        if let Some(focal_35) = uint_field(&exif, Tag::FocalLengthIn35mmFilm) {
            record.focal_ratio = f64::from(focal_35) / 36.0;
        }

        record.capture_time = string_field(&exif, Tag::DateTimeOriginal)
            .or_else(|| string_field(&exif, Tag::DateTime))
            .and_then(|s| parse_exif_datetime(&s))
            .unwrap_or(0.0);

        record.gps = extract_gps(&exif);

        Ok(record)
    }
}

/// Parses an EXIF datetime string (`YYYY:MM:DD HH:MM:SS`) to unix seconds.
pub(crate) fn parse_exif_datetime(text: &str) -> Option<f64> {
    chrono::NaiveDateTime::parse_from_str(text.trim(), "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc().timestamp() as f64)
}

fn string_field(exif: &Exif, tag: Tag) -> Option<String> {
    exif.get_field(tag, In::PRIMARY).map(|field| {
        field
            .display_value()
            .to_string()
            .trim_matches('"')
            .trim()
            .to_string()
    })
}

fn uint_field(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
}

fn rational_field(exif: &Exif, tag: Tag) -> Option<f64> {
    exif.get_field(tag, In::PRIMARY)
        .and_then(|field| match &field.value {
            Value::Rational(rationals) if !rationals.is_empty() => Some(rationals[0].to_f64()),
            _ => None,
        })
}

/// Extracts a GPS position from degree/minute/second rationals.
fn extract_gps(exif: &Exif) -> Option<GpsInfo> {
    let latitude = gps_coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, 'S')?;
    let longitude = gps_coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, 'W')?;

    let altitude = rational_field(exif, Tag::GPSAltitude).map(|altitude| {
        // Altitude reference 1 means below sea level.
        match uint_field(exif, Tag::GPSAltitudeRef) {
            Some(1) => -altitude,
            _ => altitude,
        }
    });

    Some(GpsInfo {
        latitude,
        longitude,
        altitude,
        dop: rational_field(exif, Tag::GPSDOP),
    })
}

fn gps_coordinate(exif: &Exif, tag: Tag, ref_tag: Tag, negative_ref: char) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let degrees = match &field.value {
        Value::Rational(rationals) if rationals.len() >= 3 => {
            rationals[0].to_f64() + rationals[1].to_f64() / 60.0 + rationals[2].to_f64() / 3600.0
        }
        _ => return None,
    };

    let reference = exif
        .get_field(ref_tag, In::PRIMARY)
        .map(|f| f.display_value().to_string())
        .unwrap_or_default();

    Some(if reference.contains(negative_ref) {
        -degrees
    } else {
        degrees
    })
}

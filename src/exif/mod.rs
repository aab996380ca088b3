//! EXIF decoding collaborator.

pub mod decode;

pub use decode::{ExifDecoder, KamadakExifDecoder};

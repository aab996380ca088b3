//! Utility functions for probing image files.

use image::ImageError;
use std::path::Path;

/// Probes the pixel dimensions of an image file without decoding it.
///
/// Reads only as much of the file header as the format requires, making
/// the probe cheap enough to run as the fallback for images whose EXIF
/// payload reports no usable size.
///
/// # Arguments
///
/// * `path` - A reference to the path of the image file to probe
///
/// # Returns
///
/// * `Ok((height, width))` - The probed dimensions in pixels
/// * `Err(ImageError)` - An error if the file could not be read or its
///   format is unsupported
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), ImageError> {
    let (width, height) = image::image_dimensions(path)?;
    Ok((height, width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn probes_dimensions_without_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.png");
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(8, 6);
        img.save(&path).unwrap();

        assert_eq!(probe_dimensions(&path).unwrap(), (6, 8));
    }

    #[test]
    fn probe_fails_for_missing_files() {
        assert!(probe_dimensions(Path::new("/nonexistent/image.png")).is_err());
    }
}

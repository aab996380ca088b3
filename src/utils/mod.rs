//! Utility functions for image files.

pub mod image;

pub use image::probe_dimensions;

//! Image processing helpers used by the preprocessing pipeline
//!
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Adaptive mean thresholding
//! - The [`imageops::ImageOps`] collaborator wrapping `image`/`imageproc`

/// Local-mean adaptive threshold
pub mod binarization;
/// Parallel RGB/RGBA to luminance conversion
pub mod grayscale;
pub mod imageops;

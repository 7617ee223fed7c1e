use image::GrayImage;

/// Raw input image handed to the scanner
///
/// Pixels are tightly packed rows of `channels` bytes per pixel:
/// 1 = grayscale, 3 = RGB, 4 = RGBA. The scanner never mutates a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per pixel
    pub channels: u8,
    /// Pixel buffer
    pub pixels: Vec<u8>,
}

impl ImageFrame {
    /// Wrap a pixel buffer
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// Bytes per row
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Expected buffer size in bytes
    pub fn byte_size(&self) -> usize {
        self.row_stride() * self.height as usize
    }

    /// Check the frame can be decoded; the error names the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.pixels.is_empty() {
            return Err("empty pixel buffer".to_string());
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!("zero-size frame {}x{}", self.width, self.height));
        }
        if !matches!(self.channels, 1 | 3 | 4) {
            return Err(format!("unsupported channel count {}", self.channels));
        }
        if self.pixels.len() < self.byte_size() {
            return Err(format!(
                "pixel buffer holds {} bytes, {}x{}x{} needs {}",
                self.pixels.len(),
                self.width,
                self.height,
                self.channels,
                self.byte_size()
            ));
        }
        Ok(())
    }
}

/// Which preprocessing pass produced a variant
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VariantTag {
    /// Scale factor applied in the multi-scale step
    pub scale: f32,
    /// True for the color-inverted copy
    pub inverted: bool,
}

impl VariantTag {
    /// Create a tag
    pub fn new(scale: f32, inverted: bool) -> Self {
        Self { scale, inverted }
    }
}

/// Single-channel image fed to the decode backends
#[derive(Debug, Clone, PartialEq)]
pub struct ImageVariant {
    /// Variant pixels
    pub image: GrayImage,
    /// Provenance tag
    pub tag: VariantTag,
    /// Size of this variant relative to the input frame.
    /// Divide variant coordinates by it to get frame coordinates.
    pub magnification: f32,
}

impl ImageVariant {
    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_sizes() {
        let frame = ImageFrame::new(10, 4, 3, vec![0; 120]);
        assert_eq!(frame.row_stride(), 30);
        assert_eq!(frame.byte_size(), 120);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_frames() {
        assert!(ImageFrame::new(10, 10, 1, vec![]).validate().is_err());
        assert!(ImageFrame::new(0, 10, 1, vec![1; 10]).validate().is_err());
        assert!(ImageFrame::new(2, 2, 2, vec![1; 8]).validate().is_err());
        assert!(ImageFrame::new(4, 4, 3, vec![1; 47]).validate().is_err());
    }
}

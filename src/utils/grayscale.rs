/// Convert interleaved RGB/RGBA pixels to 8-bit luminance
/// Y = 0.299*R + 0.587*G + 0.114*B
/// Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
use crate::models::ImageFrame;
use image::GrayImage;
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Frames at least this many pixels are converted row-parallel
const PARALLEL_MIN_PIXELS: usize = 512 * 512;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    lum.min(255) as u8
}

/// Convert packed pixels with `channels` bytes per pixel (3 or 4) to grayscale
pub fn to_grayscale(pixels: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    let pixel_count = width * height;
    pixels
        .chunks_exact(channels)
        .take(pixel_count)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect()
}

/// Same as [`to_grayscale`], processing rows in parallel
pub fn to_grayscale_parallel(
    pixels: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    let row_bytes = width * channels;

    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let src = &pixels[y * row_bytes..(y + 1) * row_bytes];
        for (dst, px) in row.iter_mut().zip(src.chunks_exact(channels)) {
            *dst = luma(px[0], px[1], px[2]);
        }
    });

    gray
}

/// Single-channel copy of a validated frame
pub fn frame_to_gray(frame: &ImageFrame) -> GrayImage {
    let (w, h) = (frame.width as usize, frame.height as usize);
    let channels = frame.channels as usize;

    let gray = match channels {
        1 => frame.pixels[..w * h].to_vec(),
        _ if w * h >= PARALLEL_MIN_PIXELS => {
            to_grayscale_parallel(&frame.pixels, w, h, channels)
        }
        _ => to_grayscale(&frame.pixels, w, h, channels),
    };

    // Buffer length is exactly w * h for every branch above
    GrayImage::from_raw(frame.width, frame.height, gray)
        .unwrap_or_else(|| GrayImage::new(frame.width, frame.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_grayscale() {
        // Pure red
        let gray = to_grayscale(&[255, 0, 0], 1, 1, 3);
        assert!(gray[0] > 50 && gray[0] < 100);

        // Pure green
        let gray = to_grayscale(&[0, 255, 0], 1, 1, 3);
        assert!(gray[0] > 100);

        let white = to_grayscale(&[255, 255, 255, 255], 1, 1, 4);
        assert_eq!(white[0], 254);
    }

    #[test]
    fn test_parallel_matches_scalar() {
        let (w, h) = (37, 11);
        let rgba: Vec<u8> = (0..w * h * 4).map(|i| (i * 31 % 256) as u8).collect();
        assert_eq!(
            to_grayscale(&rgba, w, h, 4),
            to_grayscale_parallel(&rgba, w, h, 4)
        );
    }

    #[test]
    fn test_frame_to_gray_passthrough() {
        let frame = ImageFrame::new(2, 2, 1, vec![1, 2, 3, 4]);
        assert_eq!(frame_to_gray(&frame).into_raw(), vec![1, 2, 3, 4]);
    }
}

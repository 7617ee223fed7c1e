//! Primitive image operations consumed by the preprocessing pipeline
//!
//! The pipeline only talks to [`ImageOps`]; [`StandardImageOps`] backs it with
//! `image` and `imageproc`, plus local implementations of the two operations
//! those crates lack (CLAHE and adaptive thresholding with an offset).

use crate::models::ImageFrame;
use crate::utils::{binarization, grayscale};
use image::GrayImage;
use image::imageops::FilterType;
use imageproc::distance_transform::Norm;

/// Resampling mode for [`ImageOps::resize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Nearest neighbour
    Nearest,
    /// Bilinear
    Bilinear,
    /// Bicubic (Catmull-Rom)
    Bicubic,
}

impl Interpolation {
    fn filter(self) -> FilterType {
        match self {
            Interpolation::Nearest => FilterType::Nearest,
            Interpolation::Bilinear => FilterType::Triangle,
            Interpolation::Bicubic => FilterType::CatmullRom,
        }
    }
}

/// Image-processing collaborator. Implementations must be deterministic.
pub trait ImageOps: Send + Sync {
    /// Single-channel intensity image of a frame
    fn to_gray(&self, frame: &ImageFrame) -> GrayImage;

    /// Resize by a uniform factor
    fn resize(&self, image: &GrayImage, factor: f32, mode: Interpolation) -> GrayImage;

    /// Contrast-limited adaptive histogram equalization
    fn equalize_adaptive(&self, image: &GrayImage, clip_limit: f32, tiles: (u32, u32))
    -> GrayImage;

    /// Edge-preserving denoise
    fn denoise(&self, image: &GrayImage) -> GrayImage;

    /// Gaussian blur with standard deviation `sigma`
    fn gaussian_blur(&self, image: &GrayImage, sigma: f32) -> GrayImage;

    /// Binary image (0/255) from a local-mean threshold
    fn adaptive_threshold(&self, image: &GrayImage, block_size: u32, offset: i32) -> GrayImage;

    /// Morphological closing with a square `kernel` x `kernel` element
    fn morph_close(&self, image: &GrayImage, kernel: u8) -> GrayImage;

    /// Bitwise inversion
    fn invert(&self, image: &GrayImage) -> GrayImage;
}

/// [`ImageOps`] backed by `image` and `imageproc`
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardImageOps;

impl ImageOps for StandardImageOps {
    fn to_gray(&self, frame: &ImageFrame) -> GrayImage {
        grayscale::frame_to_gray(frame)
    }

    fn resize(&self, image: &GrayImage, factor: f32, mode: Interpolation) -> GrayImage {
        if factor == 1.0 {
            return image.clone();
        }
        let w = ((image.width() as f32 * factor).round() as u32).max(1);
        let h = ((image.height() as f32 * factor).round() as u32).max(1);
        image::imageops::resize(image, w, h, mode.filter())
    }

    fn equalize_adaptive(
        &self,
        image: &GrayImage,
        clip_limit: f32,
        tiles: (u32, u32),
    ) -> GrayImage {
        clahe(image, tiles.0 as usize, tiles.1 as usize, clip_limit)
    }

    fn denoise(&self, image: &GrayImage) -> GrayImage {
        imageproc::filter::median_filter(image, 1, 1)
    }

    fn gaussian_blur(&self, image: &GrayImage, sigma: f32) -> GrayImage {
        imageproc::filter::gaussian_blur_f32(image, sigma)
    }

    fn adaptive_threshold(&self, image: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
        binarization::adaptive_threshold(image, block_size, offset)
    }

    fn morph_close(&self, image: &GrayImage, kernel: u8) -> GrayImage {
        imageproc::morphology::close(image, Norm::LInf, kernel / 2)
    }

    fn invert(&self, image: &GrayImage) -> GrayImage {
        let mut inverted = image.clone();
        image::imageops::invert(&mut inverted);
        inverted
    }
}

/// CLAHE over a `tiles_x` x `tiles_y` grid.
///
/// Each tile histogram is clipped at `clip_limit * tile_pixels / 256`, the
/// excess is spread evenly, and pixels are mapped by bilinear interpolation
/// between the four nearest tile lookup tables.
fn clahe(image: &GrayImage, tiles_x: usize, tiles_y: usize, clip_limit: f32) -> GrayImage {
    let (w, h) = (image.width() as usize, image.height() as usize);
    if tiles_x == 0 || tiles_y == 0 || w < tiles_x || h < tiles_y {
        return image.clone();
    }
    let grey = image.as_raw();
    let tile_w = w / tiles_x;
    let tile_h = h / tiles_y;

    let mut maps = vec![[0u8; 256]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = if tx == tiles_x - 1 { w } else { x0 + tile_w };
            let y1 = if ty == tiles_y - 1 { h } else { y0 + tile_h };
            let tile_pixels = (x1 - x0) * (y1 - y0);

            let mut hist = [0u32; 256];
            for row in y0..y1 {
                for &v in &grey[row * w + x0..row * w + x1] {
                    hist[v as usize] += 1;
                }
            }

            let clip = ((clip_limit * tile_pixels as f32 / 256.0) as u32).max(1);
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > clip {
                    excess += *bin - clip;
                    *bin = clip;
                }
            }
            let per_bin = excess / 256;
            let remainder = (excess % 256) as usize;
            for (i, bin) in hist.iter_mut().enumerate() {
                *bin += per_bin + u32::from(i < remainder);
            }

            let map = &mut maps[ty * tiles_x + tx];
            let scale = 255.0 / tile_pixels as f32;
            let mut cdf = 0u32;
            for (i, &count) in hist.iter().enumerate() {
                cdf += count;
                map[i] = (cdf as f32 * scale).round().min(255.0) as u8;
            }
        }
    }

    let mut out = GrayImage::new(image.width(), image.height());
    let last_tx = tiles_x as i64 - 1;
    let last_ty = tiles_y as i64 - 1;
    for y in 0..h {
        let fy = (y as f32 + 0.5) / tile_h as f32 - 0.5;
        let ty0 = (fy.floor() as i64).clamp(0, last_ty) as usize;
        let ty1 = (fy.floor() as i64 + 1).clamp(0, last_ty) as usize;
        let ay = (fy - fy.floor()).clamp(0.0, 1.0);
        for x in 0..w {
            let fx = (x as f32 + 0.5) / tile_w as f32 - 0.5;
            let tx0 = (fx.floor() as i64).clamp(0, last_tx) as usize;
            let tx1 = (fx.floor() as i64 + 1).clamp(0, last_tx) as usize;
            let ax = (fx - fx.floor()).clamp(0.0, 1.0);

            let v = grey[y * w + x] as usize;
            let v00 = maps[ty0 * tiles_x + tx0][v] as f32;
            let v10 = maps[ty0 * tiles_x + tx1][v] as f32;
            let v01 = maps[ty1 * tiles_x + tx0][v] as f32;
            let v11 = maps[ty1 * tiles_x + tx1][v] as f32;

            let top = v00 * (1.0 - ax) + v10 * ax;
            let bottom = v01 * (1.0 - ax) + v11 * ax;
            let value = top * (1.0 - ay) + bottom * ay;
            out.put_pixel(
                x as u32,
                y as u32,
                image::Luma([value.round().clamp(0.0, 255.0) as u8]),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, _| image::Luma([(100 + x % 40) as u8]))
    }

    #[test]
    fn test_resize_factor() {
        let ops = StandardImageOps;
        let img = ramp(20, 10);
        let up = ops.resize(&img, 1.5, Interpolation::Bilinear);
        assert_eq!(up.dimensions(), (30, 15));
        let same = ops.resize(&img, 1.0, Interpolation::Bicubic);
        assert_eq!(same, img);
    }

    #[test]
    fn test_clahe_stretches_low_contrast() {
        let ops = StandardImageOps;
        let img = ramp(256, 256);
        let eq = ops.equalize_adaptive(&img, 3.0, (8, 8));
        assert_eq!(eq.dimensions(), img.dimensions());
        let (lo, hi) = eq
            .pixels()
            .fold((255u8, 0u8), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
        // input spans 100..139, output must be spread wider
        assert!(hi - lo > 39, "range {}..{}", lo, hi);
    }

    #[test]
    fn test_clahe_tiny_image_is_identity() {
        let img = ramp(4, 4);
        assert_eq!(StandardImageOps.equalize_adaptive(&img, 3.0, (8, 8)), img);
    }

    #[test]
    fn test_invert() {
        let img = GrayImage::from_pixel(3, 3, image::Luma([10]));
        let inv = StandardImageOps.invert(&img);
        assert!(inv.pixels().all(|p| p[0] == 245));
    }

    #[test]
    fn test_close_fills_single_pixel_hole() {
        let mut img = GrayImage::from_pixel(9, 9, image::Luma([255]));
        img.put_pixel(4, 4, image::Luma([0]));
        let closed = StandardImageOps.morph_close(&img, 3);
        assert_eq!(closed.get_pixel(4, 4)[0], 255);
    }
}

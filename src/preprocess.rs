//! Deterministic image enhancement producing the decode variants
//!
//! The shipping-label profile decodes the plain grayscale image. The
//! low-resolution profile runs the full chain:
//!
//! 1. grayscale
//! 2. 2x bicubic upscale
//! 3. CLAHE (clip 3.0, 8x8 tiles)
//! 4. denoise
//! 5. unsharp mask `d + 0.7 * (d - blur(d, 3.0))`
//! 6. adaptive threshold (block 21, offset 5) and 3x3 closing
//!
//! Both profiles then emit the result at scales 1.0, 1.5 and 2.0, plus an
//! inverted copy of the pre-threshold image at every scale when an enabled
//! symbology asks for inversion retry.

use crate::models::{ImageFrame, ImageVariant, VariantTag};
use crate::settings::{PreprocessProfile, ScannerConfiguration};
use crate::utils::imageops::{ImageOps, Interpolation, StandardImageOps};
use image::GrayImage;
use tracing::debug;

/// Scale ladder applied to the enhanced image
pub const SCALES: [f32; 3] = [1.0, 1.5, 2.0];

const UPSCALE: f32 = 2.0;
const CLAHE_CLIP_LIMIT: f32 = 3.0;
const CLAHE_TILES: (u32, u32) = (8, 8);
const UNSHARP_AMOUNT: f32 = 0.7;
const UNSHARP_SIGMA: f32 = 3.0;
const THRESHOLD_BLOCK: u32 = 21;
const THRESHOLD_OFFSET: i32 = 5;
const CLOSE_KERNEL: u8 = 3;

/// Stateless enhancement chain over an [`ImageOps`] collaborator
#[derive(Debug, Clone, Default)]
pub struct PreprocessingPipeline<O: ImageOps = StandardImageOps> {
    ops: O,
}

impl PreprocessingPipeline {
    /// Pipeline backed by [`StandardImageOps`]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Output of the profile-specific stages, before the scale ladder
struct Enhanced {
    /// Image handed to the decoders
    decode: GrayImage,
    /// Last stage before thresholding; source of the inverted copies
    pre_threshold: GrayImage,
    /// Size of `decode` relative to the input frame
    upscale: f32,
}

impl<O: ImageOps> PreprocessingPipeline<O> {
    /// Pipeline over a custom collaborator
    pub fn with_ops(ops: O) -> Self {
        Self { ops }
    }

    /// Collaborator in use
    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Produce the variant list for one frame.
    ///
    /// Never fails: a frame that does not validate yields no variants.
    /// Re-running on the same frame and configuration is bit-identical.
    pub fn enhance(&self, frame: &ImageFrame, config: &ScannerConfiguration) -> Vec<ImageVariant> {
        if let Err(reason) = frame.validate() {
            debug!(%reason, "skipping preprocessing of invalid frame");
            return Vec::new();
        }

        let gray = self.ops.to_gray(frame);
        let enhanced = match config.profile() {
            PreprocessProfile::ShippingLabel => Enhanced {
                decode: gray.clone(),
                pre_threshold: gray,
                upscale: 1.0,
            },
            PreprocessProfile::LowResolution => self.enhance_low_resolution(&gray),
        };

        let inverted = config.wants_inverted_variants();
        let mut variants = Vec::with_capacity(SCALES.len() * if inverted { 2 } else { 1 });

        for scale in SCALES {
            variants.push(ImageVariant {
                image: self.rescale(&enhanced.decode, scale),
                tag: VariantTag::new(scale, false),
                magnification: enhanced.upscale * scale,
            });
        }
        if inverted {
            for scale in SCALES {
                let resized = self.rescale(&enhanced.pre_threshold, scale);
                variants.push(ImageVariant {
                    image: self.ops.invert(&resized),
                    tag: VariantTag::new(scale, true),
                    magnification: enhanced.upscale * scale,
                });
            }
        }

        debug!(
            width = frame.width,
            height = frame.height,
            profile = ?config.profile(),
            variants = variants.len(),
            "preprocessed frame"
        );
        variants
    }

    fn enhance_low_resolution(&self, gray: &GrayImage) -> Enhanced {
        let upscaled = self.ops.resize(gray, UPSCALE, Interpolation::Bicubic);
        let equalized = self
            .ops
            .equalize_adaptive(&upscaled, CLAHE_CLIP_LIMIT, CLAHE_TILES);
        let denoised = self.ops.denoise(&equalized);
        let blurred = self.ops.gaussian_blur(&denoised, UNSHARP_SIGMA);
        let sharpened = unsharp_mask(&denoised, &blurred, UNSHARP_AMOUNT);
        let binary = self
            .ops
            .adaptive_threshold(&sharpened, THRESHOLD_BLOCK, THRESHOLD_OFFSET);
        let closed = self.ops.morph_close(&binary, CLOSE_KERNEL);

        Enhanced {
            decode: closed,
            pre_threshold: sharpened,
            upscale: UPSCALE,
        }
    }

    fn rescale(&self, image: &GrayImage, scale: f32) -> GrayImage {
        self.ops.resize(image, scale, Interpolation::Bilinear)
    }
}

/// `base + amount * (base - blurred)`, clamped to 0..=255
fn unsharp_mask(base: &GrayImage, blurred: &GrayImage, amount: f32) -> GrayImage {
    let mut out = base.clone();
    for (dst, blur) in out.pixels_mut().zip(blurred.pixels()) {
        let d = dst[0] as f32;
        let b = blur[0] as f32;
        dst[0] = (d + amount * (d - b)).round().clamp(0.0, 255.0) as u8;
    }
    out
}

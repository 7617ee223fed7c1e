use crate::models::ImageFrame;
use image::GenericImageView;
use std::env;
use std::path::Path;

fn max_dim_from_env() -> Option<u32> {
    match env::var("SCAN_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an image file as an RGB [`ImageFrame`].
///
/// When `SCAN_MAX_DIM` is set, images whose longer side exceeds it are
/// downscaled first.
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<ImageFrame, image::ImageError> {
    let img = image::open(path)?;
    let img = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => {
            img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
        }
        _ => img,
    };
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(ImageFrame::new(width, height, 3, rgb.into_raw()))
}

/// Synthetic high-contrast checkerboard frame for benchmarks and smoke tests
pub fn checkerboard_frame(width: u32, height: u32, cell: u32) -> ImageFrame {
    let cell = cell.max(1);
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push(if (x / cell + y / cell) % 2 == 0 { 20 } else { 235 });
        }
    }
    ImageFrame::new(width, height, 1, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_frame("does/not/exist.png").is_err());
    }

    #[test]
    fn test_load_round_trip() {
        let path = env::temp_dir().join(format!("rust_barcode_load_{}.png", std::process::id()));
        let img = image::GrayImage::from_pixel(12, 7, image::Luma([90]));
        img.save(&path).expect("failed to write temp image");

        let frame = load_frame(&path).expect("failed to load temp image");
        assert_eq!((frame.width, frame.height, frame.channels), (12, 7, 3));
        assert!(frame.validate().is_ok());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_checkerboard_frame() {
        let frame = checkerboard_frame(8, 4, 2);
        assert_eq!(frame.pixels.len(), 32);
        assert_eq!(frame.pixels[0], 20);
        assert_eq!(frame.pixels[2], 235);
    }
}

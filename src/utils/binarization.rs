use image::GrayImage;

/// Integral image with one extra leading row and column of zeros
fn integral_image(gray: &[u8], width: usize, height: usize) -> Vec<u64> {
    let iw = width + 1;
    let mut integral = vec![0u64; iw * (height + 1)];
    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += gray[y * width + x] as u64;
            integral[(y + 1) * iw + (x + 1)] = row_sum + integral[y * iw + (x + 1)];
        }
    }
    integral
}

/// Adaptive mean threshold.
///
/// Each pixel is compared to the mean of the `block_size` x `block_size`
/// window around it (clipped at the borders) minus `offset`; pixels above
/// that threshold become 255, the rest 0.
pub fn adaptive_threshold(image: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let gray = image.as_raw();
    let radius = (block_size.max(1) / 2) as usize;
    let integral = integral_image(gray, w, h);
    let iw = w + 1;

    let mut out = GrayImage::new(image.width(), image.height());
    for y in 0..h {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(w);
            let area = ((y1 - y0) * (x1 - x0)) as i64;
            let sum = integral[y1 * iw + x1] + integral[y0 * iw + x0]
                - integral[y0 * iw + x1]
                - integral[y1 * iw + x0];
            let threshold = sum as i64 / area - offset as i64;
            let value = gray[y * w + x] as i64;
            out.put_pixel(
                x as u32,
                y as u32,
                image::Luma([if value > threshold { 255 } else { 0 }]),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_image_is_white() {
        // mean - offset is always below the pixel itself
        let img = GrayImage::from_pixel(30, 30, image::Luma([120]));
        let bin = adaptive_threshold(&img, 21, 5);
        assert!(bin.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_dark_stripe_survives() {
        let img = GrayImage::from_fn(40, 40, |x, _| {
            if (18..22).contains(&x) {
                image::Luma([20])
            } else {
                image::Luma([220])
            }
        });
        let bin = adaptive_threshold(&img, 21, 5);
        assert_eq!(bin.get_pixel(20, 20)[0], 0);
        assert_eq!(bin.get_pixel(5, 20)[0], 255);
        assert_eq!(bin.get_pixel(35, 5)[0], 255);
    }
}

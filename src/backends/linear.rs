use super::{DecodeBackend, DecodeRequest, rxing_decode, rxing_detection, rxing_hints};
use crate::config;
use crate::error::BackendError;
use crate::models::{BackendId, RawDetection, SymbologySet};
use tracing::debug;

/// Bands shorter than this are not worth a decode attempt
const MIN_BAND_ROWS: u32 = 16;

/// 1D reader (rxing restricted to linear formats).
///
/// In whole-image mode it also decodes horizontal bands of the image one by
/// one, which finds stacked labels the full-frame pass reports only once.
#[derive(Debug, Clone, Copy)]
pub struct LinearBackend {
    bands: usize,
}

impl Default for LinearBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearBackend {
    /// Band count from `SCAN_LINEAR_BANDS`
    pub fn new() -> Self {
        Self::with_bands(config::linear_band_count())
    }

    /// Explicit band count, at least 1
    pub fn with_bands(bands: usize) -> Self {
        Self {
            bands: bands.max(1),
        }
    }

    /// Row ranges of the band sweep; empty when a single band would repeat
    /// the full-frame pass
    fn band_rows(&self, height: u32) -> Vec<(u32, u32)> {
        if self.bands < 2 {
            return Vec::new();
        }
        let band_height = height / self.bands as u32;
        if band_height < MIN_BAND_ROWS {
            return Vec::new();
        }
        (0..self.bands as u32)
            .map(|i| {
                let top = i * band_height;
                let bottom = if i + 1 == self.bands as u32 {
                    height
                } else {
                    top + band_height
                };
                (top, bottom)
            })
            .collect()
    }
}

impl DecodeBackend for LinearBackend {
    fn id(&self) -> BackendId {
        BackendId::Linear
    }

    fn domain(&self) -> SymbologySet {
        SymbologySet::linear()
    }

    fn decode(&self, request: &DecodeRequest<'_>) -> Result<Vec<RawDetection>, BackendError> {
        let formats = request.formats.intersection(self.domain());
        if formats.is_empty() {
            return Ok(Vec::new());
        }
        let hints = rxing_hints(formats, request.try_harder);

        let mut detections: Vec<RawDetection> = rxing_decode(
            request.pixels,
            request.width,
            request.height,
            &hints,
            request.search_whole_image,
        )?
        .iter()
        .filter_map(|r| rxing_detection(r, formats, self.id(), request.tag))
        .collect();

        if request.search_whole_image {
            let stride = request.width as usize;
            for (top, bottom) in self.band_rows(request.height) {
                if detections.len() >= request.max_symbols {
                    break;
                }
                let rows = &request.pixels[top as usize * stride..bottom as usize * stride];
                // a band that fails to decode does not spoil the full-frame result
                let results = match rxing_decode(rows, request.width, bottom - top, &hints, false) {
                    Ok(results) => results,
                    Err(e) => {
                        debug!(top, bottom, error = %e, "linear band failed");
                        continue;
                    }
                };
                detections.extend(results.iter().filter_map(|r| {
                    let mut detection = rxing_detection(r, formats, self.id(), request.tag)?;
                    for p in &mut detection.polygon {
                        *p = p.translate(0.0, top as f32);
                    }
                    Some(detection)
                }));
            }
        }

        detections.truncate(request.max_symbols);
        debug!(
            scale = request.tag.scale,
            inverted = request.tag.inverted,
            found = detections.len(),
            "linear backend"
        );
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_rows_cover_image() {
        let backend = LinearBackend::with_bands(4);
        let rows = backend.band_rows(130);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], (0, 32));
        assert_eq!(rows[3], (96, 130));
    }

    #[test]
    fn test_no_bands_for_short_images() {
        assert!(LinearBackend::with_bands(4).band_rows(40).is_empty());
        assert!(LinearBackend::with_bands(1).band_rows(400).is_empty());
    }

    #[test]
    fn test_matrix_only_request_is_skipped() {
        let pixels = vec![255u8; 32 * 32];
        let request = DecodeRequest {
            pixels: &pixels,
            width: 32,
            height: 32,
            formats: SymbologySet::matrix(),
            max_symbols: 4,
            try_harder: false,
            search_whole_image: true,
            tag: Default::default(),
        };
        let found = LinearBackend::with_bands(2).decode(&request);
        assert_eq!(found, Ok(Vec::new()));
    }
}

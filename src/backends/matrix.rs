use super::{DecodeBackend, DecodeRequest, rxing_decode, rxing_detection, rxing_hints};
use crate::config;
use crate::error::BackendError;
use crate::models::{BackendId, RawDetection, Symbology, SymbologySet};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Smallest search window side in pixels
const MIN_WINDOW: u32 = 48;

/// Sub-window sweeps after the full frame: side = longer frame side / divisor,
/// clamped to the shorter side
const WINDOW_DIVISORS: [u32; 2] = [2, 3];

/// Square (or full-frame) region of the request buffer searched as one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// DataMatrix region search with a wall-clock budget and a cap on the
/// number of regions read per call.
///
/// The frame is searched window by window: first the whole buffer, then
/// overlapping sub-windows so symbols away from the centre are reached. The
/// deadline is checked before every window, so the budget bounds the search
/// itself and not only the decoding of regions already found. Window buffers
/// are owned by the loop and dropped on every exit path.
#[derive(Debug, Clone, Copy)]
pub struct MatrixBackend {
    time_budget: Duration,
    max_regions: usize,
}

impl Default for MatrixBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixBackend {
    /// Limits from `SCAN_MATRIX_TIME_BUDGET_MS` and `SCAN_MATRIX_MAX_REGIONS`
    pub fn new() -> Self {
        Self::with_limits(
            Duration::from_millis(config::matrix_time_budget_ms()),
            config::matrix_max_regions(),
        )
    }

    /// Explicit budget and region cap; the cap is at least one
    pub fn with_limits(time_budget: Duration, max_regions: usize) -> Self {
        Self {
            time_budget,
            max_regions: max_regions.max(1),
        }
    }

    /// Regions read for a request asking for `max_symbols` codes
    pub fn region_cap(&self, max_symbols: usize) -> usize {
        self.max_regions.min(max_symbols).max(1)
    }
}

/// Start offsets covering `extent` with windows of `side`, last one flush
/// with the far edge
fn offsets(extent: u32, side: u32, step: u32) -> Vec<u32> {
    let last = extent - side;
    let mut starts: Vec<u32> = (0..=last).step_by(step.max(1) as usize).collect();
    if starts.last() != Some(&last) {
        starts.push(last);
    }
    starts
}

/// Full frame first, then progressively smaller overlapping squares
fn search_windows(width: u32, height: u32) -> Vec<Window> {
    let mut windows = vec![Window {
        x: 0,
        y: 0,
        width,
        height,
    }];
    let (long, short) = (width.max(height), width.min(height));
    let mut previous = 0;
    for divisor in WINDOW_DIVISORS {
        let side = (long / divisor).min(short);
        if side < MIN_WINDOW {
            break;
        }
        if side == previous {
            continue;
        }
        previous = side;
        for y in offsets(height, side, side / 2) {
            for x in offsets(width, side, side / 2) {
                windows.push(Window {
                    x,
                    y,
                    width: side,
                    height: side,
                });
            }
        }
    }
    windows
}

fn crop(pixels: &[u8], stride: u32, window: Window) -> Vec<u8> {
    let mut out = Vec::with_capacity(window.width as usize * window.height as usize);
    for row in window.y..window.y + window.height {
        let start = (row * stride + window.x) as usize;
        out.extend_from_slice(&pixels[start..start + window.width as usize]);
    }
    out
}

impl DecodeBackend for MatrixBackend {
    fn id(&self) -> BackendId {
        BackendId::Matrix
    }

    fn domain(&self) -> SymbologySet {
        [Symbology::DataMatrix].into_iter().collect()
    }

    fn decode(&self, request: &DecodeRequest<'_>) -> Result<Vec<RawDetection>, BackendError> {
        let formats = request.formats.intersection(self.domain());
        if formats.is_empty() {
            return Ok(Vec::new());
        }
        let deadline = Instant::now() + self.time_budget;
        let cap = self.region_cap(request.max_symbols);
        let hints = rxing_hints(formats, request.try_harder);
        let windows = search_windows(request.width, request.height);

        let mut detections: Vec<RawDetection> = Vec::new();
        let mut seen = HashSet::new();
        let mut timed_out = false;
        for (searched, window) in windows.iter().enumerate() {
            if detections.len() >= cap {
                trace!(cap, searched, "matrix region cap reached");
                break;
            }
            if Instant::now() >= deadline {
                trace!(searched, "matrix time budget exhausted");
                timed_out = true;
                break;
            }

            let results = if searched == 0 {
                rxing_decode(request.pixels, request.width, request.height, &hints, false)
            } else {
                let pixels = crop(request.pixels, request.width, *window);
                rxing_decode(&pixels, window.width, window.height, &hints, false)
            };
            let results = match results {
                Ok(results) => results,
                Err(e) => {
                    debug!(window = searched, error = %e, "matrix window did not decode");
                    continue;
                }
            };

            for result in &results {
                if detections.len() >= cap {
                    break;
                }
                let Some(mut detection) = rxing_detection(result, formats, self.id(), request.tag)
                else {
                    continue;
                };
                // overlapping windows see the same symbol more than once
                if !seen.insert(detection.payload.clone()) {
                    continue;
                }
                for p in &mut detection.polygon {
                    *p = p.translate(window.x as f32, window.y as f32);
                }
                detections.push(detection);
            }
        }

        if timed_out && detections.is_empty() {
            return Err(BackendError::Timeout);
        }
        debug!(
            scale = request.tag.scale,
            inverted = request.tag.inverted,
            windows = windows.len(),
            found = detections.len(),
            "matrix backend"
        );
        Ok(detections)
    }
}

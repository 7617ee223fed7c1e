use super::{DecodeBackend, DecodeRequest, rxing_decode, rxing_detection, rxing_hints};
use crate::error::BackendError;
use crate::models::{BackendId, RawDetection, SymbologySet};
use tracing::debug;

/// Multi-format reader covering every supported symbology (rxing)
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralBackend;

impl GeneralBackend {
    /// Multi-format rxing reader
    pub fn new() -> Self {
        Self
    }
}

impl DecodeBackend for GeneralBackend {
    fn id(&self) -> BackendId {
        BackendId::General
    }

    fn domain(&self) -> SymbologySet {
        SymbologySet::all()
    }

    fn decode(&self, request: &DecodeRequest<'_>) -> Result<Vec<RawDetection>, BackendError> {
        if request.formats.is_empty() {
            return Ok(Vec::new());
        }
        let hints = rxing_hints(request.formats, request.try_harder);
        let results = rxing_decode(
            request.pixels,
            request.width,
            request.height,
            &hints,
            request.search_whole_image,
        )?;

        let detections: Vec<RawDetection> = results
            .iter()
            .filter_map(|r| rxing_detection(r, request.formats, self.id(), request.tag))
            .take(request.max_symbols)
            .collect();
        debug!(
            scale = request.tag.scale,
            inverted = request.tag.inverted,
            found = detections.len(),
            "general backend"
        );
        Ok(detections)
    }
}

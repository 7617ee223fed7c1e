use super::{FormatDetails, Point, Rect, Symbology, VariantTag};
use std::fmt;

/// Identifies which decode backend produced a detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendId {
    /// General multi-format reader
    General,
    /// Specialized matrix-code reader
    Matrix,
    /// Specialized linear-code reader
    Linear,
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendId::General => "general",
            BackendId::Matrix => "matrix",
            BackendId::Linear => "linear",
        };
        f.write_str(name)
    }
}

/// Un-deduplicated decoder output for one (variant, backend) pair
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Decoded payload
    pub payload: String,
    /// Symbology reported by the backend
    pub symbology: Symbology,
    /// Corner points; in variant coordinates when produced, in frame
    /// coordinates once the orchestrator hands the detection on
    pub polygon: Vec<Point>,
    /// Backend that produced it
    pub source: BackendId,
    /// Variant it was decoded from
    pub variant: VariantTag,
}

impl RawDetection {
    /// Payload used for grouping: trailing NUL terminators removed
    pub fn normalized_payload(&self) -> &str {
        self.payload.trim_end_matches('\0')
    }
}

/// Final, deduplicated scan result
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeResult {
    /// Decoded text
    pub data: String,
    /// Symbology
    pub symbology: Symbology,
    /// Display name of the symbology
    pub symbology_name: &'static str,
    /// Location in input frame coordinates
    pub location: Rect,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// True when the code was only read from an inverted variant
    pub color_inverted: bool,
    /// Rendered format details
    pub format_details: String,
    /// Structured format details
    pub details: FormatDetails,
    /// Backends that read this code, in first-seen order
    pub backends: Vec<BackendId>,
}

impl BarcodeResult {
    /// True for 2D symbologies
    pub fn is_2d(&self) -> bool {
        self.symbology.is_matrix()
    }
}

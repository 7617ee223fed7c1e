//! Decode backends
//!
//! Every backend implements [`DecodeBackend`] and is driven by the
//! orchestrator without knowing which library sits behind it. A backend
//! declares the symbologies it can read; the orchestrator only calls it when
//! that domain overlaps the enabled set, and only asks for the overlap.

/// Multi-format reader for every symbology
pub mod general;
/// 1D reader with a horizontal band sweep
pub mod linear;
/// DataMatrix region search with a time budget and region cap
pub mod matrix;

pub use general::GeneralBackend;
pub use linear::LinearBackend;
pub use matrix::MatrixBackend;

use crate::error::BackendError;
use crate::models::{
    BackendId, ImageVariant, Point, RawDetection, Symbology, SymbologySet, VariantTag,
};
use crate::settings::ScannerConfiguration;
use rxing::common::HybridBinarizer;
use rxing::multi::{GenericMultipleBarcodeReader, MultipleBarcodeReader};
use rxing::{
    BarcodeFormat, BinaryBitmap, DecodeHintValue, DecodeHints, Exceptions, Luma8LuminanceSource,
    MultiFormatReader, RXingResult, Reader,
};
use std::collections::HashSet;

/// One decode call: a single-channel pixel buffer plus the decoder knobs
#[derive(Debug, Clone, Copy)]
pub struct DecodeRequest<'a> {
    /// Row-major 8-bit pixels, `width * height` bytes
    pub pixels: &'a [u8],
    /// Buffer width in pixels
    pub width: u32,
    /// Buffer height in pixels
    pub height: u32,
    /// Symbologies to look for (the format mask)
    pub formats: SymbologySet,
    /// Upper bound on symbols to return
    pub max_symbols: usize,
    /// Slower, more thorough decoding
    pub try_harder: bool,
    /// Look for several symbols anywhere in the image
    pub search_whole_image: bool,
    /// Variant the pixels came from, copied into every detection
    pub tag: VariantTag,
}

impl<'a> DecodeRequest<'a> {
    /// Request for one variant, restricted to `formats`
    pub fn for_variant(
        variant: &'a ImageVariant,
        config: &ScannerConfiguration,
        formats: SymbologySet,
    ) -> Self {
        Self {
            pixels: variant.image.as_raw(),
            width: variant.width(),
            height: variant.height(),
            formats,
            max_symbols: config.max_codes_per_frame(),
            try_harder: config.try_harder(),
            search_whole_image: config.search_whole_image(),
            tag: variant.tag,
        }
    }
}

/// Turns a grayscale buffer into raw detections.
///
/// Implementations must be callable from several threads at once and must
/// not keep state between calls. Polygons are returned in the coordinates of
/// the request's pixel buffer.
pub trait DecodeBackend: Send + Sync {
    /// Stable identifier recorded on every detection
    fn id(&self) -> BackendId;

    /// Symbologies this backend can read
    fn domain(&self) -> SymbologySet;

    /// Decode one buffer
    fn decode(&self, request: &DecodeRequest<'_>) -> Result<Vec<RawDetection>, BackendError>;
}

pub(crate) fn to_barcode_format(symbology: Symbology) -> BarcodeFormat {
    match symbology {
        Symbology::Code128 => BarcodeFormat::CODE_128,
        Symbology::Code39 => BarcodeFormat::CODE_39,
        Symbology::Code93 => BarcodeFormat::CODE_93,
        Symbology::Codabar => BarcodeFormat::CODABAR,
        Symbology::Itf => BarcodeFormat::ITF,
        Symbology::Ean13 => BarcodeFormat::EAN_13,
        Symbology::Ean8 => BarcodeFormat::EAN_8,
        Symbology::UpcA => BarcodeFormat::UPC_A,
        Symbology::UpcE => BarcodeFormat::UPC_E,
        Symbology::QrCode => BarcodeFormat::QR_CODE,
        Symbology::DataMatrix => BarcodeFormat::DATA_MATRIX,
        Symbology::Pdf417 => BarcodeFormat::PDF_417,
        Symbology::Aztec => BarcodeFormat::AZTEC,
    }
}

pub(crate) fn from_barcode_format(format: &BarcodeFormat) -> Option<Symbology> {
    let symbology = match format {
        BarcodeFormat::CODE_128 => Symbology::Code128,
        BarcodeFormat::CODE_39 => Symbology::Code39,
        BarcodeFormat::CODE_93 => Symbology::Code93,
        BarcodeFormat::CODABAR => Symbology::Codabar,
        BarcodeFormat::ITF => Symbology::Itf,
        BarcodeFormat::EAN_13 => Symbology::Ean13,
        BarcodeFormat::EAN_8 => Symbology::Ean8,
        BarcodeFormat::UPC_A => Symbology::UpcA,
        BarcodeFormat::UPC_E => Symbology::UpcE,
        BarcodeFormat::QR_CODE => Symbology::QrCode,
        BarcodeFormat::DATA_MATRIX => Symbology::DataMatrix,
        BarcodeFormat::PDF_417 => Symbology::Pdf417,
        BarcodeFormat::AZTEC => Symbology::Aztec,
        _ => return None,
    };
    Some(symbology)
}

/// Hints restricting an rxing reader to `formats`
pub(crate) fn rxing_hints(formats: SymbologySet, try_harder: bool) -> DecodeHints {
    let possible: HashSet<BarcodeFormat> = formats.iter().map(to_barcode_format).collect();
    DecodeHints::default()
        .with(DecodeHintValue::TryHarder(try_harder))
        .with(DecodeHintValue::PossibleFormats(possible))
}

/// Run rxing over a grayscale buffer.
///
/// `multiple` selects the whole-image multi-symbol search; otherwise the
/// single best symbol is returned. "Nothing found" is an empty list, not an
/// error.
pub(crate) fn rxing_decode(
    pixels: &[u8],
    width: u32,
    height: u32,
    hints: &DecodeHints,
    multiple: bool,
) -> Result<Vec<RXingResult>, BackendError> {
    let source = Luma8LuminanceSource::new(pixels.to_vec(), width, height);
    let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));

    let outcome = if multiple {
        let mut reader = GenericMultipleBarcodeReader::new(MultiFormatReader::default());
        reader.decode_multiple_with_hints(&mut bitmap, hints)
    } else {
        let mut reader = MultiFormatReader::default();
        reader.decode_with_hints(&mut bitmap, hints).map(|r| vec![r])
    };

    match outcome {
        Ok(results) => Ok(results),
        Err(Exceptions::NotFoundException(_)) => Ok(Vec::new()),
        Err(e) => Err(BackendError::Decoder(e.to_string())),
    }
}

/// Convert an rxing result, dropping formats outside `formats`
pub(crate) fn rxing_detection(
    result: &RXingResult,
    formats: SymbologySet,
    source: BackendId,
    tag: VariantTag,
) -> Option<RawDetection> {
    let symbology = from_barcode_format(result.getBarcodeFormat())?;
    if !formats.contains(symbology) {
        return None;
    }
    let polygon = result
        .getPoints()
        .iter()
        .map(|p| Point::new(p.x, p.y))
        .collect();
    Some(RawDetection {
        payload: result.getText().to_string(),
        symbology,
        polygon,
        source,
        variant: tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mapping_round_trips() {
        for s in Symbology::ALL {
            assert_eq!(from_barcode_format(&to_barcode_format(s)), Some(s));
        }
        assert_eq!(from_barcode_format(&BarcodeFormat::MAXICODE), None);
    }

    #[test]
    fn test_blank_buffer_decodes_to_nothing() {
        let pixels = vec![255u8; 64 * 64];
        let hints = rxing_hints(SymbologySet::all(), false);
        let results = rxing_decode(&pixels, 64, 64, &hints, false).unwrap_or_default();
        assert!(results.is_empty());
    }
}

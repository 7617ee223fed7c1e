/// Raw detections, results and backend ids
pub mod detection;
/// Input frames and preprocessed variants
pub mod frame;
/// Points, rectangles and polygon checks
pub mod point;
/// Symbology enum and format sets
pub mod symbology;

pub use crate::parsers::FormatDetails;
pub use detection::{BackendId, BarcodeResult, RawDetection};
pub use frame::{ImageFrame, ImageVariant, VariantTag};
pub use point::{Point, Rect};
pub use symbology::{Symbology, SymbologyFamily, SymbologySet};

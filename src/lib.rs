//! rust_barcode - multi-backend barcode scanning pipeline
//!
//! A frame goes through a deterministic preprocessing chain, every enabled
//! decode backend runs over every image variant, and the raw detections are
//! fused into one deduplicated, bounded result list with per-symbology
//! format details (GTIN check digits, QR content classes, GS1 elements).
//!
//! ```no_run
//! use rust_barcode::{BarcodeScanner, FrameSession, ImageFrame, ScannerConfiguration};
//!
//! let mut scanner = BarcodeScanner::new(ScannerConfiguration::shipping_label());
//! let mut session = FrameSession::new();
//! session.start();
//!
//! let frame = ImageFrame::new(640, 480, 1, vec![255; 640 * 480]);
//! let status = scanner.process_frame(&session, &frame)?;
//! for code in scanner.last_results() {
//!     println!("{} {}: {}", status.code(), code.symbology_name, code.data);
//! }
//! # Ok::<(), rust_barcode::ScanError>(())
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Result fusion across variants and backends
pub mod aggregator;
/// Decode backend capability and its rxing implementations
pub mod backends;
/// Environment-driven tuning knobs
mod config;
/// Error and status types
pub mod error;
/// Core data structures (frames, detections, results, geometry)
pub mod models;
/// Variant fan-out over the registered backends
pub mod orchestrator;
/// Payload interpretation per symbology
pub mod parsers;
/// Image enhancement chain
pub mod preprocess;
/// Scanner façade
pub mod scanner;
/// Frame sequence gate
pub mod session;
/// Scanner configuration and presets
pub mod settings;
/// Image loading helpers for binaries and benchmarks
pub mod tools;
/// Image processing helpers (grayscale, thresholding, image ops)
pub mod utils;

pub use aggregator::ResultAggregator;
pub use error::{BackendError, ScanError, ScanStatus};
pub use models::{
    BackendId, BarcodeResult, FormatDetails, ImageFrame, ImageVariant, Point, RawDetection, Rect,
    Symbology, SymbologySet, VariantTag,
};
pub use orchestrator::DecodeOrchestrator;
pub use preprocess::PreprocessingPipeline;
pub use scanner::BarcodeScanner;
pub use session::{FrameSession, SessionState};
pub use settings::{PreprocessProfile, ScanPreset, ScannerConfiguration};

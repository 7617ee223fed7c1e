//! Frame-level entry point tying the pipeline stages together

use crate::aggregator::ResultAggregator;
use crate::error::{ScanError, ScanStatus};
use crate::models::{BarcodeResult, ImageFrame};
use crate::orchestrator::DecodeOrchestrator;
use crate::parsers;
use crate::preprocess::PreprocessingPipeline;
use crate::session::FrameSession;
use crate::settings::ScannerConfiguration;
use std::time::Instant;
use tracing::info;

/// Barcode scanner: preprocess, decode, aggregate, parse.
///
/// The configuration may be changed between frames through
/// [`configuration_mut`](Self::configuration_mut); it is only read while a
/// frame is processed.
pub struct BarcodeScanner {
    config: ScannerConfiguration,
    pipeline: PreprocessingPipeline,
    orchestrator: DecodeOrchestrator,
    last_results: Vec<BarcodeResult>,
}

impl BarcodeScanner {
    /// Scanner with the default general, matrix and linear backends
    pub fn new(config: ScannerConfiguration) -> Self {
        Self::with_orchestrator(config, DecodeOrchestrator::with_default_backends())
    }

    /// Scanner over a custom backend set
    pub fn with_orchestrator(
        config: ScannerConfiguration,
        orchestrator: DecodeOrchestrator,
    ) -> Self {
        Self {
            config,
            pipeline: PreprocessingPipeline::new(),
            orchestrator,
            last_results: Vec::new(),
        }
    }

    /// Active configuration
    pub fn configuration(&self) -> &ScannerConfiguration {
        &self.config
    }

    /// Mutable configuration, for changes between frames
    pub fn configuration_mut(&mut self) -> &mut ScannerConfiguration {
        &mut self.config
    }

    /// Results of the last successful [`process_frame`](Self::process_frame)
    pub fn last_results(&self) -> &[BarcodeResult] {
        &self.last_results
    }

    /// Scan one frame.
    ///
    /// Fails with [`ScanError::SessionNotActive`] outside a frame sequence
    /// (whatever the frame holds) and with [`ScanError::InvalidImage`] for an
    /// unusable frame; both are reported before any decoding runs. Backend
    /// failures never surface here.
    pub fn process_frame(
        &mut self,
        session: &FrameSession,
        frame: &ImageFrame,
    ) -> Result<ScanStatus, ScanError> {
        self.last_results.clear();

        if !session.is_active() {
            return Err(ScanError::SessionNotActive);
        }
        frame.validate().map_err(ScanError::InvalidImage)?;

        let started = Instant::now();
        let variants = self.pipeline.enhance(frame, &self.config);
        let detections = self.orchestrator.run(&variants, &self.config);
        let mut results = ResultAggregator::for_frame(frame.width, frame.height)
            .aggregate(&detections, &self.config);
        parsers::annotate(&mut results);

        info!(
            width = frame.width,
            height = frame.height,
            variants = variants.len(),
            detections = detections.len(),
            results = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "frame processed"
        );

        self.last_results = results;
        if self.last_results.is_empty() {
            Ok(ScanStatus::NoCodesFound)
        } else {
            Ok(ScanStatus::Success)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{DecodeBackend, DecodeRequest};
    use crate::error::BackendError;
    use crate::models::{BackendId, RawDetection, Symbology, SymbologySet};

    /// Reads the same GTIN from every variant
    struct FixedBackend;

    impl DecodeBackend for FixedBackend {
        fn id(&self) -> BackendId {
            BackendId::Linear
        }
        fn domain(&self) -> SymbologySet {
            SymbologySet::linear()
        }
        fn decode(&self, request: &DecodeRequest<'_>) -> Result<Vec<RawDetection>, BackendError> {
            Ok(vec![RawDetection {
                payload: "036000291452".into(),
                symbology: Symbology::UpcA,
                polygon: Vec::new(),
                source: BackendId::Linear,
                variant: request.tag,
            }])
        }
    }

    fn scanner() -> BarcodeScanner {
        let mut orchestrator = DecodeOrchestrator::new();
        orchestrator.register(FixedBackend);
        BarcodeScanner::with_orchestrator(ScannerConfiguration::shipping_label(), orchestrator)
    }

    fn frame() -> ImageFrame {
        ImageFrame::new(16, 8, 1, vec![200; 128])
    }

    #[test]
    fn test_requires_active_session() {
        let mut scanner = scanner();
        let session = FrameSession::new();
        assert_eq!(
            scanner.process_frame(&session, &frame()),
            Err(ScanError::SessionNotActive)
        );
        // session is checked before the image
        let empty = ImageFrame::new(0, 0, 1, Vec::new());
        assert_eq!(
            scanner.process_frame(&session, &empty),
            Err(ScanError::SessionNotActive)
        );
    }

    #[test]
    fn test_invalid_image() {
        let mut scanner = scanner();
        let mut session = FrameSession::new();
        session.start();
        let err = scanner
            .process_frame(&session, &ImageFrame::new(16, 8, 1, Vec::new()))
            .unwrap_err();
        assert_eq!(err.status(), ScanStatus::InvalidImage);
    }

    #[test]
    fn test_fused_and_parsed_results() {
        let mut scanner = scanner();
        let mut session = FrameSession::new();
        session.start();

        let status = scanner.process_frame(&session, &frame()).unwrap();
        assert_eq!(status, ScanStatus::Success);

        let results = scanner.last_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbology_name, "UPCA");
        assert!(results[0].format_details.ends_with("Valid: Yes"));
        assert_eq!(results[0].location.width, 16);
        assert_eq!(results[0].location.height, 8);
    }

    #[test]
    fn test_no_codes_and_results_cleared() {
        let mut scanner = scanner();
        let mut session = FrameSession::new();
        session.start();
        scanner.process_frame(&session, &frame()).unwrap();
        assert!(!scanner.last_results().is_empty());

        for s in Symbology::ALL {
            scanner.configuration_mut().set_symbology_enabled(s, false);
        }
        let status = scanner.process_frame(&session, &frame()).unwrap();
        assert_eq!(status, ScanStatus::NoCodesFound);
        assert!(scanner.last_results().is_empty());

        session.end();
        assert!(scanner.process_frame(&session, &frame()).is_err());
        assert!(scanner.last_results().is_empty());
    }
}

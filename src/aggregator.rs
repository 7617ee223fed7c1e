//! Deduplication of raw detections into the final result list

use crate::models::{
    BackendId, BarcodeResult, FormatDetails, RawDetection, Rect, Symbology, point::is_degenerate,
};
use crate::settings::ScannerConfiguration;
use std::collections::HashMap;
use tracing::debug;

/// Every backend agreeing on a code reports it with this confidence
const FUSED_CONFIDENCE: f32 = 1.0;

/// Detections sharing a symbology and normalized payload
struct Group<'a> {
    members: Vec<&'a RawDetection>,
}

impl<'a> Group<'a> {
    /// Non-inverted geometry first, then a usable polygon, then encounter order
    fn representative(&self) -> &'a RawDetection {
        let mut best = self.members[0];
        for &candidate in &self.members[1..] {
            if rank(candidate) < rank(best) {
                best = candidate;
            }
        }
        best
    }

    fn backends(&self) -> Vec<BackendId> {
        let mut ids = Vec::new();
        for member in &self.members {
            if !ids.contains(&member.source) {
                ids.push(member.source);
            }
        }
        ids
    }
}

fn rank(detection: &RawDetection) -> (bool, bool) {
    (
        detection.variant.inverted,
        is_degenerate(&detection.polygon),
    )
}

/// Groups raw detections for one frame.
///
/// Two detections are the same code when symbology and payload (trailing
/// NULs removed) match, whatever variant or backend produced them. Groups
/// keep the order in which they were first seen.
#[derive(Debug, Clone, Copy)]
pub struct ResultAggregator {
    frame: Rect,
}

impl ResultAggregator {
    /// Aggregator for a `width` x `height` input frame
    pub fn for_frame(width: u32, height: u32) -> Self {
        Self {
            frame: Rect::new(0, 0, width, height),
        }
    }

    /// Deduplicate and bound `detections`.
    ///
    /// Symbologies that are not enabled are dropped. The output never holds
    /// more than `max_codes_per_frame` results; an empty input gives an
    /// empty output. Format details are left as [`FormatDetails::Standard`]
    /// for the format parser to fill in.
    pub fn aggregate(
        &self,
        detections: &[RawDetection],
        config: &ScannerConfiguration,
    ) -> Vec<BarcodeResult> {
        let enabled = config.enabled_symbologies();
        let mut index: HashMap<(Symbology, &str), usize> = HashMap::new();
        let mut groups: Vec<Group<'_>> = Vec::new();

        for detection in detections {
            if !enabled.contains(detection.symbology) {
                continue;
            }
            let key = (detection.symbology, detection.normalized_payload());
            match index.get(&key) {
                Some(&i) => groups[i].members.push(detection),
                None => {
                    index.insert(key, groups.len());
                    groups.push(Group {
                        members: vec![detection],
                    });
                }
            }
        }

        let total = groups.len();
        let results: Vec<BarcodeResult> = groups
            .iter()
            .take(config.max_codes_per_frame())
            .map(|group| self.build(group))
            .collect();

        debug!(
            raw = detections.len(),
            distinct = total,
            kept = results.len(),
            "aggregated detections"
        );
        results
    }

    fn build(&self, group: &Group<'_>) -> BarcodeResult {
        let representative = group.representative();
        BarcodeResult {
            data: representative.normalized_payload().to_string(),
            symbology: representative.symbology,
            symbology_name: representative.symbology.name(),
            location: self.location(representative),
            confidence: FUSED_CONFIDENCE,
            color_inverted: representative.variant.inverted,
            format_details: String::new(),
            details: FormatDetails::Standard,
            backends: group.backends(),
        }
    }

    /// Enclosing rectangle of the polygon. Line-shaped polygons get at least
    /// one pixel of extent; detections without geometry cover the frame.
    fn location(&self, detection: &RawDetection) -> Rect {
        match Rect::enclosing(&detection.polygon) {
            Some(mut rect) => {
                rect.width = rect.width.max(1);
                rect.height = rect.height.max(1);
                rect
            }
            None => self.frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Point, VariantTag};

    fn square(x: f32, y: f32, side: f32) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ]
    }

    fn detection(
        payload: &str,
        symbology: Symbology,
        polygon: Vec<Point>,
        source: BackendId,
        scale: f32,
        inverted: bool,
    ) -> RawDetection {
        RawDetection {
            payload: payload.to_string(),
            symbology,
            polygon,
            source,
            variant: VariantTag::new(scale, inverted),
        }
    }

    fn config(max_codes: usize) -> ScannerConfiguration {
        let mut config = ScannerConfiguration::low_resolution();
        config.set_max_codes_per_frame(max_codes);
        config
    }

    #[test]
    fn test_empty_input() {
        let aggregator = ResultAggregator::for_frame(100, 100);
        assert!(aggregator.aggregate(&[], &config(10)).is_empty());
    }

    #[test]
    fn test_duplicates_across_scales_collapse() {
        let detections = vec![
            detection(
                "ABC",
                Symbology::QrCode,
                square(10.0, 10.0, 20.0),
                BackendId::General,
                1.0,
                false,
            ),
            detection(
                "ABC",
                Symbology::QrCode,
                square(10.5, 9.5, 20.0),
                BackendId::Matrix,
                1.5,
                false,
            ),
            detection(
                "ABC\0",
                Symbology::QrCode,
                square(10.0, 10.0, 21.0),
                BackendId::General,
                2.0,
                false,
            ),
        ];
        let results = ResultAggregator::for_frame(100, 100).aggregate(&detections, &config(10));
        assert_eq!(results.len(), 1);

        let result = &results[0];
        assert_eq!(result.data, "ABC");
        assert_eq!(result.location, Rect::new(10, 10, 20, 20));
        assert_eq!(result.backends, vec![BackendId::General, BackendId::Matrix]);
        assert_eq!(result.confidence, 1.0);
        assert!(!result.color_inverted);
    }

    #[test]
    fn test_same_payload_different_symbology_is_distinct() {
        let detections = vec![
            detection("123", Symbology::Code128, vec![], BackendId::Linear, 1.0, false),
            detection("123", Symbology::Code39, vec![], BackendId::Linear, 1.0, false),
        ];
        let results = ResultAggregator::for_frame(50, 50).aggregate(&detections, &config(10));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].symbology, Symbology::Code128);
        assert_eq!(results[1].symbology, Symbology::Code39);
    }

    #[test]
    fn test_truncates_to_max_codes_in_encounter_order() {
        let detections: Vec<_> = (0..8)
            .map(|i| {
                detection(
                    &format!("code-{i}"),
                    Symbology::QrCode,
                    square(i as f32, 0.0, 5.0),
                    BackendId::General,
                    1.0,
                    false,
                )
            })
            .collect();
        let results = ResultAggregator::for_frame(100, 100).aggregate(&detections, &config(3));
        assert_eq!(results.len(), 3);
        let data: Vec<_> = results.iter().map(|r| r.data.as_str()).collect();
        assert_eq!(data, vec!["code-0", "code-1", "code-2"]);
    }

    #[test]
    fn test_prefers_non_inverted_geometry() {
        let detections = vec![
            detection(
                "X",
                Symbology::DataMatrix,
                square(50.0, 50.0, 10.0),
                BackendId::General,
                1.0,
                true,
            ),
            detection(
                "X",
                Symbology::DataMatrix,
                square(5.0, 5.0, 10.0),
                BackendId::General,
                2.0,
                false,
            ),
        ];
        let results = ResultAggregator::for_frame(100, 100).aggregate(&detections, &config(5));
        assert_eq!(results.len(), 1);
        assert!(!results[0].color_inverted);
        assert_eq!(results[0].location, Rect::new(5, 5, 10, 10));
    }

    #[test]
    fn test_inverted_only_code_is_flagged() {
        let detections = vec![detection(
            "INV",
            Symbology::Code128,
            vec![Point::new(4.0, 30.0), Point::new(60.0, 30.0)],
            BackendId::Linear,
            1.0,
            true,
        )];
        let results = ResultAggregator::for_frame(80, 80).aggregate(&detections, &config(5));
        assert!(results[0].color_inverted);
        // scan line: one pixel high
        assert_eq!(results[0].location, Rect::new(4, 30, 56, 1));
    }

    #[test]
    fn test_prefers_polygon_then_falls_back_to_frame() {
        let detections = vec![
            detection("P", Symbology::QrCode, vec![], BackendId::General, 1.0, false),
            detection("P", Symbology::QrCode, square(1.0, 2.0, 3.0), BackendId::Matrix, 1.0, false),
            detection("Q", Symbology::QrCode, vec![], BackendId::General, 1.0, false),
        ];
        let results = ResultAggregator::for_frame(64, 48).aggregate(&detections, &config(5));
        assert_eq!(results[0].location, Rect::new(1, 2, 3, 3));
        assert_eq!(results[1].location, Rect::new(0, 0, 64, 48));
    }

    #[test]
    fn test_disabled_symbology_is_dropped() {
        let mut config = ScannerConfiguration::new();
        config.set_symbology_enabled(Symbology::QrCode, true);
        let detections = vec![
            detection("A", Symbology::Aztec, vec![], BackendId::General, 1.0, false),
            detection("B", Symbology::QrCode, vec![], BackendId::General, 1.0, false),
        ];
        let results = ResultAggregator::for_frame(10, 10).aggregate(&detections, &config);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].data, "B");
    }
}

//! Greedy non-maximum suppression over decoded boxes.
//!
//! Candidates are stably sorted by descending confidence, then accepted one
//! at a time; a candidate is rejected when its IoU with any already accepted
//! box (of the same group) strictly exceeds the threshold. Selection stops
//! once `max_results` boxes are accepted.

use crate::geometry::BoundingBox;
use crate::trace::{trace_event, trace_span};
use crate::util::math::clamp_unit;

/// Which boxes are allowed to suppress each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NmsGrouping {
    /// Any box suppresses any overlapping lower-confidence box.
    #[default]
    Global,
    /// Boxes only suppress boxes with the same `class_index`.
    PerClass,
}

/// Suppression parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NmsConfig {
    /// Maximum number of boxes to return.
    pub max_results: usize,
    /// IoU above which the lower-confidence box is dropped; clamped to `[0, 1]`.
    pub iou_threshold: f32,
    /// Suppression grouping.
    pub grouping: NmsGrouping,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            iou_threshold: 0.5,
            grouping: NmsGrouping::Global,
        }
    }
}

/// Global greedy suppression.
///
/// Returns at most `max_results` boxes in descending confidence order. The
/// threshold is clamped to `[0, 1]` (NaN becomes `1.0`); at `1.0` nothing is
/// suppressed, not even identical boxes.
pub fn suppress(
    candidates: &[BoundingBox],
    max_results: usize,
    iou_threshold: f32,
) -> Vec<BoundingBox> {
    suppress_with(
        candidates,
        &NmsConfig {
            max_results,
            iou_threshold,
            grouping: NmsGrouping::Global,
        },
    )
}

/// Greedy suppression with an explicit [`NmsConfig`].
pub fn suppress_with(candidates: &[BoundingBox], cfg: &NmsConfig) -> Vec<BoundingBox> {
    let _span = trace_span!(
        "suppress",
        candidates = candidates.len(),
        max_results = cfg.max_results
    )
    .entered();

    if candidates.is_empty() || cfg.max_results == 0 {
        return Vec::new();
    }
    let threshold = clamp_unit(cfg.iou_threshold);

    let order = sort_desc_stable(candidates);
    let mut kept: Vec<&BoundingBox> = Vec::with_capacity(cfg.max_results.min(candidates.len()));

    'outer: for idx in order {
        if kept.len() == cfg.max_results {
            break;
        }
        let candidate = &candidates[idx];
        for accepted in kept.iter() {
            if cfg.grouping == NmsGrouping::PerClass
                && accepted.class_index != candidate.class_index
            {
                continue;
            }
            if accepted.iou(candidate) > threshold {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    trace_event!("kept_boxes", count = kept.len());
    kept.into_iter().cloned().collect()
}

/// Indices of `candidates` by descending confidence; equal confidences keep input order.
fn sort_desc_stable(candidates: &[BoundingBox]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        candidates[b]
            .confidence
            .total_cmp(&candidates[a].confidence)
    });
    order
}

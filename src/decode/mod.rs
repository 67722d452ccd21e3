//! Tensor decoding: grid/anchor regression, activations and confidence gating.
//!
//! For every cell `(row, col)` and anchor slot `a` the decoder reads the
//! channels `[tx, ty, tw, th, to, class logits..]` and computes
//!
//! - center `((col + σ(tx)) / G, (row + σ(ty)) / G)`,
//! - extent `(anchor.w · e^tw / G, anchor.h · e^th / G)`,
//! - objectness `σ(to)` and a max-subtracted softmax over the class logits,
//! - confidence `objectness · max(p)`, class `argmax(p)` (lowest index on ties).
//!
//! Normalized coordinates are scaled to the model input size and a box is
//! kept when its confidence reaches the (clamped) threshold and its extent is
//! finite and positive. Output follows row, column, anchor traversal order,
//! but callers should treat it as unordered.

mod cell;

#[cfg(feature = "rayon")]
pub mod rayon;

use crate::geometry::BoundingBox;
use crate::model::ModelConfig;
use crate::tensor::{DetectionTensor, TensorShape};
use crate::trace::{trace_event, trace_span};
use crate::util::math::clamp_unit;
use crate::util::TinyDetResult;

use cell::{decode_slot, SlotGeometry};

/// Validated decoder for one model configuration.
///
/// Construction is the only place a configuration can fail; afterwards
/// `decode` can only fail on a tensor of the wrong length.
#[derive(Clone, Debug)]
pub struct Decoder {
    config: ModelConfig,
    shape: TensorShape,
}

impl Decoder {
    /// Validates `config` and builds a decoder for it.
    pub fn new(config: ModelConfig) -> TinyDetResult<Self> {
        config.validate()?;
        let shape = TensorShape::from_config(&config);
        Ok(Self { config, shape })
    }

    /// Returns the model configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Returns the expected tensor shape.
    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    /// Expected flat tensor length.
    pub fn tensor_len(&self) -> usize {
        self.shape.len()
    }

    /// Decodes `tensor` into boxes whose confidence is at least `confidence_threshold`.
    ///
    /// The threshold is clamped to `[0, 1]` (NaN becomes `1.0`). Fails with
    /// `InvalidTensorShape` when `tensor.len() != self.tensor_len()`.
    pub fn decode(
        &self,
        tensor: &[f32],
        confidence_threshold: f32,
    ) -> TinyDetResult<Vec<BoundingBox>> {
        let tensor = DetectionTensor::new(tensor, self.shape)?;
        let threshold = clamp_unit(confidence_threshold);
        let _span = trace_span!(
            "decode",
            grid = self.shape.grid_size,
            anchors = self.shape.num_anchors,
            threshold = threshold
        )
        .entered();

        let mut slot = vec![0.0f32; self.shape.channels];
        let mut out = Vec::new();
        for row in 0..self.shape.grid_size {
            self.decode_row(&tensor, row, threshold, &mut slot, &mut out);
        }

        trace_event!("decoded_boxes", count = out.len());
        Ok(out)
    }

    pub(crate) fn decode_row(
        &self,
        tensor: &DetectionTensor<'_>,
        row: usize,
        threshold: f32,
        slot: &mut [f32],
        out: &mut Vec<BoundingBox>,
    ) {
        let geom = SlotGeometry {
            grid_size: self.config.grid_size as f32,
            input_size: self.config.input_size as f32,
        };
        for col in 0..self.shape.grid_size {
            for (anchor_idx, anchor) in self.config.anchors.iter().enumerate() {
                tensor.read_slot(row, col, anchor_idx, slot);
                if let Some(bbox) = decode_slot(
                    geom,
                    &self.config.labels,
                    row,
                    col,
                    *anchor,
                    slot,
                    threshold,
                ) {
                    out.push(bbox);
                }
            }
        }
    }
}

//! Rayon-parallel decoding (feature-gated).
//!
//! Rows of the grid are decoded independently and concatenated in row
//! order, so the result is identical to [`Decoder::decode`].

use crate::decode::Decoder;
use crate::geometry::BoundingBox;
use crate::tensor::DetectionTensor;
use crate::trace::{trace_event, trace_span};
use crate::util::math::clamp_unit;
use crate::util::TinyDetResult;
use rayon::prelude::*;

impl Decoder {
    /// Row-parallel variant of [`Decoder::decode`] with the same output.
    pub fn decode_par(
        &self,
        tensor: &[f32],
        confidence_threshold: f32,
    ) -> TinyDetResult<Vec<BoundingBox>> {
        let tensor = DetectionTensor::new(tensor, self.shape())?;
        let threshold = clamp_unit(confidence_threshold);
        let shape = self.shape();
        let _span = trace_span!(
            "decode",
            grid = shape.grid_size,
            anchors = shape.num_anchors,
            threshold = threshold,
            parallel = true
        )
        .entered();

        let rows: Vec<Vec<BoundingBox>> = (0..shape.grid_size)
            .into_par_iter()
            .map(|row| {
                let mut slot = vec![0.0f32; shape.channels];
                let mut row_boxes = Vec::new();
                self.decode_row(&tensor, row, threshold, &mut slot, &mut row_boxes);
                row_boxes
            })
            .collect();

        let out: Vec<BoundingBox> = rows.into_iter().flatten().collect();
        trace_event!("decoded_boxes", count = out.len());
        Ok(out)
    }
}

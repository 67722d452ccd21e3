//! Decoding of a single anchor slot into a scored box.

use crate::geometry::BoundingBox;
use crate::model::{Anchor, LabelTable, BOX_CHANNELS};
use crate::util::math::{argmax, sigmoid, softmax_in_place};

/// Grid and scale constants shared by every slot of one decode call.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SlotGeometry {
    pub grid_size: f32,
    pub input_size: f32,
}

/// Decodes `[tx, ty, tw, th, to, class logits..]` at `(row, col)`.
///
/// Class logits in `slot` are overwritten with their probabilities. Returns
/// `None` when the confidence is below `threshold` or the box is degenerate.
pub(crate) fn decode_slot(
    geom: SlotGeometry,
    labels: &LabelTable,
    row: usize,
    col: usize,
    anchor: Anchor,
    slot: &mut [f32],
    threshold: f32,
) -> Option<BoundingBox> {
    let (head, classes) = slot.split_at_mut(BOX_CHANNELS);
    let [tx, ty, tw, th, to] = [head[0], head[1], head[2], head[3], head[4]];

    // Cheap reject: confidence can never exceed objectness.
    let objectness = sigmoid(to);
    if objectness.is_nan() || objectness < threshold {
        return None;
    }

    if !softmax_in_place(classes) {
        return None;
    }
    let (class_index, best) = argmax(classes)?;
    let confidence = objectness * best;
    if confidence.is_nan() || confidence < threshold {
        return None;
    }

    let g = geom.grid_size;
    let cx = (col as f32 + sigmoid(tx)) / g;
    let cy = (row as f32 + sigmoid(ty)) / g;
    let bw = anchor.width * tw.exp() / g;
    let bh = anchor.height * th.exp() / g;

    let s = geom.input_size;
    let x = (cx - bw / 2.0) * s;
    let y = (cy - bh / 2.0) * s;
    let width = bw * s;
    let height = bh * s;
    if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
        return None;
    }
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let label = labels.label(class_index)?.to_owned();
    Some(BoundingBox {
        x,
        y,
        width,
        height,
        confidence: confidence.min(1.0),
        label,
        class_index,
    })
}

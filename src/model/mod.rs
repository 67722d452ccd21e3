//! Detector model geometry: grid, anchors, labels and tensor layout.
//!
//! A [`ModelConfig`] describes how the flat output tensor of a grid/anchor
//! detector is laid out. It is validated once by [`Decoder::new`]; a config
//! that fails validation can never reach a decode call.
//!
//! [`Decoder::new`]: crate::Decoder::new

mod anchors;
mod labels;
pub mod voc;

pub use anchors::{Anchor, AnchorTable};
pub use labels::LabelTable;

use crate::util::{ConfigIssue, TinyDetResult};

/// Fixed per-anchor channels before the class logits: `tx, ty, tw, th, objectness`.
pub const BOX_CHANNELS: usize = 5;

/// Memory order of the flat detection tensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[row][col][anchor][channel]`, channels contiguous per anchor.
    #[default]
    CellMajor,
    /// `[anchor * channels + channel][row][col]`, one plane per channel.
    ChannelMajor,
}

/// Geometry and label configuration of a detection model.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    /// Cells per side of the square output grid.
    pub grid_size: usize,
    /// Side length of the square network input in pixels; boxes are scaled to it.
    pub input_size: usize,
    /// Anchor slots per cell.
    pub num_anchors: usize,
    /// Number of object classes.
    pub num_classes: usize,
    /// Anchor priors, one per slot.
    pub anchors: AnchorTable,
    /// Class names, one per class channel.
    pub labels: LabelTable,
    /// Memory order of the tensor.
    pub layout: TensorLayout,
}

impl Default for ModelConfig {
    /// Tiny YOLO v2 on Pascal VOC (13x13 grid, 5 anchors, 20 classes, 416 px).
    fn default() -> Self {
        Self {
            grid_size: voc::GRID_SIZE,
            input_size: voc::INPUT_SIZE,
            num_anchors: voc::NUM_ANCHORS,
            num_classes: voc::NUM_CLASSES,
            anchors: AnchorTable::from_pairs(&voc::ANCHORS),
            labels: LabelTable::from_strs(&voc::LABELS),
            layout: TensorLayout::CellMajor,
        }
    }
}

impl ModelConfig {
    /// Returns a copy with a different tensor layout.
    pub fn with_layout(mut self, layout: TensorLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Channels per anchor slot (`5 + num_classes`).
    pub fn channels_per_anchor(&self) -> usize {
        BOX_CHANNELS + self.num_classes
    }

    /// Checks dimensions and table lengths.
    pub fn validate(&self) -> TinyDetResult<()> {
        if self.grid_size == 0 {
            return Err(ConfigIssue::ZeroDimension { name: "grid_size" }.into());
        }
        if self.input_size == 0 {
            return Err(ConfigIssue::ZeroDimension { name: "input_size" }.into());
        }
        if self.num_anchors == 0 {
            return Err(ConfigIssue::ZeroDimension {
                name: "num_anchors",
            }
            .into());
        }
        if self.num_classes == 0 {
            return Err(ConfigIssue::ZeroDimension {
                name: "num_classes",
            }
            .into());
        }
        if self.anchors.len() != self.num_anchors {
            return Err(ConfigIssue::AnchorCount {
                expected: self.num_anchors,
                got: self.anchors.len(),
            }
            .into());
        }
        if self.labels.len() != self.num_classes {
            return Err(ConfigIssue::LabelCount {
                expected: self.num_classes,
                got: self.labels.len(),
            }
            .into());
        }
        if let Some(index) = self.anchors.iter().position(|anchor| !anchor.is_valid()) {
            return Err(ConfigIssue::InvalidAnchor { index }.into());
        }
        self.checked_tensor_len()
            .ok_or(ConfigIssue::TensorTooLarge)?;
        Ok(())
    }

    /// Expected flat tensor length, `grid_size² * num_anchors * (5 + num_classes)`.
    ///
    /// Saturates at `usize::MAX` for configs that fail validation.
    pub fn tensor_len(&self) -> usize {
        self.checked_tensor_len().unwrap_or(usize::MAX)
    }

    fn checked_tensor_len(&self) -> Option<usize> {
        self.grid_size
            .checked_mul(self.grid_size)?
            .checked_mul(self.num_anchors)?
            .checked_mul(BOX_CHANNELS.checked_add(self.num_classes)?)
    }
}

//! Borrowed view over a flat detector output tensor.
//!
//! `DetectionTensor` checks the buffer length against a [`TensorShape`] once
//! and then addresses values logically as `[row][col][anchor][channel]`,
//! whatever the physical [`TensorLayout`].

use crate::model::{ModelConfig, TensorLayout, BOX_CHANNELS};
use crate::util::{TinyDetError, TinyDetResult};

/// Logical dimensions of a detection tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TensorShape {
    /// Cells per grid side.
    pub grid_size: usize,
    /// Anchor slots per cell.
    pub num_anchors: usize,
    /// Channels per anchor slot (`5 + num_classes`).
    pub channels: usize,
    /// Physical memory order.
    pub layout: TensorLayout,
}

impl TensorShape {
    /// Derives the shape from a model configuration.
    pub fn from_config(cfg: &ModelConfig) -> Self {
        Self {
            grid_size: cfg.grid_size,
            num_anchors: cfg.num_anchors,
            channels: cfg.channels_per_anchor(),
            layout: cfg.layout,
        }
    }

    /// Number of class channels per anchor.
    pub fn num_classes(&self) -> usize {
        self.channels.saturating_sub(BOX_CHANNELS)
    }

    /// Total number of values.
    ///
    /// Saturates at `usize::MAX` when the dimensions overflow; no buffer of
    /// `f32` can match that length.
    pub fn len(&self) -> usize {
        self.grid_size
            .checked_mul(self.grid_size)
            .and_then(|cells| cells.checked_mul(self.num_anchors))
            .and_then(|slots| slots.checked_mul(self.channels))
            .unwrap_or(usize::MAX)
    }

    /// Returns true when the shape holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of `[row][col][anchor][channel]`.
    #[inline]
    pub fn index(&self, row: usize, col: usize, anchor: usize, channel: usize) -> usize {
        let g = self.grid_size;
        match self.layout {
            TensorLayout::CellMajor => {
                ((row * g + col) * self.num_anchors + anchor) * self.channels + channel
            }
            TensorLayout::ChannelMajor => {
                ((anchor * self.channels + channel) * g + row) * g + col
            }
        }
    }
}

/// Read-only detection tensor with a verified length.
#[derive(Clone, Copy, Debug)]
pub struct DetectionTensor<'a> {
    data: &'a [f32],
    shape: TensorShape,
}

impl<'a> DetectionTensor<'a> {
    /// Wraps `data`, failing with `InvalidTensorShape` unless its length matches `shape`.
    pub fn new(data: &'a [f32], shape: TensorShape) -> TinyDetResult<Self> {
        let expected = shape.len();
        if data.len() != expected {
            return Err(TinyDetError::InvalidTensorShape {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Returns the tensor shape.
    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    /// Returns one logical value, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize, anchor: usize, channel: usize) -> Option<f32> {
        let s = &self.shape;
        let in_grid = row < s.grid_size && col < s.grid_size;
        if !in_grid || anchor >= s.num_anchors || channel >= s.channels {
            return None;
        }
        self.data.get(s.index(row, col, anchor, channel)).copied()
    }

    /// Copies the channels of one anchor slot into `out`.
    ///
    /// `out` must hold exactly `shape().channels` values and the coordinates
    /// must be in range.
    pub(crate) fn read_slot(&self, row: usize, col: usize, anchor: usize, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.shape.channels);
        match self.shape.layout {
            TensorLayout::CellMajor => {
                let start = self.shape.index(row, col, anchor, 0);
                out.copy_from_slice(&self.data[start..start + self.shape.channels]);
            }
            TensorLayout::ChannelMajor => {
                for (channel, value) in out.iter_mut().enumerate() {
                    *value = self.data[self.shape.index(row, col, anchor, channel)];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DetectionTensor, TensorShape};
    use crate::model::TensorLayout;
    use crate::util::TinyDetError;

    fn shape(layout: TensorLayout) -> TensorShape {
        TensorShape {
            grid_size: 2,
            num_anchors: 2,
            channels: 6,
            layout,
        }
    }

    #[test]
    fn rejects_wrong_length() {
        let data = vec![0.0f32; 47];
        let err = DetectionTensor::new(&data, shape(TensorLayout::CellMajor))
            .err()
            .unwrap();
        assert_eq!(
            err,
            TinyDetError::InvalidTensorShape {
                expected: 48,
                got: 47
            }
        );
    }

    #[test]
    fn overflowing_shape_saturates_and_rejects_data() {
        let huge = TensorShape {
            grid_size: usize::MAX / 2,
            num_anchors: 3,
            channels: 6,
            layout: TensorLayout::CellMajor,
        };
        assert_eq!(huge.len(), usize::MAX);
        assert!(!huge.is_empty());

        let data = vec![0.0f32; 8];
        let err = DetectionTensor::new(&data, huge).err().unwrap();
        assert_eq!(
            err,
            TinyDetError::InvalidTensorShape {
                expected: usize::MAX,
                got: 8
            }
        );
    }

    #[test]
    fn cell_major_slot_is_contiguous() {
        let data: Vec<f32> = (0..48).map(|v| v as f32).collect();
        let tensor = DetectionTensor::new(&data, shape(TensorLayout::CellMajor)).unwrap();
        let mut slot = [0.0f32; 6];
        tensor.read_slot(1, 0, 1, &mut slot);
        // ((1 * 2 + 0) * 2 + 1) * 6 = 30
        assert_eq!(slot, [30.0, 31.0, 32.0, 33.0, 34.0, 35.0]);
        assert_eq!(tensor.get(1, 0, 1, 2), Some(32.0));
        assert_eq!(tensor.get(2, 0, 0, 0), None);
    }

    #[test]
    fn channel_major_slot_strides_by_plane() {
        let data: Vec<f32> = (0..48).map(|v| v as f32).collect();
        let tensor = DetectionTensor::new(&data, shape(TensorLayout::ChannelMajor)).unwrap();
        let mut slot = [0.0f32; 6];
        tensor.read_slot(0, 1, 1, &mut slot);
        // plane = anchor * 6 + channel, index = plane * 4 + 0 * 2 + 1
        assert_eq!(slot, [25.0, 29.0, 33.0, 37.0, 41.0, 45.0]);
    }
}

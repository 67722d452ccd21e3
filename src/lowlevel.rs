//! Low-level building blocks for custom post-processing.
//!
//! These expose the tensor view and the activation helpers used by the
//! decoder. Most users should prefer [`Decoder`](crate::Decoder) and
//! [`suppress`](crate::suppress).

pub use crate::model::BOX_CHANNELS;
pub use crate::tensor::{DetectionTensor, TensorShape};
pub use crate::util::math::{argmax, clamp_unit, sigmoid, softmax_in_place};

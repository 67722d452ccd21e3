//! tinydet turns the raw output tensor of a grid/anchor object detector into
//! a de-duplicated set of labeled bounding boxes.
//!
//! The crate provides the two post-processing stages of a Tiny YOLO v2 style
//! detector: a [`Decoder`] that applies the grid/anchor geometry, activations
//! and confidence gating, and greedy non-maximum suppression via
//! [`suppress`]. Inference itself stays outside the crate behind the
//! [`Infer`] trait; [`Pipeline`] chains the three with a single-slot gate.
//! Row-parallel decoding is available with the `rayon` feature.
//!
//! ```
//! use tinydet::{suppress, Decoder, ModelConfig};
//!
//! let decoder = Decoder::new(ModelConfig::default())?;
//! let tensor = vec![0.0f32; decoder.tensor_len()];
//! let candidates = decoder.decode(&tensor, 0.3)?;
//! let boxes = suppress(&candidates, 5, 0.5);
//! assert!(boxes.len() <= 5);
//! # Ok::<(), tinydet::TinyDetError>(())
//! ```

pub mod decode;
pub mod geometry;
pub mod lowlevel;
pub mod model;
pub mod pipeline;
pub mod suppress;
pub mod tensor;
mod trace;
pub mod util;

pub use decode::Decoder;
pub use geometry::BoundingBox;
pub use model::{Anchor, AnchorTable, LabelTable, ModelConfig, TensorLayout};
pub use pipeline::{FrameCycle, Infer, Pipeline, PipelineSettings};
pub use suppress::{suppress, suppress_with, NmsConfig, NmsGrouping};
pub use util::{ConfigIssue, TinyDetError, TinyDetResult};

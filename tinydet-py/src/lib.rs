//! Python bindings for tinydet.
//!
//! This module exposes tensor decoding and non-maximum suppression to Python
//! via PyO3, taking detector output as a flat float32 numpy array.

use numpy::PyReadonlyArray1;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use tinydet::{
    suppress_with, AnchorTable, BoundingBox, Decoder as RustDecoder, LabelTable, ModelConfig,
    NmsConfig, NmsGrouping, TensorLayout, TinyDetError,
};

/// Convert a TinyDetError to a Python exception.
fn to_py_err(err: TinyDetError) -> PyErr {
    match err {
        TinyDetError::Inference { .. } | TinyDetError::CycleSpent => {
            PyRuntimeError::new_err(err.to_string())
        }
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn parse_layout(layout: &str) -> PyResult<TensorLayout> {
    match layout.to_lowercase().as_str() {
        "cell_major" => Ok(TensorLayout::CellMajor),
        "channel_major" => Ok(TensorLayout::ChannelMajor),
        _ => Err(PyValueError::new_err("layout must be 'cell_major' or 'channel_major'")),
    }
}

fn nms_config(max_results: usize, iou_threshold: f32, per_class: bool) -> NmsConfig {
    NmsConfig {
        max_results,
        iou_threshold,
        grouping: if per_class {
            NmsGrouping::PerClass
        } else {
            NmsGrouping::Global
        },
    }
}

/// A labeled bounding box in model input pixels.
#[pyclass]
#[derive(Clone)]
pub struct Detection {
    /// Left edge.
    #[pyo3(get)]
    pub x: f32,
    /// Top edge.
    #[pyo3(get)]
    pub y: f32,
    /// Box width.
    #[pyo3(get)]
    pub width: f32,
    /// Box height.
    #[pyo3(get)]
    pub height: f32,
    /// Objectness times best class probability.
    #[pyo3(get)]
    pub confidence: f32,
    /// Class name.
    #[pyo3(get)]
    pub label: String,
    /// Class index in the label table.
    #[pyo3(get)]
    pub class_index: usize,
}

#[pymethods]
impl Detection {
    /// Intersection over union with another detection.
    fn iou(&self, other: &Detection) -> f32 {
        BoundingBox::from(self.clone()).iou(&BoundingBox::from(other.clone()))
    }

    fn __repr__(&self) -> String {
        format!(
            "Detection(label='{}', confidence={:.4}, x={:.1}, y={:.1}, width={:.1}, height={:.1})",
            self.label, self.confidence, self.x, self.y, self.width, self.height
        )
    }
}

impl From<BoundingBox> for Detection {
    fn from(b: BoundingBox) -> Self {
        Self {
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
            confidence: b.confidence,
            label: b.label,
            class_index: b.class_index,
        }
    }
}

impl From<Detection> for BoundingBox {
    fn from(d: Detection) -> Self {
        Self {
            x: d.x,
            y: d.y,
            width: d.width,
            height: d.height,
            confidence: d.confidence,
            label: d.label,
            class_index: d.class_index,
        }
    }
}

/// Tensor decoder for one model geometry.
#[pyclass]
pub struct Decoder {
    inner: RustDecoder,
}

#[pymethods]
impl Decoder {
    /// Create a decoder. Defaults describe Tiny YOLO v2 on Pascal VOC.
    ///
    /// Args:
    ///     grid_size: Cells per grid side (default: 13)
    ///     input_size: Network input side in pixels (default: 416)
    ///     anchors: List of (width, height) priors in cells (default: VOC anchors)
    ///     labels: List of class names (default: VOC labels)
    ///     layout: "cell_major" or "channel_major" (default: "cell_major")
    #[new]
    #[pyo3(signature = (grid_size = 13, input_size = 416, anchors = None, labels = None, layout = "cell_major"))]
    fn new(
        grid_size: usize,
        input_size: usize,
        anchors: Option<Vec<(f32, f32)>>,
        labels: Option<Vec<String>>,
        layout: &str,
    ) -> PyResult<Self> {
        let defaults = ModelConfig::default();
        let anchors = anchors
            .map(|pairs| AnchorTable::from_pairs(&pairs))
            .unwrap_or(defaults.anchors);
        let labels = labels.map(LabelTable::new).unwrap_or(defaults.labels);
        let cfg = ModelConfig {
            grid_size,
            input_size,
            num_anchors: anchors.len(),
            num_classes: labels.len(),
            anchors,
            labels,
            layout: parse_layout(layout)?,
        };
        let inner = RustDecoder::new(cfg).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Expected length of the flat output tensor.
    #[getter]
    fn tensor_len(&self) -> usize {
        self.inner.tensor_len()
    }

    /// Class names in index order.
    #[getter]
    fn labels(&self) -> Vec<String> {
        self.inner.config().labels.to_vec()
    }

    /// Decode a flat float32 tensor into candidate detections.
    ///
    /// Args:
    ///     tensor: 1D float32 numpy array of length `tensor_len`
    ///     confidence_threshold: Minimum confidence, clamped to [0, 1] (default: 0.3)
    ///     parallel: Decode grid rows in parallel (default: False)
    #[pyo3(signature = (tensor, confidence_threshold = 0.3, parallel = false))]
    fn decode(
        &self,
        tensor: PyReadonlyArray1<'_, f32>,
        confidence_threshold: f32,
        parallel: bool,
    ) -> PyResult<Vec<Detection>> {
        let data = tensor.as_slice()?;
        let boxes = if parallel {
            self.inner.decode_par(data, confidence_threshold)
        } else {
            self.inner.decode(data, confidence_threshold)
        }
        .map_err(to_py_err)?;
        Ok(boxes.into_iter().map(Detection::from).collect())
    }

    /// Decode and suppress in one call.
    ///
    /// Args:
    ///     tensor: 1D float32 numpy array of length `tensor_len`
    ///     confidence_threshold: Minimum confidence (default: 0.3)
    ///     max_results: Maximum detections returned (default: 5)
    ///     iou_threshold: Overlap above which weaker boxes are dropped (default: 0.5)
    ///     per_class: Only suppress boxes of the same class (default: False)
    #[pyo3(signature = (tensor, confidence_threshold = 0.3, max_results = 5, iou_threshold = 0.5, per_class = false))]
    fn detect(
        &self,
        tensor: PyReadonlyArray1<'_, f32>,
        confidence_threshold: f32,
        max_results: usize,
        iou_threshold: f32,
        per_class: bool,
    ) -> PyResult<Vec<Detection>> {
        let data = tensor.as_slice()?;
        let candidates = self
            .inner
            .decode(data, confidence_threshold)
            .map_err(to_py_err)?;
        let kept = suppress_with(&candidates, &nms_config(max_results, iou_threshold, per_class));
        Ok(kept.into_iter().map(Detection::from).collect())
    }

    fn __repr__(&self) -> String {
        let cfg = self.inner.config();
        format!(
            "Decoder(grid_size={}, input_size={}, num_anchors={}, num_classes={})",
            cfg.grid_size, cfg.input_size, cfg.num_anchors, cfg.num_classes
        )
    }
}

/// Greedy non-maximum suppression over detections.
///
/// Args:
///     detections: List of Detection objects
///     max_results: Maximum detections returned (default: 5)
///     iou_threshold: Overlap above which weaker boxes are dropped (default: 0.5)
///     per_class: Only suppress boxes of the same class (default: False)
///
/// Returns:
///     List of Detection objects, most confident first
#[pyfunction]
#[pyo3(signature = (detections, max_results = 5, iou_threshold = 0.5, per_class = false))]
fn suppress(
    detections: Vec<Detection>,
    max_results: usize,
    iou_threshold: f32,
    per_class: bool,
) -> Vec<Detection> {
    let boxes: Vec<BoundingBox> = detections.into_iter().map(BoundingBox::from).collect();
    suppress_with(&boxes, &nms_config(max_results, iou_threshold, per_class))
        .into_iter()
        .map(Detection::from)
        .collect()
}

/// Python module for tinydet.
#[pymodule]
fn _tinydet(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Detection>()?;
    m.add_class::<Decoder>()?;
    m.add_function(wrap_pyfunction!(suppress, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}

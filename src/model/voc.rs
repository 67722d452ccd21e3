//! Tiny YOLO v2 trained on Pascal VOC.

/// Cells per side of the output grid.
pub const GRID_SIZE: usize = 13;
/// Side length of the square network input, in pixels.
pub const INPUT_SIZE: usize = 416;
/// Anchor slots per cell.
pub const NUM_ANCHORS: usize = 5;
/// Object classes.
pub const NUM_CLASSES: usize = 20;
/// Flat tensor length: `13 * 13 * 5 * (5 + 20)`.
pub const TENSOR_LEN: usize = GRID_SIZE * GRID_SIZE * NUM_ANCHORS * (5 + NUM_CLASSES);

/// Anchor priors `(width, height)` in cells.
pub const ANCHORS: [(f32, f32); NUM_ANCHORS] = [
    (1.08, 1.19),
    (3.42, 4.41),
    (6.63, 11.38),
    (9.42, 5.11),
    (16.62, 10.52),
];

/// Pascal VOC class names.
pub const LABELS: [&str; NUM_CLASSES] = [
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

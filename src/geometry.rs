//! Labeled axis-aligned detection boxes.

/// One detection in pixel units of the model's input resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Box width, always positive for decoded boxes.
    pub width: f32,
    /// Box height, always positive for decoded boxes.
    pub height: f32,
    /// Objectness times best class probability, in `[0, 1]`.
    pub confidence: f32,
    /// Class name from the label table.
    pub label: String,
    /// Index of the class in the label table.
    pub class_index: usize,
}

impl BoundingBox {
    /// Right edge.
    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }

    /// Center point `(cx, cy)`.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Area; non-positive extents count as zero.
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlapping area with `other`.
    pub fn intersection(&self, other: &BoundingBox) -> f32 {
        let left = self.x.max(other.x);
        let right = self.x_max().min(other.x_max());
        let top = self.y.max(other.y);
        let bottom = self.y_max().min(other.y_max());
        (right - left).max(0.0) * (bottom - top).max(0.0)
    }

    /// Union area with `other`.
    pub fn union(&self, other: &BoundingBox) -> f32 {
        self.area() + other.area() - self.intersection(other)
    }

    /// Intersection over union; `0.0` when the union is empty.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let intersection = self.intersection(other);
        let union = self.area() + other.area() - intersection;
        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }

    /// Rescales the box by independent horizontal and vertical factors.
    ///
    /// Maps a box from the model resolution onto a render surface of a
    /// different size, e.g. `scaled(640.0 / 416.0, 480.0 / 416.0)`.
    pub fn scaled(&self, sx: f32, sy: f32) -> BoundingBox {
        BoundingBox {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
            ..self.clone()
        }
    }

    /// Clips the box to `[0, width] x [0, height]`.
    ///
    /// Returns `None` when no area remains inside the surface.
    pub fn clipped(&self, width: f32, height: f32) -> Option<BoundingBox> {
        let left = self.x.max(0.0);
        let top = self.y.max(0.0);
        let right = self.x_max().min(width);
        let bottom = self.y_max().min(height);
        if right <= left || bottom <= top {
            return None;
        }
        Some(BoundingBox {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::BoundingBox;

    fn bbox(x: f32, y: f32, width: f32, height: f32) -> BoundingBox {
        BoundingBox {
            x,
            y,
            width,
            height,
            confidence: 0.5,
            label: "dog".to_owned(),
            class_index: 11,
        }
    }

    #[test]
    fn iou_of_half_overlap() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(5.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), 50.0);
        assert_eq!(a.union(&b), 150.0);
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn iou_is_one_for_identical_and_zero_for_disjoint() {
        let a = bbox(3.0, 4.0, 20.0, 8.0);
        assert_eq!(a.iou(&a.clone()), 1.0);
        assert_eq!(a.iou(&bbox(100.0, 100.0, 1.0, 1.0)), 0.0);
    }

    #[test]
    fn iou_of_degenerate_boxes_is_zero() {
        let a = bbox(0.0, 0.0, 0.0, 0.0);
        assert_eq!(a.iou(&a.clone()), 0.0);
    }

    #[test]
    fn clipped_limits_to_surface() {
        let b = bbox(-10.0, 400.0, 50.0, 40.0);
        let clipped = b.clipped(416.0, 416.0).unwrap();
        assert_eq!((clipped.x, clipped.y), (0.0, 400.0));
        assert_eq!((clipped.width, clipped.height), (40.0, 16.0));
        assert!(bbox(500.0, 0.0, 10.0, 10.0).clipped(416.0, 416.0).is_none());
    }

    #[test]
    fn scaled_maps_to_render_resolution() {
        let b = bbox(208.0, 104.0, 52.0, 26.0).scaled(2.0, 0.5);
        assert_eq!((b.x, b.y, b.width, b.height), (416.0, 52.0, 104.0, 13.0));
        assert_eq!(b.center(), (468.0, 58.5));
    }
}

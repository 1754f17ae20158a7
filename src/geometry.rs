// src/geometry.rs
//
// Screen-space rectangles and the normalized-box transform.
// The detector reports boxes in a bottom-up normalized space
// ([0,1]×[0,1], origin at the bottom-left); everything downstream
// works in top-down screen pixels.

/// Axis-aligned rectangle in top-down screen coordinates (pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Euclidean distance between this rect's center and another's.
    pub fn center_distance(&self, other: &Rect) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        let dx = ax - bx;
        let dy = ay - by;
        (dx * dx + dy * dy).sqrt()
    }

    /// A rect is usable when all coordinates are finite and it encloses
    /// a strictly positive area. Anything else would poison the distance
    /// heuristic (division by area) and is dropped at the pipeline edge.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.area() > 0.0
            && self.area().is_finite()
    }
}

/// Detector-space bounding box: normalized [0,1] coordinates with the
/// origin at the bottom-left of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormalizedRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Project into top-down screen pixels, flipping the vertical axis.
    pub fn to_screen(&self, screen_width: f32, screen_height: f32) -> Rect {
        let w = self.width * screen_width;
        let h = self.height * screen_height;
        let x = self.x * screen_width;
        // Bottom-up y: the box top in screen space is the frame height
        // minus the normalized box's top edge.
        let y = screen_height - (self.y + self.height) * screen_height;
        Rect::new(x, y, w, h)
    }
}

/// Display bounds the pipeline projects into. The diagonal is the
/// reference length for the tracker's movement threshold.
#[derive(Debug, Clone, Copy)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl ScreenBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn diagonal(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt()
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self { Self { width, height } }
}

/// An axis-aligned rectangle with a top-left origin, y growing downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(Point::new(0.0, 0.0), Size::new(0.0, 0.0));

    pub const fn new(origin: Point, size: Size) -> Self { Self { origin, size } }

    pub const fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    pub fn min_x(&self) -> f64 { self.origin.x }

    pub fn min_y(&self) -> f64 { self.origin.y }

    pub fn max_x(&self) -> f64 { self.origin.x + self.size.width }

    pub fn max_y(&self) -> f64 { self.origin.y + self.size.height }

    pub fn width(&self) -> f64 { self.size.width }

    pub fn height(&self) -> f64 { self.size.height }

    /// True when the rectangle has no area.
    pub fn is_empty(&self) -> bool { self.size.width <= 0.0 || self.size.height <= 0.0 }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x()
            && self.min_y() < other.max_y()
            && self.max_x() > other.min_x()
            && self.max_y() > other.min_y()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.min_x().max(other.min_x());
        let y = self.min_y().max(other.min_y());
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        Some(Rect::from_xywh(x, y, max_x - x, max_y - y))
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.max_x() <= self.max_x()
            && other.min_y() >= self.min_y()
            && other.max_y() <= self.max_y()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.min_x().min(other.min_x());
        let y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::from_xywh(x, y, max_x - x, max_y - y)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(Point::new(self.origin.x + dx, self.origin.y + dy), self.size)
    }

    /// Grows the rectangle by `dx` on the left and right and `dy` on the top and bottom.
    pub fn inflate(&self, dx: f64, dy: f64) -> Rect {
        Rect::from_xywh(
            self.origin.x - dx,
            self.origin.y - dy,
            self.size.width + dx * 2.0,
            self.size.height + dy * 2.0,
        )
    }

    /// Area of `self` not covered by `other`, as at most four disjoint pieces.
    pub fn subtract(&self, other: &Rect) -> Vec<Rect> {
        let Some(cut) = self.intersection(other) else {
            return if self.is_empty() { Vec::new() } else { vec![*self] };
        };
        let mut pieces = Vec::with_capacity(4);
        if cut.min_y() > self.min_y() {
            pieces.push(Rect::from_xywh(
                self.min_x(),
                self.min_y(),
                self.width(),
                cut.min_y() - self.min_y(),
            ));
        }
        if cut.max_y() < self.max_y() {
            pieces.push(Rect::from_xywh(
                self.min_x(),
                cut.max_y(),
                self.width(),
                self.max_y() - cut.max_y(),
            ));
        }
        if cut.min_x() > self.min_x() {
            pieces.push(Rect::from_xywh(
                self.min_x(),
                cut.min_y(),
                cut.min_x() - self.min_x(),
                cut.height(),
            ));
        }
        if cut.max_x() < self.max_x() {
            pieces.push(Rect::from_xywh(
                cut.max_x(),
                cut.min_y(),
                self.max_x() - cut.max_x(),
                cut.height(),
            ));
        }
        pieces
    }

    pub fn area(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.size.width * self.size.height }
    }
}

use crate::sys::geometry::Rect;

/// Area of a bitmap that must be redrawn before the next blit.
///
/// Stored as pairwise-disjoint rectangles, or as "everything".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirtyRegion {
    infinite: bool,
    rects: Vec<Rect>,
}

impl DirtyRegion {
    pub fn new() -> Self { Self::default() }

    pub fn make_infinite(&mut self) {
        self.infinite = true;
        self.rects.clear();
    }

    pub fn make_empty(&mut self) {
        self.infinite = false;
        self.rects.clear();
    }

    pub fn is_infinite(&self) -> bool { self.infinite }

    pub fn is_empty(&self) -> bool { !self.infinite && self.rects.is_empty() }

    /// Toggles the dirtiness of `rect`: covered parts become clean, the rest dirty.
    ///
    /// An infinite region stays infinite.
    pub fn xor(&mut self, rect: Rect) {
        if self.infinite || rect.is_empty() {
            return;
        }
        let mut fresh = vec![rect];
        for existing in &self.rects {
            fresh = fresh.iter().flat_map(|piece| piece.subtract(existing)).collect();
        }
        let mut kept: Vec<Rect> = self.rects.iter().flat_map(|r| r.subtract(&rect)).collect();
        kept.extend(fresh);
        self.rects = kept;
    }

    /// Bounding box of the dirty area inside `clip`.
    pub fn bounds(&self, clip: Rect) -> Option<Rect> {
        if self.infinite {
            return (!clip.is_empty()).then_some(clip);
        }
        self.rects
            .iter()
            .filter_map(|r| r.intersection(&clip))
            .reduce(|acc, r| acc.union(&r))
    }

    pub fn is_visible(&self, rect: &Rect) -> bool {
        if rect.is_empty() {
            return false;
        }
        self.infinite || self.rects.iter().any(|r| r.intersects(rect))
    }

    /// The dirty area clipped to `clip`, as disjoint rectangles.
    pub fn rects_within(&self, clip: Rect) -> Vec<Rect> {
        if self.infinite {
            return if clip.is_empty() { Vec::new() } else { vec![clip] };
        }
        self.rects.iter().filter_map(|r| r.intersection(&clip)).collect()
    }

    pub fn area(&self) -> f64 { self.rects.iter().map(Rect::area).sum() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const CLIP: Rect = Rect::from_xywh(0.0, 0.0, 1000.0, 1000.0);

    #[test]
    fn xor_twice_cancels() {
        let mut region = DirtyRegion::new();
        let r = Rect::from_xywh(10.0, 10.0, 50.0, 40.0);
        region.xor(r);
        assert_eq!(region.area(), 2000.0);
        region.xor(r);
        assert!(region.is_empty());
        assert_eq!(region.bounds(CLIP), None);
    }

    #[test]
    fn overlapping_xor_is_the_symmetric_difference() {
        let mut region = DirtyRegion::new();
        let a = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let b = Rect::from_xywh(50.0, 50.0, 100.0, 100.0);
        region.xor(a);
        region.xor(b);
        assert_eq!(region.area(), 2.0 * (10_000.0 - 2_500.0));
        assert!(!region.is_visible(&Rect::from_xywh(60.0, 60.0, 30.0, 30.0)));
        assert!(region.is_visible(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0)));
        assert!(region.is_visible(&Rect::from_xywh(140.0, 140.0, 10.0, 10.0)));
        assert_eq!(region.bounds(CLIP), Some(Rect::from_xywh(0.0, 0.0, 150.0, 150.0)));
        let rects = region.rects_within(CLIP);
        for (i, p) in rects.iter().enumerate() {
            for q in &rects[i + 1..] {
                assert!(!p.intersects(q));
            }
        }
    }

    #[test]
    fn infinite_region_covers_the_clip() {
        let mut region = DirtyRegion::new();
        region.make_infinite();
        region.xor(Rect::from_xywh(0.0, 0.0, 10.0, 10.0));
        assert!(region.is_infinite());
        assert_eq!(region.bounds(CLIP), Some(CLIP));
        assert_eq!(region.rects_within(CLIP), vec![CLIP]);
        assert!(region.is_visible(&Rect::from_xywh(5000.0, 5000.0, 1.0, 1.0)));
        region.make_empty();
        assert!(region.is_empty());
        assert!(!region.is_visible(&Rect::from_xywh(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn bounds_are_clipped() {
        let mut region = DirtyRegion::new();
        region.xor(Rect::from_xywh(-20.0, -20.0, 40.0, 40.0));
        assert_eq!(region.bounds(CLIP), Some(Rect::from_xywh(0.0, 0.0, 20.0, 20.0)));
        assert_eq!(region.bounds(Rect::from_xywh(500.0, 500.0, 10.0, 10.0)), None);
    }
}

use egui::{Pos2, Rect, Vec2};

/// Extra pixels repainted around a freehand segment
pub const UPDATE_MARGIN: f32 = 2.0;

/// The part of the surface that changed and needs repainting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirtyRegion {
    Full,
    Area(Rect),
}

impl DirtyRegion {
    /// Smallest region covering both
    pub fn union(self, other: DirtyRegion) -> DirtyRegion {
        match (self, other) {
            (DirtyRegion::Area(a), DirtyRegion::Area(b)) => DirtyRegion::Area(a.union(b)),
            _ => DirtyRegion::Full,
        }
    }

    /// Resolve to a concrete rectangle for a surface of the given size
    pub fn to_rect(self, width: u32, height: u32) -> Rect {
        let bounds = Rect::from_min_size(Pos2::ZERO, Vec2::new(width as f32, height as f32));
        match self {
            DirtyRegion::Full => bounds,
            DirtyRegion::Area(rect) => rect.intersect(bounds),
        }
    }
}

/// Rectangle spanned by two drag points, independent of drag direction.
///
/// `min` is the component-wise minimum and `max` the component-wise maximum.
pub fn normalize_rect(a: Pos2, b: Pos2) -> Rect {
    Rect::from_two_pos(a, b)
}

/// Repaint area for a freehand segment of the given stroke width
pub fn segment_update_rect(from: Pos2, to: Pos2, width: f32) -> Rect {
    let pad = width / 2.0 + UPDATE_MARGIN;
    normalize_rect(from, to).expand(pad)
}

/// Snap a pointer position to the pixel grid
pub fn to_pixel(pos: Pos2) -> Pos2 {
    Pos2::new(pos.x.floor(), pos.y.floor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_normalize_rect_any_direction() {
        let corners = [
            (pos2(10.0, 10.0), pos2(50.0, 50.0)),
            (pos2(50.0, 50.0), pos2(10.0, 10.0)),
            (pos2(10.0, 50.0), pos2(50.0, 10.0)),
            (pos2(50.0, 10.0), pos2(10.0, 50.0)),
        ];
        for (a, b) in corners {
            let rect = normalize_rect(a, b);
            assert_eq!(rect.min, pos2(10.0, 10.0), "from {a:?} to {b:?}");
            assert_eq!(rect.max, pos2(50.0, 50.0), "from {a:?} to {b:?}");
        }
    }

    #[test]
    fn test_segment_update_rect_covers_stroke() {
        let rect = segment_update_rect(pos2(20.0, 5.0), pos2(10.0, 5.0), 4.0);
        assert_eq!(rect.min, pos2(6.0, 1.0));
        assert_eq!(rect.max, pos2(24.0, 9.0));
    }

    #[test]
    fn test_dirty_region_union() {
        let a = DirtyRegion::Area(Rect::from_min_max(pos2(0.0, 0.0), pos2(5.0, 5.0)));
        let b = DirtyRegion::Area(Rect::from_min_max(pos2(10.0, 10.0), pos2(12.0, 12.0)));
        assert_eq!(
            a.union(b),
            DirtyRegion::Area(Rect::from_min_max(pos2(0.0, 0.0), pos2(12.0, 12.0)))
        );
        assert_eq!(a.union(DirtyRegion::Full), DirtyRegion::Full);
    }

    #[test]
    fn test_to_pixel_floors() {
        assert_eq!(to_pixel(pos2(3.7, 9.2)), pos2(3.0, 9.0));
    }
}

/// Axis-aligned rectangle in canvas pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test: rectangles that only share an edge do not touch.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Same rectangle pushed back inside a `width` x `height` playfield.
    pub fn clamp_within(&self, width: f32, height: f32) -> Aabb {
        Aabb {
            x: clamp_axis(self.x, self.w, width),
            y: clamp_axis(self.y, self.h, height),
            ..*self
        }
    }
}

/// Clamp a position so `[pos, pos + size]` stays inside `[0, extent]`.
/// An entity larger than the extent is pinned to 0.
pub fn clamp_axis(pos: f32, size: f32, extent: f32) -> f32 {
    let max = (extent - size).max(0.0);
    if pos.is_nan() {
        return 0.0;
    }
    pos.clamp(0.0, max)
}

pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Unit vector along `(dx, dy)`, or `None` when the magnitude is zero or not
/// finite.
pub fn normalize(dx: f32, dy: f32) -> Option<(f32, f32)> {
    let len = (dx * dx + dy * dy).sqrt();
    if !len.is_finite() || len <= f32::EPSILON {
        return None;
    }
    Some((dx / len, dy / len))
}

/// Index of the candidate closest to `origin` that lies strictly within
/// `radius`. Equal distances resolve to the earlier candidate.
pub fn nearest_within<I>(origin: (f32, f32), radius: f32, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, (f32, f32))>,
{
    let mut best: Option<(usize, f32)> = None;
    for (idx, pos) in candidates {
        let d = distance(origin, pos);
        if d >= radius {
            continue;
        }
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((idx, d)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_leftward_entity_at_origin_stays_at_zero() {
        let r = Aabb::new(-5.0, 0.0, 20.0, 20.0);
        let clamped = r.clamp_within(800.0, 600.0);
        assert_eq!(clamped.x, 0.0);
        assert_eq!(clamped.y, 0.0);
    }

    #[test]
    fn test_disjoint_boxes_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(20.0, 0.0, 10.0, 10.0);
        let touching = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_normalize_guards_zero_length() {
        assert_eq!(normalize(0.0, 0.0), None);
        assert_eq!(normalize(f32::NAN, 1.0), None);
        let (x, y) = normalize(3.0, 4.0).unwrap();
        assert!((x - 0.6).abs() < 1e-6);
        assert!((y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_nearest_within_prefers_closest_then_earliest() {
        let origin = (0.0, 0.0);
        let picked = nearest_within(origin, 50.0, [(0, (40.0, 0.0)), (1, (10.0, 0.0)), (2, (0.0, 10.0))]);
        assert_eq!(picked, Some(1));
        let none = nearest_within(origin, 5.0, [(0, (40.0, 0.0))]);
        assert_eq!(none, None);
    }

    proptest! {
        #[test]
        fn prop_clamped_rect_inside_canvas(
            x in -2000.0f32..2000.0,
            y in -2000.0f32..2000.0,
            w in 1.0f32..200.0,
            h in 1.0f32..200.0,
        ) {
            let r = Aabb::new(x, y, w, h).clamp_within(800.0, 600.0);
            prop_assert!(r.x >= 0.0 && r.x <= 800.0 - w);
            prop_assert!(r.y >= 0.0 && r.y <= 600.0 - h);
        }

        #[test]
        fn prop_normalized_vectors_are_unit_or_none(dx in -1000.0f32..1000.0, dy in -1000.0f32..1000.0) {
            if let Some((x, y)) = normalize(dx, dy) {
                prop_assert!(((x * x + y * y) - 1.0).abs() < 1e-3);
            } else {
                prop_assert!(dx.abs() < 1e-3 && dy.abs() < 1e-3);
            }
        }
    }
}

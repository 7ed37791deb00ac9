//! Property tests for the geometry predicates.
//!
//! 1. **Symmetry**: isolation and overlap are symmetric in their arguments.
//! 2. **Duality**: two rects are isolated iff they fail to overlap on at least
//!    one axis, for the same tolerance.
//! 3. **Bounding box**: the union contains every input rect.
//! 4. **Ordering**: `ordered_below_rects` is sorted by bottom edge and keeps
//!    exactly the rects reaching the boundary.

use proptest::prelude::*;
use tinyboard_core::{
    DEFAULT_TOLERANCE, LayoutRect, Rect, bounding_box, clamp, ordered_below_rects,
};

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0.0f64..500.0, 0.0f64..500.0, 0.0f64..200.0, 0.0f64..200.0)
        .prop_map(|(left, top, width, height)| Rect::new(left, top, width, height))
}

proptest! {
    #[test]
    fn isolation_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(
            a.is_isolated(&b, DEFAULT_TOLERANCE),
            b.is_isolated(&a, DEFAULT_TOLERANCE)
        );
        prop_assert_eq!(a.x_overlaps(&b, 1.0), b.x_overlaps(&a, 1.0));
    }

    #[test]
    fn isolation_is_axis_failure(a in rect_strategy(), b in rect_strategy()) {
        let tol = DEFAULT_TOLERANCE;
        let overlapping = a.x_overlaps(&b, tol) && a.y_overlaps(&b, tol);
        prop_assert_eq!(a.is_isolated(&b, tol), !overlapping);
    }

    #[test]
    fn bounding_box_contains_inputs(rects in prop::collection::vec(rect_strategy(), 1..12)) {
        let bbox = bounding_box(rects.iter());
        for rect in &rects {
            prop_assert!(bbox.left <= rect.left && bbox.top <= rect.top);
            prop_assert!(bbox.right() >= rect.right() - 1e-9);
            prop_assert!(bbox.bottom() >= rect.bottom() - 1e-9);
        }
    }

    #[test]
    fn ordered_below_is_sorted_and_complete(
        rects in prop::collection::vec(rect_strategy(), 0..16),
        boundary in 0.0f64..700.0,
    ) {
        let tagged: Vec<LayoutRect> = rects
            .iter()
            .enumerate()
            .map(|(i, r)| LayoutRect::new(format!("r{i}"), *r))
            .collect();
        let below = ordered_below_rects(boundary, &tagged, DEFAULT_TOLERANCE);
        let expected = tagged
            .iter()
            .filter(|r| r.bottom() >= boundary - DEFAULT_TOLERANCE)
            .count();
        prop_assert_eq!(below.len(), expected);
        for pair in below.windows(2) {
            prop_assert!(pair[0].bottom() <= pair[1].bottom());
        }
    }

    #[test]
    fn clamp_stays_in_range(value in -1e6f64..1e6, lo in -500.0f64..500.0, span in 0.0f64..500.0) {
        let hi = lo + span;
        let clamped = clamp(value, lo, hi);
        prop_assert!(clamped >= lo && clamped <= hi);
    }
}

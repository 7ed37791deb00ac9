//! Property tests for the compacting handler.
//!
//! 1. **No overlap**: after resolution no two rects collide at the
//!    configured collision tolerance, with or without a dragged rect.
//! 2. **Completeness**: every input id appears exactly once in the output.
//! 3. **Determinism**: resolving the same inputs twice gives the same rects.
//! 4. **Fixed point**: tidying an already tidy layout changes nothing.
//! 5. **Ordering**: output is sorted top to bottom.

use proptest::prelude::*;
use tinyboard_core::{LayoutRect, Rect};
use tinyboard_layout::{CompactConfig, CompactLayout, GridAlign, LayoutContext, LayoutHandler};

const BOARD_WIDTH: f64 = 480.0;

/// Blocks on a 10px lattice so tolerances never decide the outcome.
fn board_strategy() -> impl Strategy<Value = Vec<LayoutRect>> {
    prop::collection::vec((0u32..40, 0u32..60, 1u32..20, 1u32..12), 1..14).prop_map(|cells| {
        cells
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, w, h))| {
                let width = f64::from(w.min(48 - x.min(47))) * 10.0;
                LayoutRect::new(
                    format!("b{i}"),
                    Rect::new(
                        f64::from(x.min(47)) * 10.0,
                        f64::from(y) * 10.0,
                        width,
                        f64::from(h) * 10.0,
                    ),
                )
            })
            .collect()
    })
}

fn assert_no_overlap(rects: &[LayoutRect], tolerance: f64) -> Result<(), TestCaseError> {
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            prop_assert!(
                a.rect.is_isolated(&b.rect, tolerance),
                "{:?} overlaps {:?}",
                a,
                b
            );
        }
    }
    Ok(())
}

fn sorted_ids(rects: &[LayoutRect]) -> Vec<String> {
    let mut ids: Vec<String> = rects.iter().map(|r| r.id.to_string()).collect();
    ids.sort();
    ids
}

proptest! {
    #[test]
    fn tidy_has_no_overlap(board in board_strategy()) {
        let cx = LayoutContext::unsnapped(Rect::from_size(BOARD_WIDTH, 2000.0));
        let handler = CompactLayout::default();
        let out = handler.resolve(&[], &board, &cx);
        assert_no_overlap(&out, CompactConfig::default().collision_tolerance)?;
        prop_assert_eq!(sorted_ids(&out), sorted_ids(&board));
        for pair in out.windows(2) {
            prop_assert!(pair[0].rect.top <= pair[1].rect.top);
        }
    }

    #[test]
    fn tidy_is_a_fixed_point(board in board_strategy()) {
        let cx = LayoutContext::unsnapped(Rect::from_size(BOARD_WIDTH, 2000.0));
        let handler = CompactLayout::default();
        let once = handler.resolve(&[], &board, &cx);
        let twice = handler.resolve(&[], &once, &cx);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn drag_has_no_overlap(
        board in board_strategy(),
        pick in any::<prop::sample::Index>(),
        dx in -200.0f64..200.0,
        dy in -200.0f64..400.0,
    ) {
        let grid = GridAlign::default();
        let cx = LayoutContext::new(Rect::from_size(BOARD_WIDTH, 2000.0), &grid);
        let handler = CompactLayout::default();

        let mut all = board;
        let index = pick.index(all.len());
        let moved = all[index].rect.translate(tinyboard_core::Vector::new(dx, dy));
        all[index].rect = moved;
        let dragged = vec![all[index].clone()];

        let first = handler.resolve(&dragged, &all, &cx);
        assert_no_overlap(&first, CompactConfig::default().collision_tolerance)?;
        prop_assert_eq!(sorted_ids(&first), sorted_ids(&all));

        let second = handler.resolve(&dragged, &all, &cx);
        prop_assert_eq!(first, second);
    }
}

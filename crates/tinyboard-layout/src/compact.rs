#![forbid(unsafe_code)]

//! Compacting layout: vertical gravity with swap-based collision handling.
//!
//! Every block floats up until it rests directly under the nearest block
//! above it whose horizontal projection overlaps its own. Blocks that collide
//! are pushed down below the block they hit.
//!
//! # Algorithm
//!
//! With interacting rects present, resolution runs in three phases:
//!
//! 1. **Lift**: every non-interacting rect floats up against the snapped
//!    interacting rects ("shadows") and the other rects, closing the gap the
//!    interacting blocks left behind.
//! 2. **Negotiate**: for each interacting rect, the lifted rects it collides
//!    with are examined. A rect whose top lies at least `swap_threshold`
//!    above the raw interacting rect swaps above it, and the shadow is placed
//!    under it. Otherwise the shadow floats up and takes the rect's place.
//! 3. **Settle**: shadows are fixed, then every other rect is placed top to
//!    bottom: floated up against everything already placed, then pushed down
//!    below anything it still collides with.
//!
//! Without interacting rects only the settle phase runs.
//!
//! # Invariants
//!
//! 1. Rects are always placed top to bottom: a lower rect's resting position
//!    depends on where every rect above it came to rest.
//! 2. After resolution no two rects collide at `collision_tolerance`.
//! 3. Resolution without interacting rects is a fixed point: resolving its
//!    own output again returns the same rects.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tinyboard_core::{LayoutId, LayoutRect, Rect};

use crate::handler::{LayoutContext, LayoutHandler, sort_top_down};

/// Tuning knobs for [`CompactLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactConfig {
    /// How far (px) above the dragged rect a colliding rect's top must be for
    /// the two to swap.
    pub swap_threshold: f64,
    /// Sub-pixel slack when looking for the rect to float up against.
    pub float_tolerance: f64,
    /// Overlap (px) below which two rects do not collide.
    pub collision_tolerance: f64,
    /// Horizontal overlap (px) below which a rect is not an obstacle.
    pub x_overlap_tolerance: f64,
}

impl Default for CompactConfig {
    fn default() -> Self {
        Self {
            swap_threshold: 30.0,
            float_tolerance: 0.5,
            collision_tolerance: 1.5,
            x_overlap_tolerance: 1.0,
        }
    }
}

impl CompactConfig {
    /// Human-readable problems with this config. Empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, value) in [
            ("swap_threshold", self.swap_threshold),
            ("float_tolerance", self.float_tolerance),
            ("collision_tolerance", self.collision_tolerance),
            ("x_overlap_tolerance", self.x_overlap_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("compact.{name} must be finite and >= 0, got {value}"));
            }
        }
        errors
    }
}

/// Grid-compacting [`LayoutHandler`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompactLayout {
    config: CompactConfig,
}

impl CompactLayout {
    pub const NAME: &'static str = "compact";

    #[must_use]
    pub const fn new(config: CompactConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CompactConfig {
        &self.config
    }

    /// Highest top `rect` can float up to without passing `max_top`: the
    /// bottom of the lowest overlapping obstacle above it, or 0.
    fn float_up<'r>(
        &self,
        rect: &Rect,
        obstacles: impl IntoIterator<Item = &'r Rect>,
        max_top: f64,
    ) -> f64 {
        let limit = max_top + self.config.float_tolerance;
        obstacles
            .into_iter()
            .filter(|o| o.x_overlaps(rect, self.config.x_overlap_tolerance))
            .map(Rect::bottom)
            .filter(|&bottom| bottom <= limit)
            .fold(0.0, f64::max)
    }

    /// Move `rect` down until it collides with none of `placed`.
    fn push_down(&self, rect: &mut Rect, placed: &[LayoutRect]) {
        loop {
            let current = *rect;
            let next = placed
                .iter()
                .filter(|p| !p.rect.is_isolated(&current, self.config.collision_tolerance))
                .map(LayoutRect::bottom)
                .fold(current.top, f64::max);
            if next <= rect.top {
                return;
            }
            rect.top = next;
        }
    }

    /// Place `rects` top to bottom around the already fixed `placed` set.
    fn settle(&self, mut placed: Vec<LayoutRect>, mut rects: Vec<LayoutRect>) -> Vec<LayoutRect> {
        sort_top_down(&mut rects);
        placed.reserve(rects.len());
        for mut item in rects {
            let top = self.float_up(&item.rect, placed.iter().map(|p| &p.rect), item.rect.top);
            item.rect.top = top;
            self.push_down(&mut item.rect, &placed);
            placed.push(item);
        }
        sort_top_down(&mut placed);
        placed
    }

    fn lift(&self, shadows: &[LayoutRect], others: &mut [LayoutRect]) {
        for i in 0..others.len() {
            let rect = others[i].rect;
            let obstacles = shadows.iter().chain(
                others
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, o)| o),
            );
            let top = self.float_up(&rect, obstacles.map(|o| &o.rect), rect.top);
            others[i].rect.top = top;
        }
    }

    /// Decide where the shadow of `raw` goes. `fixed` are the shadows already
    /// negotiated.
    fn negotiate(
        &self,
        raw: &Rect,
        mut shadow: Rect,
        fixed: &[LayoutRect],
        others: &mut [LayoutRect],
    ) -> Rect {
        let colliders: Vec<usize> = others
            .iter()
            .enumerate()
            .filter(|(_, o)| {
                !o.rect.is_isolated(raw, self.config.collision_tolerance)
                    && o.rect.x_overlap_len(&shadow) > 0.0
            })
            .map(|(i, _)| i)
            .collect();

        let mut should_float = true;
        if !colliders.is_empty() {
            let mut max_top = 0.0_f64;
            for j in colliders {
                let hit = others[j].rect;
                if raw.top - hit.top >= self.config.swap_threshold {
                    let obstacles = others
                        .iter()
                        .enumerate()
                        .filter(|&(i, _)| i != j)
                        .map(|(_, o)| &o.rect);
                    let top = self.float_up(&hit, obstacles, hit.top);
                    others[j].rect.top = top;
                    max_top = max_top.max(top + hit.height);
                    should_float = false;
                    tracing::trace!(id = %others[j].id, top, "swapped above dragged rect");
                } else {
                    let obstacles = fixed.iter().chain(others.iter()).map(|o| &o.rect);
                    max_top = max_top.max(self.float_up(&shadow, obstacles, shadow.top));
                }
            }
            shadow.top = max_top;
        }
        if should_float {
            let obstacles = fixed.iter().chain(others.iter()).map(|o| &o.rect);
            shadow.top = self.float_up(&shadow, obstacles, raw.top);
        }
        shadow
    }
}

impl LayoutHandler for CompactLayout {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn resolve(
        &self,
        interacting: &[LayoutRect],
        all: &[LayoutRect],
        cx: &LayoutContext<'_>,
    ) -> Vec<LayoutRect> {
        let _span = tracing::debug_span!(
            "compact.resolve",
            interacting = interacting.len(),
            total = all.len()
        )
        .entered();

        if interacting.is_empty() {
            return self.settle(Vec::new(), all.to_vec());
        }

        let moving: FxHashSet<&LayoutId> = interacting.iter().map(|r| &r.id).collect();
        let mut others: Vec<LayoutRect> = all
            .iter()
            .filter(|r| !moving.contains(&r.id))
            .cloned()
            .collect();
        sort_top_down(&mut others);

        let mut raws = interacting.to_vec();
        sort_top_down(&mut raws);
        let snapped: Vec<LayoutRect> = raws.iter().map(|r| r.with_rect(cx.snap(r.rect))).collect();

        self.lift(&snapped, &mut others);

        let mut shadows: Vec<LayoutRect> = Vec::with_capacity(raws.len());
        for (raw, shadow) in raws.iter().zip(&snapped) {
            let rect = self.negotiate(&raw.rect, shadow.rect, &shadows, &mut others);
            shadows.push(shadow.with_rect(rect));
        }

        // Shadows of a multi-block drag must not overlap each other.
        sort_top_down(&mut shadows);
        let mut fixed: Vec<LayoutRect> = Vec::with_capacity(shadows.len());
        for mut shadow in shadows {
            self.push_down(&mut shadow.rect, &fixed);
            fixed.push(shadow);
        }

        self.settle(fixed, others)
    }
}

#![forbid(unsafe_code)]

//! Core: geometry, block ids, pointer events, and drag tracking.
//!
//! # Role in tinyboard
//! `tinyboard-core` holds the leaf types every other crate speaks in. It has
//! no knowledge of layout policies or sessions.
//!
//! # Primary responsibilities
//! - **Geometry**: [`Rect`], [`Point`], [`Vector`], and the overlap,
//!   isolation, and collision queries the layout handlers are built from.
//! - **Ids**: [`LayoutId`] and the deterministic [`IdGenerator`].
//! - **Input**: [`PointerEvent`] with [`Modifiers`], resize handle
//!   [`ResizeDirection`]s, and the [`DragMove`] tracker that implements the
//!   initial-event rule shared by all pointer adapters.
//!
//! # How it fits in the system
//! `tinyboard-layout` resolves sets of [`LayoutRect`]s into collision-free
//! layouts; `tinyboard-runtime` owns the board model and the interaction
//! session and feeds pointer input through the adapters.

pub mod direction;
pub mod drag_move;
pub mod event;
pub mod geometry;
pub mod id;

pub use direction::{Edges, ParseDirectionError, ResizeDirection};
pub use drag_move::{DragMove, DragStep};
pub use event::{Modifiers, PointerButton, PointerEvent, PointerEventKind};
pub use geometry::{
    DEFAULT_TOLERANCE, LayoutRect, Point, Rect, Size, Vector, bounding_box, clamp, collided_rects,
    is_between, ordered_below_rects,
};
pub use id::{IdGenerator, LayoutId};

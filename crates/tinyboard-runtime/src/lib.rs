#![forbid(unsafe_code)]

//! Board model, interaction sessions, and pointer adapters.
//!
//! # Role in tinyboard
//! `tinyboard-runtime` is the stateful half of tinyboard. It owns the items
//! of a board, runs one interaction session at a time against the layout
//! pipeline from `tinyboard-layout`, and turns pointer input into candidate
//! rects.
//!
//! # Primary responsibilities
//! - **Model**: [`Dashboard`] stores [`LayoutItem`]s and selection flags and
//!   emits [`DashboardEvent`]s.
//! - **Sessions**: [`Instance`] drives activate → re-layout → commit/cancel
//!   with a leading call and a trailing [`Throttle`], and keeps the shadow
//!   indicator.
//! - **Input**: [`DragAdapter`], [`ResizeAdapter`], [`DropAdapter`], and the
//!   [`SelectionController`].
//! - **Measurement**: [`LayoutRecorder`] syncs rendered rects back in.
//! - **Configuration**: [`BoardConfig`], loadable from TOML or JSON with the
//!   `config-files` feature.
//!
//! # How it fits in the system
//! The host owns the clock and the rendering. It passes `now` into every
//! call that may resolve, polls [`Instance::poll`] at
//! [`Instance::next_deadline`], and renders items with
//! [`Instance::style_of`].
//!
//! ```
//! use tinyboard_core::{PointerEvent, Rect};
//! use tinyboard_runtime::{BoardConfig, DragAdapter, Instance, LayoutItem};
//! use web_time::Instant;
//!
//! let mut board = Instance::builder(vec![
//!     LayoutItem::new("a", Rect::new(0.0, 0.0, 100.0, 50.0), ()),
//!     LayoutItem::new("b", Rect::new(0.0, 50.0, 100.0, 50.0), ()),
//! ])
//! .config(BoardConfig {
//!     layout: "compact".into(),
//!     ..BoardConfig::default()
//! })
//! .bounds(Rect::from_size(300.0, 600.0))
//! .build()?;
//!
//! let now = Instant::now();
//! let mut drag = DragAdapter::new();
//! drag.pointer_down(&board, "a", &PointerEvent::down(10.0, 10.0));
//! drag.pointer_move(&mut board, &PointerEvent::moved(10.0, 11.0), now);
//! drag.pointer_move(&mut board, &PointerEvent::moved(10.0, 90.0), now);
//! drag.pointer_up(&mut board, &PointerEvent::up(10.0, 90.0), now);
//!
//! assert_eq!(board.dashboard().get_by_id("b").unwrap().rect.top, 0.0);
//! assert_eq!(board.dashboard().get_by_id("a").unwrap().rect.top, 50.0);
//! # Ok::<(), tinyboard_runtime::BoardError>(())
//! ```

pub mod config;
pub mod dashboard;
pub mod drag;
pub mod drop;
pub mod error;
pub mod events;
pub mod instance;
pub mod item;
pub mod recorder;
pub mod resize;
pub mod select;
pub mod shadow;
pub mod throttle;

pub use config::BoardConfig;
pub use dashboard::Dashboard;
pub use drag::{DragAdapter, DragHooks, DragOutcome, NoDragHooks};
pub use drop::{DropAdapter, centred_rect};
pub use error::{BoardError, ConfigError, Result};
pub use events::{DashboardEvent, Emitter, InstanceEvent, SubscriptionId};
pub use instance::{
    AUTO_EXPAND_TOLERANCE, BoardFlag, Instance, InstanceBuilder, SessionState,
};
pub use item::{DEFAULT_LAYER, LayoutItem};
pub use recorder::{ContainerMeasurement, ElementMeasurement, LayoutRecorder};
pub use resize::{NoResizeHooks, ResizeAdapter, ResizeHooks, ResizeOutcome, SizeLimit, resize_rect};
pub use select::{
    ElementTree, SelectOutcome, SelectionController, SelectionPolicy, closest_layout_id,
};
pub use shadow::ShadowIndicator;
pub use throttle::Throttle;

#![forbid(unsafe_code)]

//! Pointer input events.
//!
//! The host translates its native mouse events into [`PointerEvent`] values.
//! Coordinates are client coordinates; the adapters convert them into board
//! coordinates using the board bounds.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Left mouse button.
    #[default]
    Primary,
    /// Middle mouse button.
    Auxiliary,
    /// Right mouse button.
    Secondary,
}

bitflags! {
    /// Modifier keys held while a pointer event happened.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        /// Meta / Command key.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    /// Whether the modifier that toggles membership in a multi-selection is held.
    #[must_use]
    pub const fn is_toggle(self) -> bool {
        self.intersects(Self::CTRL.union(Self::META))
    }
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
}

/// A single pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    /// Primary-button press.
    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }

    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.button == PointerButton::Primary
    }
}

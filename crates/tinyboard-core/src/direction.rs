#![forbid(unsafe_code)]

//! Resize handle directions.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Edges of a box moved by a resize handle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        const TOP    = 0b0001;
        const RIGHT  = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT   = 0b1000;
    }
}

/// The handle a resize interaction was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeDirection {
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl ResizeDirection {
    pub const ALL: [ResizeDirection; 8] = [
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Left,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Edges moved by this handle.
    #[must_use]
    pub const fn edges(self) -> Edges {
        match self {
            Self::Top => Edges::TOP,
            Self::Right => Edges::RIGHT,
            Self::Bottom => Edges::BOTTOM,
            Self::Left => Edges::LEFT,
            Self::TopLeft => Edges::TOP.union(Edges::LEFT),
            Self::TopRight => Edges::TOP.union(Edges::RIGHT),
            Self::BottomLeft => Edges::BOTTOM.union(Edges::LEFT),
            Self::BottomRight => Edges::BOTTOM.union(Edges::RIGHT),
        }
    }

    /// Short handle name as used in `data-direction` attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Right => "r",
            Self::Bottom => "b",
            Self::Left => "l",
            Self::TopLeft => "tl",
            Self::TopRight => "tr",
            Self::BottomLeft => "bl",
            Self::BottomRight => "br",
        }
    }
}

impl fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handle name that is not one of the eight known directions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resize direction {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for ResizeDirection {
    type Err = ParseDirectionError;

    /// Parse a handle name. Corner names are accepted in either order
    /// (`tl` / `lt`) and case-insensitively.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let direction = match raw.trim().to_ascii_lowercase().as_str() {
            "t" => Self::Top,
            "r" => Self::Right,
            "b" => Self::Bottom,
            "l" => Self::Left,
            "tl" | "lt" => Self::TopLeft,
            "tr" | "rt" => Self::TopRight,
            "bl" | "lb" => Self::BottomLeft,
            "br" | "rb" => Self::BottomRight,
            _ => return Err(ParseDirectionError(raw.to_owned())),
        };
        Ok(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("lt".parse::<ResizeDirection>(), Ok(ResizeDirection::TopLeft));
        assert_eq!("RB".parse::<ResizeDirection>(), Ok(ResizeDirection::BottomRight));
        assert_eq!(" t ".parse::<ResizeDirection>(), Ok(ResizeDirection::Top));
        assert!("x".parse::<ResizeDirection>().is_err());
    }

    #[test]
    fn round_trips_names() {
        for direction in ResizeDirection::ALL {
            assert_eq!(direction.as_str().parse::<ResizeDirection>(), Ok(direction));
        }
    }

    #[test]
    fn corner_edges() {
        let edges = ResizeDirection::TopLeft.edges();
        assert!(edges.contains(Edges::TOP | Edges::LEFT));
        assert!(!edges.intersects(Edges::BOTTOM | Edges::RIGHT));
        assert_eq!(ResizeDirection::default(), ResizeDirection::BottomRight);
    }
}

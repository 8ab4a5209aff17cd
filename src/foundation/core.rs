use crate::foundation::error::{B2r2Error, B2r2Result};

/// Integer rectangle in pixel coordinates.
///
/// Used both as the full extent of an operation and as the window (tile) currently processed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Build a rect from its origin and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, saturating at `i32::MAX`.
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `i32::MAX`.
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// `true` when the rect covers no pixel.
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Pixel count, `0` for empty rects.
    pub fn area(self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        u64::from(self.width.unsigned_abs()) * u64::from(self.height.unsigned_abs())
    }

    /// Intersection of two rects; empty rects come back with zero size.
    pub fn intersect(self, other: Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        if r <= x || b <= y {
            return Rect::new(x, y, 0, 0);
        }
        Rect::new(x, y, r - x, b - y)
    }

    /// `true` when `other` lies entirely inside `self`.
    pub fn contains_rect(self, other: Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// `true` when the rect lies within `[0, width) x [0, height)`.
    pub fn fits_in(self, width: u32, height: u32) -> bool {
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return false;
        };
        Rect::new(0, 0, w, h).contains_rect(self)
    }

    /// Reject degenerate rects; `what` names the rect in the error message.
    pub fn require_positive(self, what: &str) -> B2r2Result<()> {
        if self.is_empty() {
            return Err(B2r2Error::invalid(format!(
                "{what} has non-positive size {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Same rect with width and height exchanged (90 degree rotation of the extent).
    pub const fn transposed(self) -> Rect {
        Rect::new(self.x, self.y, self.height, self.width)
    }
}

/// Horizontal scan order of a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Hso {
    /// Columns are written left to right.
    #[default]
    LeftToRight,
    /// Columns are written right to left.
    RightToLeft,
}

/// Vertical scan order of a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Vso {
    /// Rows are written top to bottom.
    #[default]
    TopToBottom,
    /// Rows are written bottom to top.
    BottomToTop,
}

impl Hso {
    /// Opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Hso::LeftToRight => Hso::RightToLeft,
            Hso::RightToLeft => Hso::LeftToRight,
        }
    }

    /// Apply the direction to a step size.
    pub fn signed(self, step: i32) -> i32 {
        match self {
            Hso::LeftToRight => step,
            Hso::RightToLeft => -step,
        }
    }
}

impl Vso {
    /// Opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Vso::TopToBottom => Vso::BottomToTop,
            Vso::BottomToTop => Vso::TopToBottom,
        }
    }

    /// Apply the direction to a step size.
    pub fn signed(self, step: i32) -> i32 {
        match self {
            Vso::TopToBottom => step,
            Vso::BottomToTop => -step,
        }
    }
}

/// Place a span of `len` pixels at scan offset `offset` inside `[start, start + extent)`.
///
/// Forward spans grow from `start`; reversed spans grow from the far edge.
pub(crate) fn place_span(start: i32, extent: i32, offset: i32, len: i32, reversed: bool) -> i32 {
    if reversed {
        start + extent - offset - len
    } else {
        start + offset
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

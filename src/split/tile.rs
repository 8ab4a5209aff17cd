//! Tile iteration shared by node counting and node configuration.
//!
//! Tiles are produced in scan space: offsets grow from zero along both axes and the caller
//! maps them onto surfaces, reversing the placement for right-to-left or bottom-to-top scans.

use crate::foundation::core::{Hso, Rect, Vso, place_span};
use crate::foundation::math::div_ceil;
use crate::split::buffer::{NodeSplitBuffer, ROTATE_MAX_WIDTH};

/// Row-major walk over an `extent_w` x `extent_h` area in steps of `step_w` x `step_h`.
///
/// The last column and the last row shrink to the exact remainder.
#[derive(Clone, Debug)]
pub struct TileWalker {
    extent_w: i32,
    extent_h: i32,
    step_w: i32,
    step_h: i32,
    x: i32,
    y: i32,
}

impl TileWalker {
    /// Walker over an area; non-positive steps walk the area as one tile along that axis.
    pub fn new(extent_w: i32, extent_h: i32, step_w: i32, step_h: i32) -> Self {
        let step_w = if step_w <= 0 { extent_w } else { step_w };
        let step_h = if step_h <= 0 { extent_h } else { step_h };
        Self {
            extent_w,
            extent_h,
            step_w,
            step_h,
            x: 0,
            y: 0,
        }
    }

    /// Tiles per row.
    pub fn cols(&self) -> i32 {
        div_ceil(self.extent_w, self.step_w)
    }

    /// Tile rows.
    pub fn rows(&self) -> i32 {
        div_ceil(self.extent_h, self.step_h)
    }

    /// Width of the last column.
    pub fn last_width(&self) -> i32 {
        self.extent_w - (self.cols() - 1).max(0) * self.step_w
    }

    /// Height of the last row.
    pub fn last_height(&self) -> i32 {
        self.extent_h - (self.rows() - 1).max(0) * self.step_h
    }
}

impl Iterator for TileWalker {
    type Item = Rect;

    fn next(&mut self) -> Option<Rect> {
        if self.extent_w <= 0 || self.extent_h <= 0 || self.y >= self.extent_h {
            return None;
        }
        let tile = Rect::new(
            self.x,
            self.y,
            self.step_w.min(self.extent_w - self.x),
            self.step_h.min(self.extent_h - self.y),
        );
        self.x = self.x.saturating_add(self.step_w);
        if self.x >= self.extent_w {
            self.x = 0;
            self.y = self.y.saturating_add(self.step_h);
        }
        Some(tile)
    }
}

/// Rotation nodes needed for a `width` x `height` source block.
///
/// Blocks taller than 16 lines whose height is not a multiple of 16 are split in two rows
/// (hardware erratum), doubling the count.
pub fn rot_count(width: i32, height: i32) -> u32 {
    let cols = div_ceil(width, ROTATE_MAX_WIDTH).max(0).unsigned_abs();
    if height > ROTATE_MAX_WIDTH && height % ROTATE_MAX_WIDTH != 0 {
        cols * 2
    } else {
        cols
    }
}

/// The source blocks, relative to a `width` x `height` block, that [`rot_count`] counts.
pub fn rotation_strips(width: i32, height: i32) -> impl Iterator<Item = Rect> {
    let rem = height % ROTATE_MAX_WIDTH;
    let rows: [Option<(i32, i32)>; 2] = if height > ROTATE_MAX_WIDTH && rem != 0 {
        [Some((0, height - rem)), Some((height - rem, rem))]
    } else {
        [Some((0, height)), None]
    };
    let cols = div_ceil(width, ROTATE_MAX_WIDTH).max(0);
    (0..cols).flat_map(move |col| {
        let x = col * ROTATE_MAX_WIDTH;
        let w = ROTATE_MAX_WIDTH.min(width - x);
        rows.into_iter()
            .flatten()
            .map(move |(y, h)| Rect::new(x, y, w, h))
    })
}

/// Destination area written by scan-space `tile` of an unrotated walk.
pub(crate) fn place(dst: &NodeSplitBuffer, tile: Rect) -> Rect {
    let r = dst.rect;
    Rect::new(
        place_span(r.x, r.width, tile.x, tile.width, dst.hso == Hso::RightToLeft),
        place_span(r.y, r.height, tile.y, tile.height, dst.vso == Vso::BottomToTop),
        tile.width,
        tile.height,
    )
}

/// Destination area written by source-space `block` of a rotated walk.
///
/// Source columns become destination rows and source rows become destination columns.
pub(crate) fn place_rotated(dst: &NodeSplitBuffer, block: Rect) -> Rect {
    let r = dst.rect;
    Rect::new(
        place_span(r.x, r.width, block.y, block.height, dst.hso == Hso::RightToLeft),
        place_span(r.y, r.height, block.x, block.width, dst.vso == Vso::BottomToTop),
        block.height,
        block.width,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/split/tile.rs"]
mod tests;

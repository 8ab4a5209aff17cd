//! Blit requests as handed to the compiler.

use crate::foundation::core::Rect;
use crate::format::pixel::PixelFormat;

/// One side of a blit: an image in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlitImage {
    /// Pixel format.
    pub fmt: PixelFormat,
    /// Physical address of the first plane.
    #[serde(default)]
    pub addr: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Explicit line pitch in bytes; `0` derives it from the width.
    #[serde(default)]
    pub pitch: u32,
}

impl BlitImage {
    /// Image with a derived pitch.
    pub fn new(fmt: PixelFormat, addr: u64, width: u32, height: u32) -> Self {
        Self {
            fmt,
            addr,
            width,
            height,
            pitch: 0,
        }
    }

    /// Same image with an explicit line pitch.
    pub fn with_pitch(mut self, pitch: u32) -> Self {
        self.pitch = pitch;
        self
    }

    /// Line pitch of the first plane.
    pub fn line_pitch(&self) -> u32 {
        if self.pitch != 0 {
            self.pitch
        } else {
            self.fmt.byte_pitch(self.width)
        }
    }

    /// The whole image as a rect.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0,
            0,
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}

/// Request flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BlitFlags {
    /// Fill the destination with `src_color`, converted from the fill source format.
    pub source_fill: bool,
    /// Fill the destination with `src_color` written verbatim in the destination format.
    pub source_fill_raw: bool,
    /// Blend with `global_alpha`.
    pub global_alpha_blend: bool,
    /// Blend with the source's per-pixel alpha.
    pub per_pixel_alpha_blend: bool,
    /// Source color channels are not premultiplied by alpha.
    pub src_is_not_premult: bool,
    /// Restrict writes to `clip_rect`.
    pub destination_clip: bool,
    /// Dither when writing lower-precision destinations.
    pub dither: bool,
}

impl BlitFlags {
    /// Any fill mode.
    pub fn is_fill(&self) -> bool {
        self.source_fill || self.source_fill_raw
    }

    /// Any blending mode.
    pub fn is_blend(&self) -> bool {
        self.global_alpha_blend || self.per_pixel_alpha_blend
    }
}

/// Orientation change applied while blitting.
///
/// Flips are applied to the source before the counter-clockwise rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// No change.
    #[default]
    None,
    /// Mirror left/right.
    FlipH,
    /// Mirror top/bottom.
    FlipV,
    /// Half turn.
    Rot180,
    /// Quarter turn counter-clockwise.
    Rot90Ccw,
    /// Mirror left/right, then quarter turn counter-clockwise.
    FlipHRot90Ccw,
    /// Mirror top/bottom, then quarter turn counter-clockwise.
    FlipVRot90Ccw,
    /// Three quarter turns counter-clockwise.
    Rot270Ccw,
}

const FLIP_H: u8 = 1;
const FLIP_V: u8 = 2;
const ROT_90: u8 = 4;

impl Transform {
    /// Every transform.
    pub const ALL: [Transform; 8] = [
        Transform::None,
        Transform::FlipH,
        Transform::FlipV,
        Transform::Rot180,
        Transform::Rot90Ccw,
        Transform::FlipHRot90Ccw,
        Transform::FlipVRot90Ccw,
        Transform::Rot270Ccw,
    ];

    /// Bit set: `1` horizontal flip, `2` vertical flip, `4` counter-clockwise quarter turn.
    pub fn bits(self) -> u8 {
        match self {
            Transform::None => 0,
            Transform::FlipH => FLIP_H,
            Transform::FlipV => FLIP_V,
            Transform::Rot180 => FLIP_H | FLIP_V,
            Transform::Rot90Ccw => ROT_90,
            Transform::FlipHRot90Ccw => FLIP_H | ROT_90,
            Transform::FlipVRot90Ccw => FLIP_V | ROT_90,
            Transform::Rot270Ccw => FLIP_H | FLIP_V | ROT_90,
        }
    }

    /// Mirrors horizontally.
    pub fn flip_h(self) -> bool {
        self.bits() & FLIP_H != 0
    }

    /// Mirrors vertically.
    pub fn flip_v(self) -> bool {
        self.bits() & FLIP_V != 0
    }

    /// Swaps the axes.
    pub fn rotates(self) -> bool {
        self.bits() & ROT_90 != 0
    }
}

fn opaque() -> u8 {
    u8::MAX
}

/// A complete blit request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlitRequest {
    /// Source image; ignored by fills except for its format in raw mode.
    pub src_img: BlitImage,
    /// Destination image.
    pub dst_img: BlitImage,
    /// Area read from the source.
    pub src_rect: Rect,
    /// Area written in the destination.
    pub dst_rect: Rect,
    /// Orientation change.
    #[serde(default)]
    pub transform: Transform,
    /// Request flags.
    #[serde(default)]
    pub flags: BlitFlags,
    /// Fill color, in the fill source format.
    #[serde(default)]
    pub src_color: u32,
    /// Global alpha, `0..=255`.
    #[serde(default = "opaque")]
    pub global_alpha: u8,
    /// Clip rectangle in destination coordinates.
    #[serde(default)]
    pub clip_rect: Rect,
}

impl BlitRequest {
    /// Plain copy of `src_rect` into `dst_rect`.
    pub fn copy(src_img: BlitImage, src_rect: Rect, dst_img: BlitImage, dst_rect: Rect) -> Self {
        Self {
            src_img,
            dst_img,
            src_rect,
            dst_rect,
            transform: Transform::None,
            flags: BlitFlags::default(),
            src_color: 0,
            global_alpha: opaque(),
            clip_rect: Rect::default(),
        }
    }

    /// Fill of `dst_rect` with `color`.
    pub fn fill(dst_img: BlitImage, dst_rect: Rect, color: u32) -> Self {
        let mut req = Self::copy(dst_img, dst_rect, dst_img, dst_rect);
        req.flags.source_fill = true;
        req.src_color = color;
        req
    }

    /// Same request with a transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Same request with global-alpha blending enabled.
    pub fn with_global_alpha(mut self, alpha: u8) -> Self {
        self.flags.global_alpha_blend = true;
        self.global_alpha = alpha;
        self
    }

    /// Same request with destination clipping enabled.
    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.flags.destination_clip = true;
        self.clip_rect = clip;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blit/request.rs"]
mod tests;

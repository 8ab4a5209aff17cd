//! Per-surface descriptors used while splitting a blit into nodes.

use smallvec::{SmallVec, smallvec};

use crate::blit::request::BlitImage;
use crate::foundation::core::{Hso, Rect, Vso};
use crate::foundation::error::{B2r2Error, B2r2Result};
use crate::format::pixel::{AlphaRange, FmtType, NativeFormat, PixelFormat};
use crate::node::types::{Plane, SurfaceConfig};

/// Widest source run the rescaler handles in one node.
pub const RESCALE_MAX_WIDTH: i32 = 128;

/// Widest source block the rotator handles in one node.
pub const ROTATE_MAX_WIDTH: i32 = 16;

/// One surface of a split operation: source, destination or temporary buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NodeSplitBuffer {
    /// Pixel format.
    pub fmt: PixelFormat,
    /// Memory layout of `fmt`.
    pub fmt_type: FmtType,
    /// Full operation area.
    pub rect: Rect,
    /// First tile of the operation.
    pub window: Rect,
    /// Luma (or only) plane address.
    pub addr: u64,
    /// Chroma plane address (Cb plane for planar formats).
    pub chroma_addr: u64,
    /// Cr plane address of planar formats.
    pub chroma_cr_addr: u64,
    /// Synthetic fill source.
    pub is_fill: bool,
    /// Fill color.
    pub color: u32,
    /// Line pitch of the first plane in bytes.
    pub pitch: u32,
    /// Height of the backing surface in lines.
    pub height: u32,
    /// Horizontal scan order.
    pub hso: Hso,
    /// Vertical scan order.
    pub vso: Vso,
    /// Horizontal step between tiles, negative when scanning right to left.
    pub dx: i32,
    /// Vertical step between tiles, negative when scanning bottom to top.
    pub dy: i32,
    /// Alpha interpretation range.
    pub alpha_range: AlphaRange,
    /// Dither writes into this surface.
    pub dither: bool,
    /// Temporary buffer slot (1-based), `0` for caller memory.
    pub tmp_buf_index: u32,
}

impl NodeSplitBuffer {
    fn blank(fmt: PixelFormat, rect: Rect) -> Self {
        Self {
            fmt,
            fmt_type: fmt.fmt_type(),
            rect,
            window: rect,
            addr: 0,
            chroma_addr: 0,
            chroma_cr_addr: 0,
            is_fill: false,
            color: 0,
            pitch: 0,
            height: 0,
            hso: Hso::LeftToRight,
            vso: Vso::TopToBottom,
            dx: rect.width,
            dy: rect.height,
            alpha_range: fmt.alpha_range(),
            dither: false,
            tmp_buf_index: 0,
        }
    }

    /// Describe `full_rect` of `img` in format `fmt`, or a fill source of `fill_color`.
    pub fn set_buf(
        fmt: PixelFormat,
        full_rect: Rect,
        is_fill: bool,
        fill_color: u32,
        img: &BlitImage,
    ) -> Self {
        let mut buf = Self::blank(fmt, full_rect);
        if is_fill {
            buf.is_fill = true;
            buf.color = fill_color;
            return buf;
        }

        buf.addr = img.addr;
        buf.pitch = if img.pitch != 0 {
            img.pitch
        } else {
            fmt.byte_pitch(img.width)
        };
        buf.height = img.height;

        let luma_size = u64::from(buf.pitch) * u64::from(img.height);
        match fmt.fmt_type() {
            FmtType::Raster => {}
            FmtType::SemiPlanar => {
                buf.chroma_addr = buf.addr.wrapping_add(luma_size);
            }
            FmtType::Planar => {
                buf.chroma_addr = buf.addr.wrapping_add(luma_size);
                let cb_size = u64::from(buf.plane_pitch(Plane::ChromaCb))
                    * u64::from(buf.plane_height(Plane::ChromaCb));
                buf.chroma_cr_addr = buf.chroma_addr.wrapping_add(cb_size);
            }
        }
        buf
    }

    /// Turn this buffer into temporary buffer `index` covering `window`, anchored at the origin.
    pub fn configure_tmp_buf(&mut self, index: u32, window: Rect) {
        let fmt = self.fmt;
        let window = Rect::new(0, 0, window.width, window.height);
        self.tmp_buf_index = index;
        self.rect = window;
        self.window = window;
        self.addr = 0;
        self.chroma_addr = 0;
        self.chroma_cr_addr = 0;
        self.is_fill = false;
        self.pitch = fmt.byte_pitch(window.width.unsigned_abs());
        self.height = window.height.unsigned_abs();
        self.hso = Hso::LeftToRight;
        self.vso = Vso::TopToBottom;
        self.dx = window.width;
        self.dy = window.height;
        self.alpha_range = fmt.alpha_range();
        self.dither = false;
    }

    /// Memory planes, in the order nodes write them.
    pub fn planes(&self) -> SmallVec<[Plane; 3]> {
        match self.fmt.fmt_type() {
            FmtType::Raster => smallvec![Plane::Full],
            FmtType::SemiPlanar => smallvec![Plane::Luma, Plane::Chroma],
            FmtType::Planar => smallvec![Plane::Luma, Plane::ChromaCb, Plane::ChromaCr],
        }
    }

    /// Number of memory planes.
    pub fn plane_count(&self) -> u32 {
        self.fmt.fmt_type().plane_count()
    }

    /// `true` for semi-planar and planar surfaces.
    pub fn is_multi_plane(&self) -> bool {
        self.fmt.fmt_type() != FmtType::Raster
    }

    /// Scale factors of the chroma planes of this surface when written from `src` at
    /// `h_sf` x `v_sf`, or `None` when one does not fit in 16 bits.
    ///
    /// Subsampled chroma sees the factor multiplied by the subsampling; a multi-plane source
    /// is resampled from its own subsampled chroma.
    pub fn chroma_scale_factors(
        &self,
        src: &NodeSplitBuffer,
        h_sf: u16,
        v_sf: u16,
    ) -> Option<(u16, u16)> {
        let (dst_h, dst_v) = self.fmt.chroma_subsampling();
        let (src_h, src_v) = if src.is_multi_plane() {
            src.fmt.chroma_subsampling()
        } else {
            (1, 1)
        };
        Some((
            subsampled_factor(h_sf, dst_h, src_h)?,
            subsampled_factor(v_sf, dst_v, src_v)?,
        ))
    }

    fn plane_addr(&self, plane: Plane) -> u64 {
        match plane {
            Plane::Full | Plane::Luma => self.addr,
            Plane::Chroma | Plane::ChromaCb => self.chroma_addr,
            Plane::ChromaCr => self.chroma_cr_addr,
        }
    }

    /// Line pitch of `plane`.
    pub fn plane_pitch(&self, plane: Plane) -> u32 {
        let (hsub, _) = self.fmt.chroma_subsampling();
        match plane {
            Plane::Full | Plane::Luma => self.pitch,
            // Interleaved CbCr pairs take as many bytes per line as the luma samples they cover.
            Plane::Chroma => self.pitch.next_multiple_of(2),
            Plane::ChromaCb | Plane::ChromaCr => self.pitch.div_ceil(hsub.unsigned_abs()),
        }
    }

    fn plane_height(&self, plane: Plane) -> u32 {
        let (_, vsub) = self.fmt.chroma_subsampling();
        if plane.is_chroma() {
            self.height.div_ceil(vsub.unsigned_abs())
        } else {
            self.height
        }
    }

    /// Hardware format code of `plane`.
    pub fn plane_native(&self, plane: Plane) -> NativeFormat {
        match plane {
            Plane::Full => self.fmt.native(),
            Plane::Luma | Plane::ChromaCb | Plane::ChromaCr => NativeFormat::Byte,
            Plane::Chroma => NativeFormat::Cbcr,
        }
    }

    /// `window` (luma coordinates) expressed in the coordinates of `plane`.
    pub fn plane_window(&self, window: Rect, plane: Plane) -> Rect {
        if !plane.is_chroma() {
            return window;
        }
        let (hsub, vsub) = self.fmt.chroma_subsampling();
        let x0 = window.x.div_euclid(hsub);
        let y0 = window.y.div_euclid(vsub);
        let x1 = ceil_div(window.right(), hsub);
        let y1 = ceil_div(window.bottom(), vsub);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Slot configuration writing or reading `plane` over `window`.
    pub fn surface(&self, plane: Plane, window: Rect, hso: Hso, vso: Vso) -> SurfaceConfig {
        if self.is_fill {
            return SurfaceConfig {
                native: self.fmt.native(),
                window,
                hso,
                vso,
                color: Some(self.color),
                alpha_range: self.alpha_range,
                ..SurfaceConfig::default()
            };
        }
        SurfaceConfig {
            addr: self.plane_addr(plane),
            cr_addr: if plane == Plane::ChromaCb {
                self.chroma_cr_addr
            } else {
                0
            },
            native: self.plane_native(plane),
            pitch: self.plane_pitch(plane),
            window: self.plane_window(window, plane),
            hso,
            vso,
            plane,
            color: None,
            alpha_range: self.alpha_range,
        }
    }
}

fn subsampled_factor(sf: u16, mul: i32, div: i32) -> Option<u16> {
    let scaled = u32::from(sf) * mul.unsigned_abs() / div.unsigned_abs().max(1);
    u16::try_from(scaled).ok()
}

fn ceil_div(num: i32, den: i32) -> i32 {
    -(-num).div_euclid(den)
}

/// Temporary buffer format for intermediate results headed for `preferred`.
fn tmp_format(preferred: PixelFormat) -> PixelFormat {
    if preferred.is_yuv() {
        PixelFormat::Ayuv8888
    } else if preferred.is_bgr() {
        PixelFormat::Abgr8888
    } else {
        PixelFormat::Argb8888
    }
}

/// Bytes a temporary buffer headed for `preferred_fmt` needs to hold `width` x `height` pixels.
pub fn tmp_buf_bytes(preferred_fmt: PixelFormat, width: i32, height: i32) -> u64 {
    let fmt = tmp_format(preferred_fmt);
    u64::from(fmt.byte_pitch(width.max(0).unsigned_abs())) * u64::from(height.max(0).unsigned_abs())
}

/// Size a temporary buffer of at most `max_size` bytes for a `width` x `height` area.
///
/// A buffer that does not fit is first narrowed to [`RESCALE_MAX_WIDTH`] and then cut to as
/// many lines as fit, rounded down to an even count when more than one line fits.
pub fn setup_tmp_buf(
    max_size: u32,
    preferred_fmt: PixelFormat,
    width: i32,
    height: i32,
) -> B2r2Result<NodeSplitBuffer> {
    if width <= 0 || height <= 0 {
        return Err(B2r2Error::invalid(format!(
            "temporary buffer of {width}x{height}"
        )));
    }
    let fmt = tmp_format(preferred_fmt);
    let mut width = width;
    let mut height = height;

    if tmp_buf_bytes(preferred_fmt, width, height) > u64::from(max_size) {
        width = width.min(RESCALE_MAX_WIDTH);
        let pitch = fmt.byte_pitch(width.unsigned_abs());
        let mut lines = i32::try_from(max_size / pitch.max(1)).unwrap_or(i32::MAX);
        if lines == 0 {
            tracing::warn!(max_size, pitch, "temporary buffer cannot hold a single line");
            return Err(B2r2Error::exhausted(format!(
                "{max_size} bytes cannot hold one {pitch}-byte line"
            )));
        }
        if lines > 1 {
            lines &= !1;
        }
        height = height.min(lines);
    }

    let mut tmp = NodeSplitBuffer::blank(fmt, Rect::default());
    tmp.configure_tmp_buf(1, Rect::new(0, 0, width, height));
    tracing::debug!(?fmt, width, height, pitch = tmp.pitch, "temporary buffer sized");
    Ok(tmp)
}

#[cfg(test)]
#[path = "../../tests/unit/split/buffer.rs"]
mod tests;

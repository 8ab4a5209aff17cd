//! Pixel format lookup table.
//!
//! Every property here is a pure function of the format tag; nothing is stateful.

/// Pixel formats accepted in blit requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 16-bit RGB 5:6:5.
    Rgb565,
    /// 16-bit BGR 5:6:5.
    Bgr565,
    /// 16-bit ARGB 4:4:4:4.
    Argb4444,
    /// 16-bit ARGB 1:5:5:5.
    Argb1555,
    /// 24-bit RGB.
    Rgb888,
    /// 24-bit ARGB 8:5:6:5.
    Argb8565,
    /// 32-bit ARGB.
    Argb8888,
    /// 32-bit ABGR.
    Abgr8888,
    /// 1-bit alpha mask.
    A1,
    /// 8-bit alpha mask.
    A8,
    /// Interleaved 4:2:2, `Y Cb Y Cr` byte order.
    YCbYCr,
    /// Interleaved 4:2:2, `Cb Y Cr Y` byte order.
    CbYCrY,
    /// 24-bit packed YUV.
    Yuv888,
    /// 32-bit packed AYUV.
    Ayuv8888,
    /// 24-bit packed VUY.
    Vuy888,
    /// 32-bit packed VUYA.
    Vuya8888,
    /// Three planes, chroma subsampled 2x2.
    Yuv420Planar,
    /// Three planes, chroma subsampled 2x1.
    Yuv422Planar,
    /// Three planes, no chroma subsampling.
    Yuv444Planar,
    /// Luma plane plus interleaved CbCr plane, subsampled 2x2.
    Yuv420SemiPlanar,
    /// Luma plane plus interleaved CbCr plane, subsampled 2x1.
    Yuv422SemiPlanar,
}

/// Memory layout class of a pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FmtType {
    /// Single interleaved plane.
    Raster,
    /// Luma plane followed by one interleaved chroma plane.
    SemiPlanar,
    /// Luma plane followed by separate Cb and Cr planes.
    Planar,
}

impl FmtType {
    /// Number of memory planes (and of destination nodes per tile when writing this layout).
    pub fn plane_count(self) -> u32 {
        match self {
            FmtType::Raster => 1,
            FmtType::SemiPlanar => 2,
            FmtType::Planar => 3,
        }
    }
}

/// Range the hardware uses to interpret an alpha channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AlphaRange {
    /// Alpha spans `0..=128`.
    Range128,
    /// Alpha spans `0..=255`.
    #[default]
    Range255,
}

/// Color format codes understood by the blit engine.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(u8)]
pub enum NativeFormat {
    /// RGB 5:6:5.
    #[default]
    Rgb565 = 0x00,
    /// RGB 8:8:8.
    Rgb888 = 0x01,
    /// ARGB 8:5:6:5.
    Argb8565 = 0x04,
    /// ARGB 8:8:8:8.
    Argb8888 = 0x05,
    /// ARGB 1:5:5:5.
    Argb1555 = 0x06,
    /// ARGB 4:4:4:4.
    Argb4444 = 0x07,
    /// YCbCr 4:2:x, luma plus one chroma buffer.
    Ycbcr42xR2b = 0x0d,
    /// YCbCr 8:8:8.
    Ycbcr888 = 0x10,
    /// YCbCr 4:2:2 raster.
    Ycbcr422R = 0x12,
    /// AYCbCr 8:8:8:8.
    Aycbcr8888 = 0x15,
    /// Interleaved CbCr chroma plane.
    Cbcr = 0x16,
    /// 1-bit alpha.
    A1 = 0x18,
    /// 8-bit alpha.
    A8 = 0x19,
    /// Single byte per pixel plane.
    Byte = 0x1d,
    /// YUV with separate chroma buffers.
    Yuv = 0x1e,
}

impl NativeFormat {
    /// Raw register value.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl PixelFormat {
    /// Every supported format, in declaration order.
    pub const ALL: [PixelFormat; 21] = [
        PixelFormat::Rgb565,
        PixelFormat::Bgr565,
        PixelFormat::Argb4444,
        PixelFormat::Argb1555,
        PixelFormat::Rgb888,
        PixelFormat::Argb8565,
        PixelFormat::Argb8888,
        PixelFormat::Abgr8888,
        PixelFormat::A1,
        PixelFormat::A8,
        PixelFormat::YCbYCr,
        PixelFormat::CbYCrY,
        PixelFormat::Yuv888,
        PixelFormat::Ayuv8888,
        PixelFormat::Vuy888,
        PixelFormat::Vuya8888,
        PixelFormat::Yuv420Planar,
        PixelFormat::Yuv422Planar,
        PixelFormat::Yuv444Planar,
        PixelFormat::Yuv420SemiPlanar,
        PixelFormat::Yuv422SemiPlanar,
    ];

    /// RGB-ordered formats, alpha-only formats included.
    pub fn is_rgb(self) -> bool {
        matches!(
            self,
            PixelFormat::Rgb565
                | PixelFormat::Argb4444
                | PixelFormat::Argb1555
                | PixelFormat::Rgb888
                | PixelFormat::Argb8565
                | PixelFormat::Argb8888
                | PixelFormat::A1
                | PixelFormat::A8
        )
    }

    /// BGR-ordered formats.
    pub fn is_bgr(self) -> bool {
        matches!(self, PixelFormat::Bgr565 | PixelFormat::Abgr8888)
    }

    /// YCbCr formats of any layout.
    pub fn is_yuv(self) -> bool {
        !self.is_rgb() && !self.is_bgr()
    }

    /// YUV formats with chroma subsampled in both directions.
    pub fn is_yuv420(self) -> bool {
        matches!(
            self,
            PixelFormat::Yuv420Planar | PixelFormat::Yuv420SemiPlanar
        )
    }

    /// YUV formats with chroma subsampled horizontally only.
    pub fn is_yuv422(self) -> bool {
        matches!(
            self,
            PixelFormat::Yuv422Planar
                | PixelFormat::Yuv422SemiPlanar
                | PixelFormat::YCbYCr
                | PixelFormat::CbYCrY
        )
    }

    /// Chroma subsampling divisors `(horizontal, vertical)`.
    pub fn chroma_subsampling(self) -> (i32, i32) {
        if self.is_yuv420() {
            (2, 2)
        } else if self.is_yuv422() {
            (2, 1)
        } else {
            (1, 1)
        }
    }

    /// Memory layout class.
    pub fn fmt_type(self) -> FmtType {
        match self {
            PixelFormat::Yuv420Planar | PixelFormat::Yuv422Planar | PixelFormat::Yuv444Planar => {
                FmtType::Planar
            }
            PixelFormat::Yuv420SemiPlanar | PixelFormat::Yuv422SemiPlanar => FmtType::SemiPlanar,
            _ => FmtType::Raster,
        }
    }

    /// `true` when the format carries an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::Argb4444
                | PixelFormat::Argb1555
                | PixelFormat::Argb8565
                | PixelFormat::Argb8888
                | PixelFormat::Abgr8888
                | PixelFormat::Ayuv8888
                | PixelFormat::Vuya8888
                | PixelFormat::A1
                | PixelFormat::A8
        )
    }

    /// Alpha interpretation range: 8-bit alpha channels use the full byte range.
    pub fn alpha_range(self) -> AlphaRange {
        match self {
            PixelFormat::Argb8565
            | PixelFormat::Argb8888
            | PixelFormat::Abgr8888
            | PixelFormat::Ayuv8888
            | PixelFormat::Vuya8888
            | PixelFormat::A8 => AlphaRange::Range255,
            _ => AlphaRange::Range128,
        }
    }

    /// Bits per pixel over all planes.
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::A1 => 1,
            PixelFormat::A8 => 8,
            PixelFormat::Yuv420Planar | PixelFormat::Yuv420SemiPlanar => 12,
            PixelFormat::Rgb565
            | PixelFormat::Bgr565
            | PixelFormat::Argb4444
            | PixelFormat::Argb1555
            | PixelFormat::YCbYCr
            | PixelFormat::CbYCrY
            | PixelFormat::Yuv422Planar
            | PixelFormat::Yuv422SemiPlanar => 16,
            PixelFormat::Rgb888
            | PixelFormat::Argb8565
            | PixelFormat::Yuv888
            | PixelFormat::Vuy888
            | PixelFormat::Yuv444Planar => 24,
            PixelFormat::Argb8888
            | PixelFormat::Abgr8888
            | PixelFormat::Ayuv8888
            | PixelFormat::Vuya8888 => 32,
        }
    }

    /// Bytes per pixel of the first plane; sub-byte formats round up to one.
    pub fn bytes_per_pixel(self) -> u32 {
        match self.fmt_type() {
            FmtType::Raster => self.bits_per_pixel().div_ceil(8),
            FmtType::SemiPlanar | FmtType::Planar => 1,
        }
    }

    /// Byte pitch of the first plane for a `width`-pixel line, saturating at `u32::MAX`.
    pub fn byte_pitch(self, width: u32) -> u32 {
        match self {
            PixelFormat::A1 => width.div_ceil(8),
            PixelFormat::YCbYCr | PixelFormat::CbYCrY => width.div_ceil(2).saturating_mul(4),
            _ => match self.fmt_type() {
                FmtType::Raster => {
                    let bits = u64::from(width) * u64::from(self.bits_per_pixel());
                    u32::try_from(bits / 8).unwrap_or(u32::MAX)
                }
                FmtType::SemiPlanar | FmtType::Planar => width,
            },
        }
    }

    /// Hardware color format code used when fetching or writing the whole surface.
    pub fn native(self) -> NativeFormat {
        match self {
            PixelFormat::Rgb565 | PixelFormat::Bgr565 => NativeFormat::Rgb565,
            PixelFormat::Argb4444 => NativeFormat::Argb4444,
            PixelFormat::Argb1555 => NativeFormat::Argb1555,
            PixelFormat::Rgb888 => NativeFormat::Rgb888,
            PixelFormat::Argb8565 => NativeFormat::Argb8565,
            PixelFormat::Argb8888 | PixelFormat::Abgr8888 => NativeFormat::Argb8888,
            PixelFormat::A1 => NativeFormat::A1,
            PixelFormat::A8 => NativeFormat::A8,
            PixelFormat::YCbYCr | PixelFormat::CbYCrY => NativeFormat::Ycbcr422R,
            PixelFormat::Yuv888 | PixelFormat::Vuy888 => NativeFormat::Ycbcr888,
            PixelFormat::Ayuv8888 | PixelFormat::Vuya8888 => NativeFormat::Aycbcr8888,
            PixelFormat::Yuv420SemiPlanar | PixelFormat::Yuv422SemiPlanar => {
                NativeFormat::Ycbcr42xR2b
            }
            PixelFormat::Yuv420Planar | PixelFormat::Yuv422Planar | PixelFormat::Yuv444Planar => {
                NativeFormat::Yuv
            }
        }
    }

    /// Alpha component of a color value in this format, widened to `0..=255`.
    pub fn get_alpha(self, color: u32) -> u8 {
        match self {
            PixelFormat::Argb8888 | PixelFormat::Abgr8888 | PixelFormat::Ayuv8888 => {
                (color >> 24) as u8
            }
            PixelFormat::Argb8565 => (color >> 16) as u8,
            PixelFormat::Argb4444 => (((color >> 12) & 0xf) * 0x11) as u8,
            PixelFormat::Argb1555 => {
                if color & 0x8000 != 0 {
                    0xff
                } else {
                    0
                }
            }
            PixelFormat::Vuya8888 | PixelFormat::A8 => color as u8,
            PixelFormat::A1 => {
                if color & 1 != 0 {
                    0xff
                } else {
                    0
                }
            }
            _ => 0xff,
        }
    }

    /// `color` with its alpha component replaced by `alpha` (`0..=255`, narrowed as needed).
    pub fn set_alpha(self, alpha: u8, color: u32) -> u32 {
        let a = u32::from(alpha);
        match self {
            PixelFormat::Argb8888 | PixelFormat::Abgr8888 | PixelFormat::Ayuv8888 => {
                (color & 0x00ff_ffff) | (a << 24)
            }
            PixelFormat::Argb8565 => (color & 0xff00_ffff) | (a << 16),
            PixelFormat::Argb4444 => (color & !0xf000) | ((a >> 4) << 12),
            PixelFormat::Argb1555 => (color & !0x8000) | ((a >> 7) << 15),
            PixelFormat::Vuya8888 | PixelFormat::A8 => (color & !0xff) | a,
            PixelFormat::A1 => (color & !1) | (a >> 7),
            _ => color,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/format/pixel.rs"]
mod tests;

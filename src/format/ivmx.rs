use crate::foundation::error::{B2r2Error, B2r2Result};
use crate::format::pixel::PixelFormat;

/// Color-space conversion matrix programmed into a node's iVMX registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Ivmx {
    /// RGB to YCbCr (BT.601, video range).
    RgbToYuv,
    /// YCbCr to RGB (BT.601, video range).
    YuvToRgb,
    /// Swap red and blue.
    RgbToBgr,
    /// Swap blue and red.
    BgrToRgb,
}

// Each set is four packed words: three rows of 10-bit coefficients plus the offset vector.
const RGB_TO_YUV: [u32; 4] = [0x2c44_0000, 0xe9a4_03aa, 0x0004_013a, 0x0000_0080];
const YUV_TO_RGB: [u32; 4] = [0x3324_a800, 0xe604_ab9c, 0x0004_a957, 0x32c0_8000];
const RGB_SWAP: [u32; 4] = [0x4000_0000, 0x0010_0000, 0x0000_0400, 0x0000_0000];

impl Ivmx {
    /// The four coefficient words of this matrix.
    pub fn coefficients(self) -> &'static [u32; 4] {
        match self {
            Ivmx::RgbToYuv => &RGB_TO_YUV,
            Ivmx::YuvToRgb => &YUV_TO_RGB,
            Ivmx::RgbToBgr | Ivmx::BgrToRgb => &RGB_SWAP,
        }
    }

    /// Matrix converting `src` pixels into `dst` pixels, `None` when both share a color family.
    ///
    /// Direct YCbCr/BGR conversion has no matrix and is rejected.
    pub fn select(src: PixelFormat, dst: PixelFormat) -> B2r2Result<Option<Ivmx>> {
        let ivmx = if src.is_rgb() {
            if dst.is_yuv() {
                Some(Ivmx::RgbToYuv)
            } else if dst.is_bgr() {
                Some(Ivmx::RgbToBgr)
            } else {
                None
            }
        } else if src.is_yuv() {
            if dst.is_rgb() {
                Some(Ivmx::YuvToRgb)
            } else if dst.is_bgr() {
                return Err(B2r2Error::unsupported(format!(
                    "no direct conversion from {src:?} to {dst:?}"
                )));
            } else {
                None
            }
        } else if dst.is_rgb() {
            Some(Ivmx::BgrToRgb)
        } else if dst.is_yuv() {
            return Err(B2r2Error::unsupported(format!(
                "no direct conversion from {src:?} to {dst:?}"
            )));
        } else {
            None
        };
        Ok(ivmx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/format/ivmx.rs"]
mod tests;

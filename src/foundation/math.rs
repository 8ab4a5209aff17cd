//! Fixed-point resampling arithmetic.
//!
//! Scale factors are unsigned 16-bit fixed point with 10 fractional bits: `1 << 10` is 1:1,
//! larger values shrink (more source pixels per destination pixel), smaller values enlarge.

use crate::foundation::error::{B2r2Error, B2r2Result};

/// Number of fractional bits in a scale factor.
pub const SF_FRAC_BITS: u32 = 10;

/// The 1:1 scale factor.
pub const SF_ONE: u16 = 1 << SF_FRAC_BITS;

const SF_FRAC_MASK: i64 = (1 << SF_FRAC_BITS) - 1;

/// Step size that maps a `from`-pixel extent onto a `to`-pixel extent.
///
/// The first and last destination pixels sample the first and last source pixels:
/// `((from << 10) - 1) / (to - 1)`.
pub fn calculate_scale_factor(from: u32, to: u32) -> B2r2Result<u16> {
    if from == to {
        return Ok(SF_ONE);
    }
    if to <= 1 {
        return Err(B2r2Error::invalid(format!(
            "cannot rescale {from} pixels onto {to}"
        )));
    }
    if from == 0 {
        return Err(B2r2Error::invalid("cannot rescale an empty extent"));
    }

    let sf = ((u64::from(from) << SF_FRAC_BITS) - 1) / (u64::from(to) - 1);
    if sf == 0 {
        return Err(B2r2Error::invalid(format!(
            "scale factor for {from} -> {to} underflows"
        )));
    }
    u16::try_from(sf).map_err(|_| {
        B2r2Error::invalid(format!("scale factor for {from} -> {to} overflows 16 bits"))
    })
}

/// Destination extent covered by `dim` source pixels under `sf`.
pub fn rescale(dim: i32, sf: u16) -> i32 {
    if dim <= 0 {
        return 0;
    }
    let sf = i64::from(sf.max(1));
    let out = ((i64::from(dim) << SF_FRAC_BITS) - 1) / sf + 1;
    clamp_i32(out)
}

/// Source extent needed for `dim` destination pixels under `sf`, rounded up.
pub fn inv_rescale(dim: i32, sf: u16) -> i32 {
    if dim <= 0 {
        return 0;
    }
    let out = (i64::from(dim) * i64::from(sf) + SF_FRAC_MASK) >> SF_FRAC_BITS;
    clamp_i32(out)
}

/// Source sampling span of a destination run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SampleSpan {
    /// Offset of the first sampled source pixel.
    pub(crate) start: i32,
    /// Number of source pixels touched by the run.
    pub(crate) len: i32,
    /// Fractional position of the first sample (10 bits).
    pub(crate) phase: u32,
}

/// Source pixels sampled by destination pixels `offset .. offset + len`.
///
/// Computed from the absolute offset so that consecutive tiles never accumulate rounding.
pub(crate) fn sample_span(offset: i32, len: i32, sf: u16) -> SampleSpan {
    let sf = i64::from(sf);
    let first = i64::from(offset) * sf;
    let last = (i64::from(offset) + i64::from(len.max(1)) - 1) * sf;
    let start = first >> SF_FRAC_BITS;
    SampleSpan {
        start: clamp_i32(start),
        len: clamp_i32((last >> SF_FRAC_BITS) - start + 1),
        phase: (first & SF_FRAC_MASK) as u32,
    }
}

pub(crate) fn div_ceil(num: i32, den: i32) -> i32 {
    if den <= 0 {
        return 0;
    }
    clamp_i32((i64::from(num) + i64::from(den) - 1).div_euclid(i64::from(den)))
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

//! Rescale filter coefficient tables.
//!
//! The tables are built once on first use and shared read-only for the life of the process.
//! Nodes only name the table they need ([`FilterKind`]); the caller uploads
//! [`FilterTables`] to device memory once at start-up.

use std::f64::consts::PI;
use std::sync::OnceLock;

/// Horizontal filter taps.
pub const H_TAPS: usize = 8;
/// Vertical filter taps.
pub const V_TAPS: usize = 5;
/// Sub-pixel phases per table.
pub const PHASES: usize = 16;
/// Every phase of every table sums to this value.
pub const COEFF_SUM: i32 = 64;

/// Coefficient set chosen by scale-factor range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FilterKind {
    /// Enlarging or 1:1.
    Upscale,
    /// Shrinking by up to 2x.
    Down2,
    /// Shrinking by up to 4x.
    Down4,
    /// Shrinking by more than 4x.
    DownMax,
}

impl FilterKind {
    /// All kinds in table order.
    pub const ALL: [FilterKind; 4] = [
        FilterKind::Upscale,
        FilterKind::Down2,
        FilterKind::Down4,
        FilterKind::DownMax,
    ];

    /// Table for a 10-bit fixed-point scale factor.
    pub fn for_scale_factor(sf: u32) -> Self {
        match sf {
            0..=1024 => FilterKind::Upscale,
            1025..=2048 => FilterKind::Down2,
            2049..=4096 => FilterKind::Down4,
            _ => FilterKind::DownMax,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn cutoff(self) -> f64 {
        match self {
            FilterKind::Upscale => 1.0,
            FilterKind::Down2 => 0.6,
            FilterKind::Down4 => 0.35,
            FilterKind::DownMax => 0.2,
        }
    }
}

/// Horizontal and vertical coefficient tables for every [`FilterKind`].
#[derive(Debug)]
pub struct FilterTables {
    h: [[[i8; H_TAPS]; PHASES]; 4],
    v: [[[i8; V_TAPS]; PHASES]; 4],
}

impl FilterTables {
    /// Horizontal coefficients, one row per phase.
    pub fn horizontal(&self, kind: FilterKind) -> &[[i8; H_TAPS]; PHASES] {
        &self.h[kind.index()]
    }

    /// Vertical coefficients, one row per phase.
    pub fn vertical(&self, kind: FilterKind) -> &[[i8; V_TAPS]; PHASES] {
        &self.v[kind.index()]
    }

    fn build() -> Self {
        let mut h = [[[0i8; H_TAPS]; PHASES]; 4];
        let mut v = [[[0i8; V_TAPS]; PHASES]; 4];
        for kind in FilterKind::ALL {
            for phase in 0..PHASES {
                h[kind.index()][phase] = phase_row::<H_TAPS>(kind.cutoff(), phase);
                v[kind.index()][phase] = phase_row::<V_TAPS>(kind.cutoff(), phase);
            }
        }
        tracing::debug!("rescale filter tables initialized");
        Self { h, v }
    }
}

static TABLES: OnceLock<FilterTables> = OnceLock::new();

/// Shared filter tables, built on first call.
pub fn tables() -> &'static FilterTables {
    TABLES.get_or_init(FilterTables::build)
}

/// Hann-windowed sinc taps for one phase, quantized so the row sums to [`COEFF_SUM`].
fn phase_row<const N: usize>(cutoff: f64, phase: usize) -> [i8; N] {
    let center = ((N - 1) / 2) as f64;
    let frac = phase as f64 / PHASES as f64;
    let half = N as f64 / 2.0;

    let mut weights = [0f64; N];
    for (i, w) in weights.iter_mut().enumerate() {
        let t = i as f64 - center - frac;
        let x = cutoff * t;
        let sinc = if x.abs() < 1e-9 {
            1.0
        } else {
            (PI * x).sin() / (PI * x)
        };
        let window = if t.abs() < half {
            0.5 * (1.0 + (PI * t / half).cos())
        } else {
            0.0
        };
        *w = cutoff * sinc * window;
    }

    let total: f64 = weights.iter().sum();
    let mut row = [0i8; N];
    let mut sum = 0i32;
    let mut peak = 0usize;
    for (i, w) in weights.iter().enumerate() {
        let q = (w / total * f64::from(COEFF_SUM)).round() as i32;
        row[i] = q as i8;
        sum += q;
        if weights[i] > weights[peak] {
            peak = i;
        }
    }
    row[peak] = (i32::from(row[peak]) + COEFF_SUM - sum) as i8;
    row
}

#[cfg(test)]
#[path = "../../tests/unit/format/filters.rs"]
mod tests;

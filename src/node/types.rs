//! Node descriptor model.
//!
//! A node is one instruction for the blit engine: up to three sources, one target and the
//! processing stages between them. Nodes are chained through `next` in the order the engine
//! executes them.

use crate::foundation::core::{Hso, Rect, Vso};
use crate::format::filters::FilterKind;
use crate::format::ivmx::Ivmx;
use crate::format::pixel::{AlphaRange, NativeFormat};

/// How the engine processes a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NodeMode {
    /// Not configured.
    #[default]
    Unused,
    /// Write a constant color straight into the target.
    DirectFill,
    /// Copy source 2 into the target without any processing stage.
    DirectCopy,
    /// Full pipeline: sources, rescale, rotation, color matrix, blend, clip.
    Blit,
}

/// Memory plane a surface slot addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Plane {
    /// The only plane of a raster surface.
    #[default]
    Full,
    /// Luma plane of a multi-plane surface.
    Luma,
    /// Interleaved CbCr plane of a semi-planar surface.
    Chroma,
    /// Cb plane of a planar surface.
    ChromaCb,
    /// Cr plane of a planar surface.
    ChromaCr,
}

impl Plane {
    /// `true` for any chroma plane.
    pub fn is_chroma(self) -> bool {
        matches!(self, Plane::Chroma | Plane::ChromaCb | Plane::ChromaCr)
    }
}

/// One source slot or the target of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceConfig {
    /// Physical address of the plane, `0` until a temporary buffer is bound.
    pub addr: u64,
    /// Cr plane address when a planar source is read through one chroma slot.
    pub cr_addr: u64,
    /// Hardware format code.
    pub native: NativeFormat,
    /// Line pitch in bytes.
    pub pitch: u32,
    /// Pixels read or written, in plane coordinates.
    pub window: Rect,
    /// Horizontal scan order.
    pub hso: Hso,
    /// Vertical scan order.
    pub vso: Vso,
    /// Which plane of the surface.
    pub plane: Plane,
    /// Constant color for synthetic fill sources.
    pub color: Option<u32>,
    /// Alpha interpretation range.
    pub alpha_range: AlphaRange,
}

/// Resampling stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RescaleConfig {
    /// Horizontal scale factor (10 fractional bits).
    pub h_sf: u16,
    /// Vertical scale factor (10 fractional bits).
    pub v_sf: u16,
    /// Horizontal start phase (10 fractional bits).
    pub h_phase: u32,
    /// Vertical start phase (10 fractional bits).
    pub v_phase: u32,
    /// Horizontal coefficient table.
    pub h_filter: FilterKind,
    /// Vertical coefficient table.
    pub v_filter: FilterKind,
}

impl RescaleConfig {
    /// Stage for the given factors and start phases, with matching filters.
    pub fn new(h_sf: u16, v_sf: u16, h_phase: u32, v_phase: u32) -> Self {
        Self {
            h_sf,
            v_sf,
            h_phase,
            v_phase,
            h_filter: FilterKind::for_scale_factor(u32::from(h_sf)),
            v_filter: FilterKind::for_scale_factor(u32::from(v_sf)),
        }
    }
}

/// Blend stage: source 2 over source 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlendConfig {
    /// Global alpha on the engine's `0..=128` scale.
    pub global_alpha: u8,
    /// Source colors are premultiplied by alpha.
    pub premultiplied: bool,
    /// Source per-pixel alpha participates.
    pub per_pixel: bool,
}

/// One engine instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Processing mode.
    pub mode: NodeMode,
    /// Source slots 1 (blend background), 2 (main source or luma) and 3 (chroma).
    pub sources: [Option<SurfaceConfig>; 3],
    /// Output surface.
    pub target: Option<SurfaceConfig>,
    /// Resampling stage.
    pub rescale: Option<RescaleConfig>,
    /// Quarter-turn rotation of the source block.
    pub rotate: bool,
    /// Color matrix.
    pub ivmx: Option<Ivmx>,
    /// Blend stage.
    pub blend: Option<BlendConfig>,
    /// Writes outside this rect are dropped.
    pub clip: Option<Rect>,
    /// Dither the output.
    pub dither: bool,
    /// Physical address of this node.
    pub phys_addr: u64,
    /// Index of the next node in the chain.
    pub next: Option<usize>,
    /// Physical address of the next node, `0` at the end of the chain.
    pub next_addr: u64,
    /// Temporary buffer (1-based) the target refers to, `0` when none.
    pub dst_tmp_index: u32,
    /// Temporary buffer (1-based) a source refers to, `0` when none.
    pub src_tmp_index: u32,
    /// Source slot (1-based) holding the temporary buffer.
    pub src_index: u32,
}

impl Node {
    /// Clear every configured field, keeping the chain links and the node address.
    pub fn reset(&mut self) {
        *self = Node {
            phys_addr: self.phys_addr,
            next: self.next,
            next_addr: self.next_addr,
            ..Node::default()
        };
    }

    /// `true` once the node carries an instruction.
    pub fn is_configured(&self) -> bool {
        self.mode != NodeMode::Unused
    }

    /// Source slot `index` (1-based).
    pub fn source_mut(&mut self, index: u32) -> Option<&mut SurfaceConfig> {
        let slot = usize::try_from(index).ok()?.checked_sub(1)?;
        self.sources.get_mut(slot)?.as_mut()
    }
}

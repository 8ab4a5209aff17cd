//! The derived state of one blit, shared by configure and buffer assignment.

use crate::blit::request::Transform;
use crate::foundation::core::Rect;
use crate::format::ivmx::Ivmx;
use crate::split::buffer::NodeSplitBuffer;

/// Operation classes, each with its own tiling and node layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OpKind {
    /// Constant color written without format conversion or blending.
    DirectFill,
    /// Same-format raster copy without processing.
    DirectCopy,
    /// Constant color through the full pipeline.
    Fill,
    /// Copy through the full pipeline, staged through a temporary buffer when large.
    Copy,
    /// Copy with mirrored scan order.
    Flip,
    /// Resampling, tiled horizontally or staged through a temporary buffer when large.
    Scale,
    /// Quarter-turn rotation in 16-pixel strips.
    Rotate,
    /// Resampling into a temporary buffer, then rotation into the destination.
    ScaleAndRotate,
}

/// A temporary buffer the caller must allocate before assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WorkBufRequest {
    /// Size in bytes.
    pub size: u32,
}

/// Everything analyze derived from a request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Plan {
    /// Operation class.
    pub kind: OpKind,
    /// Source surface.
    pub src: NodeSplitBuffer,
    /// Destination surface.
    pub dst: NodeSplitBuffer,
    /// Temporary buffers, slot `i` is referenced by index `i + 1`.
    pub tmp_bufs: Vec<NodeSplitBuffer>,
    /// Horizontal scale factor (10 fractional bits).
    pub h_sf: u16,
    /// Vertical scale factor (10 fractional bits).
    pub v_sf: u16,
    /// The horizontal axis changes size.
    pub h_rescale: bool,
    /// The vertical axis changes size.
    pub v_rescale: bool,
    /// Axes are swapped.
    pub rotate: bool,
    /// Requested orientation change.
    pub transform: Transform,
    /// Blend source over destination.
    pub blend: bool,
    /// Global alpha, `0..=255`.
    pub global_alpha: u8,
    /// Per-pixel source alpha participates in blending.
    pub per_pixel_alpha: bool,
    /// Source colors are premultiplied.
    pub src_premultiplied: bool,
    /// Destination clip, already intersected with the destination image.
    pub clip: Option<Rect>,
    /// Color matrix between source and destination.
    pub ivmx: Option<Ivmx>,
    /// Nodes configure will populate.
    pub node_count: u32,
    /// Temporary buffers to allocate.
    pub buf_count: u32,
    /// Sizes of the temporary buffers.
    pub work_bufs: Vec<WorkBufRequest>,
}

impl Plan {
    /// Temporary buffer slot `index` (1-based).
    pub fn tmp_buf(&self, index: u32) -> Option<&NodeSplitBuffer> {
        let slot = usize::try_from(index).ok()?.checked_sub(1)?;
        self.tmp_bufs.get(slot)
    }

    /// Drop the plan. It owns no node or buffer memory, so cancelling always succeeds.
    pub fn cancel(self) {
        tracing::debug!(kind = ?self.kind, nodes = self.node_count, "plan cancelled");
    }
}

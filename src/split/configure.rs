//! Node emission: replays the tiling counted by analyze and fills in the nodes.

use crate::foundation::core::{Hso, Rect, Vso};
use crate::foundation::error::{B2r2Error, B2r2Result};
use crate::foundation::math::{SF_ONE, sample_span};
use crate::format::ivmx::Ivmx;
use crate::format::pixel::FmtType;
use crate::node::list::{NodeCursor, NodeList};
use crate::node::types::{BlendConfig, Node, NodeMode, Plane, RescaleConfig};
use crate::split::buffer::NodeSplitBuffer;
use crate::split::plan::{OpKind, Plan};
use crate::split::tile::{TileWalker, place, place_rotated, rotation_strips};

/// Global alpha at which the engine blends fully opaque.
const ENGINE_ALPHA_MAX: u32 = 128;

/// One pass from a source surface into a target surface.
struct Stage<'a> {
    src: &'a NodeSplitBuffer,
    dst: &'a NodeSplitBuffer,
    rescale: Option<(u16, u16)>,
    rotate: bool,
    ivmx: Option<Ivmx>,
    /// Writes the final destination: blend, clip and dither apply.
    last: bool,
}

/// Populate `nodes` for `plan`, returning the number of nodes used.
///
/// The list must hold at least `plan.node_count` nodes. The chain is terminated after the
/// last used node.
#[tracing::instrument(skip(plan, nodes), fields(kind = ?plan.kind, expected = plan.node_count))]
pub fn configure(plan: &Plan, nodes: &mut NodeList) -> B2r2Result<usize> {
    nodes.reset();
    let mut cursor = nodes.cursor();
    let checked = emit(plan, &mut cursor).and_then(|()| {
        if u64::try_from(cursor.used()).ok() == Some(u64::from(plan.node_count)) {
            Ok(())
        } else {
            Err(B2r2Error::internal(format!(
                "configured {} nodes, analyze counted {}",
                cursor.used(),
                plan.node_count
            )))
        }
    });
    if let Err(err) = checked {
        tracing::error!(
            error = %err,
            used = cursor.used(),
            capacity = cursor.list().len(),
            "node configuration failed\n{}",
            cursor.list().dump()
        );
        return Err(err);
    }
    Ok(cursor.finish())
}

fn emit(plan: &Plan, cursor: &mut NodeCursor<'_>) -> B2r2Result<()> {
    match plan.kind {
        OpKind::DirectFill => emit_direct(plan, cursor, NodeMode::DirectFill),
        OpKind::DirectCopy => emit_direct(plan, cursor, NodeMode::DirectCopy),
        OpKind::Copy | OpKind::Scale if plan.tmp_buf(1).is_some() => emit_staged(plan, cursor),
        OpKind::Fill | OpKind::Copy | OpKind::Flip => {
            let stage = Stage {
                src: &plan.src,
                dst: &plan.dst,
                rescale: None,
                rotate: false,
                ivmx: plan.ivmx,
                last: true,
            };
            emit_stage(plan, cursor, &stage, plan.src.rect, (0, 0), plan.dst.rect)
        }
        OpKind::Scale => emit_scale(plan, cursor),
        OpKind::Rotate => emit_rotate(plan, cursor),
        OpKind::ScaleAndRotate => emit_scale_rotate(plan, cursor),
    }
}

fn emit_direct(plan: &Plan, cursor: &mut NodeCursor<'_>, mode: NodeMode) -> B2r2Result<()> {
    let node = cursor.next_node()?;
    node.mode = mode;
    node.target = Some(plan.dst.surface(
        Plane::Full,
        plan.dst.rect,
        Hso::LeftToRight,
        Vso::TopToBottom,
    ));
    node.sources[1] = Some(plan.src.surface(
        Plane::Full,
        plan.src.rect,
        Hso::LeftToRight,
        Vso::TopToBottom,
    ));
    Ok(())
}

fn emit_scale(plan: &Plan, cursor: &mut NodeCursor<'_>) -> B2r2Result<()> {
    let (src, dst) = (&plan.src, &plan.dst);
    let stage = Stage {
        src,
        dst,
        rescale: Some((plan.h_sf, plan.v_sf)),
        rotate: false,
        ivmx: plan.ivmx,
        last: true,
    };
    let tile_w = dst.window.width;
    for tile in TileWalker::new(dst.rect.width, dst.rect.height, tile_w, dst.rect.height) {
        let (src_win, phase) = sample_window(plan, src, tile);
        emit_stage(plan, cursor, &stage, src_win, phase, place(dst, tile))?;
    }
    Ok(())
}

/// Copy or scale through the temporary buffer, one buffer-sized destination tile at a time.
fn emit_staged(plan: &Plan, cursor: &mut NodeCursor<'_>) -> B2r2Result<()> {
    let (src, dst) = (&plan.src, &plan.dst);
    let tmp = plan
        .tmp_buf(1)
        .ok_or_else(|| B2r2Error::internal("staged blit without a temporary buffer"))?;

    let fetch = Stage {
        src,
        dst: tmp,
        rescale: (plan.kind == OpKind::Scale).then_some((plan.h_sf, plan.v_sf)),
        rotate: false,
        ivmx: Ivmx::select(src.fmt, tmp.fmt)?,
        last: false,
    };
    let write = Stage {
        src: tmp,
        dst,
        // Subsampled chroma planes are still resampled from the full-resolution buffer.
        rescale: dst.is_multi_plane().then_some((SF_ONE, SF_ONE)),
        rotate: false,
        ivmx: Ivmx::select(tmp.fmt, dst.fmt)?,
        last: true,
    };

    let walker = TileWalker::new(
        dst.rect.width,
        dst.rect.height,
        tmp.window.width,
        tmp.window.height,
    );
    for tile in walker {
        let (src_win, phase) = sample_window(plan, src, tile);
        let tmp_win = Rect::new(0, 0, tile.width, tile.height);
        emit_stage(plan, cursor, &fetch, src_win, phase, tmp_win)?;
        emit_stage(plan, cursor, &write, tmp_win, (0, 0), place(dst, tile))?;
    }
    Ok(())
}

fn emit_rotate(plan: &Plan, cursor: &mut NodeCursor<'_>) -> B2r2Result<()> {
    let (src, dst) = (&plan.src, &plan.dst);
    let stage = Stage {
        src,
        dst,
        rescale: None,
        rotate: true,
        ivmx: plan.ivmx,
        last: true,
    };
    let walker = TileWalker::new(
        src.rect.width,
        src.rect.height,
        src.window.width,
        src.rect.height,
    );
    for tile in walker {
        for strip in rotation_strips(tile.width, tile.height) {
            let block = Rect::new(
                tile.x + strip.x,
                tile.y + strip.y,
                strip.width,
                strip.height,
            );
            let src_win = Rect::new(
                src.rect.x + block.x,
                src.rect.y + block.y,
                block.width,
                block.height,
            );
            emit_stage(plan, cursor, &stage, src_win, (0, 0), place_rotated(dst, block))?;
        }
    }
    Ok(())
}

fn emit_scale_rotate(plan: &Plan, cursor: &mut NodeCursor<'_>) -> B2r2Result<()> {
    let (src, dst) = (&plan.src, &plan.dst);
    let tmp = plan
        .tmp_buf(1)
        .ok_or_else(|| B2r2Error::internal("scale and rotate without a temporary buffer"))?;

    let scale = Stage {
        src,
        dst: tmp,
        rescale: Some((plan.h_sf, plan.v_sf)),
        rotate: false,
        ivmx: Ivmx::select(src.fmt, tmp.fmt)?,
        last: false,
    };
    let rotate = Stage {
        src: tmp,
        dst,
        rescale: None,
        rotate: true,
        ivmx: Ivmx::select(tmp.fmt, dst.fmt)?,
        last: true,
    };

    // Walk the scaled, not yet rotated image one temporary buffer at a time.
    let walker = TileWalker::new(
        dst.rect.height,
        dst.rect.width,
        tmp.window.width,
        tmp.window.height,
    );
    for tile in walker {
        let (src_win, phase) = sample_window(plan, src, tile);
        let tmp_win = Rect::new(0, 0, tile.width, tile.height);
        emit_stage(plan, cursor, &scale, src_win, phase, tmp_win)?;

        for strip in rotation_strips(tile.width, tile.height) {
            let block = Rect::new(
                tile.x + strip.x,
                tile.y + strip.y,
                strip.width,
                strip.height,
            );
            emit_stage(plan, cursor, &rotate, strip, (0, 0), place_rotated(dst, block))?;
        }
    }
    Ok(())
}

/// Source window and start phases sampled by scaled-space `tile`.
///
/// Derived from the tile's absolute offset so remainder tiles never accumulate rounding.
fn sample_window(plan: &Plan, src: &NodeSplitBuffer, tile: Rect) -> (Rect, (u32, u32)) {
    let h = sample_span(tile.x, tile.width, plan.h_sf);
    let v = sample_span(tile.y, tile.height, plan.v_sf);
    let win = Rect::new(
        src.rect.x + h.start,
        src.rect.y + v.start,
        h.len.min(src.rect.width - h.start),
        v.len.min(src.rect.height - v.start),
    );
    (win, (h.phase, v.phase))
}

/// One node per target plane for the block `src_win` -> `dst_win`.
fn emit_stage(
    plan: &Plan,
    cursor: &mut NodeCursor<'_>,
    stage: &Stage<'_>,
    src_win: Rect,
    phase: (u32, u32),
    dst_win: Rect,
) -> B2r2Result<()> {
    let dst = stage.dst;
    for plane in dst.planes() {
        let node = cursor.next_node()?;
        node.mode = NodeMode::Blit;
        node.target = Some(dst.surface(plane, dst_win, dst.hso, dst.vso));
        node.dst_tmp_index = dst.tmp_buf_index;
        set_source(node, stage.src, src_win);
        node.rotate = stage.rotate;
        node.ivmx = stage.ivmx;

        if let Some((h_sf, v_sf)) = stage.rescale {
            let (h_sf, v_sf) = plane_factors(stage, plane, h_sf, v_sf)?;
            node.rescale = Some(RescaleConfig::new(h_sf, v_sf, phase.0, phase.1));
        }

        if stage.last {
            if plan.blend {
                node.sources[0] = Some(dst.surface(plane, dst_win, dst.hso, dst.vso));
                node.blend = Some(BlendConfig {
                    global_alpha: engine_alpha(plan.global_alpha),
                    premultiplied: plan.src_premultiplied,
                    per_pixel: plan.per_pixel_alpha,
                });
            }
            node.clip = plan.clip.map(|c| dst.plane_window(c, plane));
            node.dither = dst.dither;
        }
    }
    Ok(())
}

fn set_source(node: &mut Node, src: &NodeSplitBuffer, win: Rect) {
    let (hso, vso) = (Hso::LeftToRight, Vso::TopToBottom);
    match src.fmt_type {
        FmtType::Raster => {
            node.sources[1] = Some(src.surface(Plane::Full, win, hso, vso));
        }
        FmtType::SemiPlanar => {
            node.sources[1] = Some(src.surface(Plane::Luma, win, hso, vso));
            node.sources[2] = Some(src.surface(Plane::Chroma, win, hso, vso));
        }
        FmtType::Planar => {
            node.sources[1] = Some(src.surface(Plane::Luma, win, hso, vso));
            node.sources[2] = Some(src.surface(Plane::ChromaCb, win, hso, vso));
        }
    }
    if src.tmp_buf_index != 0 {
        node.src_tmp_index = src.tmp_buf_index;
        node.src_index = 2;
    }
}

/// Scale factors seen by a node writing `plane`.
fn plane_factors(stage: &Stage<'_>, plane: Plane, h_sf: u16, v_sf: u16) -> B2r2Result<(u16, u16)> {
    if !plane.is_chroma() {
        return Ok((h_sf, v_sf));
    }
    stage
        .dst
        .chroma_scale_factors(stage.src, h_sf, v_sf)
        .ok_or_else(|| {
            B2r2Error::internal(format!(
                "chroma scale factor of {h_sf}x{v_sf} does not fit in 16 bits"
            ))
        })
}

fn engine_alpha(alpha: u8) -> u8 {
    (u32::from(alpha) * ENGINE_ALPHA_MAX / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/split/configure.rs"]
mod tests;

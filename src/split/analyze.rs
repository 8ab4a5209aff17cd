//! Request classification and node/buffer counting.

use crate::blit::request::{BlitImage, BlitRequest, Transform};
use crate::foundation::core::{Hso, Rect, Vso};
use crate::foundation::error::{B2r2Error, B2r2Result};
use crate::foundation::math::{SF_ONE, calculate_scale_factor, div_ceil, inv_rescale, rescale};
use crate::format::ivmx::Ivmx;
use crate::format::pixel::{FmtType, PixelFormat};
use crate::split::buffer::{
    NodeSplitBuffer, RESCALE_MAX_WIDTH, ROTATE_MAX_WIDTH, setup_tmp_buf, tmp_buf_bytes,
};
use crate::split::plan::{OpKind, Plan, WorkBufRequest};
use crate::split::tile::{TileWalker, place, place_rotated, rot_count};

/// Temporary buffer budget used when the caller has no specific limit.
pub const DEFAULT_MAX_BUF_SIZE: u32 = 32 * 1024;

/// Classify `req` and count the nodes and temporary buffers it needs.
///
/// Allocates no node or buffer memory; the returned [`Plan`] lists what the caller must provide.
#[tracing::instrument(
    skip(req),
    fields(src = ?req.src_img.fmt, dst = ?req.dst_img.fmt, transform = ?req.transform)
)]
pub fn analyze(req: &BlitRequest, max_buf_size: u32) -> B2r2Result<Plan> {
    let plan = analyze_request(req, max_buf_size)
        .inspect_err(|e| tracing::warn!(error = %e, "blit request rejected"))?;
    tracing::debug!(
        kind = ?plan.kind,
        nodes = plan.node_count,
        bufs = plan.buf_count,
        "request analyzed"
    );
    Ok(plan)
}

fn analyze_request(req: &BlitRequest, max_buf_size: u32) -> B2r2Result<Plan> {
    let clip = validate(req)?;

    if req.flags.is_fill() {
        return analyze_fill(req, clip);
    }

    let multi_plane = req.src_img.fmt.fmt_type() != FmtType::Raster
        || req.dst_img.fmt.fmt_type() != FmtType::Raster;
    let same_size = req.src_rect.width == req.dst_rect.width
        && req.src_rect.height == req.dst_rect.height;
    if req.transform != Transform::None || !same_size || multi_plane {
        return analyze_transform(req, clip, max_buf_size);
    }
    analyze_copy(req, clip, max_buf_size)
}

/// Bounds checks; returns the visible part of the destination when clipping.
fn validate(req: &BlitRequest) -> B2r2Result<Option<Rect>> {
    let is_fill = req.flags.is_fill();

    check_image(&req.dst_img, "destination")?;
    req.dst_rect.require_positive("destination rect")?;
    if !is_fill {
        check_image(&req.src_img, "source")?;
        req.src_rect.require_positive("source rect")?;
    }

    let clip = req
        .flags
        .destination_clip
        .then(|| req.dst_rect.intersect(req.clip_rect));
    let visible = clip.unwrap_or(req.dst_rect);
    if visible.is_empty() {
        return Err(B2r2Error::invalid("destination rect is clipped away"));
    }
    if !visible.fits_in(req.dst_img.width, req.dst_img.height) {
        return Err(B2r2Error::invalid(format!(
            "destination rect {visible:?} outside {}x{} image",
            req.dst_img.width, req.dst_img.height
        )));
    }
    if !is_fill && !req.src_rect.fits_in(req.src_img.width, req.src_img.height) {
        return Err(B2r2Error::invalid(format!(
            "source rect {:?} outside {}x{} image",
            req.src_rect, req.src_img.width, req.src_img.height
        )));
    }
    Ok(clip)
}

fn check_image(img: &BlitImage, what: &str) -> B2r2Result<()> {
    if img.width == 0 || img.height == 0 {
        return Err(B2r2Error::invalid(format!(
            "{what} image has size {}x{}",
            img.width, img.height
        )));
    }
    let min_pitch = img.fmt.byte_pitch(img.width);
    if img.pitch != 0 && img.pitch < min_pitch {
        return Err(B2r2Error::invalid(format!(
            "{what} pitch {} below {min_pitch} bytes",
            img.pitch
        )));
    }
    Ok(())
}

/// `true` when clipping leaves the whole destination rect writable.
fn unclipped(clip: Option<Rect>, dst_rect: Rect) -> bool {
    clip.is_none_or(|c| c == dst_rect)
}

fn base_plan(
    req: &BlitRequest,
    kind: OpKind,
    src: NodeSplitBuffer,
    dst: NodeSplitBuffer,
    clip: Option<Rect>,
) -> Plan {
    Plan {
        kind,
        src,
        dst,
        tmp_bufs: Vec::new(),
        h_sf: SF_ONE,
        v_sf: SF_ONE,
        h_rescale: false,
        v_rescale: false,
        rotate: false,
        transform: req.transform,
        blend: req.flags.is_blend(),
        global_alpha: if req.flags.global_alpha_blend {
            req.global_alpha
        } else {
            u8::MAX
        },
        per_pixel_alpha: req.flags.per_pixel_alpha_blend,
        src_premultiplied: !req.flags.src_is_not_premult,
        clip,
        ivmx: None,
        node_count: 0,
        buf_count: 0,
        work_bufs: Vec::new(),
    }
}

fn dst_buffer(req: &BlitRequest) -> NodeSplitBuffer {
    let mut dst =
        NodeSplitBuffer::set_buf(req.dst_img.fmt, req.dst_rect, false, 0, &req.dst_img);
    dst.dither = req.flags.dither;
    dst
}

fn node_count(parts: &[u64]) -> B2r2Result<u32> {
    let total: u64 = parts.iter().sum();
    u32::try_from(total).map_err(|_| B2r2Error::invalid(format!("{total} nodes required")))
}

fn analyze_fill(req: &BlitRequest, clip: Option<Rect>) -> B2r2Result<Plan> {
    let dst_fmt = req.dst_img.fmt;
    let raw = req.flags.source_fill_raw;
    if raw && dst_fmt.fmt_type() != FmtType::Raster {
        return Err(B2r2Error::invalid(format!(
            "raw fill into non-raster {dst_fmt:?}"
        )));
    }

    let direct = !req.flags.is_blend()
        && unclipped(clip, req.dst_rect)
        && (raw
            || matches!(
                dst_fmt,
                PixelFormat::Argb8888 | PixelFormat::Abgr8888 | PixelFormat::Ayuv8888
            ));
    let src_fmt = if raw {
        dst_fmt
    } else if dst_fmt.is_yuv() {
        PixelFormat::Ayuv8888
    } else if dst_fmt.is_bgr() {
        PixelFormat::Abgr8888
    } else {
        PixelFormat::Argb8888
    };

    let dst = dst_buffer(req);
    let kind = if direct { OpKind::DirectFill } else { OpKind::Fill };
    let mut plan = base_plan(req, kind, dst, dst, clip);

    let mut color = req.src_color;
    if !raw && req.flags.per_pixel_alpha_blend {
        // Fold the color's own alpha into the global alpha so it is applied once.
        let pixel_alpha = u32::from(src_fmt.get_alpha(color));
        plan.global_alpha = (pixel_alpha * u32::from(plan.global_alpha) / 255) as u8;
        color = src_fmt.set_alpha(u8::MAX, color);
    }
    plan.src = NodeSplitBuffer::set_buf(src_fmt, req.dst_rect, true, color, &req.dst_img);
    plan.ivmx = Ivmx::select(src_fmt, dst_fmt)?;
    plan.node_count = if direct { 1 } else { plan.dst.plane_count() };
    Ok(plan)
}

fn analyze_copy(req: &BlitRequest, clip: Option<Rect>, max_buf_size: u32) -> B2r2Result<Plan> {
    let src = NodeSplitBuffer::set_buf(req.src_img.fmt, req.src_rect, false, 0, &req.src_img);
    let dst = dst_buffer(req);
    let direct = src.fmt == dst.fmt
        && dst.fmt_type == FmtType::Raster
        && !req.flags.is_blend()
        && unclipped(clip, req.dst_rect);

    let kind = if direct { OpKind::DirectCopy } else { OpKind::Copy };
    let mut plan = base_plan(req, kind, src, dst, clip);
    plan.ivmx = Ivmx::select(src.fmt, dst.fmt)?;
    if direct {
        plan.node_count = 1;
        return Ok(plan);
    }

    let (w, h) = (dst.rect.width, dst.rect.height);
    if tmp_buf_bytes(dst.fmt, w, h) <= u64::from(max_buf_size) {
        plan.node_count = dst.plane_count();
        return Ok(plan);
    }
    let tmp = setup_tmp_buf(max_buf_size, dst.fmt, w, h)?;
    let (tmp_w, tmp_h) = (tmp.window.width, tmp.window.height);
    plan.src.window = Rect::new(src.rect.x, src.rect.y, tmp_w, tmp_h);
    plan.src.dx = tmp_w;
    plan.src.dy = tmp_h;
    plan.dst.window = place(&plan.dst, Rect::new(0, 0, tmp_w, tmp_h));
    plan.dst.dx = tmp_w;
    plan.dst.dy = tmp_h;
    let nodes = staged_nodes(&plan.dst, &tmp);
    tracing::debug!(tmp_w, tmp_h, nodes, "copy through temporary buffer");
    plan.node_count = node_count(&[nodes])?;
    attach_tmp_buf(&mut plan, tmp);
    Ok(plan)
}

/// Nodes of a blit staged through `tmp`: every buffer-sized destination tile is fetched into
/// the buffer and then written out plane by plane.
fn staged_nodes(dst: &NodeSplitBuffer, tmp: &NodeSplitBuffer) -> u64 {
    let walker = TileWalker::new(
        dst.rect.width,
        dst.rect.height,
        tmp.window.width,
        tmp.window.height,
    );
    let tiles = u64::from(walker.cols().unsigned_abs()) * u64::from(walker.rows().unsigned_abs());
    tiles * u64::from(tmp.plane_count() + dst.plane_count())
}

fn attach_tmp_buf(plan: &mut Plan, tmp: NodeSplitBuffer) {
    plan.work_bufs.push(WorkBufRequest {
        size: tmp.pitch.saturating_mul(tmp.height),
    });
    plan.tmp_bufs.push(tmp);
    plan.buf_count = u32::try_from(plan.tmp_bufs.len()).unwrap_or(u32::MAX);
}

fn analyze_transform(
    req: &BlitRequest,
    clip: Option<Rect>,
    max_buf_size: u32,
) -> B2r2Result<Plan> {
    let transform = req.transform;
    let rotate = transform.rotates();
    let mut src = NodeSplitBuffer::set_buf(req.src_img.fmt, req.src_rect, false, 0, &req.src_img);
    let mut dst = dst_buffer(req);

    // Extents in source orientation: a quarter turn maps source x onto destination y.
    let (sw, sh) = (src.rect.width, src.rect.height);
    let (dw, dh) = if rotate {
        (dst.rect.height, dst.rect.width)
    } else {
        (dst.rect.width, dst.rect.height)
    };
    let is_scaling = sw != dw || sh != dh || src.is_multi_plane() || dst.is_multi_plane();
    let blend = req.flags.is_blend();
    if is_scaling && rotate && blend {
        return Err(B2r2Error::unsupported(
            "scaling, rotating and blending in one blit",
        ));
    }
    let ivmx = Ivmx::select(src.fmt, dst.fmt)?;

    let h_sf = calculate_scale_factor(sw.unsigned_abs(), dw.unsigned_abs())?;
    let v_sf = calculate_scale_factor(sh.unsigned_abs(), dh.unsigned_abs())?;

    if rotate {
        dst.hso = if transform.flip_v() {
            Hso::RightToLeft
        } else {
            Hso::LeftToRight
        };
        dst.vso = if transform.flip_h() {
            Vso::TopToBottom
        } else {
            Vso::BottomToTop
        };
    } else {
        dst.hso = if transform.flip_h() {
            Hso::RightToLeft
        } else {
            Hso::LeftToRight
        };
        dst.vso = if transform.flip_v() {
            Vso::BottomToTop
        } else {
            Vso::TopToBottom
        };
    }

    let kind = match (is_scaling, rotate) {
        (true, true) => OpKind::ScaleAndRotate,
        (true, false) => OpKind::Scale,
        (false, true) => OpKind::Rotate,
        (false, false) => OpKind::Flip,
    };
    tracing::debug!(?kind, h_sf, v_sf, "transform classified");

    let planes = u64::from(dst.plane_count());
    let mut staging = None;
    let nodes = match kind {
        OpKind::Flip => node_count(&[planes])?,
        OpKind::Scale if tmp_buf_bytes(dst.fmt, dw, dh) > u64::from(max_buf_size) => {
            let src_win_w = scale_window_width(sw);
            let tmp = setup_tmp_buf(max_buf_size, dst.fmt, rescale(src_win_w, h_sf).min(dw), dh)?;
            let (tmp_w, tmp_h) = (tmp.window.width, tmp.window.height);
            src.window = Rect::new(
                src.rect.x,
                src.rect.y,
                inv_rescale(tmp_w, h_sf).min(sw),
                inv_rescale(tmp_h, v_sf).min(sh),
            );
            dst.window = place(&dst, Rect::new(0, 0, tmp_w, tmp_h));
            let nodes = staged_nodes(&dst, &tmp);
            tracing::debug!(tmp_w, tmp_h, nodes, "scale through temporary buffer");
            staging = Some(tmp);
            node_count(&[nodes])?
        }
        OpKind::Scale => {
            if dst.is_multi_plane() && dst.chroma_scale_factors(&src, h_sf, v_sf).is_none() {
                return Err(B2r2Error::invalid(format!(
                    "chroma scale factor of {h_sf}x{v_sf} into {:?} does not fit in 16 bits",
                    dst.fmt
                )));
            }
            let src_win_w = scale_window_width(sw);
            let dst_win_w = rescale(src_win_w, h_sf).min(dw);
            src.window = Rect::new(src.rect.x, src.rect.y, src_win_w, sh);
            dst.window = place(&dst, Rect::new(0, 0, dst_win_w, dh));
            let cols = u64::from(div_ceil(dw, dst_win_w).unsigned_abs());
            tracing::debug!(src_win_w, dst_win_w, cols, "scale tiling");
            node_count(&[planes * cols])?
        }
        OpKind::Rotate => {
            let src_win_w = sw.min(ROTATE_MAX_WIDTH);
            src.window = Rect::new(src.rect.x, src.rect.y, src_win_w, sh);
            dst.window = place_rotated(&dst, Rect::new(0, 0, src_win_w, sh));
            let cols = u64::from(div_ceil(sw, src_win_w).unsigned_abs());
            let strips = u64::from(rot_count(src_win_w, sh));
            tracing::debug!(src_win_w, cols, strips, "rotate tiling");
            node_count(&[planes * strips * cols])?
        }
        OpKind::ScaleAndRotate => {
            let src_win_w = scale_window_width(sw);
            let tmp = setup_tmp_buf(
                max_buf_size,
                dst.fmt,
                rescale(src_win_w, h_sf).min(dw),
                dh,
            )?;
            let (tmp_w, tmp_h) = (tmp.window.width, tmp.window.height);
            src.window = Rect::new(
                src.rect.x,
                src.rect.y,
                inv_rescale(tmp_w, h_sf).min(sw),
                inv_rescale(tmp_h, v_sf).min(sh),
            );
            dst.window = place_rotated(&dst, Rect::new(0, 0, tmp_w, tmp_h));

            // Destination tiles are the rotated temporary buffer; edge tiles rotate a
            // narrower or shorter block and may need a different number of strips.
            let (win_w, win_h) = (tmp_h, tmp_w);
            let cols = div_ceil(dst.rect.width, win_w);
            let rows = div_ceil(dst.rect.height, win_h);
            let right_w = dst.rect.width - (cols - 1) * win_w;
            let bottom_h = dst.rect.height - (rows - 1) * win_h;
            let inner_cols = u64::from((cols - 1).unsigned_abs());
            let inner_rows = u64::from((rows - 1).unsigned_abs());

            let rot_nodes = u64::from(rot_count(win_h, win_w)) * inner_cols * inner_rows
                + u64::from(rot_count(win_h, right_w)) * inner_rows
                + u64::from(rot_count(bottom_h, win_w)) * inner_cols
                + u64::from(rot_count(bottom_h, right_w));
            let rescale_nodes = u64::from(cols.unsigned_abs()) * u64::from(rows.unsigned_abs());
            tracing::debug!(tmp_w, tmp_h, cols, rows, rot_nodes, "scale and rotate tiling");

            staging = Some(tmp);
            node_count(&[rescale_nodes, rot_nodes * planes])?
        }
        OpKind::DirectFill | OpKind::DirectCopy | OpKind::Fill | OpKind::Copy => {
            return Err(B2r2Error::internal(format!(
                "{kind:?} reached transform analysis"
            )));
        }
    };

    src.dx = src.window.width;
    src.dy = src.window.height;
    dst.dx = dst.hso.signed(dst.window.width);
    dst.dy = dst.vso.signed(dst.window.height);

    let mut plan = base_plan(req, kind, src, dst, clip);
    plan.h_sf = h_sf;
    plan.v_sf = v_sf;
    plan.h_rescale = h_sf != SF_ONE;
    plan.v_rescale = v_sf != SF_ONE;
    plan.rotate = rotate;
    plan.ivmx = ivmx;
    plan.node_count = nodes;
    if let Some(tmp) = staging {
        attach_tmp_buf(&mut plan, tmp);
    }
    Ok(plan)
}

/// Source columns resampled per node; wide sources use one column less than the maximum so
/// that a tile's sample span, which may start mid-pixel, never exceeds it.
fn scale_window_width(src_width: i32) -> i32 {
    if src_width > RESCALE_MAX_WIDTH {
        RESCALE_MAX_WIDTH - 1
    } else {
        src_width
    }
}

#[cfg(test)]
#[path = "../../tests/unit/split/analyze.rs"]
mod tests;

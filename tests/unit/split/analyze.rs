use super::*;

fn image(fmt: PixelFormat, width: u32, height: u32) -> BlitImage {
    BlitImage::new(fmt, 0x100_0000, width, height)
}

fn copy(
    src_fmt: PixelFormat,
    (sw, sh): (i32, i32),
    dst_fmt: PixelFormat,
    (dw, dh): (i32, i32),
) -> BlitRequest {
    BlitRequest::copy(
        image(src_fmt, sw as u32, sh as u32),
        Rect::new(0, 0, sw, sh),
        image(dst_fmt, dw as u32, dh as u32),
        Rect::new(0, 0, dw, dh),
    )
}

#[test]
fn same_format_copy_is_direct() {
    let req = copy(PixelFormat::Rgb565, (100, 100), PixelFormat::Rgb565, (100, 100));
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::DirectCopy);
    assert_eq!(plan.node_count, 1);
    assert_eq!(plan.buf_count, 0);
    assert!(plan.work_bufs.is_empty());
}

#[test]
fn format_conversion_copy_uses_the_pipeline() {
    let req = copy(PixelFormat::Argb8888, (32, 32), PixelFormat::Rgb565, (32, 32));
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::Copy);
    assert_eq!(plan.node_count, 1);
    assert_eq!(plan.ivmx, None);

    let req = copy(PixelFormat::Argb8888, (32, 32), PixelFormat::Abgr8888, (32, 32));
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.ivmx, Some(Ivmx::RgbToBgr));
}

#[test]
fn blending_copy_is_not_direct() {
    let req = copy(PixelFormat::Argb8888, (8, 8), PixelFormat::Argb8888, (8, 8))
        .with_global_alpha(255);
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::Copy);
    assert!(plan.blend);
}

#[test]
fn fill_into_semi_planar_yuv_needs_a_node_per_plane() {
    let dst = image(PixelFormat::Yuv420SemiPlanar, 64, 64);
    let req = BlitRequest::fill(dst, Rect::new(0, 0, 64, 64), 0xff80_8080);
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::Fill);
    assert_eq!(plan.node_count, 2);
    assert_eq!(plan.src.fmt, PixelFormat::Ayuv8888);
    assert!(plan.src.is_fill);
}

#[test]
fn fills_without_conversion_are_direct() {
    let dst = image(PixelFormat::Argb8888, 16, 16);
    let plan = analyze(
        &BlitRequest::fill(dst, Rect::new(0, 0, 16, 16), 1),
        DEFAULT_MAX_BUF_SIZE,
    )
    .unwrap();
    assert_eq!(plan.kind, OpKind::DirectFill);
    assert_eq!(plan.node_count, 1);

    let dst = image(PixelFormat::Rgb565, 16, 16);
    let mut req = BlitRequest::fill(dst, Rect::new(0, 0, 16, 16), 0xf800);
    req.flags.source_fill = false;
    req.flags.source_fill_raw = true;
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::DirectFill);
    assert_eq!(plan.src.fmt, PixelFormat::Rgb565);

    let mut req = BlitRequest::fill(dst, Rect::new(0, 0, 16, 16), 0xf800);
    req.flags.source_fill_raw = false;
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::Fill);
    assert_eq!(plan.src.fmt, PixelFormat::Argb8888);
}

#[test]
fn raw_fill_into_planar_is_rejected() {
    let dst = image(PixelFormat::Yuv420Planar, 16, 16);
    let mut req = BlitRequest::fill(dst, Rect::new(0, 0, 16, 16), 0);
    req.flags.source_fill_raw = true;
    let err = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap_err();
    assert!(matches!(err, B2r2Error::InvalidArgument(_)));
}

#[test]
fn per_pixel_alpha_is_folded_into_global_alpha() {
    let dst = image(PixelFormat::Rgb565, 16, 16);
    let mut req = BlitRequest::fill(dst, Rect::new(0, 0, 16, 16), 0x80ff_0000)
        .with_global_alpha(200);
    req.flags.per_pixel_alpha_blend = true;
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::Fill);
    assert_eq!(plan.global_alpha, 100);
    assert_eq!(plan.src.color, 0xffff_0000);
}

#[test]
fn destination_outside_image_is_rejected() {
    let mut req = copy(PixelFormat::Rgb565, (5, 5), PixelFormat::Rgb565, (12, 20));
    req.dst_rect = Rect::new(10, 10, 5, 5);
    let err = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap_err();
    assert!(matches!(err, B2r2Error::InvalidArgument(_)));
}

#[test]
fn clipping_can_bring_destination_inside() {
    let mut req = copy(PixelFormat::Rgb565, (5, 5), PixelFormat::Rgb565, (12, 20));
    req.dst_rect = Rect::new(10, 10, 5, 5);
    let req = req.with_clip(Rect::new(0, 0, 12, 20));
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::Copy);
    assert_eq!(plan.clip, Some(Rect::new(10, 10, 2, 5)));
    assert_eq!(plan.node_count, 1);
}

#[test]
fn fully_clipped_destination_is_rejected() {
    let req = copy(PixelFormat::Rgb565, (8, 8), PixelFormat::Rgb565, (8, 8))
        .with_clip(Rect::new(20, 20, 4, 4));
    let err = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap_err();
    assert!(matches!(err, B2r2Error::InvalidArgument(_)));
}

#[test]
fn degenerate_rects_and_pitches_are_rejected() {
    let mut req = copy(PixelFormat::Rgb565, (8, 8), PixelFormat::Rgb565, (8, 8));
    req.src_rect.width = 0;
    assert!(analyze(&req, DEFAULT_MAX_BUF_SIZE).is_err());

    let mut req = copy(PixelFormat::Rgb565, (8, 8), PixelFormat::Rgb565, (8, 8));
    req.dst_img = req.dst_img.with_pitch(8);
    assert!(analyze(&req, DEFAULT_MAX_BUF_SIZE).is_err());
}

#[test]
fn scaling_onto_one_pixel_is_invalid() {
    let req = copy(PixelFormat::Argb8888, (2, 4), PixelFormat::Argb8888, (1, 4));
    let err = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap_err();
    assert!(matches!(err, B2r2Error::InvalidArgument(_)));
}

#[test]
fn flips_reverse_the_scan_order() {
    let req = copy(PixelFormat::Argb8888, (64, 32), PixelFormat::Argb8888, (64, 32))
        .with_transform(Transform::FlipH);
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::Flip);
    assert_eq!(plan.node_count, 1);
    assert_eq!(plan.dst.hso, Hso::RightToLeft);
    assert_eq!(plan.dst.vso, Vso::TopToBottom);
    assert_eq!(plan.dst.dx, -64);
    assert_eq!(plan.dst.dy, 32);
}

#[test]
fn rotation_is_counted_in_strips() {
    let req = copy(PixelFormat::Argb8888, (40, 20), PixelFormat::Argb8888, (20, 40))
        .with_transform(Transform::Rot90Ccw);
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::Rotate);
    assert!(plan.rotate);
    assert_eq!(plan.src.window, Rect::new(0, 0, 16, 20));
    assert_eq!(plan.node_count, 6);
    assert_eq!(plan.dst.hso, Hso::LeftToRight);
    assert_eq!(plan.dst.vso, Vso::BottomToTop);
    assert_eq!(plan.dst.window, Rect::new(0, 24, 20, 16));
}

#[test]
fn wide_scales_are_tiled() {
    let req = copy(PixelFormat::Argb8888, (300, 10), PixelFormat::Argb8888, (150, 10));
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::Scale);
    assert_eq!(plan.h_sf, 2061);
    assert!(plan.h_rescale);
    assert!(!plan.v_rescale);
    assert_eq!(plan.src.window.width, RESCALE_MAX_WIDTH - 1);
    assert_eq!(plan.dst.window.width, 64);
    assert_eq!(plan.node_count, 3);
}

#[test]
fn planar_sources_are_always_resampled() {
    let req = copy(PixelFormat::Yuv420Planar, (64, 64), PixelFormat::Argb8888, (64, 64));
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.kind, OpKind::Scale);
    assert_eq!(plan.ivmx, Some(Ivmx::YuvToRgb));
    assert!(!plan.h_rescale);
}

#[test]
fn scale_and_rotate_sizes_a_temporary_buffer() {
    let req = copy(PixelFormat::Argb8888, (200, 100), PixelFormat::Argb8888, (300, 400))
        .with_transform(Transform::Rot90Ccw);
    let plan = analyze(&req, 16 * 1024).unwrap();
    assert_eq!(plan.kind, OpKind::ScaleAndRotate);
    assert_eq!(plan.buf_count, 1);
    let tmp = plan.tmp_buf(1).unwrap();
    assert_eq!(tmp.window, Rect::new(0, 0, 128, 32));
    assert_eq!(tmp.pitch, tmp.fmt.byte_pitch(tmp.window.width as u32));
    assert_eq!(plan.work_bufs[0].size, tmp.pitch * tmp.height);
    assert_eq!(plan.work_bufs[0].size, 16 * 1024);
    assert_eq!(plan.node_count, 290);
}

#[test]
fn scale_rotate_and_blend_is_unsupported() {
    let req = copy(PixelFormat::Argb8888, (20, 10), PixelFormat::Argb8888, (30, 40))
        .with_transform(Transform::Rot90Ccw)
        .with_global_alpha(128);
    let err = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn yuv_to_bgr_is_unsupported() {
    let req = copy(PixelFormat::Yuv420Planar, (16, 16), PixelFormat::Abgr8888, (16, 16));
    let err = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn temporary_buffer_budget_below_one_line_is_exhausted() {
    let req = copy(PixelFormat::Argb8888, (200, 100), PixelFormat::Argb8888, (300, 400))
        .with_transform(Transform::Rot90Ccw);
    let err = analyze(&req, 64).unwrap_err();
    assert!(matches!(err, B2r2Error::ResourceExhausted(_)));
}

#[test]
fn large_scale_goes_through_a_temporary_buffer() {
    let req = copy(PixelFormat::Argb8888, (400, 400), PixelFormat::Argb8888, (300, 300));
    let plan = analyze(&req, 1024).unwrap();
    assert_eq!(plan.kind, OpKind::Scale);
    assert_eq!(plan.buf_count, 1);
    let tmp = plan.tmp_buf(1).unwrap();
    assert_eq!(tmp.window, Rect::new(0, 0, 95, 2));
    assert_eq!(tmp.pitch, tmp.fmt.byte_pitch(tmp.window.width as u32));
    assert_eq!(plan.work_bufs[0].size, tmp.pitch * tmp.height);
    assert_eq!(plan.src.window, Rect::new(0, 0, 128, 3));
    assert_eq!(plan.dst.window, Rect::new(0, 0, 95, 2));
    // 4 columns x 150 rows, each fetched into the buffer and written out.
    assert_eq!(plan.node_count, 1200);
}

#[test]
fn small_scale_writes_the_destination_directly() {
    let req = copy(PixelFormat::Argb8888, (400, 400), PixelFormat::Argb8888, (300, 300));
    let plan = analyze(&req, 1024 * 1024).unwrap();
    assert_eq!(plan.buf_count, 0);
    assert!(plan.tmp_bufs.is_empty());
}

#[test]
fn large_conversion_copy_is_tiled_through_a_temporary_buffer() {
    let req = copy(PixelFormat::Argb8888, (200, 100), PixelFormat::Rgb565, (200, 100));
    let plan = analyze(&req, 4096).unwrap();
    assert_eq!(plan.kind, OpKind::Copy);
    assert_eq!(plan.buf_count, 1);
    let tmp = plan.tmp_buf(1).unwrap();
    assert_eq!(tmp.window, Rect::new(0, 0, 128, 8));
    assert_eq!(plan.work_bufs[0].size, 4096);
    assert_eq!(plan.src.window, Rect::new(0, 0, 128, 8));
    assert_eq!(plan.node_count, 2 * 13 * 2);
}

#[test]
fn large_same_format_copy_stays_direct() {
    let req = copy(PixelFormat::Argb8888, (200, 100), PixelFormat::Argb8888, (200, 100));
    let plan = analyze(&req, 512).unwrap();
    assert_eq!(plan.kind, OpKind::DirectCopy);
    assert_eq!(plan.buf_count, 0);
}

#[test]
fn chroma_scale_factor_overflow_is_rejected() {
    let req = copy(PixelFormat::Argb8888, (3000, 50), PixelFormat::Yuv420Planar, (50, 50));
    let err = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap_err();
    assert!(matches!(err, B2r2Error::InvalidArgument(_)));

    // Through the temporary buffer the chroma planes are written at 2:1 only.
    let plan = analyze(&req, 1024).unwrap();
    assert_eq!(plan.buf_count, 1);
    assert_eq!(plan.node_count, 17 * 4);
}

#[test]
fn rects_near_the_coordinate_limit_are_rejected() {
    let dst = image(PixelFormat::Argb8888, 100, 100);
    let req = BlitRequest::fill(dst, Rect::new(i32::MAX - 5, 0, 10, 10), 0);
    let err = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap_err();
    assert!(matches!(err, B2r2Error::InvalidArgument(_)));

    let mut req = copy(PixelFormat::Argb8888, (8, 8), PixelFormat::Argb8888, (8, 8));
    req.src_rect = Rect::new(0, i32::MAX - 1, 8, 8);
    let err = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap_err();
    assert!(matches!(err, B2r2Error::InvalidArgument(_)));
}

#[test]
fn unbounded_clip_rect_keeps_the_destination() {
    let req = copy(PixelFormat::Argb8888, (8, 8), PixelFormat::Rgb565, (8, 8))
        .with_clip(Rect::new(0, 0, i32::MAX, i32::MAX));
    let plan = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap();
    assert_eq!(plan.clip, Some(Rect::new(0, 0, 8, 8)));
}

#[test]
fn images_wider_than_the_coordinate_range_are_rejected() {
    let req = BlitRequest::fill(
        image(PixelFormat::Argb8888, u32::MAX, 1),
        Rect::new(0, 0, 8, 1),
        0,
    );
    let err = analyze(&req, DEFAULT_MAX_BUF_SIZE).unwrap_err();
    assert!(matches!(err, B2r2Error::InvalidArgument(_)));
}

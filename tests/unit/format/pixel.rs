use super::*;

#[test]
fn every_format_has_exactly_one_color_family() {
    for fmt in PixelFormat::ALL {
        let families = [fmt.is_rgb(), fmt.is_bgr(), fmt.is_yuv()];
        assert_eq!(
            families.iter().filter(|f| **f).count(),
            1,
            "{fmt:?} must belong to exactly one family"
        );
    }
}

#[test]
fn layout_classes_match_plane_counts() {
    assert_eq!(PixelFormat::Rgb565.fmt_type(), FmtType::Raster);
    assert_eq!(PixelFormat::YCbYCr.fmt_type(), FmtType::Raster);
    assert_eq!(
        PixelFormat::Yuv420SemiPlanar.fmt_type(),
        FmtType::SemiPlanar
    );
    assert_eq!(PixelFormat::Yuv444Planar.fmt_type(), FmtType::Planar);
    assert_eq!(FmtType::Raster.plane_count(), 1);
    assert_eq!(FmtType::SemiPlanar.plane_count(), 2);
    assert_eq!(FmtType::Planar.plane_count(), 3);
}

#[test]
fn byte_pitch_is_monotonic_in_width() {
    for fmt in PixelFormat::ALL {
        let mut prev = 0;
        for w in 0..300 {
            let p = fmt.byte_pitch(w);
            assert!(p >= prev, "{fmt:?} pitch shrank at width {w}");
            prev = p;
        }
    }
}

#[test]
fn byte_pitch_examples() {
    assert_eq!(PixelFormat::Rgb565.byte_pitch(100), 200);
    assert_eq!(PixelFormat::Rgb888.byte_pitch(10), 30);
    assert_eq!(PixelFormat::Argb8888.byte_pitch(10), 40);
    assert_eq!(PixelFormat::A1.byte_pitch(9), 2);
    assert_eq!(PixelFormat::YCbYCr.byte_pitch(5), 12);
    assert_eq!(PixelFormat::Yuv420Planar.byte_pitch(64), 64);
    assert_eq!(PixelFormat::Argb8888.byte_pitch(u32::MAX), u32::MAX);
    assert_eq!(PixelFormat::CbYCrY.byte_pitch(u32::MAX), u32::MAX);
}

#[test]
fn alpha_range_follows_alpha_width() {
    assert_eq!(PixelFormat::Argb8888.alpha_range(), AlphaRange::Range255);
    assert_eq!(PixelFormat::A8.alpha_range(), AlphaRange::Range255);
    assert_eq!(PixelFormat::Argb4444.alpha_range(), AlphaRange::Range128);
    assert_eq!(PixelFormat::Rgb565.alpha_range(), AlphaRange::Range128);
}

#[test]
fn yuv420_subsamples_both_axes() {
    assert!(PixelFormat::Yuv420SemiPlanar.is_yuv420());
    assert_eq!(PixelFormat::Yuv420Planar.chroma_subsampling(), (2, 2));
    assert_eq!(PixelFormat::Yuv422SemiPlanar.chroma_subsampling(), (2, 1));
    assert_eq!(PixelFormat::Argb8888.chroma_subsampling(), (1, 1));
}

#[test]
fn alpha_accessors_round_trip_for_8bit_alpha() {
    let c = 0x80_12_34_56;
    assert_eq!(PixelFormat::Argb8888.get_alpha(c), 0x80);
    let opaque = PixelFormat::Argb8888.set_alpha(0xff, c);
    assert_eq!(opaque, 0xff_12_34_56);
    assert_eq!(PixelFormat::Ayuv8888.get_alpha(opaque), 0xff);
    assert_eq!(PixelFormat::Argb1555.get_alpha(0x8000), 0xff);
    assert_eq!(PixelFormat::Argb4444.set_alpha(0xff, 0x0abc), 0xfabc);
    assert_eq!(PixelFormat::Rgb565.get_alpha(0), 0xff);
}

#[test]
fn native_codes_are_stable() {
    assert_eq!(PixelFormat::Rgb565.native().code(), 0x00);
    assert_eq!(PixelFormat::Argb8888.native().code(), 0x05);
    assert_eq!(PixelFormat::Abgr8888.native(), NativeFormat::Argb8888);
    assert_eq!(PixelFormat::Ayuv8888.native().code(), 0x15);
}

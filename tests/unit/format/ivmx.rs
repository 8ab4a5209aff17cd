use super::*;

#[test]
fn same_family_needs_no_matrix() {
    assert_eq!(
        Ivmx::select(PixelFormat::Rgb565, PixelFormat::Argb8888).unwrap(),
        None
    );
    assert_eq!(
        Ivmx::select(PixelFormat::Yuv420Planar, PixelFormat::Ayuv8888).unwrap(),
        None
    );
}

#[test]
fn cross_family_conversions_pick_a_matrix() {
    assert_eq!(
        Ivmx::select(PixelFormat::Argb8888, PixelFormat::Yuv420SemiPlanar).unwrap(),
        Some(Ivmx::RgbToYuv)
    );
    assert_eq!(
        Ivmx::select(PixelFormat::YCbYCr, PixelFormat::Rgb565).unwrap(),
        Some(Ivmx::YuvToRgb)
    );
    assert_eq!(
        Ivmx::select(PixelFormat::Abgr8888, PixelFormat::Rgb888).unwrap(),
        Some(Ivmx::BgrToRgb)
    );
    assert_eq!(
        Ivmx::select(PixelFormat::Argb8888, PixelFormat::Abgr8888).unwrap(),
        Some(Ivmx::RgbToBgr)
    );
}

#[test]
fn yuv_bgr_conversions_are_unsupported() {
    let err = Ivmx::select(PixelFormat::Yuv420Planar, PixelFormat::Abgr8888).unwrap_err();
    assert!(err.is_unsupported());
    let err = Ivmx::select(PixelFormat::Bgr565, PixelFormat::Ayuv8888).unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn swaps_share_coefficients() {
    assert_eq!(
        Ivmx::RgbToBgr.coefficients(),
        Ivmx::BgrToRgb.coefficients()
    );
    assert_ne!(
        Ivmx::RgbToYuv.coefficients(),
        Ivmx::YuvToRgb.coefficients()
    );
}

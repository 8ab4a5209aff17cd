use super::*;

#[test]
fn scale_factor_identity_is_one() {
    assert_eq!(calculate_scale_factor(640, 640).unwrap(), SF_ONE);
    assert_eq!(calculate_scale_factor(1, 1).unwrap(), SF_ONE);
}

#[test]
fn scale_factor_rejects_single_pixel_targets() {
    let err = calculate_scale_factor(2, 1).unwrap_err();
    assert!(matches!(err, B2r2Error::InvalidArgument(_)));
    assert!(calculate_scale_factor(5, 0).is_err());
}

#[test]
fn scale_factor_rejects_overflow_and_underflow() {
    // 100 -> 2 needs ~100.0 in 6.10 fixed point, which does not fit 16 bits.
    assert!(matches!(
        calculate_scale_factor(100, 2),
        Err(B2r2Error::InvalidArgument(_))
    ));
    // 1 -> 2000 rounds down to zero.
    assert!(matches!(
        calculate_scale_factor(1, 2000),
        Err(B2r2Error::InvalidArgument(_))
    ));
}

#[test]
fn scale_factor_matches_endpoint_formula() {
    assert_eq!(calculate_scale_factor(100, 200).unwrap(), 514);
    assert_eq!(calculate_scale_factor(200, 100).unwrap(), 2068);
}

#[test]
fn rescale_of_full_source_reaches_destination() {
    for (from, to) in [(100u32, 200u32), (200, 100), (37, 91), (640, 480), (3, 1000)] {
        let sf = calculate_scale_factor(from, to).unwrap();
        assert!(rescale(from as i32, sf) >= to as i32, "{from}->{to}");
    }
}

#[test]
fn rescale_handles_non_positive_dims() {
    assert_eq!(rescale(0, SF_ONE), 0);
    assert_eq!(inv_rescale(-4, SF_ONE), 0);
    assert_eq!(rescale(17, SF_ONE), 17);
    assert_eq!(inv_rescale(17, SF_ONE), 17);
}

#[test]
fn rescale_round_trip_is_bounded_by_one() {
    let factors = [256u16, 300, 512, 700, 1023, 1024, 1025, 1500, 2048, 3000, 4096, 9000];
    for sf in factors {
        for d in 1..400 {
            if sf >= SF_ONE {
                let back = rescale(inv_rescale(d, sf), sf);
                assert!((0..=1).contains(&(back - d)), "sf={sf} d={d} back={back}");
            }
            if sf <= SF_ONE {
                let back = inv_rescale(rescale(d, sf), sf);
                assert!((0..=1).contains(&(back - d)), "sf={sf} d={d} back={back}");
            }
        }
    }
}

#[test]
fn sample_span_of_full_destination_covers_source_exactly() {
    for (from, to) in [(100u32, 200u32), (200, 100), (37, 91), (128, 128), (5, 1000)] {
        let sf = calculate_scale_factor(from, to).unwrap();
        let span = sample_span(0, to as i32, sf);
        assert_eq!(span.start, 0);
        assert_eq!(span.len, from as i32, "{from}->{to}");
        assert_eq!(span.phase, 0);
    }
}

#[test]
fn sample_span_is_absolute_not_accumulated() {
    let sf = calculate_scale_factor(300, 170).unwrap();
    let a = sample_span(0, 50, sf);
    let b = sample_span(50, 50, sf);
    let whole = sample_span(0, 100, sf);
    assert_eq!(b.start, ((50 * i64::from(sf)) >> 10) as i32);
    assert!(b.start >= a.start + a.len - 1);
    assert_eq!(b.start + b.len, whole.start + whole.len);
}

#[test]
fn div_ceil_counts_partial_tiles() {
    assert_eq!(div_ceil(100, 16), 7);
    assert_eq!(div_ceil(96, 16), 6);
    assert_eq!(div_ceil(1, 16), 1);
    assert_eq!(div_ceil(5, 0), 0);
    assert_eq!(div_ceil(i32::MAX, 16), 134_217_728);
    assert_eq!(div_ceil(i32::MAX, 1), i32::MAX);
}

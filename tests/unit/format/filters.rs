use super::*;

#[test]
fn every_phase_sums_to_unity() {
    let t = tables();
    for kind in FilterKind::ALL {
        for (phase, row) in t.horizontal(kind).iter().enumerate() {
            let sum: i32 = row.iter().map(|c| i32::from(*c)).sum();
            assert_eq!(sum, COEFF_SUM, "{kind:?} horizontal phase {phase}");
        }
        for (phase, row) in t.vertical(kind).iter().enumerate() {
            let sum: i32 = row.iter().map(|c| i32::from(*c)).sum();
            assert_eq!(sum, COEFF_SUM, "{kind:?} vertical phase {phase}");
        }
    }
}

#[test]
fn zero_phase_upscale_is_a_pass_through() {
    let row = tables().horizontal(FilterKind::Upscale)[0];
    assert_eq!(row, [0, 0, 0, 64, 0, 0, 0, 0]);
    let row = tables().vertical(FilterKind::Upscale)[0];
    assert_eq!(row, [0, 0, 64, 0, 0]);
}

#[test]
fn tables_are_built_once() {
    assert!(std::ptr::eq(tables(), tables()));
}

#[test]
fn kind_follows_scale_factor_ranges() {
    assert_eq!(FilterKind::for_scale_factor(512), FilterKind::Upscale);
    assert_eq!(FilterKind::for_scale_factor(1024), FilterKind::Upscale);
    assert_eq!(FilterKind::for_scale_factor(1025), FilterKind::Down2);
    assert_eq!(FilterKind::for_scale_factor(4096), FilterKind::Down4);
    assert_eq!(FilterKind::for_scale_factor(4097), FilterKind::DownMax);
}

use crate::core::layout::ValueLayout;
use crate::tests::helpers::histo64;
use rand::Rng;

#[test]
fn equivalent_range_doubles_per_bucket() {
    let l = ValueLayout::new(1, u64::max_value(), 3).unwrap();
    assert_eq!(1, l.equivalent_range(1));
    assert_eq!(1, l.equivalent_range(2047));
    assert_eq!(2, l.equivalent_range(2048));
    assert_eq!(2, l.equivalent_range(4095));
    assert_eq!(4, l.equivalent_range(4096));
    assert_eq!(8, l.equivalent_range(10_007));
}

#[test]
fn equivalent_range_with_unit_magnitude() {
    let l = ValueLayout::new(1024, u64::max_value(), 3).unwrap();
    assert_eq!(1 << 10, l.equivalent_range(1));
    assert_eq!(1 << 10, l.equivalent_range(2_000_000));
    assert_eq!(1 << 11, l.equivalent_range(4_000_000));
}

#[test]
fn equivalents_within_one_bin() {
    let l = ValueLayout::new(1, u64::max_value(), 3).unwrap();
    // the [10000, 10007] bin
    assert_eq!(10_000, l.lowest_equivalent(10_007));
    assert_eq!(10_007, l.highest_equivalent(10_000));
    assert_eq!(10_004, l.median_equivalent(10_002));
    assert_eq!(10_008, l.next_non_equivalent(10_007));
}

#[test]
fn single_unit_bins_are_their_own_equivalents() {
    let l = ValueLayout::new(1, u64::max_value(), 3).unwrap();
    assert_eq!(1500, l.lowest_equivalent(1500));
    assert_eq!(1500, l.highest_equivalent(1500));
    // median rounds up within the 1-wide bin
    assert_eq!(1500, l.median_equivalent(1500));
    assert_eq!(1501, l.next_non_equivalent(1500));
}

#[test]
fn zero_behaves_like_any_bucket_0_value() {
    let l = ValueLayout::new(1, u64::max_value(), 3).unwrap();
    assert_eq!(0, l.lowest_equivalent(0));
    assert_eq!(0, l.highest_equivalent(0));
    assert_eq!(1, l.next_non_equivalent(0));
}

#[test]
fn top_of_range_saturates() {
    let l = ValueLayout::new(1, u64::max_value(), 3).unwrap();
    assert_eq!(u64::max_value(), l.highest_equivalent(u64::max_value()));
    assert_eq!(u64::max_value(), l.next_non_equivalent(u64::max_value()));
}

#[test]
fn bin_bounds_bracket_the_value() {
    // I3: lowest <= v < lowest + range, and the bin tiles exactly
    let l = ValueLayout::new(1, u64::max_value(), 2).unwrap();
    let mut rng = rand::thread_rng();
    for _ in 0..100_000 {
        let v = rng.gen::<u64>();
        let lowest = l.lowest_equivalent(v);
        let range = l.equivalent_range(v);
        assert!(lowest <= v);
        assert!(v - lowest < range);
        if lowest.checked_add(range).is_some() {
            assert_eq!(lowest + range, l.next_non_equivalent(v));
        }
    }
}

#[test]
fn relative_error_stays_within_precision() {
    // P2: bin width relative to the value is bounded by 2 * 10^-digits
    for &digits in &[0_u8, 1, 2, 3, 4, 5] {
        let l = ValueLayout::new(1, u64::max_value(), digits).unwrap();
        let bound = 2.0 * 10_f64.powi(-i32::from(digits));
        let mut rng = rand::thread_rng();
        for _ in 0..10_000 {
            let v = rng.gen_range(1..=u64::max_value());
            let ratio = l.equivalent_range(v) as f64 / v as f64;
            assert!(
                ratio <= bound,
                "digits={} v={} ratio={} bound={}",
                digits,
                v,
                ratio,
                bound
            );
        }
    }
}

#[test]
fn histogram_exposes_bin_arithmetic() {
    let h = histo64(1, 3_600_000_000, 3);
    assert!(h.equivalent(10_000, 10_007));
    assert!(!h.equivalent(10_000, 10_008));
    assert_eq!(h.highest_equivalent(10_000) + 1, h.next_non_equivalent(10_000));
    assert_eq!(
        h.equivalent_range(10_000),
        h.next_non_equivalent(10_000) - h.lowest_equivalent(10_000)
    );
}

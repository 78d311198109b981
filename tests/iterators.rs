use rangehist::Histogram;

const TRACKABLE_MAX: u64 = 3_600_000_000;
const SIGFIG: u8 = 3;

fn loaded() -> Histogram<u64> {
    let mut h = Histogram::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record_n(100, 2).unwrap();
    h.record_n(1_000, 3).unwrap();
    h.record(500_000).unwrap();
    h
}

#[test]
fn recorded_yields_only_nonempty_bins() {
    let h = loaded();
    let steps: Vec<_> = h.iter_recorded().collect();
    assert_eq!(3, steps.len());

    assert_eq!(100, steps[0].value_iterated_to());
    assert_eq!(2, steps[0].count_at_value());
    assert_eq!(1_000, steps[1].value_iterated_to());
    assert_eq!(3, steps[1].count_at_value());
    assert_eq!(h.highest_equivalent(500_000), steps[2].value_iterated_to());
    assert_eq!(1, steps[2].count_at_value());
}

#[test]
fn recorded_running_totals_accumulate() {
    let h = loaded();
    let steps: Vec<_> = h.iter_recorded().collect();

    assert_eq!(2, steps[0].total_count_to_this_value());
    assert_eq!(5, steps[1].total_count_to_this_value());
    assert_eq!(6, steps[2].total_count_to_this_value());

    assert_eq!(2, steps[0].count_added_in_this_iteration_step());
    assert_eq!(3, steps[1].count_added_in_this_iteration_step());
    assert_eq!(1, steps[2].count_added_in_this_iteration_step());

    // value_iterated_from chains the previous step's value_iterated_to
    assert_eq!(0, steps[0].value_iterated_from());
    assert_eq!(100, steps[1].value_iterated_from());
    assert_eq!(1_000, steps[2].value_iterated_from());

    // running value sum uses each bin's median
    assert_eq!(2 * 100, steps[0].total_value_to_this_value());
    assert_eq!(2 * 100 + 3 * 1_000, steps[1].total_value_to_this_value());
    assert_eq!(
        2 * 100 + 3 * 1_000 + h.median_equivalent(500_000),
        steps[2].total_value_to_this_value()
    );
}

#[test]
fn recorded_percentiles_grow_to_100() {
    let h = loaded();
    let steps: Vec<_> = h.iter_recorded().collect();
    assert!((steps[0].percentile() - 100.0 * 2.0 / 6.0).abs() < 1e-9);
    assert!((steps[1].percentile() - 100.0 * 5.0 / 6.0).abs() < 1e-9);
    assert!((steps[2].percentile() - 100.0).abs() < 1e-9);
}

#[test]
fn all_visits_every_bin_up_to_the_max() {
    let mut h = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record(0).unwrap();
    h.record(3).unwrap();

    let steps: Vec<_> = h.iter_all().collect();
    // iteration covers the whole counts array once recorded data is passed
    assert_eq!(h.bin_count(), steps.len());
    assert_eq!(1, steps[0].count_at_value());
    assert_eq!(0, steps[1].count_at_value());
    assert_eq!(1, steps[3].count_at_value());
    assert_eq!(2, steps[3].total_count_to_this_value());
}

#[test]
fn empty_histogram_iterates_nothing_recorded() {
    let h = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    assert_eq!(0, h.iter_recorded().count());
}

#[test]
fn linear_covers_range_in_even_steps() {
    let mut h = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record(50).unwrap();
    h.record(150).unwrap();
    h.record(460).unwrap();

    let steps: Vec<_> = h.iter_linear(100).collect();
    // boundaries at 99, 199, 299, 399, 499
    assert_eq!(5, steps.len());
    assert_eq!(99, steps[0].value_iterated_to());
    assert_eq!(1, steps[0].count_added_in_this_iteration_step());
    assert_eq!(199, steps[1].value_iterated_to());
    assert_eq!(1, steps[1].count_added_in_this_iteration_step());
    assert_eq!(0, steps[2].count_added_in_this_iteration_step());
    assert_eq!(0, steps[3].count_added_in_this_iteration_step());
    assert_eq!(1, steps[4].count_added_in_this_iteration_step());

    let total: u64 = steps
        .iter()
        .map(|s| s.count_added_in_this_iteration_step())
        .sum();
    assert_eq!(h.total_count(), total);
}

#[test]
fn log_steps_multiply() {
    let mut h = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record(5).unwrap();
    h.record(50).unwrap();
    h.record(700).unwrap();

    let steps: Vec<_> = h.iter_log(10, 10.0).collect();
    // boundaries at 9, 99, 999
    assert_eq!(3, steps.len());
    assert_eq!(9, steps[0].value_iterated_to());
    assert_eq!(99, steps[1].value_iterated_to());
    assert_eq!(999, steps[2].value_iterated_to());
    for (step, expected) in steps.iter().zip([1_u64, 1, 1].iter()) {
        assert_eq!(*expected, step.count_added_in_this_iteration_step());
    }
}

#[test]
fn percentile_iteration_levels_are_monotonic_and_terminate() {
    let mut h = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    for i in 1..=10_000_u64 {
        h.record(i).unwrap();
    }

    let steps: Vec<_> = h.iter_percentiles(5).collect();
    assert!(!steps.is_empty());

    let mut prev_level = -1.0_f64;
    for step in &steps {
        assert!(step.percentile_level_iterated_to() >= prev_level);
        prev_level = step.percentile_level_iterated_to();
    }
    // iteration runs out exactly at the 100% tick
    assert_eq!(100.0, steps.last().unwrap().percentile_level_iterated_to());
    assert_eq!(
        h.total_count(),
        steps.last().unwrap().total_count_to_this_value()
    );
}

#[test]
fn percentile_iteration_ticks_densify_toward_the_tail() {
    let mut h = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    for i in 1..=10_000_u64 {
        h.record(i).unwrap();
    }

    let levels: Vec<f64> = h
        .iter_percentiles(1)
        .map(|s| s.percentile_level_iterated_to())
        .collect();
    // with 1 tick per half distance, levels halve their remaining gap:
    // 0, 50, 75, 87.5, ...
    assert!(levels.windows(2).all(|w| w[1] > w[0]));
    assert!(levels.contains(&50.0));
    assert!(levels.contains(&75.0));
    assert!(levels.contains(&87.5));
}

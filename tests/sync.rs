use rangehist::sync::{ConcurrentHistogram, Recorder};
use rangehist::{Histogram, RecordError, ShiftError, SubtractionError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

const TRACKABLE_MAX: u64 = 3_600_000_000;
const SIGFIG: u8 = 3;

#[test]
fn concurrent_record_through() {
    let h = ConcurrentHistogram::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record(4).unwrap();
    h.record_n(4, 2).unwrap();
    assert_eq!(3, h.count_at(4));
    assert_eq!(3, h.total_count());
}

#[test]
fn concurrent_rejects_out_of_range() {
    let h = ConcurrentHistogram::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    assert_eq!(Err(RecordError::ValueOutOfRange), h.record(4 * TRACKABLE_MAX));
    assert_eq!(0, h.total_count());
}

#[test]
fn concurrent_record_correct_backfills() {
    let h = ConcurrentHistogram::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record_correct(100_000, 10_000).unwrap();
    assert_eq!(10, h.total_count());
    assert_eq!(1, h.count_at(10_000));
}

#[test]
fn spec_scenario_eight_threads_million_records() {
    let h = Arc::new(ConcurrentHistogram::new_with_bounds(1, 1 << 62, SIGFIG).unwrap());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let h = Arc::clone(&h);
        handles.push(thread::spawn(move || {
            for i in 0..1_000_000_u64 {
                h.record(i).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(8_000_000, h.total_count());
    assert_eq!(8, h.count_at(0));

    let snapshot = h.snapshot();
    assert_eq!(8_000_000, snapshot.total_count());
    assert_eq!(8, snapshot.count_at(0));
    assert!(!snapshot.has_overflowed());
}

#[test]
fn snapshot_is_value_equal_to_single_threaded_reference() {
    let concurrent = ConcurrentHistogram::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    let mut reference = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();

    for i in 0..100_000_u64 {
        let v = (i * 31) % 2_000_000;
        concurrent.record(v).unwrap();
        reference.record(v).unwrap();
    }

    assert_eq!(concurrent.snapshot(), reference);
}

#[test]
fn concurrent_add_and_subtract() {
    let h = ConcurrentHistogram::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    let mut delta = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    delta.record_n(1000, 5).unwrap();
    delta.record_n(2_000_000, 2).unwrap();

    h.add(&delta).unwrap();
    assert_eq!(7, h.total_count());
    assert_eq!(5, h.count_at(1000));

    h.subtract(&delta).unwrap();
    assert_eq!(0, h.total_count());
    assert_eq!(0, h.count_at(1000));

    // an empty concurrent histogram has nothing left to subtract
    assert_eq!(Err(SubtractionError::WouldUnderflow), h.subtract(&delta));
}

#[test]
fn concurrent_reset_zeroes_everything() {
    let h = ConcurrentHistogram::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record_n(42, 100).unwrap();
    h.reset();
    assert_eq!(0, h.total_count());
    assert_eq!(0, h.count_at(42));
    assert_eq!(0, h.snapshot().total_count());
}

#[test]
fn shift_moves_distribution_between_bins() {
    let h = ConcurrentHistogram::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record_n(1000, 3).unwrap();

    // values <= 2047 sit in the single-unit region, where one slot is one
    // value unit
    h.shift_values_left(24).unwrap();
    assert_eq!(3, h.count_at(1024));
    assert_eq!(0, h.count_at(1000));

    h.shift_values_right(24).unwrap();
    assert_eq!(3, h.count_at(1000));
    assert_eq!(3, h.total_count());
}

#[test]
fn shift_that_would_drop_counts_is_rejected() {
    let h = ConcurrentHistogram::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record(5).unwrap();
    // 5 slots from the bottom: shifting right by 6 would push it off the edge
    assert_eq!(Err(ShiftError::OverflowedRange), h.shift_values_right(6));
    assert_eq!(1, h.count_at(5));

    let wide = ConcurrentHistogram::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    wide.record(TRACKABLE_MAX).unwrap();
    assert_eq!(
        Err(ShiftError::OverflowedRange),
        wide.shift_values_left(wide.snapshot().bin_count())
    );
}

#[test]
fn recorder_samples_partition_the_stream() {
    // two writers, periodic samples, one final sample: every record lands in
    // exactly one interval
    let recorder = Recorder::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    let mut totals = 0_u64;

    let mut writers = Vec::new();
    for _ in 0..2 {
        let writer = recorder.clone();
        writers.push(thread::spawn(move || {
            for _ in 0..1000 {
                writer.record(42).unwrap();
            }
        }));
    }

    let mut samples = Vec::new();
    for _ in 0..10 {
        samples.push(recorder.sample());
        thread::sleep(std::time::Duration::from_millis(1));
    }
    for writer in writers {
        writer.join().unwrap();
    }
    samples.push(recorder.sample());

    for interval in &samples {
        totals += interval.total_count();
        assert_eq!(interval.total_count(), u64::from(interval.count_at(42)));
    }
    assert_eq!(2000, totals);
    // everything was drained into the intervals
    assert_eq!(0, recorder.histogram().total_count());
}

#[test]
fn recorder_sample_into_recycles() {
    let recorder = Recorder::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    let mut interval = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();

    recorder.record(7).unwrap();
    recorder.sample_into(&mut interval);
    assert_eq!(1, interval.total_count());
    assert_eq!(1, interval.count_at(7));
    assert!(interval.start_timestamp().is_some());
    assert!(interval.end_timestamp().is_some());

    // previous contents are discarded, not accumulated
    recorder.record(9).unwrap();
    recorder.sample_into(&mut interval);
    assert_eq!(1, interval.total_count());
    assert_eq!(0, interval.count_at(7));
    assert_eq!(1, interval.count_at(9));
}

#[test]
fn recorder_sample_while_writers_stream() {
    let recorder = Recorder::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    let stop = Arc::new(AtomicBool::new(false));

    let mut writers = Vec::new();
    for _ in 0..4 {
        let writer = recorder.clone();
        let stop = Arc::clone(&stop);
        writers.push(thread::spawn(move || {
            let mut written = 0_u64;
            while !stop.load(Ordering::Relaxed) {
                writer.record(1000).unwrap();
                written += 1;
            }
            written
        }));
    }

    let mut sampled = 0_u64;
    for _ in 0..50 {
        sampled += recorder.sample().total_count();
    }
    stop.store(true, Ordering::Relaxed);

    let mut written = 0_u64;
    for writer in writers {
        written += writer.join().unwrap();
    }
    sampled += recorder.sample().total_count();

    assert_eq!(written, sampled);
}

use rangehist::serialization::interval_log::{
    IntervalLogIterator, IntervalLogWriterBuilder, LogEntry, Tag,
};
use rangehist::serialization::{Deserializer, V2DeflateSerializer};
use rangehist::Histogram;
use rand::Rng;
use std::time::{Duration, UNIX_EPOCH};

const TRACKABLE_MAX: u64 = 3_600_000_000;
const SIGFIG: u8 = 3;

fn decode(encoded: &str) -> Histogram<u64> {
    let bytes = base64::decode(encoded).unwrap();
    Deserializer::new().deserialize(&mut bytes.as_slice()).unwrap()
}

#[test]
fn n_records_round_trip_in_order() {
    // P7: write N interval records, read back the same N in the same order
    let mut rng = rand::thread_rng();
    let mut originals = Vec::new();
    for i in 0..10_u32 {
        let mut h = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
        for _ in 0..100 {
            h.record(rng.gen_range(0..TRACKABLE_MAX)).unwrap();
        }
        let tag = if i % 2 == 0 {
            Some(format!("series-{}", i))
        } else {
            None
        };
        originals.push((h, tag, Duration::from_millis(u64::from(i) * 1000)));
    }

    let mut buf = Vec::new();
    let mut serializer = V2DeflateSerializer::new();
    {
        let mut writer = IntervalLogWriterBuilder::new()
            .add_comment("test run")
            .with_start_time(UNIX_EPOCH + Duration::from_secs(1_500_000_000))
            .begin_log_with(&mut buf, &mut serializer)
            .unwrap();
        for (h, tag, start) in &originals {
            writer
                .write_histogram(
                    h,
                    *start,
                    Duration::new(1, 0),
                    tag.as_deref().and_then(Tag::new),
                )
                .unwrap();
        }
    }

    let mut seen = 0;
    for entry in IntervalLogIterator::new(&buf) {
        match entry.unwrap() {
            LogEntry::StartTime(st) => {
                assert_eq!(Duration::from_secs(1_500_000_000), st);
            }
            LogEntry::BaseTime(_) => panic!("no BaseTime was written"),
            LogEntry::Interval(interval) => {
                let (expected_hist, expected_tag, expected_start) = &originals[seen];
                assert_eq!(*expected_start, interval.start_timestamp());
                assert_eq!(Duration::new(1, 0), interval.duration());
                assert_eq!(
                    expected_tag.as_deref(),
                    interval.tag().map(|t| t.as_str())
                );
                let restored = decode(interval.encoded_histogram());
                assert_eq!(&restored, expected_hist);
                seen += 1;
            }
        }
    }
    assert_eq!(originals.len(), seen);
}

#[test]
fn interval_timestamps_support_base_time_offsets() {
    let mut h = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record(1).unwrap();

    let mut buf = Vec::new();
    let mut serializer = V2DeflateSerializer::new();
    {
        let mut writer = IntervalLogWriterBuilder::new()
            .with_base_time(UNIX_EPOCH + Duration::from_secs(1_500_000_000))
            .begin_log_with(&mut buf, &mut serializer)
            .unwrap();
        // timestamps in a base-time log are deltas vs the base
        writer
            .write_histogram(&h, Duration::from_secs(60), Duration::new(1, 0), None)
            .unwrap();
    }

    let entries: Vec<_> = IntervalLogIterator::new(&buf)
        .map(Result::unwrap)
        .collect();
    match (&entries[0], &entries[1]) {
        (LogEntry::BaseTime(base), LogEntry::Interval(interval)) => {
            assert_eq!(Duration::from_secs(1_500_000_000), *base);
            assert_eq!(Duration::from_secs(60), interval.start_timestamp());
        }
        other => panic!("unexpected entries {:?}", other),
    }
}

#[test]
fn restarting_iteration_rereads_the_log() {
    let mut h = Histogram::<u64>::new_with_max(TRACKABLE_MAX, SIGFIG).unwrap();
    h.record(7).unwrap();

    let mut buf = Vec::new();
    let mut serializer = V2DeflateSerializer::new();
    {
        let mut writer = IntervalLogWriterBuilder::new()
            .begin_log_with(&mut buf, &mut serializer)
            .unwrap();
        writer
            .write_histogram(&h, Duration::from_secs(0), Duration::new(1, 0), None)
            .unwrap();
    }

    let first: Vec<_> = IntervalLogIterator::new(&buf).collect();
    let second: Vec<_> = IntervalLogIterator::new(&buf).collect();
    assert_eq!(first, second);
}

use super::*;
use crate::serialization::{Deserializer, V2DeflateSerializer, V2Serializer};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[test]
fn parse_start_time_with_iso_tail() {
    let log = b"#[StartTime: 1500000040.123 (seconds since epoch), 2017-07-14T02:40:40.123+00:00]\n";
    let mut iter = IntervalLogIterator::new(&log[..]);
    assert_eq!(
        Some(Ok(LogEntry::StartTime(Duration::new(1_500_000_040, 123_000_000)))),
        iter.next()
    );
    assert_eq!(None, iter.next());
}

#[test]
fn parse_base_time() {
    let log = b"#[BaseTime: 1500000040.000 (seconds since epoch)]\n";
    let mut iter = IntervalLogIterator::new(&log[..]);
    assert_eq!(
        Some(Ok(LogEntry::BaseTime(Duration::from_secs(1_500_000_040)))),
        iter.next()
    );
    assert_eq!(None, iter.next());
}

#[test]
fn parse_interval_with_tag() {
    let log = b"Tag=api,0.127,1.007,2.769,SGlzdG8=\n";
    let mut iter = IntervalLogIterator::new(&log[..]);
    match iter.next().unwrap().unwrap() {
        LogEntry::Interval(h) => {
            assert_eq!(Some("api"), h.tag().map(|t| t.as_str()));
            assert_eq!(Duration::new(0, 127_000_000), h.start_timestamp());
            assert_eq!(Duration::new(1, 7_000_000), h.duration());
            assert_eq!(2.769, h.max());
            assert_eq!("SGlzdG8=", h.encoded_histogram());
        }
        other => panic!("unexpected entry {:?}", other),
    }
    assert_eq!(None, iter.next());
}

#[test]
fn parse_interval_without_tag() {
    let log = b"0.127,1.007,2.769,SGlzdG8=\n";
    match IntervalLogIterator::new(&log[..]).next().unwrap().unwrap() {
        LogEntry::Interval(h) => assert_eq!(None, h.tag()),
        other => panic!("unexpected entry {:?}", other),
    }
}

#[test]
fn comments_legend_and_unknown_headers_are_skipped() {
    let log = b"\
#plain comment\n\
#[SomeUnknownHeader: whatever]\n\
\"StartTimestamp\",\"Interval_Length\",\"Interval_Max\",\"Interval_Compressed_Histogram\"\n\
0.127,1.007,2.769,SGlzdG8=\n";
    let entries: Vec<_> = IntervalLogIterator::new(&log[..]).collect();
    assert_eq!(1, entries.len());
    assert!(matches!(entries[0], Ok(LogEntry::Interval(_))));
}

#[test]
fn unparseable_line_reports_offset() {
    let log = b"#fine\nutter nonsense\n";
    let mut iter = IntervalLogIterator::new(&log[..]);
    assert_eq!(
        Some(Err(LogIteratorError::ParseError { offset: 6 })),
        iter.next()
    );
    assert_eq!(None, iter.next());
}

#[test]
fn tag_rejects_reserved_characters() {
    assert!(Tag::new("with space").is_none());
    assert!(Tag::new("with,comma").is_none());
    assert!(Tag::new("with\nnewline").is_none());
    assert!(Tag::new("with\rcr").is_none());
    assert_eq!("ok-tag_1", Tag::new("ok-tag_1").unwrap().as_str());
}

#[test]
fn written_headers_parse_back() {
    let mut buf = Vec::new();
    let mut serializer = V2Serializer::new();
    {
        let mut writer = IntervalLogWriterBuilder::new()
            .add_comment("a comment\nwith two lines")
            .with_start_time(UNIX_EPOCH + Duration::from_secs(1_500_000_040))
            .with_base_time(UNIX_EPOCH + Duration::from_secs(1_500_000_000))
            .with_max_value_divisor(1_000_000.0)
            .begin_log_with(&mut buf, &mut serializer)
            .unwrap();
        writer.write_comment("and one more").unwrap();
    }

    let text = String::from_utf8(buf.clone()).unwrap();
    assert!(text.starts_with("#a comment\n#with two lines\n"));
    assert!(text.contains("#[StartTime: 1500000040.000 (seconds since epoch), 2017-07-14T"));
    assert!(text.contains("#[BaseTime: 1500000000.000 (seconds since epoch)]\n"));
    assert!(text.contains("#[MaxValueDivisor: 1000000.000]\n"));
    assert!(text.contains(
        "\"StartTimestamp\",\"Interval_Length\",\"Interval_Max\",\"Interval_Compressed_Histogram\"\n"
    ));

    let entries: Vec<_> = IntervalLogIterator::new(&buf).collect();
    assert_eq!(
        vec![
            Ok(LogEntry::StartTime(Duration::from_secs(1_500_000_040))),
            Ok(LogEntry::BaseTime(Duration::from_secs(1_500_000_000))),
        ],
        entries
    );
}

#[test]
fn written_interval_round_trips_through_deserializer() {
    let mut h = crate::Histogram::<u64>::new_with_max(u64::max_value(), 3).unwrap();
    h.record_n(9_000, 7).unwrap();
    h.record(12_345).unwrap();

    let mut buf = Vec::new();
    let mut serializer = V2DeflateSerializer::new();
    {
        let mut writer = IntervalLogWriterBuilder::new()
            .begin_log_with(&mut buf, &mut serializer)
            .unwrap();
        writer
            .write_histogram(
                &h,
                Duration::from_millis(100),
                Duration::new(1, 0),
                Tag::new("t1"),
            )
            .unwrap();
    }

    let interval = IntervalLogIterator::new(&buf)
        .find_map(|e| match e {
            Ok(LogEntry::Interval(ilh)) => Some(ilh),
            _ => None,
        })
        .unwrap();
    assert_eq!(Some("t1"), interval.tag().map(|t| t.as_str()));
    assert_eq!(Duration::from_millis(100), interval.start_timestamp());

    let bytes = base64::decode(interval.encoded_histogram()).unwrap();
    let restored: crate::Histogram<u64> = Deserializer::new()
        .deserialize(&mut bytes.as_slice())
        .unwrap();
    assert_eq!(restored, h);
}

#[test]
fn max_value_divisor_scales_max_column() {
    let mut h = crate::Histogram::<u64>::new_with_max(u64::max_value(), 3).unwrap();
    h.record(1_000_000).unwrap();

    let mut buf = Vec::new();
    let mut serializer = V2Serializer::new();
    {
        let mut writer = IntervalLogWriterBuilder::new()
            .with_max_value_divisor(1_000_000.0)
            .begin_log_with(&mut buf, &mut serializer)
            .unwrap();
        writer
            .write_histogram(&h, Duration::from_secs(0), Duration::new(1, 0), None)
            .unwrap();
    }

    let interval = IntervalLogIterator::new(&buf)
        .find_map(|e| match e {
            Ok(LogEntry::Interval(ilh)) => Some(ilh),
            _ => None,
        })
        .unwrap();
    // 1.0 (max ~1e6 divided by 1e6), give or take bin rounding
    assert!((interval.max() - 1.0).abs() < 0.01);
}

#[test]
fn iso8601_rendering_is_utc() {
    assert_eq!(
        Some("1970-01-01T00:00:00.000+00:00".to_owned()),
        iso8601_utc(0.0)
    );
    assert_eq!(
        Some("2017-07-14T02:40:40.500+00:00".to_owned()),
        iso8601_utc(1_500_000_040.5)
    );
}

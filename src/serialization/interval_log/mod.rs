//! Reading and writing interval logs.
//!
//! An interval log records a sequence of histograms over time, one line per
//! sampling interval — the natural sink for a `Recorder` that is sampled
//! once a second during a load test, for example. The format is line
//! oriented UTF-8: free-form `#`-prefixed comments and header entries,
//! followed by one record per interval carrying an optional tag, a start
//! timestamp, an interval length, the interval's maximum value, and the
//! base64 of a compressed histogram payload.
//!
//! # Timestamps
//!
//! Two optional header entries qualify how per-interval timestamps should be
//! read. `StartTime` names the instant (seconds since the epoch) the
//! recorded process reached its "start" condition, so consumers can plot
//! intervals relative to it. `BaseTime` re-bases the per-interval
//! timestamps: when present, each interval's timestamp is the number of
//! seconds since BaseTime rather than since the epoch, which keeps the
//! per-line numbers small and readable. Neither affects the payloads; both
//! are surfaced to the consumer as ordinary entries, in file order, to
//! interpret as its data requires.
//!
//! # Examples
//!
//! Parse a log and count the intervals past a cutoff:
//!
//! ```
//! use rangehist::serialization::interval_log;
//!
//! let log = "\
//!     #A comment\n\
//!     Tag=api,0.127,1.007,2.769,base64EncodedHisto\n\
//!     3.456,1.007,2.769,base64EncodedHisto\n"
//!     .as_bytes();
//!
//! let late_intervals = interval_log::IntervalLogIterator::new(&log)
//!     .filter_map(|e| match e {
//!         Ok(interval_log::LogEntry::Interval(ilh)) => Some(ilh),
//!         _ => None,
//!     })
//!     .filter(|ilh| ilh.start_timestamp().as_secs() >= 3)
//!     .count();
//! assert_eq!(1, late_intervals);
//! ```
//!
//! Write a log:
//!
//! ```
//! use std::time;
//! use rangehist::Histogram;
//! use rangehist::serialization::{interval_log, V2DeflateSerializer};
//!
//! let mut h = Histogram::<u64>::new_with_max(3_600_000, 3).unwrap();
//! h.record(12_345).unwrap();
//!
//! let mut buf = Vec::new();
//! let mut serializer = V2DeflateSerializer::new();
//! {
//!     let mut log_writer = interval_log::IntervalLogWriterBuilder::new()
//!         .add_comment("a load test")
//!         .with_start_time(time::SystemTime::now())
//!         .begin_log_with(&mut buf, &mut serializer)
//!         .unwrap();
//!
//!     log_writer
//!         .write_histogram(
//!             &h,
//!             time::Duration::from_millis(100),
//!             time::Duration::new(1, 0),
//!             interval_log::Tag::new("api"),
//!         )
//!         .unwrap();
//! }
//! assert!(buf.starts_with(b"#a load test\n"));
//! ```
//!
//! Reading defers histogram deserialization: the iterator hands out the
//! base64 text so consumers can filter on tags and timestamps cheaply and
//! only decode the records they keep.

use std::error::Error;
use std::fmt::Write as _;
use std::str::{self, FromStr};
use std::{fmt, io, ops, time};

use nom::character::complete::{char, digit1};
use nom::sequence::separated_pair;
use nom::IResult;

use ::time::OffsetDateTime;

use crate::core::counter::Counter;
use crate::Histogram;

use super::Serializer;

const START_TIME_PREFIX: &[u8] = b"#[StartTime: ";
const BASE_TIME_PREFIX: &[u8] = b"#[BaseTime: ";
const TAG_PREFIX: &[u8] = b"Tag=";
const LEGEND: &str =
    "\"StartTimestamp\",\"Interval_Length\",\"Interval_Max\",\"Interval_Compressed_Histogram\"";

/// Prepares an [`IntervalLogWriter`]: collects header comments and
/// timestamps, then converts into a writer with
/// [`IntervalLogWriterBuilder::begin_log_with`].
pub struct IntervalLogWriterBuilder {
    header_comments: Vec<String>,
    start_time: Option<time::SystemTime>,
    base_time: Option<time::SystemTime>,
    max_value_divisor: f64,
}

impl Default for IntervalLogWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalLogWriterBuilder {
    /// Create a builder with no headers configured.
    pub fn new() -> IntervalLogWriterBuilder {
        IntervalLogWriterBuilder {
            header_comments: Vec::new(),
            start_time: None,
            base_time: None,
            max_value_divisor: 1.0,
        }
    }

    /// Add a comment line to write before the headers. Embedded newlines
    /// split the comment into multiple comment lines.
    pub fn add_comment(&mut self, s: &str) -> &mut Self {
        self.header_comments.push(s.to_owned());
        self
    }

    /// Set a StartTime header. See the module documentation.
    ///
    /// The last value set before building wins.
    pub fn with_start_time(&mut self, time: time::SystemTime) -> &mut Self {
        self.start_time = Some(time);
        self
    }

    /// Set a BaseTime header. See the module documentation.
    ///
    /// The last value set before building wins.
    pub fn with_base_time(&mut self, time: time::SystemTime) -> &mut Self {
        self.base_time = Some(time);
        self
    }

    /// Scale the human-readable max-value column down by this divisor (e.g.
    /// 10⁹ to render nanosecond recordings as seconds). Affects only that
    /// column, never the payloads. Defaults to 1.0.
    pub fn with_max_value_divisor(&mut self, max_value_divisor: f64) -> &mut Self {
        self.max_value_divisor = max_value_divisor;
        self
    }

    /// Write the configured headers and the column legend to `writer`, and
    /// return an [`IntervalLogWriter`] that appends interval records
    /// serialized with `serializer`.
    #[allow(clippy::float_cmp)]
    pub fn begin_log_with<'a, 'b, W: 'a + io::Write, S: 'b + Serializer>(
        &self,
        writer: &'a mut W,
        serializer: &'b mut S,
    ) -> Result<IntervalLogWriter<'a, 'b, W, S>, io::Error> {
        let mut log_writer = IntervalLogWriter {
            sink: writer,
            serializer,
            line: String::new(),
            payload: Vec::new(),
            max_value_divisor: self.max_value_divisor,
        };

        for comment in &self.header_comments {
            log_writer.write_comment(comment)?;
        }

        if let Some(start) = self.start_time {
            let seconds = epoch_seconds(start);
            writeln!(
                log_writer.sink,
                "#[StartTime: {:.3} (seconds since epoch), {}]",
                seconds,
                iso8601_utc(seconds).unwrap_or_default(),
            )?;
        }

        if let Some(base) = self.base_time {
            writeln!(
                log_writer.sink,
                "#[BaseTime: {:.3} (seconds since epoch)]",
                epoch_seconds(base),
            )?;
        }

        // scaling the max column without a trace would be confusing
        if self.max_value_divisor != 1.0_f64 {
            writeln!(
                log_writer.sink,
                "#[MaxValueDivisor: {:.3}]",
                self.max_value_divisor,
            )?;
        }

        writeln!(log_writer.sink, "{}", LEGEND)?;

        Ok(log_writer)
    }
}

/// Appends interval histograms to an interval log. Created via
/// [`IntervalLogWriterBuilder`].
pub struct IntervalLogWriter<'a, 'b, W: 'a + io::Write, S: 'b + Serializer> {
    sink: &'a mut W,
    serializer: &'b mut S,
    /// Each record is assembled here in full and written with a single call,
    /// so a failed serialization leaves no partial line behind.
    line: String,
    payload: Vec<u8>,
    max_value_divisor: f64,
}

impl<'a, 'b, W: 'a + io::Write, S: 'b + Serializer> IntervalLogWriter<'a, 'b, W, S> {
    /// Write a comment line. Embedded newlines split the comment into
    /// multiple comment lines.
    pub fn write_comment(&mut self, s: &str) -> io::Result<()> {
        for line in s.split('\n') {
            writeln!(self.sink, "#{}", line)?;
        }
        Ok(())
    }

    /// Write one interval record.
    ///
    /// `start_timestamp` is when the interval began, in seconds since the
    /// epoch — or since the BaseTime, if the log was built with one.
    /// `duration` is the interval's length. `tag`, if given, prefixes the
    /// record so downstream analysis can keep independent series apart in
    /// one log.
    pub fn write_histogram<T: Counter>(
        &mut self,
        h: &Histogram<T>,
        start_timestamp: time::Duration,
        duration: time::Duration,
        tag: Option<Tag>,
    ) -> Result<(), IntervalLogWriterError<S::SerializeError>> {
        // serialize first: nothing reaches the sink if the histogram fails
        self.payload.clear();
        self.serializer
            .serialize(h, &mut self.payload)
            .map_err(IntervalLogWriterError::SerializeError)?;

        self.line.clear();
        if let Some(tag) = tag {
            write!(self.line, "Tag={},", tag.as_str()).expect("String formatting is infallible");
        }
        write!(
            self.line,
            "{:.3},{:.3},{:.3},",
            start_timestamp.as_secs_f64(),
            duration.as_secs_f64(),
            h.max() as f64 / self.max_value_divisor,
        )
        .expect("String formatting is infallible");
        base64::encode_config_buf(&self.payload, base64::STANDARD, &mut self.line);
        self.line.push('\n');

        self.sink.write_all(self.line.as_bytes())?;
        Ok(())
    }
}

/// Errors that can occur while writing a log record.
#[derive(Debug)]
pub enum IntervalLogWriterError<E> {
    /// Histogram serialization failed.
    SerializeError(E),
    /// An i/o error occurred.
    IoError(io::Error),
}

impl<E> From<io::Error> for IntervalLogWriterError<E> {
    fn from(e: io::Error) -> Self {
        IntervalLogWriterError::IoError(e)
    }
}

impl<E: fmt::Display + fmt::Debug> fmt::Display for IntervalLogWriterError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntervalLogWriterError::SerializeError(e) => {
                write!(f, "histogram serialization failed: {}", e)
            }
            IntervalLogWriterError::IoError(e) => write!(f, "an i/o error occurred: {}", e),
        }
    }
}

impl<E: Error + 'static> Error for IntervalLogWriterError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IntervalLogWriterError::SerializeError(e) => Some(e),
            IntervalLogWriterError::IoError(e) => Some(e),
        }
    }
}

/// A tag for an interval record: any string free of `,`, `\r`, `\n`, and
/// space, which are reserved by the line format.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Tag<'a>(&'a str);

impl<'a> Tag<'a> {
    /// Wrap a `str` as a tag, or `None` if it contains a reserved character.
    pub fn new(s: &'a str) -> Option<Tag<'a>> {
        if s.bytes().any(|b| matches!(b, b',' | b' ' | b'\r' | b'\n')) {
            None
        } else {
            Some(Tag(s))
        }
    }

    /// The tag contents as a `str`.
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl<'a> ops::Deref for Tag<'a> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

/// One interval record parsed from a log, histogram payload still encoded.
#[derive(PartialEq, Debug)]
pub struct IntervalLogHistogram<'a> {
    tag: Option<Tag<'a>>,
    start_timestamp: time::Duration,
    duration: time::Duration,
    max: f64,
    encoded_histogram: &'a str,
}

impl<'a> IntervalLogHistogram<'a> {
    /// The record's tag, if any.
    pub fn tag(&self) -> Option<Tag<'a>> {
        self.tag
    }

    /// When the interval began, as a duration since the epoch or since the
    /// log's BaseTime — see the module documentation.
    pub fn start_timestamp(&self) -> time::Duration {
        self.start_timestamp
    }

    /// The length of the interval.
    pub fn duration(&self) -> time::Duration {
        self.duration
    }

    /// The interval's maximum value, as written (i.e. already divided by any
    /// MaxValueDivisor).
    pub fn max(&self) -> f64 {
        self.max
    }

    /// The base64 of the serialized histogram. Decode the base64 and hand
    /// the bytes to a `Deserializer` to recover the histogram.
    pub fn encoded_histogram(&self) -> &'a str {
        self.encoded_histogram
    }
}

/// One non-comment line of an interval log.
#[derive(PartialEq, Debug)]
#[allow(variant_size_differences)]
pub enum LogEntry<'a> {
    /// A StartTime header: seconds since the epoch.
    StartTime(time::Duration),
    /// A BaseTime header: seconds since the epoch.
    BaseTime(time::Duration),
    /// An interval histogram record.
    Interval(IntervalLogHistogram<'a>),
}

/// Errors produced while iterating a log.
#[derive(Debug, PartialEq)]
pub enum LogIteratorError {
    /// A line could not be parsed.
    ParseError {
        /// Offset into the input where the unparseable content starts.
        offset: usize,
    },
}

/// A lazy iterator over the entries of an interval log.
///
/// The input is consumed one `\n`-terminated line at a time; comments, the
/// column legend, and unknown header lines are skipped, and everything else
/// is surfaced as a [`LogEntry`] in file order. Parsing works over a
/// complete in-memory slice (which an mmap'd file satisfies nicely), and
/// since payloads stay encoded until the consumer asks, skimming a large log
/// for the right tag or time range costs almost nothing. The iterator is
/// restartable by constructing a new one over the same slice.
pub struct IntervalLogIterator<'a> {
    input: &'a [u8],
    /// Bytes handed out so far; reported as the offset of a parse failure.
    consumed: usize,
    failed: bool,
}

impl<'a> IntervalLogIterator<'a> {
    /// Create a new iterator over the UTF-8 bytes of an interval log.
    pub fn new(input: &'a [u8]) -> IntervalLogIterator<'a> {
        IntervalLogIterator {
            input,
            consumed: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for IntervalLogIterator<'a> {
    type Item = Result<LogEntry<'a>, LogIteratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed || self.input.is_empty() {
                return None;
            }

            // a trailing fragment with no terminator is not a valid line
            let (line, rest) = match take_line(self.input) {
                Some(split) => split,
                None => {
                    self.failed = true;
                    return Some(Err(LogIteratorError::ParseError {
                        offset: self.consumed,
                    }));
                }
            };
            let advance = line.len() + 1;
            self.input = rest;

            match classify(line) {
                Line::Entry(entry) => {
                    self.consumed += advance;
                    return Some(Ok(entry));
                }
                Line::Skipped => {
                    self.consumed += advance;
                }
                Line::Unrecognized => {
                    self.failed = true;
                    return Some(Err(LogIteratorError::ParseError {
                        offset: self.consumed,
                    }));
                }
            }
        }
    }
}

enum Line<'a> {
    Entry(LogEntry<'a>),
    Skipped,
    Unrecognized,
}

/// Split off the first line (without its `\n`).
fn take_line(input: &[u8]) -> Option<(&[u8], &[u8])> {
    let end = input.iter().position(|&b| b == b'\n')?;
    Some((&input[..end], &input[end + 1..]))
}

fn classify(line: &[u8]) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(START_TIME_PREFIX) {
        // a magic header that fails to parse is treated as a plain comment
        if let Some((seconds, _)) = fract_seconds(rest) {
            return Line::Entry(LogEntry::StartTime(seconds));
        }
    } else if let Some(rest) = line.strip_prefix(BASE_TIME_PREFIX) {
        if let Some((seconds, _)) = fract_seconds(rest) {
            return Line::Entry(LogEntry::BaseTime(seconds));
        }
    }

    if line.first() == Some(&b'#') || line.starts_with(b"\"StartTimestamp\"") {
        return Line::Skipped;
    }

    match interval_record(line) {
        Some(entry) => Line::Entry(entry),
        None => Line::Unrecognized,
    }
}

/// Parse `[Tag=<tag>,]<start>,<length>,<max>,<base64>` by splitting the
/// fields at their commas. The base64 alphabet contains no comma, so the
/// encoded payload is simply the remainder of the line.
fn interval_record(line: &[u8]) -> Option<LogEntry<'_>> {
    let (tag, rest) = match line.strip_prefix(TAG_PREFIX) {
        Some(tagged) => {
            let (tag, rest) = split_at_comma(tagged)?;
            (Some(Tag(str::from_utf8(tag).ok()?)), rest)
        }
        None => (None, line),
    };

    let (start_timestamp, rest) = fract_seconds(rest)?;
    let rest = expect_byte(rest, b',')?;
    let (duration, rest) = fract_seconds(rest)?;
    let rest = expect_byte(rest, b',')?;
    let (max_field, encoded) = split_at_comma(rest)?;
    let max = f64::from_str(str::from_utf8(max_field).ok()?).ok()?;
    let encoded_histogram = str::from_utf8(encoded).ok()?;

    Some(LogEntry::Interval(IntervalLogHistogram {
        tag,
        start_timestamp,
        duration,
        max,
        encoded_histogram,
    }))
}

fn split_at_comma(input: &[u8]) -> Option<(&[u8], &[u8])> {
    let comma = input.iter().position(|&b| b == b',')?;
    Some((&input[..comma], &input[comma + 1..]))
}

fn expect_byte(input: &[u8], byte: u8) -> Option<&[u8]> {
    if input.first() == Some(&byte) {
        Some(&input[1..])
    } else {
        None
    }
}

/// Parse a `<digits>.<digits>` timestamp into a `Duration`, returning the
/// unparsed remainder. Fractional digits past nanosecond precision are
/// ignored.
fn fract_seconds(input: &[u8]) -> Option<(time::Duration, &[u8])> {
    let parsed: IResult<&[u8], (&[u8], &[u8])> =
        separated_pair(digit1, char('.'), digit1)(input);
    let (rest, (secs_digits, frac_digits)) = parsed.ok()?;

    let secs = u64::from_str(str::from_utf8(secs_digits).ok()?).ok()?;

    let nanos_digits = &frac_digits[..frac_digits.len().min(9)];
    let mut nanos = u32::from_str(str::from_utf8(nanos_digits).ok()?).ok()?;
    for _ in nanos_digits.len()..9 {
        nanos *= 10;
    }

    Some((time::Duration::new(secs, nanos), rest))
}

fn epoch_seconds(time: time::SystemTime) -> f64 {
    match time.duration_since(time::UNIX_EPOCH) {
        Ok(after_epoch) => after_epoch.as_secs_f64(),
        // a negative number is a reasonable rendering of a pre-epoch time
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// Render fractional epoch seconds as an ISO-8601 UTC datetime, or `None`
/// when out of the representable calendar range.
fn iso8601_utc(seconds_since_epoch: f64) -> Option<String> {
    let whole = seconds_since_epoch.floor();
    let mut millis = ((seconds_since_epoch - whole) * 1000.0).round() as u32;
    let mut whole = whole as i64;
    if millis >= 1000 {
        millis -= 1000;
        whole += 1;
    }
    let dt = OffsetDateTime::from_unix_timestamp(whole).ok()?;
    Some(format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}+00:00",
        dt.year(),
        dt.month() as u8,
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        millis,
    ))
}

#[cfg(test)]
mod tests;

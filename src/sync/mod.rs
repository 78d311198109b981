//! Concurrent recording with consistent interval snapshots.
//!
//! Three layers build on each other here:
//!
//! - [`WriterReaderPhaser`], a synchronization primitive that lets any number
//!   of wait-free writers flow through a critical section while a single
//!   reader can, when it needs to, wait out every writer that entered before
//!   a chosen instant ("flipping the phase").
//! - [`ConcurrentHistogram`], a histogram whose record path is a couple of
//!   atomic adds inside a phaser critical section: no locks, no waiting on
//!   readers, O(1) per record from unboundedly many threads.
//! - [`Recorder`], a cloneable handle that producers record through while a
//!   consumer repeatedly calls [`Recorder::sample`] to receive the records
//!   of exactly one interval at a time, without ever pausing the producers.
//!
//! The phaser follows the classic writer-reader phaser construction: writers
//! bump a start epoch on entry and one of two end epochs (chosen by the phase
//! observed at entry) on exit; the reader flips which end epoch new writers
//! will target and then spins until the old phase's end epoch has caught up
//! with the start epoch captured at the flip. At that point every writer that
//! entered before the flip has left, and whatever the reader re-pointed while
//! flipping is safe to read.

use crate::core::counter::Counter;
use crate::core::layout::ValueLayout;
use crate::errors::{AdditionError, CreationError, RecordError, ShiftError, SubtractionError};
use crate::Histogram;
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};
use std::thread;

/// How long [`PhaseGuard::flip`] sleeps between spins while waiting for
/// in-flight writers to drain.
const DEFAULT_FLIP_YIELD: Duration = Duration::from_micros(500);

/// Coordinates wait-free writers with a phase-flipping reader.
///
/// Writers bracket their critical sections with [`writer_enter`] and
/// [`writer_exit`]; both are a single atomic fetch-add and never block. A
/// reader takes the (reader-exclusive) lock with [`read`] and may then flip
/// the phase to wait out all writers that entered before the flip.
///
/// [`writer_enter`]: WriterReaderPhaser::writer_enter
/// [`writer_exit`]: WriterReaderPhaser::writer_exit
/// [`read`]: WriterReaderPhaser::read
#[derive(Debug)]
pub struct WriterReaderPhaser {
    start_epoch: AtomicI64,
    even_end_epoch: AtomicI64,
    odd_end_epoch: AtomicI64,
    reader_gate: Mutex<()>,
}

/// Proof that a writer entered the phaser; hand it back to
/// [`WriterReaderPhaser::writer_exit`].
#[derive(Debug, Clone, Copy)]
#[must_use = "a writer that never exits stalls every future phase flip"]
pub struct WriterToken(i64);

/// Exclusive reader access to a [`WriterReaderPhaser`]; released on drop.
#[derive(Debug)]
pub struct PhaseGuard<'a> {
    phaser: &'a WriterReaderPhaser,
    _gate: MutexGuard<'a, ()>,
}

impl Default for WriterReaderPhaser {
    fn default() -> Self {
        Self::new()
    }
}

impl WriterReaderPhaser {
    /// Create a phaser starting in the even phase with no writers in flight.
    pub fn new() -> WriterReaderPhaser {
        WriterReaderPhaser {
            start_epoch: AtomicI64::new(0),
            even_end_epoch: AtomicI64::new(0),
            odd_end_epoch: AtomicI64::new(i64::min_value()),
            reader_gate: Mutex::new(()),
        }
    }

    /// Enter a writer critical section. Wait-free.
    pub fn writer_enter(&self) -> WriterToken {
        WriterToken(self.start_epoch.fetch_add(1, Ordering::SeqCst))
    }

    /// Exit a writer critical section. Wait-free.
    pub fn writer_exit(&self, token: WriterToken) {
        // the token's sign says which phase the writer entered during
        let end_epoch = if token.0 < 0 {
            &self.odd_end_epoch
        } else {
            &self.even_end_epoch
        };
        end_epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Acquire reader access. Readers exclude each other; writers are never
    /// affected.
    pub fn read(&self) -> PhaseGuard<'_> {
        PhaseGuard {
            phaser: self,
            _gate: self.reader_gate.lock().unwrap(),
        }
    }
}

impl<'a> PhaseGuard<'a> {
    /// Flip the phase and wait until every writer that entered before the
    /// flip has exited, sleeping [`DEFAULT_FLIP_YIELD`] between spins.
    pub fn flip(&self) {
        self.flip_with_yield(DEFAULT_FLIP_YIELD)
    }

    /// Like [`PhaseGuard::flip`], with a caller-chosen spin sleep. A zero
    /// duration yields the thread instead of sleeping.
    pub fn flip_with_yield(&self, yield_period: Duration) {
        let phaser = self.phaser;
        let next_phase_is_even = phaser.start_epoch.load(Ordering::SeqCst) < 0;

        // reset the end epoch writers of the *next* phase will increment
        let initial_start_value = if next_phase_is_even {
            0
        } else {
            i64::min_value()
        };
        if next_phase_is_even {
            phaser.even_end_epoch.store(initial_start_value, Ordering::SeqCst);
        } else {
            phaser.odd_end_epoch.store(initial_start_value, Ordering::SeqCst);
        }

        // roll writers over to the next phase, capturing how many entered the
        // phase now ending
        let start_value_at_flip = phaser
            .start_epoch
            .swap(initial_start_value, Ordering::SeqCst);

        // wait for every writer from the ending phase to leave
        let ending_phase_end_epoch = if next_phase_is_even {
            &phaser.odd_end_epoch
        } else {
            &phaser.even_end_epoch
        };
        while ending_phase_end_epoch.load(Ordering::SeqCst) != start_value_at_flip {
            if yield_period == Duration::from_secs(0) {
                thread::yield_now();
            } else {
                thread::sleep(yield_period);
            }
        }
    }
}

/// A histogram of `u64` samples that any number of threads may record into
/// concurrently, wait-free.
///
/// Counts live in two atomic arrays; writers stream into whichever array is
/// active, inside a phaser critical section. Reader-class operations
/// ([`add`], [`subtract`], [`reset`], [`copy_counts_into`], the shift
/// operations, and [`Recorder`] sampling) serialize on the phaser's reader
/// lock, and the ones that re-point writers flip the phase so the array they
/// are about to touch is quiescent.
///
/// Point reads ([`total_count`], [`count_at`]) are lock-free and see a
/// momentary view that may be mid-update; take a [`snapshot`] (or sample via
/// a [`Recorder`]) for an internally consistent picture.
///
/// [`add`]: ConcurrentHistogram::add
/// [`subtract`]: ConcurrentHistogram::subtract
/// [`reset`]: ConcurrentHistogram::reset
/// [`copy_counts_into`]: ConcurrentHistogram::copy_counts_into
/// [`total_count`]: ConcurrentHistogram::total_count
/// [`count_at`]: ConcurrentHistogram::count_at
/// [`snapshot`]: ConcurrentHistogram::snapshot
#[derive(Debug)]
pub struct ConcurrentHistogram {
    layout: ValueLayout,
    counts: [Box<[AtomicU64]>; 2],
    /// Normalizing rotation for each counts array, in slots. Mutated only
    /// under the reader lock while the owning array is quiescent.
    offsets: [AtomicUsize; 2],
    /// Which entry of `counts` writers stream into. Swapped only under the
    /// reader lock.
    active: AtomicUsize,
    total_count: AtomicU64,
    phaser: WriterReaderPhaser,
}

fn atomic_slots(len: usize) -> Box<[AtomicU64]> {
    let mut slots = Vec::with_capacity(len);
    slots.resize_with(len, || AtomicU64::new(0));
    slots.into()
}

/// `(index - offset) mod len` in the non-negative representative, without a
/// division.
fn normalize(index: usize, offset: usize, len: usize) -> usize {
    if offset == 0 {
        return index;
    }
    let mut physical = index + len - offset;
    if physical >= len {
        physical -= len;
    }
    physical
}

impl ConcurrentHistogram {
    /// Construct a concurrent histogram covering `[1, highest_trackable]` at
    /// `significant_digits` decimal digits of precision.
    pub fn new_with_max(
        highest_trackable: u64,
        significant_digits: u8,
    ) -> Result<ConcurrentHistogram, CreationError> {
        Self::new_with_bounds(1, highest_trackable, significant_digits)
    }

    /// Construct a concurrent histogram covering
    /// `[lowest_discernible, highest_trackable]` at `significant_digits`
    /// decimal digits of precision. Parameters as for
    /// [`Histogram::new_with_bounds`].
    pub fn new_with_bounds(
        lowest_discernible: u64,
        highest_trackable: u64,
        significant_digits: u8,
    ) -> Result<ConcurrentHistogram, CreationError> {
        let layout = ValueLayout::new(lowest_discernible, highest_trackable, significant_digits)?;
        let len = layout.counts_len();
        Ok(ConcurrentHistogram {
            layout,
            counts: [atomic_slots(len), atomic_slots(len)],
            offsets: [AtomicUsize::new(0), AtomicUsize::new(0)],
            active: AtomicUsize::new(0),
            total_count: AtomicU64::new(0),
            phaser: WriterReaderPhaser::new(),
        })
    }

    /// The total number of samples recorded and not yet drained by sampling.
    pub fn total_count(&self) -> u64 {
        self.total_count.load(Ordering::Relaxed)
    }

    /// The number of samples in the bin holding `value`. Values beyond the
    /// trackable range report the nearest tracked bin.
    pub fn count_at(&self, value: u64) -> u64 {
        let len = self.counts[0].len();
        let index = self.layout.index_for(value).min(len - 1);
        let mut count = 0_u64;
        for slot in 0..2 {
            let offset = self.offsets[slot].load(Ordering::Relaxed);
            count = count.saturating_add(
                self.counts[slot][normalize(index, offset, len)].load(Ordering::Relaxed),
            );
        }
        count
    }

    /// Record a single occurrence of `value`. Wait-free.
    pub fn record(&self, value: u64) -> Result<(), RecordError> {
        self.record_n(value, 1)
    }

    /// Record `count` occurrences of `value`. Wait-free.
    pub fn record_n(&self, value: u64, count: u64) -> Result<(), RecordError> {
        let len = self.counts[0].len();
        let index = self.layout.index_for(value);
        if index >= len {
            return Err(RecordError::ValueOutOfRange);
        }

        let token = self.phaser.writer_enter();
        let slot = self.active.load(Ordering::Acquire);
        let offset = self.offsets[slot].load(Ordering::Relaxed);
        self.counts[slot][normalize(index, offset, len)].fetch_add(count, Ordering::Relaxed);
        self.total_count.fetch_add(count, Ordering::Relaxed);
        self.phaser.writer_exit(token);
        Ok(())
    }

    /// Record `value` with coordinated-omission back-fill, as
    /// [`Histogram::record_correct`]. The whole correction chain runs in one
    /// writer critical section.
    pub fn record_correct(&self, value: u64, expected_interval: u64) -> Result<(), RecordError> {
        let len = self.counts[0].len();
        if self.layout.index_for(value) >= len {
            return Err(RecordError::ValueOutOfRange);
        }

        let token = self.phaser.writer_enter();
        let slot = self.active.load(Ordering::Acquire);
        let offset = self.offsets[slot].load(Ordering::Relaxed);
        let mut recorded = 0_u64;
        let mut value = value;
        loop {
            // back-filled values only get smaller, so indexes stay in range
            let index = normalize(self.layout.index_for(value), offset, len);
            self.counts[slot][index].fetch_add(1, Ordering::Relaxed);
            recorded += 1;
            if expected_interval == 0 {
                break;
            }
            match value.checked_sub(expected_interval) {
                Some(missing) if missing >= expected_interval => value = missing,
                _ => break,
            }
        }
        self.total_count.fetch_add(recorded, Ordering::Relaxed);
        self.phaser.writer_exit(token);
        Ok(())
    }

    /// Merge a plain histogram's counts into this one.
    ///
    /// Runs as a reader so the active array cannot be swapped out from under
    /// it, but does not pause writers; the merged counts appear in the
    /// interval that is active while it runs.
    pub fn add<C: Counter>(&self, other: &Histogram<C>) -> Result<(), AdditionError> {
        let len = self.counts[0].len();
        let top = self
            .layout
            .highest_equivalent(self.layout.value_for(len - 1));
        if top < other.max() {
            return Err(AdditionError::RangeExceeded);
        }

        let _guard = self.phaser.read();
        let slot = self.active.load(Ordering::Acquire);
        let offset = self.offsets[slot].load(Ordering::Relaxed);
        let same_layout = self.layout == *other.layout();

        let mut merged = 0_u64;
        for i in 0..other.bin_count() {
            let count = match other.count_at_index(i) {
                Some(c) => c.as_u64(),
                None => break,
            };
            if count != 0 {
                let index = if same_layout {
                    i
                } else {
                    let value = other.median_equivalent(other.value_for(i));
                    let index = self.layout.index_for(value);
                    if index >= len {
                        return Err(AdditionError::RangeExceeded);
                    }
                    index
                };
                self.counts[slot][normalize(index, offset, len)]
                    .fetch_add(count, Ordering::Relaxed);
                merged = merged.saturating_add(count);
            }
        }
        self.total_count.fetch_add(merged, Ordering::Relaxed);
        Ok(())
    }

    /// Remove a plain histogram's counts from this one.
    ///
    /// The combined counts are validated first; on `WouldUnderflow` nothing
    /// has been changed. Concurrent recording can only add, so validated
    /// headroom cannot disappear mid-application.
    pub fn subtract<C: Counter>(&self, other: &Histogram<C>) -> Result<(), SubtractionError> {
        let len = self.counts[0].len();
        let top = self
            .layout
            .highest_equivalent(self.layout.value_for(len - 1));
        if top < other.max() {
            return Err(SubtractionError::RangeExceeded);
        }

        let _guard = self.phaser.read();

        // fold the subtrahend into per-bin deltas in our logical index space
        let mut deltas = vec![0_u64; len];
        let same_layout = self.layout == *other.layout();
        for i in 0..other.bin_count() {
            let count = match other.count_at_index(i) {
                Some(c) => c.as_u64(),
                None => break,
            };
            if count != 0 {
                let index = if same_layout {
                    i
                } else {
                    let value = other.median_equivalent(other.value_for(i));
                    let index = self.layout.index_for(value);
                    if index >= len {
                        return Err(SubtractionError::RangeExceeded);
                    }
                    index
                };
                deltas[index] = deltas[index].saturating_add(count);
            }
        }

        let active = self.active.load(Ordering::Acquire);
        let inactive = 1 - active;
        let offsets = [
            self.offsets[0].load(Ordering::Relaxed),
            self.offsets[1].load(Ordering::Relaxed),
        ];

        // validate against the combined arrays before touching either
        for (index, delta) in deltas.iter().enumerate() {
            if *delta != 0 {
                let available = self.counts[active][normalize(index, offsets[active], len)]
                    .load(Ordering::Relaxed)
                    .saturating_add(
                        self.counts[inactive][normalize(index, offsets[inactive], len)]
                            .load(Ordering::Relaxed),
                    );
                if available < *delta {
                    return Err(SubtractionError::WouldUnderflow);
                }
            }
        }

        // drain the inactive (writer-free) array first, then take the rest
        // from the active one; concurrent adds only grow what was validated
        let mut removed = 0_u64;
        for (index, delta) in deltas.iter().enumerate() {
            if *delta != 0 {
                let stable = &self.counts[inactive][normalize(index, offsets[inactive], len)];
                let held = stable.load(Ordering::Relaxed);
                let from_stable = held.min(*delta);
                if from_stable > 0 {
                    stable.store(held - from_stable, Ordering::Relaxed);
                }
                let rest = delta - from_stable;
                if rest > 0 {
                    self.counts[active][normalize(index, offsets[active], len)]
                        .fetch_sub(rest, Ordering::Relaxed);
                }
                removed = removed.saturating_add(*delta);
            }
        }
        self.total_count.fetch_sub(removed, Ordering::Relaxed);
        Ok(())
    }

    /// Zero every counter and the total.
    ///
    /// Records racing with the reset may land before or after it and be
    /// cleared or kept accordingly; quiesce producers first if that matters.
    pub fn reset(&self) {
        let guard = self.phaser.read();
        guard.flip();
        for slot in 0..2 {
            for counter in self.counts[slot].iter() {
                counter.store(0, Ordering::Relaxed);
            }
            self.offsets[slot].store(0, Ordering::Relaxed);
        }
        self.total_count.store(0, Ordering::Relaxed);
    }

    /// Copy the combined counts into `target`, replacing its contents and
    /// recomputing its statistics. `target` must share this histogram's
    /// configuration (it is re-created if it does not).
    pub fn copy_counts_into(&self, target: &mut Histogram<u64>) {
        if *target.layout() != self.layout {
            *target = Histogram::from_layout(self.layout);
        } else {
            target.reset();
        }

        let _guard = self.phaser.read();
        let len = self.counts[0].len();
        let offsets = [
            self.offsets[0].load(Ordering::Relaxed),
            self.offsets[1].load(Ordering::Relaxed),
        ];
        for index in 0..len {
            let mut count = 0_u64;
            for slot in 0..2 {
                count = count.saturating_add(
                    self.counts[slot][normalize(index, offsets[slot], len)]
                        .load(Ordering::Relaxed),
                );
            }
            if count != 0 {
                let _ = target.set_count_at_index(index, count);
            }
        }
        target.refresh_stats();
    }

    /// An internally consistent copy of the current counts as a plain
    /// histogram.
    pub fn snapshot(&self) -> Histogram<u64> {
        let mut h = Histogram::from_layout(self.layout);
        self.copy_counts_into(&mut h);
        h
    }

    /// Shift the recorded distribution `slots` bins toward larger values by
    /// rotating the normalizing offsets, without copying counts.
    ///
    /// Fails with `ShiftError` if non-zero counts would rotate past the top
    /// of the array, leaving the distribution unchanged. Safe under
    /// concurrent recording.
    pub fn shift_values_left(&self, slots: usize) -> Result<(), ShiftError> {
        self.shift(slots, true)
    }

    /// Shift the recorded distribution `slots` bins toward smaller values.
    /// The mirror image of [`ConcurrentHistogram::shift_values_left`].
    pub fn shift_values_right(&self, slots: usize) -> Result<(), ShiftError> {
        self.shift(slots, false)
    }

    fn shift(&self, slots: usize, toward_larger: bool) -> Result<(), ShiftError> {
        let len = self.counts[0].len();
        if slots == 0 {
            return Ok(());
        }
        if slots >= len {
            return Err(ShiftError::OverflowedRange);
        }

        let guard = self.phaser.read();

        // Both arrays contribute to the distribution, so both offsets must
        // rotate; an offset may only change while its array is quiescent.
        // Swap so the first array drains of in-flight writers.
        let first = self.active.load(Ordering::Acquire);
        let second = 1 - first;
        self.active.store(second, Ordering::Release);
        guard.flip();

        // The bins that would rotate off the edge must be empty in both
        // arrays, checked before either offset moves. (A record racing into
        // a doomed bin of the still-active array is the caller's race, as
        // with any shift concurrent with out-of-range recording.)
        let doomed = if toward_larger {
            len - slots..len
        } else {
            0..slots
        };
        for &slot in &[first, second] {
            let offset = self.offsets[slot].load(Ordering::Relaxed);
            for index in doomed.clone() {
                if self.counts[slot][normalize(index, offset, len)].load(Ordering::Relaxed) != 0 {
                    return Err(ShiftError::OverflowedRange);
                }
            }
        }

        let rotate = |slot: usize| {
            let offset = self.offsets[slot].load(Ordering::Relaxed);
            let mut rotated = if toward_larger {
                offset + slots
            } else {
                offset + len - slots
            };
            if rotated >= len {
                rotated -= len;
            }
            self.offsets[slot].store(rotated, Ordering::Relaxed);
        };

        // rotate the quiesced array, re-point writers at it, then quiesce and
        // rotate the other
        rotate(first);
        self.active.store(first, Ordering::Release);
        guard.flip();
        rotate(second);
        Ok(())
    }

    pub(crate) fn layout(&self) -> &ValueLayout {
        &self.layout
    }

    /// Swap, quiesce, and drain the previous interval's counts into `target`
    /// (which the caller has already reset). Total count is reduced by the
    /// amount drained, so consecutive drains partition the record stream.
    fn drain_into(&self, target: &mut Histogram<u64>) {
        let guard = self.phaser.read();

        let quiesced = self.active.load(Ordering::Acquire);
        self.active.store(1 - quiesced, Ordering::Release);
        guard.flip();

        let len = self.counts[quiesced].len();
        let offset = self.offsets[quiesced].load(Ordering::Relaxed);
        let mut drained = 0_u64;
        for index in 0..len {
            let count =
                self.counts[quiesced][normalize(index, offset, len)].swap(0, Ordering::Relaxed);
            if count != 0 {
                let _ = target.set_count_at_index(index, count);
                drained = drained.saturating_add(count);
            }
        }
        self.total_count.fetch_sub(drained, Ordering::Relaxed);
        target.refresh_stats();
    }
}

/// A cloneable recording handle over a shared [`ConcurrentHistogram`] that
/// supports interval sampling.
///
/// Producers record through any clone of the recorder; a consumer calls
/// [`Recorder::sample`] (or [`Recorder::sample_into`], recycling an interval
/// histogram) to receive everything recorded since the previous sample.
/// Every record lands in exactly one sampled interval: writers that raced
/// with the swap are waited out by the phase flip before the interval is
/// read.
///
/// ```
/// use rangehist::sync::Recorder;
///
/// let recorder = Recorder::new_with_max(3_600_000, 3).unwrap();
/// let writer = recorder.clone();
/// writer.record(42).unwrap();
///
/// let interval = recorder.sample();
/// assert_eq!(interval.total_count(), 1);
/// assert_eq!(recorder.sample().total_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Recorder {
    shared: Arc<RecorderShared>,
}

#[derive(Debug)]
struct RecorderShared {
    hist: ConcurrentHistogram,
    /// When the interval now being recorded began.
    interval_start: Mutex<SystemTime>,
}

impl Recorder {
    /// Construct a recorder covering `[1, highest_trackable]` at
    /// `significant_digits` decimal digits of precision.
    pub fn new_with_max(
        highest_trackable: u64,
        significant_digits: u8,
    ) -> Result<Recorder, CreationError> {
        Self::new_with_bounds(1, highest_trackable, significant_digits)
    }

    /// Construct a recorder covering `[lowest_discernible, highest_trackable]`
    /// at `significant_digits` decimal digits of precision.
    pub fn new_with_bounds(
        lowest_discernible: u64,
        highest_trackable: u64,
        significant_digits: u8,
    ) -> Result<Recorder, CreationError> {
        let hist =
            ConcurrentHistogram::new_with_bounds(lowest_discernible, highest_trackable, significant_digits)?;
        Ok(Recorder {
            shared: Arc::new(RecorderShared {
                hist,
                interval_start: Mutex::new(SystemTime::now()),
            }),
        })
    }

    /// The shared histogram this recorder records into.
    pub fn histogram(&self) -> &ConcurrentHistogram {
        &self.shared.hist
    }

    /// Record a single occurrence of `value`. Wait-free.
    pub fn record(&self, value: u64) -> Result<(), RecordError> {
        self.shared.hist.record(value)
    }

    /// Record `count` occurrences of `value`. Wait-free.
    pub fn record_n(&self, value: u64, count: u64) -> Result<(), RecordError> {
        self.shared.hist.record_n(value, count)
    }

    /// Record with coordinated-omission back-fill. See
    /// [`Histogram::record_correct`].
    pub fn record_correct(&self, value: u64, expected_interval: u64) -> Result<(), RecordError> {
        self.shared.hist.record_correct(value, expected_interval)
    }

    /// Take the current interval: returns a histogram holding every record
    /// since the previous sample (or since construction), stamped with the
    /// interval's start and end times.
    pub fn sample(&self) -> Histogram<u64> {
        let mut interval = Histogram::from_layout(*self.shared.hist.layout());
        self.sample_into(&mut interval);
        interval
    }

    /// Like [`Recorder::sample`], but recycles `interval` instead of
    /// allocating. Its previous contents are discarded (and it is re-created
    /// if its configuration does not match the recorder's).
    pub fn sample_into(&self, interval: &mut Histogram<u64>) {
        if *interval.layout() != *self.shared.hist.layout() {
            *interval = Histogram::from_layout(*self.shared.hist.layout());
        } else {
            interval.reset();
        }

        let mut started = self.shared.interval_start.lock().unwrap();
        self.shared.hist.drain_into(interval);
        let now = SystemTime::now();
        interval.set_start_timestamp(*started);
        interval.set_end_timestamp(now);
        *started = now;
    }
}

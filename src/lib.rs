//! `rangehist` records non-negative integer samples across a large,
//! configurable value range while holding a configurable relative error, and
//! answers quantile queries over what it saw. The memory footprint is fixed at
//! construction: recording is a handful of bit operations and one counter
//! increment, with no allocation on the hot path, which makes the histogram
//! suitable for latency measurement in performance-sensitive code.
//!
//! The value range is covered by exponentially growing buckets, each split
//! into linearly spaced sub-buckets, so a histogram tracking `[1, 3.6e9]`
//! at 3 significant digits distinguishes 1 from 2 at the bottom of the range
//! and still resolves the top of the range to better than one part in a
//! thousand — using a few hundred kilobytes no matter how many samples are
//! recorded.
//!
//! # Recording and querying
//!
//! ```
//! use rangehist::Histogram;
//!
//! let mut hist = Histogram::<u64>::new_with_max(60 * 60 * 1000, 2).unwrap();
//!
//! hist.record(54_321).expect("value fits the configured range");
//! // or, for ergonomics (panics on out-of-range values):
//! hist += 54_321;
//!
//! assert_eq!(hist.total_count(), 2);
//! assert!(hist.equivalent(54_321, hist.value_at_percentile(99.9)));
//! ```
//!
//! The counter type parameter trades memory for overflow headroom: `u64`
//! counters never realistically overflow, while `u32` or `u16` halve or
//! quarter the footprint at the cost of `CounterOverflow` errors when a bin
//! saturates.
//!
//! # Coordinated omission
//!
//! A sampling loop that stalls under-reports long events: while one long
//! operation is in flight, the samples that *would* have been taken are never
//! recorded. [`Histogram::record_correct`] compensates at record time by
//! back-filling one sample per missed interval, and
//! [`Histogram::corrected_clone`] applies the same correction after the fact.
//!
//! # Concurrency
//!
//! `Histogram` itself is not thread-safe (it can be sent between threads, but
//! mixed access needs external synchronization). The [`sync`] module provides
//! a [`sync::ConcurrentHistogram`] with wait-free recording from any number of
//! threads and a [`sync::Recorder`] that hands consumers consistent interval
//! snapshots without pausing producers.
//!
//! # Persistence
//!
//! The [`serialization`] module implements a compact binary payload format
//! (plain and zlib-compressed) and a line-oriented interval log for streaming
//! sequences of histograms to disk and back.

use std::borrow::Borrow;
use std::cmp;
use std::ops::AddAssign;
use std::time::SystemTime;

pub mod core;
pub mod errors;
pub mod iterators;
#[cfg(feature = "serialization")]
pub mod serialization;
#[cfg(feature = "sync")]
pub mod sync;

#[cfg(test)]
mod tests;

pub use crate::core::counter::Counter;
pub use crate::errors::{
    AdditionError, CreationError, RecordError, ShiftError, SubtractionError,
};

use crate::core::layout::ValueLayout;
use crate::iterators::HistogramIterator;

/// A histogram of `u64` samples with a fixed memory footprint, bounded
/// relative error, and per-bin counters of type `C`.
///
/// See the crate-level documentation for an overview.
#[derive(Debug, Clone)]
pub struct Histogram<C: Counter> {
    layout: ValueLayout,

    // internal unit-equivalent forms; see `update_max` / `update_min_nonzero`
    max_value: u64,
    min_non_zero_value: u64,

    total_count: u64,
    counts: Vec<C>,

    start_timestamp: Option<SystemTime>,
    end_timestamp: Option<SystemTime>,
    tag: Option<String>,
    instance_id: Option<u64>,
}

// construction

impl<C: Counter> Histogram<C> {
    /// Construct a histogram covering `[1, highest_trackable]` at
    /// `significant_digits` decimal digits of precision.
    ///
    /// `highest_trackable` must be at least 2; `significant_digits` must be
    /// in `[0, 5]`.
    pub fn new_with_max(
        highest_trackable: u64,
        significant_digits: u8,
    ) -> Result<Histogram<C>, CreationError> {
        Self::new_with_bounds(1, highest_trackable, significant_digits)
    }

    /// Construct a histogram covering `[lowest_discernible, highest_trackable]`
    /// at `significant_digits` decimal digits of precision.
    ///
    /// Raising `lowest_discernible` above 1 shrinks the allocation when the
    /// value units are much finer than the needed accuracy, e.g. tracking
    /// nanosecond values with microsecond precision would use a lowest
    /// discernible value of 1000. It must be at least 1 and no more than half
    /// of `highest_trackable`.
    pub fn new_with_bounds(
        lowest_discernible: u64,
        highest_trackable: u64,
        significant_digits: u8,
    ) -> Result<Histogram<C>, CreationError> {
        let layout = ValueLayout::new(lowest_discernible, highest_trackable, significant_digits)?;
        let len = layout.counts_len();
        Ok(Histogram {
            layout,
            max_value: 0,
            min_non_zero_value: u64::max_value(),
            total_count: 0,
            counts: vec![C::zero(); len],
            start_timestamp: None,
            end_timestamp: None,
            tag: None,
            instance_id: None,
        })
    }

    /// Construct an empty histogram with the same value range, precision, and
    /// metadata as `source` (but none of its counts).
    pub fn new_from<F: Counter>(source: &Histogram<F>) -> Histogram<C> {
        Histogram {
            layout: source.layout,
            max_value: 0,
            min_non_zero_value: u64::max_value(),
            total_count: 0,
            counts: vec![C::zero(); source.counts.len()],
            start_timestamp: source.start_timestamp,
            end_timestamp: source.end_timestamp,
            tag: source.tag.clone(),
            instance_id: source.instance_id,
        }
    }

    pub(crate) fn from_layout(layout: ValueLayout) -> Histogram<C> {
        let len = layout.counts_len();
        Histogram {
            layout,
            max_value: 0,
            min_non_zero_value: u64::max_value(),
            total_count: 0,
            counts: vec![C::zero(); len],
            start_timestamp: None,
            end_timestamp: None,
            tag: None,
            instance_id: None,
        }
    }
}

// configuration accessors

impl<C: Counter> Histogram<C> {
    /// The configured lowest discernible value.
    pub fn lowest_discernible(&self) -> u64 {
        self.layout.lowest_discernible
    }

    /// The configured highest trackable value.
    pub fn highest_trackable(&self) -> u64 {
        self.layout.highest_trackable
    }

    /// The configured number of significant decimal digits.
    pub fn significant_digits(&self) -> u8 {
        self.layout.significant_digits
    }

    /// The number of distinct bins the histogram maintains.
    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// The total number of samples recorded.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }
}

// metadata

impl<C: Counter> Histogram<C> {
    /// When this histogram's recording window began, if stamped.
    pub fn start_timestamp(&self) -> Option<SystemTime> {
        self.start_timestamp
    }

    /// Stamp the start of this histogram's recording window.
    pub fn set_start_timestamp(&mut self, time: SystemTime) {
        self.start_timestamp = Some(time);
    }

    /// When this histogram's recording window ended, if stamped.
    pub fn end_timestamp(&self) -> Option<SystemTime> {
        self.end_timestamp
    }

    /// Stamp the end of this histogram's recording window.
    pub fn set_end_timestamp(&mut self, time: SystemTime) {
        self.end_timestamp = Some(time);
    }

    /// The tag carried through interval-log persistence, if set.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Set or clear the tag. Tags never affect counting or equality.
    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag;
    }

    /// An opaque instance identifier, if set. Never affects counting.
    pub fn instance_id(&self) -> Option<u64> {
        self.instance_id
    }

    /// Set or clear the instance identifier.
    pub fn set_instance_id(&mut self, id: Option<u64>) {
        self.instance_id = id;
    }
}

// recording

impl<C: Counter> Histogram<C> {
    /// Record a single occurrence of `value`.
    ///
    /// Fails with `ValueOutOfRange` if `value` exceeds the highest trackable
    /// value, and with `CounterOverflow` if the bin counter is saturated.
    /// Failed calls leave the histogram untouched.
    pub fn record(&mut self, value: u64) -> Result<(), RecordError> {
        self.record_n(value, C::one())
    }

    /// Record `count` occurrences of `value`. See [`Histogram::record`].
    pub fn record_n(&mut self, value: u64, count: C) -> Result<(), RecordError> {
        let index = self.layout.index_for(value);
        if index >= self.counts.len() {
            return Err(RecordError::ValueOutOfRange);
        }
        let updated = self.counts[index]
            .checked_add(&count)
            .ok_or(RecordError::CounterOverflow)?;
        self.counts[index] = updated;
        self.update_min_max(value);
        self.total_count = self.total_count.saturating_add(count.as_u64());
        Ok(())
    }

    /// Record `value`, compensating for coordinated omission.
    ///
    /// When the loop producing samples stalls, long values imply missed
    /// samples: this method back-fills one additional record at `value - k *
    /// expected_interval` for every `k >= 1` that stays at or above
    /// `expected_interval`. Use either this at-record correction or
    /// [`Histogram::corrected_clone`] afterwards — never both on the same
    /// data.
    ///
    /// An `expected_interval` of 0 disables the correction.
    pub fn record_correct(&mut self, value: u64, expected_interval: u64) -> Result<(), RecordError> {
        self.record_n_correct(value, C::one(), expected_interval)
    }

    /// Record `count` occurrences of `value`, compensating for coordinated
    /// omission. See [`Histogram::record_correct`].
    pub fn record_n_correct(
        &mut self,
        value: u64,
        count: C,
        expected_interval: u64,
    ) -> Result<(), RecordError> {
        self.record_n(value, count)?;
        if expected_interval == 0 {
            return Ok(());
        }
        let mut missing = value.wrapping_sub(expected_interval);
        while missing >= expected_interval && missing <= value {
            self.record_n(missing, count)?;
            missing = missing.wrapping_sub(expected_interval);
        }
        Ok(())
    }

    /// Like `record_n_correct`, but saturates bin counters instead of
    /// failing. Values are known in range (they come from this histogram's
    /// own bins), so the whole chain is infallible.
    fn saturating_record_n_correct(&mut self, value: u64, count: C, expected_interval: u64) {
        let mut value = value;
        loop {
            let index = self.layout.index_for(value);
            debug_assert!(index < self.counts.len());
            self.counts[index] = self.counts[index].saturating_add(count);
            self.update_min_max(value);
            self.total_count = self.total_count.saturating_add(count.as_u64());

            if expected_interval == 0 {
                return;
            }
            match value.checked_sub(expected_interval) {
                Some(missing) if missing >= expected_interval => value = missing,
                _ => return,
            }
        }
    }

    fn update_min_max(&mut self, value: u64) {
        if value > self.max_value {
            self.update_max(value);
        }
        if value < self.min_non_zero_value && value != 0 {
            self.update_min_nonzero(value);
        }
    }

    fn update_max(&mut self, value: u64) {
        // highest unit-equivalent form, so `max()` rounds up correctly
        let internal = value | self.layout.unit_magnitude_mask;
        if internal > self.max_value {
            self.max_value = internal;
        }
    }

    fn update_min_nonzero(&mut self, value: u64) {
        if value <= self.layout.unit_magnitude_mask {
            // unit-equivalent to 0
            return;
        }
        let internal = value & !self.layout.unit_magnitude_mask;
        if internal < self.min_non_zero_value {
            self.min_non_zero_value = internal;
        }
    }
}

// merging

impl<C: Counter> Histogram<C> {
    /// Add all counts from `other` into this histogram.
    ///
    /// Requires every value in `other` to be representable here. Matching
    /// geometries merge bin-by-bin (saturating); mismatched geometries
    /// re-record each of `other`'s bins at its median-equivalent value. The
    /// recording window is widened to cover `other`'s timestamps.
    pub fn add<B: Borrow<Histogram<C>>>(&mut self, other: B) -> Result<(), AdditionError> {
        let other = other.borrow();

        if self.top_representable() < other.max() {
            return Err(AdditionError::RangeExceeded);
        }

        if self.layout == other.layout {
            let mut merged = 0_u64;
            for i in 0..other.counts.len() {
                let count = other.counts[i];
                if count != C::zero() {
                    self.counts[i] = self.counts[i].saturating_add(count);
                    merged = merged.saturating_add(count.as_u64());
                }
            }
            self.total_count = self.total_count.saturating_add(merged);
            if other.max_value > self.max_value {
                self.max_value = other.max_value;
            }
            if other.min_non_zero_value < self.min_non_zero_value {
                self.min_non_zero_value = other.min_non_zero_value;
            }
        } else {
            for i in 0..other.counts.len() {
                let count = other.counts[i];
                if count != C::zero() {
                    let value = other.layout.median_equivalent(other.layout.value_for(i));
                    self.record_n(value, count).map_err(|e| match e {
                        RecordError::ValueOutOfRange => AdditionError::RangeExceeded,
                        RecordError::CounterOverflow => AdditionError::CounterOverflow,
                    })?;
                }
            }
        }

        if let Some(other_start) = other.start_timestamp {
            self.start_timestamp = Some(match self.start_timestamp {
                Some(start) => cmp::min(start, other_start),
                None => other_start,
            });
        }
        if let Some(other_end) = other.end_timestamp {
            self.end_timestamp = Some(match self.end_timestamp {
                Some(end) => cmp::max(end, other_end),
                None => other_end,
            });
        }

        Ok(())
    }

    /// Remove `other`'s counts from this histogram.
    ///
    /// The subtraction is validated before any counter changes: if any bin
    /// would go negative the call fails with `WouldUnderflow` and this
    /// histogram is left exactly as it was.
    pub fn subtract<B: Borrow<Histogram<C>>>(
        &mut self,
        other: B,
    ) -> Result<(), SubtractionError> {
        let other = other.borrow();

        if self.top_representable() < other.max() {
            return Err(SubtractionError::RangeExceeded);
        }

        if self.layout == other.layout {
            for i in 0..other.counts.len() {
                if self.counts[i] < other.counts[i] {
                    return Err(SubtractionError::WouldUnderflow);
                }
            }
            for i in 0..other.counts.len() {
                let count = other.counts[i];
                if count != C::zero() {
                    self.counts[i] = self.counts[i] - count;
                }
            }
        } else {
            // Mismatched geometry: several of the subtrahend's bins may fold
            // into one of ours, so accumulate per-bin deltas first.
            let mut deltas = vec![0_u64; self.counts.len()];
            for i in 0..other.counts.len() {
                let count = other.counts[i].as_u64();
                if count != 0 {
                    let value = other.layout.median_equivalent(other.layout.value_for(i));
                    let index = self.layout.index_for(value);
                    if index >= self.counts.len() {
                        return Err(SubtractionError::RangeExceeded);
                    }
                    deltas[index] = deltas[index].saturating_add(count);
                }
            }
            for (index, delta) in deltas.iter().enumerate() {
                if *delta > self.counts[index].as_u64() {
                    return Err(SubtractionError::WouldUnderflow);
                }
            }
            for (index, delta) in deltas.iter().enumerate() {
                if *delta != 0 {
                    if let Some(delta) = C::from_u64(*delta) {
                        self.counts[index] = self.counts[index] - delta;
                    }
                }
            }
        }

        // min/max may have been subtracted away entirely
        self.refresh_stats();
        Ok(())
    }

    /// A copy of this histogram with coordinated-omission correction applied
    /// after the fact: each recorded bin additionally contributes records at
    /// `value - k * expected_interval` down to `expected_interval`.
    ///
    /// Mutually exclusive with at-record correction
    /// ([`Histogram::record_correct`]); apply only one of the two to a data
    /// set. Bin counters saturate rather than overflow.
    pub fn corrected_clone(&self, expected_interval: u64) -> Histogram<C> {
        let mut corrected = Histogram::new_from(self);
        for step in self.iter_recorded() {
            corrected.saturating_record_n_correct(
                step.value_iterated_to(),
                step.count_at_value(),
                expected_interval,
            );
        }
        corrected
    }

    /// Clear all counts, statistics, and timestamps. The configured value
    /// range, tag, and instance id are retained.
    pub fn reset(&mut self) {
        for c in self.counts.iter_mut() {
            *c = C::zero();
        }
        self.total_count = 0;
        self.max_value = 0;
        self.min_non_zero_value = u64::max_value();
        self.start_timestamp = None;
        self.end_timestamp = None;
    }
}

// queries

impl<C: Counter> Histogram<C> {
    /// The number of samples recorded in the bin holding `value`. Values
    /// beyond the trackable range report the nearest tracked bin.
    pub fn count_at(&self, value: u64) -> C {
        let index = cmp::min(self.layout.index_for(value), self.counts.len() - 1);
        self.counts[index]
    }

    /// The number of samples recorded between `low` and `high` inclusive,
    /// after rounding each bound to its containing bin.
    pub fn count_between(&self, low: u64, high: u64) -> u64 {
        let low_index = cmp::min(self.layout.index_for(low), self.counts.len() - 1);
        let high_index = cmp::min(self.layout.index_for(high), self.counts.len() - 1);
        (low_index..=high_index)
            .map(|i| self.counts[i].as_u64())
            .fold(0_u64, |total, c| total.saturating_add(c))
    }

    /// The value at the given percentile of recorded samples.
    ///
    /// Finds the smallest bin such that the running count reaches
    /// `ceil(percentile/100 * total_count)` and reports the highest value of
    /// that bin, so the returned value is one that the given percentage of
    /// samples is at or below. Percentiles outside `[0, 100]` are clamped.
    pub fn value_at_percentile(&self, percentile: f64) -> u64 {
        let percentile = percentile.max(0.0).min(100.0);
        let target = ((percentile / 100.0) * self.total_count as f64).ceil() as u64;
        // reach at least the first recorded bin
        let target = cmp::max(target, 1);

        let mut running = 0_u64;
        for index in 0..self.counts.len() {
            running = running.saturating_add(self.counts[index].as_u64());
            if running >= target {
                return self.layout.highest_equivalent(self.layout.value_for(index));
            }
        }
        0
    }

    /// The percentile of recorded samples at or below `value`.
    pub fn percentile_below(&self, value: u64) -> f64 {
        if self.total_count == 0 {
            return 100.0;
        }
        let target_index = cmp::min(self.layout.index_for(value), self.counts.len() - 1);
        let below: u64 = (0..=target_index)
            .map(|i| self.counts[i].as_u64())
            .fold(0_u64, |total, c| total.saturating_add(c));
        100.0 * below as f64 / self.total_count as f64
    }

    /// The arithmetic mean of all recorded samples, using each bin's median
    /// value.
    pub fn mean(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.iter_recorded().fold(0.0, |mean, step| {
            mean + self.median_equivalent(step.value_iterated_to()) as f64
                * step.count_at_value().as_f64()
                / self.total_count as f64
        })
    }

    /// The standard deviation of all recorded samples.
    pub fn stdev(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq = self.iter_recorded().fold(0.0, |sum, step| {
            let deviation = self.median_equivalent(step.value_iterated_to()) as f64 - mean;
            sum + deviation * deviation * step.count_at_value().as_f64()
        });
        (sum_sq / self.total_count as f64).sqrt()
    }

    /// The lowest recorded value, or 0 if nothing was recorded.
    pub fn min(&self) -> u64 {
        if self.total_count == 0 || self.counts[0].as_u64() != 0 {
            0
        } else {
            self.min_nonzero()
        }
    }

    /// The lowest recorded non-zero value, or `u64::max_value()` if no
    /// non-zero value was recorded.
    pub fn min_nonzero(&self) -> u64 {
        if self.min_non_zero_value == u64::max_value() {
            u64::max_value()
        } else {
            self.layout.lowest_equivalent(self.min_non_zero_value)
        }
    }

    /// The highest recorded value, or 0 if nothing was recorded.
    pub fn max(&self) -> u64 {
        if self.max_value == 0 {
            0
        } else {
            self.layout.highest_equivalent(self.max_value)
        }
    }

    /// Whether the sum of bin counters disagrees with the recorded total,
    /// which signals that some fixed-width counter saturated (or that the
    /// re-summation itself would wrap a `u64`).
    pub fn has_overflowed(&self) -> bool {
        let mut sum = 0_u64;
        for c in &self.counts {
            sum = match sum.checked_add(c.as_u64()) {
                Some(sum) => sum,
                None => return true,
            };
        }
        sum != self.total_count
    }
}

// bin arithmetic helpers

impl<C: Counter> Histogram<C> {
    /// The lowest value counted in the same bin as `value`.
    pub fn lowest_equivalent(&self, value: u64) -> u64 {
        self.layout.lowest_equivalent(value)
    }

    /// The highest value counted in the same bin as `value`.
    pub fn highest_equivalent(&self, value: u64) -> u64 {
        self.layout.highest_equivalent(value)
    }

    /// The midpoint (rounded up) of the bin holding `value`.
    pub fn median_equivalent(&self, value: u64) -> u64 {
        self.layout.median_equivalent(value)
    }

    /// The lowest value counted in a higher bin than `value`.
    pub fn next_non_equivalent(&self, value: u64) -> u64 {
        self.layout.next_non_equivalent(value)
    }

    /// The width of the bin holding `value`.
    pub fn equivalent_range(&self, value: u64) -> u64 {
        self.layout.equivalent_range(value)
    }

    /// Whether `a` and `b` are counted in the same bin.
    pub fn equivalent(&self, a: u64, b: u64) -> bool {
        self.layout.lowest_equivalent(a) == self.layout.lowest_equivalent(b)
    }

    /// The lowest value mapping to the bin at `index`.
    pub fn value_for(&self, index: usize) -> u64 {
        self.layout.value_for(index)
    }

    /// The count in the bin at `index`, if in range.
    pub fn count_at_index(&self, index: usize) -> Option<C> {
        self.counts.get(index).copied()
    }

    pub(crate) fn layout(&self) -> &ValueLayout {
        &self.layout
    }

    pub(crate) fn index_for(&self, value: u64) -> usize {
        self.layout.index_for(value)
    }

    /// Highest value this histogram's bins can actually hold, which may round
    /// up past the configured highest trackable value.
    pub(crate) fn top_representable(&self) -> u64 {
        self.layout
            .highest_equivalent(self.layout.value_for(self.counts.len() - 1))
    }

    /// Overwrite the count at `index`; used when rebuilding a histogram from
    /// a decoded counts stream. Callers must `refresh_stats` afterwards.
    pub(crate) fn set_count_at_index(&mut self, index: usize, count: C) -> Result<(), ()> {
        if index >= self.counts.len() {
            return Err(());
        }
        self.counts[index] = count;
        Ok(())
    }

    /// Recompute total count, max, and min-non-zero from the bin counters.
    pub(crate) fn refresh_stats(&mut self) {
        let mut total = 0_u64;
        let mut max_index = None;
        let mut min_nz_index = None;
        for (index, c) in self.counts.iter().enumerate() {
            let count = c.as_u64();
            if count != 0 {
                total = total.saturating_add(count);
                max_index = Some(index);
                if min_nz_index.is_none() && self.layout.value_for(index) != 0 {
                    min_nz_index = Some(index);
                }
            }
        }
        self.total_count = total;
        self.max_value = 0;
        self.min_non_zero_value = u64::max_value();
        if let Some(index) = max_index {
            let value = self.layout.highest_equivalent(self.layout.value_for(index));
            self.update_max(value);
        }
        if let Some(index) = min_nz_index {
            self.update_min_nonzero(self.layout.value_for(index));
        }
    }
}

// iteration

impl<C: Counter> Histogram<C> {
    /// Iterate over every bin in value order, recorded or not, ending once
    /// all recorded values have been visited.
    pub fn iter_all(&self) -> HistogramIterator<'_, C, iterators::all::Iter> {
        iterators::all::Iter::new(self)
    }

    /// Iterate over the bins with a non-zero count, in value order.
    pub fn iter_recorded(&self) -> HistogramIterator<'_, C, iterators::recorded::Iter> {
        iterators::recorded::Iter::new(self)
    }

    /// Iterate in fixed steps of `step` value units, covering all recorded
    /// data. `step` must be non-zero.
    pub fn iter_linear(&self, step: u64) -> HistogramIterator<'_, C, iterators::linear::Iter<'_, C>> {
        iterators::linear::Iter::new(self, step)
    }

    /// Iterate in steps that start at `first_step` value units and grow by a
    /// factor of `base` each time, covering all recorded data. `first_step`
    /// must be non-zero and `base` greater than 1.
    pub fn iter_log(
        &self,
        first_step: u64,
        base: f64,
    ) -> HistogramIterator<'_, C, iterators::log::Iter<'_, C>> {
        iterators::log::Iter::new(self, first_step, base)
    }

    /// Iterate by percentile level, halving the distance to 100% every
    /// `ticks_per_half_distance` steps. `ticks_per_half_distance` must be
    /// non-zero.
    pub fn iter_percentiles(
        &self,
        ticks_per_half_distance: u32,
    ) -> HistogramIterator<'_, C, iterators::percentile::Iter<'_, C>> {
        iterators::percentile::Iter::new(self, ticks_per_half_distance)
    }
}

// comparison

impl<C: Counter, F: Counter> PartialEq<Histogram<F>> for Histogram<C> {
    /// Value equality: same configuration and the same count in every bin.
    /// Metadata (timestamps, tag, instance id) is ignored.
    fn eq(&self, other: &Histogram<F>) -> bool {
        if self.layout.lowest_discernible != other.layout.lowest_discernible
            || self.layout.highest_trackable != other.layout.highest_trackable
            || self.layout.significant_digits != other.layout.significant_digits
        {
            return false;
        }
        if self.total_count != other.total_count
            || self.max() != other.max()
            || self.min_nonzero() != other.min_nonzero()
        {
            return false;
        }
        (0..self.counts.len()).all(|i| self.counts[i].as_u64() == other.counts[i].as_u64())
    }
}

// operator sugar

impl<C: Counter> AddAssign<u64> for Histogram<C> {
    /// Record a value, panicking if it is out of range or its bin counter is
    /// saturated. Use [`Histogram::record`] for a fallible version.
    fn add_assign(&mut self, value: u64) {
        self.record(value).unwrap();
    }
}

impl<'a, C: Counter> AddAssign<&'a Histogram<C>> for Histogram<C> {
    /// Merge another histogram, panicking on range mismatch. Use
    /// [`Histogram::add`] for a fallible version.
    fn add_assign(&mut self, other: &'a Histogram<C>) {
        self.add(other).unwrap();
    }
}

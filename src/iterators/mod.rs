//! Strategies for walking a histogram's bins in value order.
//!
//! All iteration shares one engine, [`HistogramIterator`], which steps through
//! the counts array accumulating running totals. A [`PickyIterator`] strategy
//! decides which steps are worth yielding (every bin, only recorded bins,
//! fixed-width steps, and so on), and may keep the iteration going through a
//! suffix of empty bins when its stepping scheme calls for it.

use crate::core::counter::Counter;
use crate::Histogram;
use std::cmp;

/// An iterator that yields every bin in value order.
pub mod all;

/// An iterator that yields fixed-size value steps.
pub mod linear;

/// An iterator that yields exponentially growing value steps.
pub mod log;

/// An iterator that yields percentile levels.
pub mod percentile;

/// An iterator that yields bins with a non-zero count.
pub mod recorded;

/// One step of a histogram iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationValue<C: Counter> {
    value_iterated_to: u64,
    value_iterated_from: u64,
    count_at_value: C,
    count_added_in_this_iteration_step: u64,
    total_count_to_this_value: u64,
    total_value_to_this_value: u64,
    percentile: f64,
    percentile_level_iterated_to: f64,
}

impl<C: Counter> IterationValue<C> {
    /// The value this step iterated to (the highest value of the current bin,
    /// unless the strategy reports a step boundary instead).
    pub fn value_iterated_to(&self) -> u64 {
        self.value_iterated_to
    }

    /// The value the previous step iterated to, or 0 on the first step.
    pub fn value_iterated_from(&self) -> u64 {
        self.value_iterated_from
    }

    /// The count in the bin at `value_iterated_to`.
    pub fn count_at_value(&self) -> C {
        self.count_at_value
    }

    /// The number of samples swept up since the previous step.
    pub fn count_added_in_this_iteration_step(&self) -> u64 {
        self.count_added_in_this_iteration_step
    }

    /// The running count of samples at or below `value_iterated_to`.
    pub fn total_count_to_this_value(&self) -> u64 {
        self.total_count_to_this_value
    }

    /// The running sum of samples (each taken at its bin's median value) at
    /// or below `value_iterated_to`. Saturates on overflow.
    pub fn total_value_to_this_value(&self) -> u64 {
        self.total_value_to_this_value
    }

    /// The percentile of recorded samples at or below `value_iterated_to`.
    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// The percentile level the strategy was stepping to, where that differs
    /// from the data percentile (e.g. for the percentile iterator).
    pub fn percentile_level_iterated_to(&self) -> f64 {
        self.percentile_level_iterated_to
    }
}

/// Overrides a strategy may attach to a picked step.
#[derive(Debug, Default)]
pub struct PickMetadata {
    percentile_override: Option<f64>,
    value_override: Option<u64>,
}

impl PickMetadata {
    /// Attach an iterated-to percentile level and/or value boundary that
    /// differs from the current bin's own.
    pub fn new(percentile_override: Option<f64>, value_override: Option<u64>) -> PickMetadata {
        PickMetadata {
            percentile_override,
            value_override,
        }
    }
}

/// A strategy for selecting which iteration steps to yield.
pub trait PickyIterator<C: Counter> {
    /// Should a step be yielded at this index? The engine re-offers a picked
    /// index before advancing, so strategies that emit multiple steps per bin
    /// (linear, log) get the chance to do so, and single-visit strategies
    /// must track what they already picked.
    fn pick(&mut self, index: usize, total_count_to_index: u64, count_at_index: C)
        -> Option<PickMetadata>;

    /// Once all recorded values have been yielded, should iteration keep
    /// stepping through the remaining (empty) bins?
    fn more(&mut self, index_to_pick: usize) -> bool;
}

/// The iteration engine: walks bins in index order, maintains running totals,
/// and defers to a [`PickyIterator`] for which steps to emit.
pub struct HistogramIterator<'a, C: Counter, P: PickyIterator<C>> {
    hist: &'a Histogram<C>,
    total_count_to_index: u64,
    total_value_to_index: u64,
    prev_total_count: u64,
    prev_value_iterated_to: u64,
    current_index: usize,
    fresh: bool,
    ended: bool,
    picker: P,
}

impl<'a, C: Counter, P: PickyIterator<C>> HistogramIterator<'a, C, P> {
    fn new(hist: &'a Histogram<C>, picker: P) -> HistogramIterator<'a, C, P> {
        HistogramIterator {
            hist,
            total_count_to_index: 0,
            total_value_to_index: 0,
            prev_total_count: 0,
            prev_value_iterated_to: 0,
            current_index: 0,
            fresh: true,
            ended: false,
            picker,
        }
    }
}

impl<'a, C: Counter, P: PickyIterator<C>> Iterator for HistogramIterator<'a, C, P> {
    type Item = IterationValue<C>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.hist.total_count();

        while !self.ended {
            if self.current_index == self.hist.bin_count() {
                self.ended = true;
                return None;
            }

            if self.prev_total_count == total {
                // every recorded sample has been yielded; the strategy decides
                // whether the empty tail is still interesting
                if !self.picker.more(self.current_index) {
                    self.ended = true;
                    return None;
                }
            } else if self.fresh {
                // absorb this bin's count into the running totals exactly once
                let count = self.hist.counts[self.current_index].as_u64();
                self.total_count_to_index = self.total_count_to_index.saturating_add(count);
                self.total_value_to_index = self.total_value_to_index.saturating_add(
                    count.saturating_mul(
                        self.hist
                            .median_equivalent(self.hist.value_for(self.current_index)),
                    ),
                );
                self.fresh = false;
            }

            let count_at_index = self.hist.counts[self.current_index];
            if let Some(metadata) =
                self.picker
                    .pick(self.current_index, self.total_count_to_index, count_at_index)
            {
                let value_iterated_to = metadata.value_override.unwrap_or_else(|| {
                    self.hist
                        .highest_equivalent(self.hist.value_for(self.current_index))
                });
                let percentile =
                    100.0 * self.total_count_to_index as f64 / cmp::max(total, 1) as f64;

                let step = IterationValue {
                    value_iterated_to,
                    value_iterated_from: self.prev_value_iterated_to,
                    count_at_value: count_at_index,
                    count_added_in_this_iteration_step: self.total_count_to_index
                        - self.prev_total_count,
                    total_count_to_this_value: self.total_count_to_index,
                    total_value_to_this_value: self.total_value_to_index,
                    percentile,
                    percentile_level_iterated_to: metadata.percentile_override.unwrap_or(percentile),
                };

                // a picked index is offered again before the engine moves on
                self.prev_total_count = self.total_count_to_index;
                self.prev_value_iterated_to = value_iterated_to;
                return Some(step);
            }

            self.current_index += 1;
            self.fresh = true;
        }
        None
    }
}

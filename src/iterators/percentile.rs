use crate::core::counter::Counter;
use crate::iterators::{HistogramIterator, PickMetadata, PickyIterator};
use crate::Histogram;

/// Yields steps at percentile levels that tighten toward 100%.
///
/// The 0–100% range is divided into ticks; each time the remaining distance
/// to 100% halves, the tick size halves with it, so the interesting tail gets
/// proportionally more steps. Iteration ends when the level reaches 100% and
/// the highest recorded value has been reported.
pub struct Iter<'a, C: Counter> {
    hist: &'a Histogram<C>,
    ticks_per_half_distance: u32,
    percentile_to_iterate_to: f64,
    reached_end: bool,
}

impl<'a, C: Counter> Iter<'a, C> {
    /// Construct a percentile iterator. See [`Histogram::iter_percentiles`].
    pub fn new(
        hist: &'a Histogram<C>,
        ticks_per_half_distance: u32,
    ) -> HistogramIterator<'a, C, Iter<'a, C>> {
        assert!(
            ticks_per_half_distance > 0,
            "ticks_per_half_distance must be > 0"
        );
        HistogramIterator::new(
            hist,
            Iter {
                hist,
                ticks_per_half_distance,
                percentile_to_iterate_to: 0.0,
                reached_end: false,
            },
        )
    }
}

impl<'a, C: Counter> PickyIterator<C> for Iter<'a, C> {
    #[allow(clippy::float_cmp)]
    fn pick(&mut self, _: usize, total_count_to_index: u64, count_at_index: C)
        -> Option<PickMetadata> {
        if count_at_index == C::zero() {
            return None;
        }

        let current_percentile =
            100.0 * total_count_to_index as f64 / self.hist.total_count() as f64;
        if current_percentile < self.percentile_to_iterate_to {
            return None;
        }

        if self.reached_end {
            // the 100% step was already emitted; skip the remaining re-offers
            // of this bin until `more()` is consulted
            return None;
        }

        if self.percentile_to_iterate_to == 100.0 {
            // emit the final step exactly at 100%, then stop: the tick math
            // below is meaningless at and beyond that level
            self.reached_end = true;
            return Some(PickMetadata::new(Some(100.0), None));
        }

        // Levels step in fixed-size ticks within each successive halving of
        // the distance to 100%: with the remaining distance halved n times,
        // ticks_per_half_distance * 2^(n+1) ticks span the full range.
        let halvings = (100.0 / (100.0 - self.percentile_to_iterate_to)).log2() as u32;
        let total_ticks = u64::from(self.ticks_per_half_distance)
            .checked_mul(
                1_u64
                    .checked_shl(halvings + 1)
                    .expect("excessive percentile halvings"),
            )
            .expect("excessive percentile ticks");
        let increment = 100.0 / total_ticks as f64;

        let metadata = PickMetadata::new(Some(self.percentile_to_iterate_to), None);
        let next = self.percentile_to_iterate_to + increment;
        self.percentile_to_iterate_to = if next == self.percentile_to_iterate_to {
            // increment too small to move an f64 this close to 100
            100.0
        } else {
            next
        };
        Some(metadata)
    }

    fn more(&mut self, _: usize) -> bool {
        if self.reached_end {
            return false;
        }
        // The highest recorded bin was reached with the level still below
        // 100%: jump straight there and emit one final step.
        self.percentile_to_iterate_to = 100.0;
        true
    }
}

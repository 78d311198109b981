use crate::core::counter::Counter;
use crate::iterators::{HistogramIterator, PickMetadata, PickyIterator};
use crate::Histogram;

/// Yields steps whose width grows by a constant factor, covering all recorded
/// data.
pub struct Iter<'a, C: Counter> {
    hist: &'a Histogram<C>,

    // > 1.0
    base: f64,
    next_step_boundary: f64,
    current_step_highest: u64,
    current_step_lowest: u64,
}

impl<'a, C: Counter> Iter<'a, C> {
    /// Construct a logarithmic iterator. See [`Histogram::iter_log`].
    pub fn new(
        hist: &'a Histogram<C>,
        first_step: u64,
        base: f64,
    ) -> HistogramIterator<'a, C, Iter<'a, C>> {
        assert!(first_step > 0, "first_step must be > 0");
        assert!(base > 1.0, "base must be > 1.0");
        HistogramIterator::new(
            hist,
            Iter {
                hist,
                base,
                next_step_boundary: first_step as f64,
                current_step_highest: first_step - 1,
                current_step_lowest: hist.lowest_equivalent(first_step - 1),
            },
        )
    }
}

impl<'a, C: Counter> PickyIterator<C> for Iter<'a, C> {
    fn pick(&mut self, index: usize, _: u64, _: C) -> Option<PickMetadata> {
        let value = self.hist.value_for(index);
        if value >= self.current_step_lowest || index == self.hist.bin_count() - 1 {
            let metadata = PickMetadata::new(None, Some(self.current_step_highest));
            // grows monotonically since base > 1.0
            self.next_step_boundary *= self.base;
            self.current_step_highest = (self.next_step_boundary as u64).saturating_sub(1);
            self.current_step_lowest = self.hist.lowest_equivalent(self.current_step_highest);
            Some(metadata)
        } else {
            None
        }
    }

    fn more(&mut self, index_to_pick: usize) -> bool {
        self.hist
            .lowest_equivalent(self.next_step_boundary as u64)
            < self.hist.value_for(index_to_pick + 1)
    }
}

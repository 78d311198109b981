use crate::core::counter::Counter;
use crate::iterators::{HistogramIterator, PickMetadata, PickyIterator};
use crate::Histogram;

/// Yields a step at every multiple of a fixed value unit, covering all
/// recorded data.
pub struct Iter<'a, C: Counter> {
    hist: &'a Histogram<C>,

    // > 0
    step: u64,
    current_step_highest: u64,
    current_step_lowest: u64,
}

impl<'a, C: Counter> Iter<'a, C> {
    /// Construct a linear iterator. See [`Histogram::iter_linear`].
    pub fn new(hist: &'a Histogram<C>, step: u64) -> HistogramIterator<'a, C, Iter<'a, C>> {
        assert!(step > 0, "step must be > 0");
        HistogramIterator::new(
            hist,
            Iter {
                hist,
                step,
                current_step_highest: step - 1,
                current_step_lowest: hist.lowest_equivalent(step - 1),
            },
        )
    }
}

impl<'a, C: Counter> PickyIterator<C> for Iter<'a, C> {
    fn pick(&mut self, index: usize, _: u64, _: C) -> Option<PickMetadata> {
        let value = self.hist.value_for(index);
        if value >= self.current_step_lowest || index == self.hist.bin_count() - 1 {
            let metadata = PickMetadata::new(None, Some(self.current_step_highest));
            self.current_step_highest = self.current_step_highest.saturating_add(self.step);
            self.current_step_lowest = self.hist.lowest_equivalent(self.current_step_highest);
            Some(metadata)
        } else {
            None
        }
    }

    fn more(&mut self, index_to_pick: usize) -> bool {
        // Keep emitting steps until the one we are about to emit moves past
        // the next bin, so the final recorded bin is covered by a step
        // boundary rather than cut off. `value_for` extrapolates past the
        // last bin, which is exactly what the comparison needs.
        self.current_step_highest < self.hist.value_for(index_to_pick + 1)
    }
}

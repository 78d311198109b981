use crate::core::counter::Counter;
use crate::iterators::{HistogramIterator, PickMetadata, PickyIterator};
use crate::Histogram;

/// Yields a step for every bin holding at least one sample.
pub struct Iter {
    visited: Option<usize>,
}

impl Iter {
    /// Construct a recorded-values iterator. See [`Histogram::iter_recorded`].
    pub fn new<C: Counter>(hist: &Histogram<C>) -> HistogramIterator<'_, C, Iter> {
        HistogramIterator::new(hist, Iter { visited: None })
    }
}

impl<C: Counter> PickyIterator<C> for Iter {
    fn pick(&mut self, index: usize, _: u64, count_at_index: C) -> Option<PickMetadata> {
        if count_at_index == C::zero() || self.visited == Some(index) {
            return None;
        }
        self.visited = Some(index);
        Some(PickMetadata::default())
    }

    fn more(&mut self, _: usize) -> bool {
        false
    }
}

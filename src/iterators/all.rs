use crate::core::counter::Counter;
use crate::iterators::{HistogramIterator, PickMetadata, PickyIterator};
use crate::Histogram;

/// Yields a step for every bin, recorded or not.
pub struct Iter {
    visited: Option<usize>,
}

impl Iter {
    /// Construct a full-range iterator. See [`Histogram::iter_all`].
    pub fn new<C: Counter>(hist: &Histogram<C>) -> HistogramIterator<'_, C, Iter> {
        HistogramIterator::new(hist, Iter { visited: None })
    }
}

impl<C: Counter> PickyIterator<C> for Iter {
    fn pick(&mut self, index: usize, _: u64, _: C) -> Option<PickMetadata> {
        if self.visited == Some(index) {
            // the engine re-offers picked indices; yield each bin once
            return None;
        }
        self.visited = Some(index);
        Some(PickMetadata::default())
    }

    fn more(&mut self, _: usize) -> bool {
        true
    }
}

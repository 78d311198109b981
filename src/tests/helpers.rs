use crate::Histogram;

pub fn histo64(
    lowest_discernible: u64,
    highest_trackable: u64,
    significant_digits: u8,
) -> Histogram<u64> {
    Histogram::<u64>::new_with_bounds(lowest_discernible, highest_trackable, significant_digits)
        .unwrap()
}

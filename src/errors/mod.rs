//! Error types for histogram construction and mutation.
//!
//! Every fallible operation gets its own small enum so callers can match on
//! exactly the failures that operation can produce. Codec errors live next to
//! the codec in the `serialization` module.

use std::error::Error;
use std::fmt;

/// Errors that can occur when creating a histogram.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum CreationError {
    /// The lowest discernible value must be >= 1.
    LowIsZero,
    /// The lowest discernible value must be <= `u64::max_value() / 2`, since
    /// the highest trackable value must be at least twice the lowest.
    LowExceedsMax,
    /// The highest trackable value must be >= 2 * the lowest discernible
    /// value for the bucket math to work out.
    HighLessThanTwiceLow,
    /// The number of significant digits must be in `[0, 5]`. Memory use grows
    /// exponentially with this parameter, and 5 digits already distinguishes
    /// one part in 200,000.
    SigFigExceedsMax,
    /// The requested precision cannot be represented starting at the
    /// requested lowest discernible value: the bits for the sub-bucket range
    /// plus the bits below the lowest value exceed what a `u64` holds.
    /// Decrease the significant digits or the lowest discernible value.
    CannotRepresentSigFigBeyondLow,
    /// The counts array for this configuration does not fit in `usize` on
    /// this platform.
    UsizeTypeTooSmall,
}

impl fmt::Display for CreationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CreationError::LowIsZero => write!(f, "lowest discernible value must be >= 1"),
            CreationError::LowExceedsMax => {
                write!(f, "lowest discernible value must be <= u64::max_value() / 2")
            }
            CreationError::HighLessThanTwiceLow => write!(
                f,
                "highest trackable value must be >= 2 * lowest discernible value"
            ),
            CreationError::SigFigExceedsMax => {
                write!(f, "number of significant digits must be in [0, 5]")
            }
            CreationError::CannotRepresentSigFigBeyondLow => write!(
                f,
                "cannot represent the requested precision beyond the lowest discernible value"
            ),
            CreationError::UsizeTypeTooSmall => {
                write!(f, "counts array length does not fit in usize")
            }
        }
    }
}

impl Error for CreationError {}

/// Errors that can occur while recording a value.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum RecordError {
    /// The value is larger than the configured highest trackable value.
    ValueOutOfRange,
    /// The bin counter would exceed the positive range of the counter type.
    /// Use a wider counter type, or query `has_overflowed()` to detect this
    /// after bulk merges.
    CounterOverflow,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordError::ValueOutOfRange => {
                write!(f, "value exceeds the highest trackable value")
            }
            RecordError::CounterOverflow => {
                write!(f, "count exceeds the range of the counter type")
            }
        }
    }
}

impl Error for RecordError {}

/// Errors that can occur when adding another histogram.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum AdditionError {
    /// The other histogram contains values that do not fit in this
    /// histogram's range.
    RangeExceeded,
    /// A bin counter would exceed the range of this histogram's counter type.
    CounterOverflow,
}

impl fmt::Display for AdditionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AdditionError::RangeExceeded => write!(
                f,
                "the other histogram includes values outside this histogram's range"
            ),
            AdditionError::CounterOverflow => {
                write!(f, "count exceeds the range of the counter type")
            }
        }
    }
}

impl Error for AdditionError {}

/// Errors that can occur when subtracting another histogram.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum SubtractionError {
    /// The subtrahend contains values that do not fit in this histogram's
    /// range.
    RangeExceeded,
    /// The subtrahend holds a higher count than this histogram for some bin.
    /// The subtraction is validated up front, so this histogram is unchanged
    /// when this error is returned.
    WouldUnderflow,
}

impl fmt::Display for SubtractionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubtractionError::RangeExceeded => write!(
                f,
                "the subtrahend includes values outside this histogram's range"
            ),
            SubtractionError::WouldUnderflow => write!(
                f,
                "the subtrahend holds a higher count than this histogram for some bin"
            ),
        }
    }
}

impl Error for SubtractionError {}

/// Errors that can occur when shifting a concurrent histogram's distribution.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum ShiftError {
    /// Non-zero counts would rotate past the edge of the counts array. The
    /// histogram is unchanged.
    OverflowedRange,
}

impl fmt::Display for ShiftError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShiftError::OverflowedRange => {
                write!(f, "non-zero counts would shift outside the trackable range")
            }
        }
    }
}

impl Error for ShiftError {}

use super::{cookie_for, varint, Serializer, V2_HEADER_SIZE};
use crate::core::counter::Counter;
use crate::Histogram;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};
use std::{error, fmt};

/// Errors that occur while serializing in the plain V2 format.
#[derive(Debug)]
pub enum V2SerializeError {
    /// A count above `i64::max_value()` cannot be zig-zag encoded, and
    /// therefore cannot be serialized.
    CountNotSerializable,
    /// Internal size calculations overflowed `usize`.
    UsizeTypeTooSmall,
    /// An i/o operation failed.
    IoError(io::Error),
}

impl From<io::Error> for V2SerializeError {
    fn from(e: io::Error) -> Self {
        V2SerializeError::IoError(e)
    }
}

impl fmt::Display for V2SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            V2SerializeError::CountNotSerializable => {
                write!(f, "a count above i64::max_value() cannot be zig-zag encoded")
            }
            V2SerializeError::UsizeTypeTooSmall => {
                write!(f, "internal size calculations overflowed usize")
            }
            V2SerializeError::IoError(e) => write!(f, "an i/o operation failed: {}", e),
        }
    }
}

impl error::Error for V2SerializeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            V2SerializeError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

/// Serializer for the plain V2 binary format.
pub struct V2Serializer {
    buf: Vec<u8>,
}

impl Default for V2Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl V2Serializer {
    /// Create a new serializer.
    pub fn new() -> V2Serializer {
        V2Serializer { buf: Vec::new() }
    }
}

impl Serializer for V2Serializer {
    type SerializeError = V2SerializeError;

    fn serialize<T: Counter, W: Write>(
        &mut self,
        h: &Histogram<T>,
        writer: &mut W,
    ) -> Result<usize, V2SerializeError> {
        self.buf.clear();
        let max_size = max_encoded_size(h).ok_or(V2SerializeError::UsizeTypeTooSmall)?;

        self.buf.write_u32::<BigEndian>(cookie_for::<T>())?;
        // payload length placeholder, filled in once the counts are encoded
        self.buf.write_u32::<BigEndian>(0)?;
        // normalizing index offset: a plain histogram is never rotated
        self.buf.write_u32::<BigEndian>(0)?;
        self.buf
            .write_u32::<BigEndian>(u32::from(h.significant_digits()))?;
        self.buf.write_u64::<BigEndian>(h.lowest_discernible())?;
        self.buf.write_u64::<BigEndian>(h.highest_trackable())?;
        // integer-to-double conversion ratio; always 1.0 for integer histograms
        self.buf.write_f64::<BigEndian>(1.0)?;

        debug_assert_eq!(V2_HEADER_SIZE, self.buf.len());

        self.buf.resize(max_size, 0);
        let counts_len = encode_counts(h, &mut self.buf[V2_HEADER_SIZE..])?;
        let total_len = V2_HEADER_SIZE + counts_len;

        // the counts stream of any valid configuration fits a u32 easily
        (&mut self.buf[4..8]).write_u32::<BigEndian>(counts_len as u32)?;

        writer
            .write_all(&self.buf[0..total_len])
            .map(|_| total_len)
            .map_err(V2SerializeError::IoError)
    }
}

fn max_encoded_size<T: Counter>(h: &Histogram<T>) -> Option<usize> {
    // every encoded slot costs at most one 9-byte varint
    encoded_bin_limit(h)
        .checked_mul(9)
        .and_then(|n| n.checked_add(V2_HEADER_SIZE))
}

/// Number of leading bins that need encoding: everything at or below the bin
/// holding the max recorded value.
fn encoded_bin_limit<T: Counter>(h: &Histogram<T>) -> usize {
    h.index_for(h.max()).min(h.bin_count() - 1) + 1
}

/// Encode the counts array into `buf`, which must hold at least 9 bytes per
/// encoded bin. Runs of empty bins collapse into a single negative varint.
fn encode_counts<T: Counter>(h: &Histogram<T>, buf: &mut [u8]) -> Result<usize, V2SerializeError> {
    let limit = encoded_bin_limit(h);
    let mut index = 0;
    let mut bytes_written = 0;

    while index < limit {
        let count = h.counts[index];
        index += 1;

        let mut zero_run = 0_i64;
        if count == T::zero() {
            zero_run = 1;
            while index < limit && h.counts[index] == T::zero() {
                zero_run += 1;
                index += 1;
            }
        }

        let count_or_zeros: i64 = if zero_run > 1 {
            // a run length is at most the counts array length, far below i64 range
            -zero_run
        } else {
            count
                .to_i64()
                .ok_or(V2SerializeError::CountNotSerializable)?
        };

        bytes_written += varint::write(
            varint::zig_zag_encode(count_or_zeros),
            &mut buf[bytes_written..],
        );
    }

    Ok(bytes_written)
}

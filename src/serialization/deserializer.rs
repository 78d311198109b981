use super::{varint, word_size_from_cookie, V2_COMPRESSED_COOKIE_BASE, V2_COOKIE_BASE};
use crate::core::counter::Counter;
use crate::Histogram;
use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;
use num_traits::ToPrimitive;
use std::io::{self, Read};
use std::{error, fmt};

/// Errors that can happen during deserialization. On any of them the
/// histogram under construction is discarded; nothing partial escapes.
#[derive(Debug)]
pub enum DeserializeError {
    /// An i/o operation failed.
    IoError(io::Error),
    /// The cookie (first 4 bytes) did not match any supported format and
    /// word size.
    InvalidCookie,
    /// The payload uses a feature this implementation does not support (e.g.
    /// a non-unit integer-to-double conversion ratio).
    UnsupportedFeature,
    /// A decoded count exceeds what the target counter type can hold.
    UnsuitableCounterType,
    /// The header's histogram parameters are invalid (lowest/highest value,
    /// precision, or normalizing offset).
    InvalidParameters,
    /// The counts stream ended in the middle of a varint, or before the
    /// declared payload length.
    Truncated,
    /// The counts stream addresses more bins than the header's geometry has.
    EncodedArrayTooLong,
}

impl From<io::Error> for DeserializeError {
    fn from(e: io::Error) -> Self {
        DeserializeError::IoError(e)
    }
}

impl fmt::Display for DeserializeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeserializeError::IoError(e) => write!(f, "an i/o operation failed: {}", e),
            DeserializeError::InvalidCookie => {
                write!(f, "the cookie did not match any supported format")
            }
            DeserializeError::UnsupportedFeature => {
                write!(f, "the payload uses an unsupported feature")
            }
            DeserializeError::UnsuitableCounterType => {
                write!(f, "a count exceeds the range of the target counter type")
            }
            DeserializeError::InvalidParameters => {
                write!(f, "the serialized histogram parameters are invalid")
            }
            DeserializeError::Truncated => write!(f, "the payload ended early"),
            DeserializeError::EncodedArrayTooLong => {
                write!(f, "the counts stream is longer than the header's geometry")
            }
        }
    }
}

impl error::Error for DeserializeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DeserializeError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

/// Deserializer for all supported formats.
///
/// The formats carry distinguishing cookies, so one deserializer handles
/// plain and compressed payloads of any counter width. Decoded counts are
/// converted into the requested counter type; counts that do not fit fail
/// the deserialization rather than silently truncating.
pub struct Deserializer {
    payload_buf: Vec<u8>,
}

impl Default for Deserializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deserializer {
    /// Create a new deserializer.
    pub fn new() -> Deserializer {
        Deserializer {
            payload_buf: Vec::new(),
        }
    }

    /// Deserialize an encoded histogram from the provided reader.
    ///
    /// `&[u8]` and `Cursor` are convenient `Read` implementations when the
    /// bytes are already in memory.
    pub fn deserialize<T: Counter, R: Read>(
        &mut self,
        reader: &mut R,
    ) -> Result<Histogram<T>, DeserializeError> {
        let cookie = reader.read_u32::<BigEndian>()?;

        if word_size_from_cookie(cookie, V2_COOKIE_BASE).is_some() {
            self.deserialize_payload(reader)
        } else if word_size_from_cookie(cookie, V2_COMPRESSED_COOKIE_BASE).is_some() {
            self.deserialize_compressed(reader)
        } else {
            Err(DeserializeError::InvalidCookie)
        }
    }

    fn deserialize_compressed<T: Counter, R: Read>(
        &mut self,
        reader: &mut R,
    ) -> Result<Histogram<T>, DeserializeError> {
        let compressed_len = u64::from(reader.read_u32::<BigEndian>()?);

        let mut inflater = ZlibDecoder::new(reader.take(compressed_len));
        let inner_cookie = inflater.read_u32::<BigEndian>()?;
        if word_size_from_cookie(inner_cookie, V2_COOKIE_BASE).is_none() {
            return Err(DeserializeError::InvalidCookie);
        }

        self.deserialize_payload(&mut inflater)
    }

    #[allow(clippy::float_cmp)]
    fn deserialize_payload<T: Counter, R: Read>(
        &mut self,
        reader: &mut R,
    ) -> Result<Histogram<T>, DeserializeError> {
        let payload_len = reader
            .read_u32::<BigEndian>()?
            .to_usize()
            .ok_or(DeserializeError::InvalidParameters)?;
        let normalizing_offset = reader.read_u32::<BigEndian>()?.to_usize().unwrap_or(0);
        let significant_digits = reader
            .read_u32::<BigEndian>()?
            .to_u8()
            .ok_or(DeserializeError::InvalidParameters)?;
        let lowest = reader.read_u64::<BigEndian>()?;
        let highest = reader.read_u64::<BigEndian>()?;
        let int_to_double_ratio = reader.read_f64::<BigEndian>()?;
        if int_to_double_ratio != 1.0 {
            return Err(DeserializeError::UnsupportedFeature);
        }

        let mut h = Histogram::new_with_bounds(lowest, highest, significant_digits)
            .map_err(|_| DeserializeError::InvalidParameters)?;
        let bin_count = h.bin_count();
        if normalizing_offset != 0 && normalizing_offset >= bin_count {
            return Err(DeserializeError::InvalidParameters);
        }

        if payload_len > self.payload_buf.len() {
            self.payload_buf.resize(payload_len, 0);
        }
        let payload = &mut self.payload_buf[0..payload_len];
        reader.read_exact(payload)?;

        // Walk the counts stream: positive varints are counts for successive
        // bins, negative ones skip runs of empty bins. The stream is written
        // in physical array order; a non-zero normalizing offset rotates each
        // position back to its logical bin.
        let mut position = 0;
        let mut dest_index = 0_usize;
        while position < payload_len {
            let (encoded, used) =
                varint::read(&payload[position..]).ok_or(DeserializeError::Truncated)?;
            position += used;

            let count_or_zeros = varint::zig_zag_decode(encoded);
            if count_or_zeros < 0 {
                let zero_run = count_or_zeros
                    .checked_neg()
                    .and_then(|n| n.to_usize())
                    .ok_or(DeserializeError::EncodedArrayTooLong)?;
                dest_index = dest_index
                    .checked_add(zero_run)
                    .ok_or(DeserializeError::EncodedArrayTooLong)?;
            } else {
                let count =
                    T::from_i64(count_or_zeros).ok_or(DeserializeError::UnsuitableCounterType)?;
                if count > T::zero() {
                    let logical = rotate(dest_index, normalizing_offset, bin_count);
                    h.set_count_at_index(logical, count)
                        .map_err(|_| DeserializeError::EncodedArrayTooLong)?;
                }
                dest_index = dest_index
                    .checked_add(1)
                    .ok_or(DeserializeError::EncodedArrayTooLong)?;
            }
        }

        h.refresh_stats();
        Ok(h)
    }
}

/// Logical bin for physical stream position `index` under a normalizing
/// rotation. Positions beyond the array surface as out-of-range (and are
/// rejected by the bounds-checked store).
fn rotate(index: usize, offset: usize, len: usize) -> usize {
    if offset == 0 || index >= len {
        return index;
    }
    let mut logical = index + offset;
    if logical >= len {
        logical -= len;
    }
    logical
}

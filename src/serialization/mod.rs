//! Serialization and deserialization of histograms.
//!
//! Two binary formats are implemented: a plain V2 payload and the same
//! payload wrapped in zlib DEFLATE. Both are compact snapshots of a
//! histogram's configuration and counts, intended for archival or shipping to
//! another process for analysis; a typical pattern is to serialize an
//! interval histogram periodically and aggregate the deserialized pieces
//! elsewhere, which preserves full fidelity for quantile queries in a way
//! that storing precomputed percentiles cannot.
//!
//! Space usage depends mostly on precision: runs of empty bins are
//! compressed away, so a sparse histogram over a huge range costs little.
//! The DEFLATE variant trades serialization time for further density.
//!
//! Each format has its own serializer type; the cookie at the front of every
//! payload identifies the format and counter width, so a single
//! [`Deserializer`] reads any of them, regardless of which counter width did
//! the writing, as long as the counts fit the target histogram's counter
//! type.
//!
//! Serializers and the deserializer carry internal scratch buffers, so
//! reusing one instance across many histograms amortizes allocations. Any
//! `io::Write` / `io::Read` can be the target; a `Vec<u8>` works fine:
//!
//! ```
//! use rangehist::Histogram;
//! use rangehist::serialization::{Deserializer, Serializer, V2Serializer};
//!
//! let mut hist = Histogram::<u64>::new_with_max(3_600_000, 3).unwrap();
//! hist.record_n(500, 17).unwrap();
//!
//! let mut buf = Vec::new();
//! V2Serializer::new().serialize(&hist, &mut buf).unwrap();
//!
//! let restored: Histogram<u64> = Deserializer::new()
//!     .deserialize(&mut buf.as_slice())
//!     .unwrap();
//! assert_eq!(restored, hist);
//! ```
//!
//! For a line-oriented format carrying a timestamped sequence of histograms,
//! see the [`interval_log`] module.

use std::{fmt, io, mem};

use crate::core::counter::Counter;
use crate::Histogram;


mod varint;

mod v2_serializer;
pub use self::v2_serializer::{V2SerializeError, V2Serializer};

mod v2_deflate_serializer;
pub use self::v2_deflate_serializer::{V2DeflateSerializeError, V2DeflateSerializer};

mod deserializer;
pub use self::deserializer::{DeserializeError, Deserializer};

pub mod interval_log;

const V2_COOKIE_BASE: u32 = 0x1c84_9303;
const V2_COMPRESSED_COOKIE_BASE: u32 = 0x1c84_9304;

const V2_HEADER_SIZE: usize = 40;

/// The wire cookie for an uncompressed payload with `C`-width counters: the
/// base with the counter width in bytes folded into the low nibble.
fn cookie_for<C: Counter>() -> u32 {
    V2_COOKIE_BASE | mem::size_of::<C>() as u32
}

/// The wire cookie for a compressed payload with `C`-width counters.
fn compressed_cookie_for<C: Counter>() -> u32 {
    V2_COMPRESSED_COOKIE_BASE | mem::size_of::<C>() as u32
}

/// If `cookie` is `base` with a supported word size folded in, that word size
/// in bytes.
fn word_size_from_cookie(cookie: u32, base: u32) -> Option<u8> {
    [2_u8, 4, 8]
        .iter()
        .copied()
        .find(|&word_size| cookie == base | u32::from(word_size))
}

/// Histogram serializer.
///
/// Different implementations serialize to different formats.
pub trait Serializer {
    /// Error type returned when serialization fails.
    type SerializeError: fmt::Debug;

    /// Serialize the histogram into the provided writer, returning the number
    /// of bytes written.
    fn serialize<T: Counter, W: io::Write>(
        &mut self,
        h: &Histogram<T>,
        writer: &mut W,
    ) -> Result<usize, Self::SerializeError>;
}

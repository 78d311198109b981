use num_traits::{CheckedAdd, FromPrimitive, Num, Saturating, ToPrimitive};
use std::fmt::Debug;

/// Per-bin counter storage, implemented for the unsigned widths the wire
/// format supports (16, 32, and 64 bits).
///
/// The histogram needs little from a counter: `Num` supplies zero/one and
/// exact arithmetic for merges, `CheckedAdd` gates the overflow-checked
/// record path, `Saturating` backs bulk merges that prefer capping over
/// failing, and the primitive conversions move counts between widths at the
/// codec boundary. Everything else (statistics, totals) runs on the `u64`
/// widening.
pub trait Counter:
    Num
    + CheckedAdd
    + Saturating
    + FromPrimitive
    + ToPrimitive
    + PartialOrd<Self>
    + Copy
    + Debug
{
    /// The counter widened to a `u64`. Lossless for every supported width.
    fn as_u64(&self) -> u64;

    /// The counter as an `f64`, for quantile and statistics math.
    fn as_f64(&self) -> f64 {
        self.as_u64() as f64
    }
}

impl Counter for u16 {
    #[inline]
    fn as_u64(&self) -> u64 {
        u64::from(*self)
    }
}

impl Counter for u32 {
    #[inline]
    fn as_u64(&self) -> u64 {
        u64::from(*self)
    }
}

impl Counter for u64 {
    #[inline]
    fn as_u64(&self) -> u64 {
        *self
    }
}

//! Building blocks shared by every histogram variant.

/// The counter-width abstraction all histogram operations are written against.
pub mod counter;

pub(crate) mod layout;

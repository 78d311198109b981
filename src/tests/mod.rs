//! White-box tests that need access to crate internals (layout fields,
//! counts arrays). Black-box coverage lives in `tests/`.

mod helpers;
mod value_calculation;

//! Pure per-pixel field functions.
//!
//! Nothing in here holds state: every value is a function of the explicit arguments, so fields
//! may be evaluated in any order and from any thread.

pub(crate) mod flow;
pub(crate) mod grating;
pub(crate) mod hash;
pub(crate) mod noise;

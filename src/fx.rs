//! Built-in loop effects and the registry that names them.
//!
//! Each effect is a unit type implementing [`effect::Effect`]: a pure `precompute` from
//! configuration to immutable data, and a reentrant `invoke` per frame.

pub(crate) mod bloom;
pub(crate) mod chromatic;
pub(crate) mod echo;
pub(crate) mod effect;
pub(crate) mod geometry;
pub(crate) mod grain;
pub(crate) mod interference;
pub(crate) mod registry;
pub(crate) mod ripple;
pub(crate) mod vignette;
pub(crate) mod vortex;
pub(crate) mod warp;

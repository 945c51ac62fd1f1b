//! Buffer lifecycle, sampling, and the frame/loop rendering entry points.

pub(crate) mod buffer_pool;
pub(crate) mod pipeline;
pub(crate) mod sample;

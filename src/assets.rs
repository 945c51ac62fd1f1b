//! Adapters to the host's raster containers and layer model.

pub(crate) mod codec;
pub(crate) mod layer;

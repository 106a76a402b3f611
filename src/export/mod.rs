//! Export: resize a composed token to its delivery size and encode it.

pub(crate) mod encode;
pub(crate) mod pipeline;
pub(crate) mod resize;

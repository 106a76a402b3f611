//! Persistence: versioned canvas envelopes and a debounced background writer.

pub(crate) mod debounce;
pub(crate) mod store;

//! Layers that can be added to the content API pipeline.

pub mod inject_populate;

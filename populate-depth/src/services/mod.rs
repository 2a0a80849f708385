//! Request and response types of the content API pipeline, and the layers
//! wrapping it.

pub mod content;
pub mod layers;

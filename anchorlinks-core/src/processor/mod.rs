//! Markdown processing around the anchor annotator.
//!
//! - [`core`]: the comrak adapter and the [`AnchorProcessor`] pipeline
//! - [`types`]: options, the processor struct and the [`Transformer`] trait
pub mod core;
pub mod types;

pub use core::parse_markdown;

pub use types::{AnchorProcessor, ParseOptions, Transformer};

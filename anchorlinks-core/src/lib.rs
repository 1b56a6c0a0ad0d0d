//! # anchorlinks - stable anchors for Markdown documents
//!
//! Annotates an mdast-shaped document tree with collision-free anchor
//! identifiers for headings and for list items that start with inline code,
//! and records every heading for building a table of contents.
//!
//! ## Quick Start
//!
//! ```rust
//! use anchorlinks_core::{AnchorOptions, AnchorProcessor, ParseOptions};
//!
//! let processor =
//!   AnchorProcessor::new(ParseOptions::default(), AnchorOptions::default());
//! let result = processor.process("# Hello World\n\n- `flag` does things\n");
//!
//! assert_eq!(result.headings[0].slug, "hello-world");
//! println!("{}", result.tree.to_json_pretty().unwrap_or_default());
//! ```
//!
//! ## Features
//!
//! - **Slugs** that are unique per document, numbered `foo`, `foo-1`, ...
//! - **Aliases** written as `((#old-name, #other))` after a heading or code
//! - **Compatibility slugs** from a caller supplied function, e.g.
//!   [`slug::legacy_slug`]
//! - **Tab tracking**: each heading knows how deep inside `<Tabs>` it sits
//! - **Headings comment** embedding the heading list as JSON
//!   ([`toc::TocComment`])
//!
//! Trees can come from the bundled comrak adapter
//! ([`processor::parse_markdown`]) or from mdast JSON
//! ([`mdast::Node::from_json`]).

pub mod anchors;
pub mod mdast;
pub mod processor;
pub mod slug;
pub mod toc;
mod types;
pub mod utils;

pub use crate::{
  anchors::{AnchorLinks, AnchorOptions, CompatibilitySlug},
  mdast::{Node, NodeKind, ParseError},
  processor::{AnchorProcessor, ParseOptions, Transformer, parse_markdown},
  slug::{SlugRegistry, generate_aria_label, generate_slug, slug_for},
  toc::TocComment,
  types::{AnchorResult, HeadingRecord},
};

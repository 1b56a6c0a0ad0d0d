//! Type definitions for the anchor processor.
//!
//! # Examples
//!
//! ```
//! use anchorlinks_core::processor::ParseOptions;
//!
//! let options = ParseOptions { gfm: false };
//! assert!(!options.gfm);
//! ```

use crate::{anchors::AnchorLinks, mdast::Node};

/// Options for parsing Markdown into a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
  /// Enable GitHub Flavored Markdown tables, strikethrough and autolinks.
  pub gfm: bool,
}

impl ParseOptions {
  /// Enable all available features based on compile-time feature flags.
  #[must_use]
  pub const fn with_all_features() -> Self {
    Self {
      gfm: cfg!(feature = "gfm"),
    }
  }
}

impl Default for ParseOptions {
  fn default() -> Self {
    Self::with_all_features()
  }
}

/// Parses Markdown and annotates the resulting tree in one call.
#[derive(Debug, Clone, Default)]
pub struct AnchorProcessor {
  pub(crate) parse:       ParseOptions,
  pub(crate) anchors:     AnchorLinks,
  pub(crate) toc_comment: bool,
}

/// A whole-tree rewrite.
pub trait Transformer {
  fn transform(&self, tree: Node) -> Node;
}

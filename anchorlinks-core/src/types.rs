//! Types for the anchorlinks-core public API.
use serde::{Deserialize, Serialize};

use crate::mdast::Node;

/// A heading discovered while annotating a document.
///
/// Serialized with camelCase keys so the records can be consumed by
/// JavaScript tooling that builds a table of contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeadingRecord {
  /// Heading text with markup and alias tokens removed.
  pub title: String,

  /// Generated slug, also the heading's `id`.
  pub slug: String,

  /// Target of the heading's permalink: first alias, else compatibility
  /// slug, else `slug`.
  pub permalink_slug: String,

  /// Heading level (1-6).
  pub level: u8,

  /// Explicit aliases, in the order written. Possibly empty.
  pub aliases: Vec<String>,

  /// Nesting depth of `<Tabs>` containers around the heading.
  pub tabbed_section_depth: i64,
}

/// Result of processing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorResult {
  /// The annotated tree.
  pub tree: Node,

  /// Heading records in document order.
  pub headings: Vec<HeadingRecord>,
}

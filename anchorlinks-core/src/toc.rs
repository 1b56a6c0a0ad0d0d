//! The headings comment.
//!
//! [`TocComment`] appends a raw HTML comment to the end of a document that
//! lists every heading as JSON, so a page template can build its table of
//! contents without walking the tree again:
//!
//! ```text
//! <!-- start of anchorlinks headings comment
//! [{"title":"Intro","slug":"intro","level":1}]
//! end of anchorlinks headings comment -->
//! ```
//!
//! [`extract_toc_comment`] reads the list back out of rendered output.
use serde::{Deserialize, Serialize};

use crate::{
  mdast::{Node, NodeKind},
  processor::Transformer,
  slug::{SlugRegistry, generate_slug},
};

pub const COMMENT_PREFIX: &str = "start of anchorlinks headings comment";
pub const COMMENT_SUFFIX: &str = "end of anchorlinks headings comment";

/// One heading as listed in the comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
  pub title: String,
  pub slug:  String,
  pub level: u8,
}

/// Appends the headings comment to a root node.
#[derive(Debug, Clone, Copy, Default)]
pub struct TocComment;

impl Transformer for TocComment {
  fn transform(&self, mut tree: Node) -> Node {
    let entries = collect_entries(&tree);
    append_comment(&mut tree, &entries);
    tree
  }
}

/// List the headings of `tree` in document order.
///
/// The title is the value of a heading's first child, empty when that child
/// is not a leaf. Slugs are numbered against a registry private to this
/// call.
#[must_use]
pub fn collect_entries(tree: &Node) -> Vec<TocEntry> {
  let mut registry = SlugRegistry::new();
  let mut entries = Vec::new();
  walk(tree, &mut |node| {
    if let NodeKind::Heading { depth, children } = &node.kind {
      let title = children
        .first()
        .and_then(Node::value)
        .unwrap_or_default()
        .to_owned();
      entries.push(TocEntry {
        slug: generate_slug(&title, &mut registry),
        title,
        level: *depth,
      });
    }
  });
  entries
}

/// Push the comment for `entries` onto the root's children. Trees that are
/// not rooted in a container are left alone.
pub fn append_comment(tree: &mut Node, entries: &[TocEntry]) {
  let Some(children) = tree.children_mut() else {
    log::warn!("Cannot append headings comment to a leaf node");
    return;
  };
  children.push(Node::html(render_comment(entries)));
}

/// Render the comment text for `entries`.
#[must_use]
pub fn render_comment(entries: &[TocEntry]) -> String {
  // A list of plain structs always serializes.
  let json = serde_json::to_string(entries).unwrap_or_default();
  format!("<!-- {COMMENT_PREFIX}\n{json}\n{COMMENT_SUFFIX} -->")
}

/// Find a headings comment in `html` and decode its entries.
///
/// Returns `None` when there is no complete comment or its payload is not
/// valid JSON.
#[must_use]
pub fn extract_toc_comment(html: &str) -> Option<Vec<TocEntry>> {
  let start = html.find(COMMENT_PREFIX)? + COMMENT_PREFIX.len();
  let end = start + html[start..].find(COMMENT_SUFFIX)?;
  match serde_json::from_str(html[start..end].trim()) {
    Ok(entries) => Some(entries),
    Err(e) => {
      log::debug!("Ignoring malformed headings comment: {e}");
      None
    },
  }
}

fn walk<F: FnMut(&Node)>(node: &Node, f: &mut F) {
  f(node);
  for child in node.children().unwrap_or_default() {
    walk(child, f);
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  fn document() -> Node {
    Node::root(vec![
      Node::heading(1, vec![Node::text("Heading 1")]),
      Node::paragraph(vec![Node::text("body")]),
      Node::heading(2, vec![Node::text("Heading 1")]),
      Node::heading(3, vec![Node::inline_code("code")]),
    ])
  }

  #[test]
  fn entries_follow_document_order() {
    let entries = collect_entries(&document());
    assert_eq!(entries, vec![
      TocEntry {
        title: "Heading 1".into(),
        slug:  "heading-1".into(),
        level: 1,
      },
      TocEntry {
        title: "Heading 1".into(),
        slug:  "heading-1-1".into(),
        level: 2,
      },
      TocEntry {
        title: "code".into(),
        slug:  "code".into(),
        level: 3,
      },
    ]);
  }

  #[test]
  fn comment_is_appended_last() {
    let tree = TocComment.transform(document());
    let children = tree.children().unwrap();
    let comment = children.last().unwrap().value().unwrap();
    assert!(comment.starts_with("<!-- start of anchorlinks headings comment\n"));
    assert!(comment.ends_with("\nend of anchorlinks headings comment -->"));
  }

  #[test]
  fn comment_round_trips() {
    let entries = collect_entries(&document());
    let page = format!("<p>before</p>{}<p>after</p>", render_comment(&entries));
    assert_eq!(extract_toc_comment(&page), Some(entries));
  }

  #[test]
  fn missing_or_broken_comment() {
    assert_eq!(extract_toc_comment("<p>nothing</p>"), None);
    let broken = format!("<!-- {COMMENT_PREFIX}\n[{{\n{COMMENT_SUFFIX} -->");
    assert_eq!(extract_toc_comment(&broken), None);
  }

  #[test]
  fn empty_document_gets_an_empty_list() {
    let tree = TocComment.transform(Node::root(Vec::new()));
    let comment = tree.children().unwrap()[0].value().unwrap();
    assert_eq!(
      extract_toc_comment(comment),
      Some(Vec::new())
    );
  }
}

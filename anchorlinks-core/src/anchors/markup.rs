//! Markup injected next to anchored content.
use html_escape::encode_double_quoted_attribute as attr;

use crate::{mdast::Node, slug::PERMALINK_GLYPH};

/// Where an anchor is injected; selects the CSS class family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  Heading,
  ListItem,
}

impl Scope {
  const fn target_class(self) -> &'static str {
    match self {
      Self::Heading => "__target-h",
      Self::ListItem => "__target-lic",
    }
  }
}

/// Hidden target for an alias or a compatibility slug.
#[must_use]
pub fn compat_target(id: &str, scope: Scope) -> Node {
  Node::html(format!(
    r#"<a class="{} __compat" id="{}" aria-hidden="true"></a>"#,
    scope.target_class(),
    attr(id)
  ))
}

/// Hidden target carrying a list item's primary slug.
#[must_use]
pub fn list_item_target(slug: &str) -> Node {
  Node::html(format!(
    r#"<a id="{}" class="__target-lic" aria-hidden="true"></a>"#,
    attr(slug)
  ))
}

/// Visible permalink placed at the start of a heading.
#[must_use]
pub fn heading_permalink(target: &str, label: &str) -> Node {
  Node::html(format!(
    r##"<a class="__permalink-h" href="#{}" aria-label="{} permalink">{PERMALINK_GLYPH}</a>"##,
    attr(target),
    attr(label)
  ))
}

/// Wrap a list item's leading inline code in a permalink.
#[must_use]
pub fn code_permalink(target: &str, label: &str, code: Node) -> Node {
  let mut link = Node::link(format!("#{target}"), vec![code]);
  link.set_h_property("ariaLabel", format!("{label} permalink"));
  link.set_h_property("class", "__permalink-lic");
  link
}

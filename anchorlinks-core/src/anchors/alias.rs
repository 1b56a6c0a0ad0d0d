//! Anchor alias parsing.
//!
//! Authors attach extra anchors to a heading or code-led list item by
//! writing `((#name))` or `((#name, #other))` right after its content. The
//! parser pulls those names out and removes the token from the text.
//!
//! Markdown escapes can split the token across several sibling nodes, most
//! commonly an alias with an escaped underscore such as `((#\_foo))`. When
//! the opening `((#` is found without a complete token, the siblings up to
//! the first one containing `))` are merged into a single text node first.
use crate::{mdast::Node, utils::ALIAS_TOKEN_RE};

const OPENING: &str = "((#";
const CLOSING: &str = "))";

/// Extract aliases from `children`, starting at index `start`.
///
/// Returns an empty list when there is no child at `start`, when it holds no
/// alias token, or when an opened token is never closed. In the last case
/// the children are left untouched.
pub fn parse_aliases(children: &mut Vec<Node>, start: usize) -> Vec<String> {
  let Some(value) = children.get(start).and_then(Node::value) else {
    return Vec::new();
  };

  if ALIAS_TOKEN_RE.is_match(value) {
    return take_aliases(&mut children[start]);
  }

  if !value.contains(OPENING) {
    return Vec::new();
  }

  let Some(end) = children
    .iter()
    .enumerate()
    .skip(start + 1)
    .find(|(_, node)| node.value().is_some_and(|v| v.contains(CLOSING)))
    .map(|(idx, _)| idx)
  else {
    log::debug!("Ignoring unterminated anchor alias in {value:?}");
    return Vec::new();
  };

  let combined: String = children
    .drain(start..=end)
    .filter_map(|node| node.value().map(str::to_owned))
    .collect();
  children.insert(start, Node::text(combined));

  take_aliases(&mut children[start])
}

/// Split the first alias token in `node` into names and remove it from the
/// node's value.
fn take_aliases(node: &mut Node) -> Vec<String> {
  let Some(value) = node.value_mut() else {
    return Vec::new();
  };

  let aliases: Vec<String> = match ALIAS_TOKEN_RE.captures(value) {
    Some(caps) => {
      caps[1]
        .split(',')
        .map(|alias| {
          let alias = alias.trim();
          alias.strip_prefix('#').unwrap_or(alias).to_owned()
        })
        .collect()
    },
    None => return Vec::new(),
  };

  let stripped = ALIAS_TOKEN_RE.replacen(value.as_str(), 1, "").into_owned();
  *value = stripped;
  aliases
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mdast::NodeKind;

  fn values(children: &[Node]) -> Vec<Option<&str>> {
    children.iter().map(Node::value).collect()
  }

  #[test]
  fn single_alias_in_one_node() {
    let mut children = vec![Node::text("hello world ((#foo))")];
    assert_eq!(parse_aliases(&mut children, 0), vec!["foo"]);
    assert_eq!(values(&children), vec![Some("hello world")]);
  }

  #[test]
  fn multiple_aliases_keep_order() {
    let mut children = vec![Node::text("hello world ((#foo, #bar,#baz))")];
    assert_eq!(parse_aliases(&mut children, 0), vec!["foo", "bar", "baz"]);
  }

  #[test]
  fn only_the_first_token_is_removed() {
    let mut children = vec![
      Node::inline_code("foo"),
      Node::text(" some text ((#wow)) more ((#later))"),
    ];
    assert_eq!(parse_aliases(&mut children, 1), vec!["wow"]);
    assert_eq!(children[1].value(), Some(" some text more ((#later))"));
  }

  #[test]
  fn missing_child_means_no_aliases() {
    let mut children = vec![Node::inline_code("foo")];
    assert!(parse_aliases(&mut children, 1).is_empty());
    assert!(parse_aliases(&mut Vec::new(), 0).is_empty());
  }

  #[test]
  fn non_value_child_means_no_aliases() {
    let mut children = vec![NodeKind::Emphasis {
      children: vec![Node::text("((#foo))")],
    }
    .into()];
    assert!(parse_aliases(&mut children, 0).is_empty());
  }

  #[test]
  fn split_token_is_merged() {
    let mut children = vec![
      Node::inline_code("baz"),
      Node::text(" ((#"),
      Node::text("_bar)) text"),
      Node::link("#test", vec![Node::text("link")]),
    ];
    assert_eq!(parse_aliases(&mut children, 1), vec!["_bar"]);
    assert_eq!(children.len(), 3);
    assert_eq!(children[1].value(), Some(" text"));
    assert_eq!(children[2].type_name(), "link");
  }

  #[test]
  fn non_text_nodes_inside_split_span_are_dropped() {
    let mut children = vec![
      Node::text("title ((#a"),
      NodeKind::Emphasis {
        children: vec![Node::text("b")],
      }
      .into(),
      Node::text("_c))"),
    ];
    assert_eq!(parse_aliases(&mut children, 0), vec!["a_c"]);
    assert_eq!(values(&children), vec![Some("title")]);
  }

  #[test]
  fn unterminated_token_is_ignored() {
    let mut children = vec![
      Node::inline_code("quux"),
      Node::text(" ((#foo wow"),
      Node::text(" and more"),
    ];
    assert!(parse_aliases(&mut children, 1).is_empty());
    assert_eq!(values(&children), vec![
      Some("quux"),
      Some(" ((#foo wow"),
      Some(" and more")
    ]);
  }

  #[test]
  fn closing_before_start_is_not_used() {
    let mut children = vec![
      Node::inline_code("f())"),
      Node::text(" ((#"),
      Node::text("x"),
    ];
    assert!(parse_aliases(&mut children, 1).is_empty());
    assert_eq!(children.len(), 3);
  }
}

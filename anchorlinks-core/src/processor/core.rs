//! Markdown parsing and the processing pipeline.
use comrak::{
  Arena,
  nodes::{AstNode, ListType, NodeValue},
  options::Options,
  parse_document,
};
use log::{debug, trace};

use super::types::{AnchorProcessor, ParseOptions};
use crate::{
  anchors::{AnchorLinks, AnchorOptions},
  mdast::{Node, NodeKind},
  toc,
  types::AnchorResult,
};

impl AnchorProcessor {
  #[must_use]
  pub fn new(parse: ParseOptions, options: AnchorOptions) -> Self {
    Self {
      parse,
      anchors: AnchorLinks::new(options),
      toc_comment: false,
    }
  }

  /// Also append the headings comment to every processed tree.
  #[must_use]
  pub const fn with_toc_comment(mut self, enabled: bool) -> Self {
    self.toc_comment = enabled;
    self
  }

  #[must_use]
  pub const fn parse_options(&self) -> &ParseOptions {
    &self.parse
  }

  #[must_use]
  pub const fn anchors(&self) -> &AnchorLinks {
    &self.anchors
  }

  /// Parse `markdown` into a tree without annotating it.
  #[must_use]
  pub fn parse(&self, markdown: &str) -> Node {
    parse_markdown(markdown, &self.parse)
  }

  /// Parse and annotate `markdown`.
  #[must_use]
  pub fn process(&self, markdown: &str) -> AnchorResult {
    self.process_tree(self.parse(markdown))
  }

  /// Annotate an already parsed tree.
  #[must_use]
  pub fn process_tree(&self, tree: Node) -> AnchorResult {
    // Titles come from each heading's first child, which annotation replaces.
    let entries = self.toc_comment.then(|| toc::collect_entries(&tree));

    let mut headings = Vec::new();
    let mut tree = self.anchors.annotate(tree, Some(&mut headings));
    if let Some(entries) = entries {
      toc::append_comment(&mut tree, &entries);
    }

    debug!("Annotated tree with {} headings", headings.len());
    AnchorResult { tree, headings }
  }
}

/// Parse Markdown with comrak and convert the result into a [`Node`] tree.
#[must_use]
pub fn parse_markdown(content: &str, options: &ParseOptions) -> Node {
  let arena = Arena::new();
  let root = parse_document(&arena, content, &comrak_options(options));
  Node::root(convert_children(root))
}

fn comrak_options(options: &ParseOptions) -> Options<'static> {
  let mut comrak = Options::default();
  if options.gfm {
    comrak.extension.table = true;
    comrak.extension.strikethrough = true;
    comrak.extension.autolink = true;
  }
  comrak
}

fn convert_children<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
  merge_text(node.children().flat_map(convert).collect())
}

/// Convert one comrak node. Unknown containers are replaced by their
/// converted children; unknown leaves vanish.
fn convert<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
  let ast = node.data.borrow();
  let children = || convert_children(node);

  let kind = match &ast.value {
    NodeValue::Document => {
      NodeKind::Root {
        children: children(),
      }
    },
    NodeValue::Paragraph => {
      NodeKind::Paragraph {
        children: children(),
      }
    },
    NodeValue::Heading(heading) => {
      NodeKind::Heading {
        depth:    heading.level,
        children: children(),
      }
    },
    NodeValue::BlockQuote => {
      NodeKind::Blockquote {
        children: children(),
      }
    },
    NodeValue::List(list) => {
      let ordered = list.list_type == ListType::Ordered;
      NodeKind::List {
        ordered,
        start: ordered.then(|| u32::try_from(list.start).unwrap_or(u32::MAX)),
        children: children(),
      }
    },
    NodeValue::Item(_) => {
      NodeKind::ListItem {
        children: children(),
      }
    },
    NodeValue::CodeBlock(block) => {
      NodeKind::Code {
        lang:  block
          .info
          .split_whitespace()
          .next()
          .map(str::to_owned),
        value: strip_final_newline(&block.literal),
      }
    },
    NodeValue::HtmlBlock(block) => {
      NodeKind::Html {
        value: strip_final_newline(&block.literal),
      }
    },
    NodeValue::ThematicBreak => NodeKind::ThematicBreak,
    NodeValue::Text(text) => {
      NodeKind::Text {
        value: text.to_string(),
      }
    },
    NodeValue::SoftBreak => {
      NodeKind::Text {
        value: "\n".to_string(),
      }
    },
    NodeValue::LineBreak => NodeKind::Break,
    NodeValue::Code(code) => {
      NodeKind::InlineCode {
        value: code.literal.to_string(),
      }
    },
    NodeValue::HtmlInline(html) => {
      NodeKind::Html {
        value: html.to_string(),
      }
    },
    NodeValue::Emph => {
      NodeKind::Emphasis {
        children: children(),
      }
    },
    NodeValue::Strong => {
      NodeKind::Strong {
        children: children(),
      }
    },
    NodeValue::Strikethrough => {
      NodeKind::Delete {
        children: children(),
      }
    },
    NodeValue::Link(link) => {
      NodeKind::Link {
        url:      link.url.to_string(),
        title:    non_empty(&link.title),
        children: children(),
      }
    },
    NodeValue::Image(link) => {
      NodeKind::Image {
        url:   link.url.to_string(),
        title: non_empty(&link.title),
        alt:   children().iter().map(Node::text_content).collect(),
      }
    },
    NodeValue::Table(..) => {
      NodeKind::Table {
        children: children(),
      }
    },
    NodeValue::TableRow(..) => {
      NodeKind::TableRow {
        children: children(),
      }
    },
    NodeValue::TableCell => {
      NodeKind::TableCell {
        children: children(),
      }
    },
    other => {
      if node.first_child().is_some() {
        trace!("Unwrapping unsupported container {other:?}");
        return children();
      }
      trace!("Dropping unsupported node {other:?}");
      return Vec::new();
    },
  };

  vec![kind.into()]
}

/// Join adjacent text nodes, as mdast parsers do.
fn merge_text(nodes: Vec<Node>) -> Vec<Node> {
  let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
  for node in nodes {
    if let (
      Some(Node {
        kind: NodeKind::Text { value: last },
        ..
      }),
      NodeKind::Text { value },
    ) = (merged.last_mut(), &node.kind)
    {
      last.push_str(value);
      continue;
    }
    merged.push(node);
  }
  merged
}

fn strip_final_newline(literal: &str) -> String {
  literal.strip_suffix('\n').unwrap_or(literal).to_owned()
}

fn non_empty(text: &str) -> Option<String> {
  (!text.is_empty()).then(|| text.to_owned())
}

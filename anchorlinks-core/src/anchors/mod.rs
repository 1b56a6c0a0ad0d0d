//! Anchor annotation for headings and code-led list items.
//!
//! [`AnchorLinks`] walks a tree once and
//!
//! - gives every heading an `id`, a visible `»` permalink, and hidden targets
//!   for its aliases and compatibility slug;
//! - turns the leading inline code of a list item into a permalink and
//!   prepends hidden targets to the list item;
//! - records a [`HeadingRecord`] per heading, including how deep inside
//!   `<Tabs>` containers the heading sits.
//!
//! Headings and list items share one slug registry per run, so a list item
//! `` `foo` `` after a heading `# foo` is anchored as `foo-1`.
//!
//! # Examples
//!
//! ```
//! use anchorlinks_core::{
//!   AnchorLinks,
//!   AnchorOptions,
//!   mdast::Node,
//! };
//!
//! let tree = Node::root(vec![
//!   Node::heading(1, vec![Node::text("hello world ((#foo, #bar))")]),
//! ]);
//!
//! let mut headings = Vec::new();
//! AnchorLinks::new(AnchorOptions::default()).annotate(tree, Some(&mut headings));
//!
//! assert_eq!(headings[0].slug, "hello-world");
//! assert_eq!(headings[0].aliases, vec!["foo", "bar"]);
//! assert_eq!(headings[0].permalink_slug, "foo");
//! ```

pub mod alias;
pub mod markup;
pub mod tabs;

use std::{fmt, sync::Arc};

use log::trace;

pub use self::{alias::parse_aliases, tabs::TabDepth};
use self::markup::Scope;
use crate::{
  mdast::{self, Node, NodeKind},
  processor::Transformer,
  slug::{SlugRegistry, generate_aria_label, generate_slug, heading_title},
  types::HeadingRecord,
};

/// A function producing an alternative slug that should keep resolving,
/// e.g. the slug an older site generator used.
pub type CompatibilitySlug = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Options for [`AnchorLinks`].
#[derive(Clone, Default)]
pub struct AnchorOptions {
  /// Extra slug computed from the same text. When it differs from the
  /// primary slug a hidden target is added for it, and it becomes the
  /// permalink target unless an alias is given.
  pub compatibility_slug: Option<CompatibilitySlug>,

  /// Prefix joined with `-` in front of a list item's inline code before
  /// slugging. Empty prefixes are ignored.
  pub list_with_inline_code_prefix: Option<String>,
}

impl fmt::Debug for AnchorOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AnchorOptions")
      .field(
        "compatibility_slug",
        &self.compatibility_slug.as_ref().map(|_| "<fn>"),
      )
      .field(
        "list_with_inline_code_prefix",
        &self.list_with_inline_code_prefix,
      )
      .finish()
  }
}

impl AnchorOptions {
  #[must_use]
  pub fn with_compatibility_slug<F>(mut self, slug: F) -> Self
  where
    F: Fn(&str) -> String + Send + Sync + 'static,
  {
    self.compatibility_slug = Some(Arc::new(slug));
    self
  }

  #[must_use]
  pub fn with_list_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.list_with_inline_code_prefix = Some(prefix.into());
    self
  }
}

/// The anchor annotator. Cheap to share; every call to
/// [`annotate`](Self::annotate) starts with fresh slug and tab state.
#[derive(Debug, Clone, Default)]
pub struct AnchorLinks {
  options: AnchorOptions,
}

impl AnchorLinks {
  #[must_use]
  pub const fn new(options: AnchorOptions) -> Self {
    Self { options }
  }

  #[must_use]
  pub const fn options(&self) -> &AnchorOptions {
    &self.options
  }

  /// Annotate `tree`, appending a record per heading to `headings` if given.
  pub fn annotate(
    &self,
    tree: Node,
    headings: Option<&mut Vec<HeadingRecord>>,
  ) -> Node {
    let mut run = AnchorRun {
      options: &self.options,
      registry: SlugRegistry::new(),
      tabs: TabDepth::new(),
      headings,
    };
    mdast::map(tree, &mut |node| run.visit(node))
  }
}

impl Transformer for AnchorLinks {
  fn transform(&self, tree: Node) -> Node {
    self.annotate(tree, None)
  }
}

/// Per-document state.
struct AnchorRun<'o, 'h> {
  options:  &'o AnchorOptions,
  registry: SlugRegistry,
  tabs:     TabDepth,
  headings: Option<&'h mut Vec<HeadingRecord>>,
}

impl AnchorRun<'_, '_> {
  fn visit(&mut self, node: Node) -> Node {
    if node.is_raw_markup()
      && let Some(markup) = node.value()
    {
      self.tabs.observe(markup);
    }

    if matches!(node.kind, NodeKind::Heading { .. }) {
      return self.process_heading(node);
    }
    if leading_inline_code(&node).is_some() {
      return self.process_list_item(node);
    }
    node
  }

  fn compatibility_slug(&self, text: &str) -> Option<String> {
    self.options.compatibility_slug.as_ref().map(|slug| slug(text))
  }

  fn process_heading(&mut self, mut node: Node) -> Node {
    let text = node.text_content();
    let slug = generate_slug(&text, &mut self.registry);
    node.set_h_property("id", slug.clone());

    let NodeKind::Heading { depth, children } = &mut node.kind else {
      return node;
    };
    let level = *depth;

    let aliases = parse_aliases(children, 0);
    let compat = self.compatibility_slug(&text);
    let permalink_slug =
      permalink_target(&aliases, compat.as_deref(), &slug).to_owned();

    let mut injected = vec![markup::heading_permalink(
      &permalink_slug,
      &generate_aria_label(&text),
    )];
    if let Some(compat) = compat.as_deref().filter(|c| *c != slug) {
      injected.push(markup::compat_target(compat, Scope::Heading));
    }
    injected.extend(
      aliases
        .iter()
        .map(|alias| markup::compat_target(alias, Scope::Heading)),
    );
    injected.append(children);
    *children = injected;

    trace!("Anchored heading #{slug} (h{level}) -> #{permalink_slug}");

    if let Some(headings) = self.headings.as_deref_mut() {
      headings.push(HeadingRecord {
        title: heading_title(&text),
        slug,
        permalink_slug,
        level,
        aliases,
        tabbed_section_depth: self.tabs.get(),
      });
    }

    node
  }

  fn process_list_item(&mut self, mut node: Node) -> Node {
    let Some(code) = leading_inline_code(&node).map(str::to_owned) else {
      return node;
    };

    let source = match self.options.list_with_inline_code_prefix.as_deref() {
      Some(prefix) if !prefix.is_empty() => format!("{prefix}-{code}"),
      _ => code.clone(),
    };
    let slug = generate_slug(&source, &mut self.registry);
    let compat = self.compatibility_slug(&code);

    let NodeKind::ListItem { children } = &mut node.kind else {
      return node;
    };
    let Some(NodeKind::Paragraph { children: inline }) =
      children.first_mut().map(|p| &mut p.kind)
    else {
      return node;
    };

    let aliases = parse_aliases(inline, 1);
    let permalink_slug = permalink_target(&aliases, compat.as_deref(), &slug);

    let code_node = inline.remove(0);
    inline.insert(
      0,
      markup::code_permalink(
        permalink_slug,
        &generate_aria_label(&code),
        code_node,
      ),
    );

    let mut injected = vec![markup::list_item_target(&slug)];
    if let Some(compat) = compat.as_deref().filter(|c| *c != slug) {
      injected.push(markup::compat_target(compat, Scope::ListItem));
    }
    injected.extend(
      aliases
        .iter()
        .map(|alias| markup::compat_target(alias, Scope::ListItem)),
    );

    trace!("Anchored list item #{slug} -> #{permalink_slug}");
    injected.append(children);
    *children = injected;

    node
  }
}

/// Permalink target precedence: first alias, then compatibility slug, then
/// the generated slug.
fn permalink_target<'a>(
  aliases: &'a [String],
  compat: Option<&'a str>,
  slug: &'a str,
) -> &'a str {
  aliases.first().map(String::as_str).or(compat).unwrap_or(slug)
}

/// The inline code value of a `listItem > paragraph > inlineCode` chain.
fn leading_inline_code(node: &Node) -> Option<&str> {
  let NodeKind::ListItem { children } = &node.kind else {
    return None;
  };
  let NodeKind::Paragraph { children: inline } = &children.first()?.kind else {
    return None;
  };
  match &inline.first()?.kind {
    NodeKind::InlineCode { value } => Some(value),
    _ => None,
  }
}

//! An mdast-shaped document tree.
//!
//! [`Node`] mirrors the JSON shape used by the unified/remark ecosystem: every
//! node carries a `type` discriminator, containers own `children`, leaves
//! carry a `value`, and an optional `data.hProperties` map holds rendering
//! attributes for a downstream HTML renderer. Trees round-trip through
//! `serde_json`, so an external parser can hand one over as JSON.
//!
//! # Examples
//!
//! ```
//! use anchorlinks_core::mdast::{Node, map};
//!
//! let tree = Node::root(vec![Node::heading(1, vec![Node::text("Hello")])]);
//! let shouted = map(tree, &mut |mut node: Node| {
//!   if let Some(value) = node.value_mut() {
//!     *value = value.to_uppercase();
//!   }
//!   node
//! });
//! assert_eq!(shouted.text_content(), "HELLO");
//! ```

use std::collections::BTreeMap;

use serde::{
  Deserialize,
  Deserializer,
  Serialize,
  Serializer,
  de::{DeserializeOwned, Error as _},
  ser::SerializeMap,
};
use serde_json::{Map, Value};

/// Error type for decoding trees handed over by an external parser.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
  #[error("Invalid mdast JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Expected a root node, found `{0}`")]
  NotRoot(String),

  #[error("Node `{node}` is missing the `{field}` field")]
  MissingField { node: String, field: &'static str },
}

/// Rendering attributes attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
  /// Attributes the renderer emits on the node's element (`id`, `class`,
  /// `ariaLabel`, ...). Values are whatever the producer put there, e.g.
  /// `className: ["note"]`.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub h_properties: BTreeMap<String, Value>,

  /// Other `data` keys (`hName`, ...), kept as is.
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl NodeData {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.h_properties.is_empty() && self.extra.is_empty()
  }
}

/// The kind-specific part of a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
  Root {
    children: Vec<Node>,
  },
  Paragraph {
    children: Vec<Node>,
  },
  Heading {
    depth:    u8,
    children: Vec<Node>,
  },
  ThematicBreak,
  Blockquote {
    children: Vec<Node>,
  },
  List {
    ordered:  bool,
    start:    Option<u32>,
    children: Vec<Node>,
  },
  ListItem {
    children: Vec<Node>,
  },
  Table {
    children: Vec<Node>,
  },
  TableRow {
    children: Vec<Node>,
  },
  TableCell {
    children: Vec<Node>,
  },
  Code {
    lang:  Option<String>,
    value: String,
  },
  /// Raw HTML, either a block or an inline fragment.
  Html {
    value: String,
  },
  /// Raw JSX, as produced by MDX parsers.
  Jsx {
    value: String,
  },
  Text {
    value: String,
  },
  Emphasis {
    children: Vec<Node>,
  },
  Strong {
    children: Vec<Node>,
  },
  Delete {
    children: Vec<Node>,
  },
  InlineCode {
    value: String,
  },
  Break,
  Link {
    url:      String,
    title:    Option<String>,
    children: Vec<Node>,
  },
  Image {
    url:   String,
    title: Option<String>,
    alt:   String,
  },
  /// Any other node type (`linkReference`, `definition`, `yaml`, MDX
  /// expressions, ...). Its other fields live in [`Node::extra`].
  Other {
    type_name: String,
    children:  Option<Vec<Node>>,
    value:     Option<String>,
  },
}

/// A node in the document tree.
///
/// Fields this model does not know about (`position`, `spread`, `checked`,
/// `identifier`, ...) are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
  pub kind:  NodeKind,
  pub data:  NodeData,
  pub extra: Map<String, Value>,
}

impl From<NodeKind> for Node {
  fn from(kind: NodeKind) -> Self {
    Self {
      kind,
      data: NodeData::default(),
      extra: Map::new(),
    }
  }
}

impl Node {
  #[must_use]
  pub fn root(children: Vec<Self>) -> Self {
    NodeKind::Root { children }.into()
  }

  #[must_use]
  pub fn paragraph(children: Vec<Self>) -> Self {
    NodeKind::Paragraph { children }.into()
  }

  #[must_use]
  pub fn heading(depth: u8, children: Vec<Self>) -> Self {
    NodeKind::Heading { depth, children }.into()
  }

  #[must_use]
  pub fn list(ordered: bool, children: Vec<Self>) -> Self {
    NodeKind::List {
      ordered,
      start: None,
      children,
    }
    .into()
  }

  #[must_use]
  pub fn list_item(children: Vec<Self>) -> Self {
    NodeKind::ListItem { children }.into()
  }

  #[must_use]
  pub fn text(value: impl Into<String>) -> Self {
    NodeKind::Text {
      value: value.into(),
    }
    .into()
  }

  #[must_use]
  pub fn html(value: impl Into<String>) -> Self {
    NodeKind::Html {
      value: value.into(),
    }
    .into()
  }

  #[must_use]
  pub fn inline_code(value: impl Into<String>) -> Self {
    NodeKind::InlineCode {
      value: value.into(),
    }
    .into()
  }

  #[must_use]
  pub fn link(url: impl Into<String>, children: Vec<Self>) -> Self {
    NodeKind::Link {
      url: url.into(),
      title: None,
      children,
    }
    .into()
  }

  /// The mdast `type` name of this node.
  #[must_use]
  pub fn type_name(&self) -> &str {
    match &self.kind {
      NodeKind::Root { .. } => "root",
      NodeKind::Paragraph { .. } => "paragraph",
      NodeKind::Heading { .. } => "heading",
      NodeKind::ThematicBreak => "thematicBreak",
      NodeKind::Blockquote { .. } => "blockquote",
      NodeKind::List { .. } => "list",
      NodeKind::ListItem { .. } => "listItem",
      NodeKind::Table { .. } => "table",
      NodeKind::TableRow { .. } => "tableRow",
      NodeKind::TableCell { .. } => "tableCell",
      NodeKind::Code { .. } => "code",
      NodeKind::Html { .. } => "html",
      NodeKind::Jsx { .. } => "jsx",
      NodeKind::Text { .. } => "text",
      NodeKind::Emphasis { .. } => "emphasis",
      NodeKind::Strong { .. } => "strong",
      NodeKind::Delete { .. } => "delete",
      NodeKind::InlineCode { .. } => "inlineCode",
      NodeKind::Break => "break",
      NodeKind::Link { .. } => "link",
      NodeKind::Image { .. } => "image",
      NodeKind::Other { type_name, .. } => type_name,
    }
  }

  /// Children of a container node, `None` for leaves.
  #[must_use]
  pub fn children(&self) -> Option<&[Self]> {
    match &self.kind {
      NodeKind::Root { children }
      | NodeKind::Paragraph { children }
      | NodeKind::Heading { children, .. }
      | NodeKind::Blockquote { children }
      | NodeKind::List { children, .. }
      | NodeKind::ListItem { children }
      | NodeKind::Table { children }
      | NodeKind::TableRow { children }
      | NodeKind::TableCell { children }
      | NodeKind::Emphasis { children }
      | NodeKind::Strong { children }
      | NodeKind::Delete { children }
      | NodeKind::Link { children, .. }
      | NodeKind::Other {
        children: Some(children),
        ..
      } => Some(children.as_slice()),
      _ => None,
    }
  }

  pub const fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
    match &mut self.kind {
      NodeKind::Root { children }
      | NodeKind::Paragraph { children }
      | NodeKind::Heading { children, .. }
      | NodeKind::Blockquote { children }
      | NodeKind::List { children, .. }
      | NodeKind::ListItem { children }
      | NodeKind::Table { children }
      | NodeKind::TableRow { children }
      | NodeKind::TableCell { children }
      | NodeKind::Emphasis { children }
      | NodeKind::Strong { children }
      | NodeKind::Delete { children }
      | NodeKind::Link { children, .. }
      | NodeKind::Other {
        children: Some(children),
        ..
      } => Some(children),
      _ => None,
    }
  }

  /// Literal value of a leaf node (text, raw markup, code).
  #[must_use]
  pub fn value(&self) -> Option<&str> {
    match &self.kind {
      NodeKind::Code { value, .. }
      | NodeKind::Html { value }
      | NodeKind::Jsx { value }
      | NodeKind::Text { value }
      | NodeKind::InlineCode { value }
      | NodeKind::Other {
        value: Some(value), ..
      } => Some(value),
      _ => None,
    }
  }

  pub const fn value_mut(&mut self) -> Option<&mut String> {
    match &mut self.kind {
      NodeKind::Code { value, .. }
      | NodeKind::Html { value }
      | NodeKind::Jsx { value }
      | NodeKind::Text { value }
      | NodeKind::InlineCode { value }
      | NodeKind::Other {
        value: Some(value), ..
      } => Some(value),
      _ => None,
    }
  }

  /// Whether this node holds raw HTML or JSX markup.
  #[must_use]
  pub const fn is_raw_markup(&self) -> bool {
    matches!(self.kind, NodeKind::Html { .. } | NodeKind::Jsx { .. })
  }

  /// Concatenate the values of every descendant leaf, depth-first.
  ///
  /// Raw markup is included verbatim; callers strip tags themselves.
  #[must_use]
  pub fn text_content(&self) -> String {
    let mut out = String::new();
    self.collect_text(&mut out);
    out
  }

  fn collect_text(&self, out: &mut String) {
    if let Some(children) = self.children() {
      for child in children {
        child.collect_text(out);
      }
    } else if let Some(value) = self.value() {
      out.push_str(value);
    }
  }

  /// Look up a string rendering attribute.
  #[must_use]
  pub fn h_property(&self, key: &str) -> Option<&str> {
    self.data.h_properties.get(key).and_then(Value::as_str)
  }

  /// Set a rendering attribute, replacing any previous value.
  pub fn set_h_property(
    &mut self,
    key: impl Into<String>,
    value: impl Into<Value>,
  ) {
    self.data.h_properties.insert(key.into(), value.into());
  }

  /// Decode a tree from mdast JSON. The top-level node must be a `root`.
  ///
  /// Unknown node types and fields are kept, so a tree written back with
  /// [`to_json_pretty`](Self::to_json_pretty) only differs by what the
  /// annotator changed.
  ///
  /// # Errors
  ///
  /// Returns an error if the JSON is malformed, a known node type lacks a
  /// required field, or the tree is not rooted at a `root` node.
  pub fn from_json(json: &str) -> Result<Self, ParseError> {
    Self::from_json_value(serde_json::from_str(json)?)
  }

  /// Like [`from_json`](Self::from_json), for JSON that is already parsed.
  ///
  /// # Errors
  ///
  /// Same as [`from_json`](Self::from_json).
  pub fn from_json_value(value: Value) -> Result<Self, ParseError> {
    let node: Self = serde_json::from_value(value)?;
    if matches!(node.kind, NodeKind::Root { .. }) {
      Ok(node)
    } else {
      Err(ParseError::NotRoot(node.type_name().to_owned()))
    }
  }

  /// Encode the tree as pretty-printed mdast JSON.
  ///
  /// # Errors
  ///
  /// Returns an error if serialization fails.
  pub fn to_json_pretty(&self) -> Result<String, ParseError> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

/// The fields of one JSON node, consumed as the node kind is built. Whatever
/// is left over ends up in [`Node::extra`].
struct Fields<'a> {
  type_name: &'a str,
  map:       Map<String, Value>,
}

impl Fields<'_> {
  fn take<T: DeserializeOwned>(
    &mut self,
    key: &str,
  ) -> Result<Option<T>, ParseError> {
    match self.map.shift_remove(key) {
      None | Some(Value::Null) => Ok(None),
      Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
  }

  fn require<T: DeserializeOwned>(
    &mut self,
    field: &'static str,
  ) -> Result<T, ParseError> {
    self.take(field)?.ok_or_else(|| {
      ParseError::MissingField {
        node: self.type_name.to_owned(),
        field,
      }
    })
  }

  fn children(&mut self) -> Result<Vec<Node>, ParseError> {
    Ok(self.take("children")?.unwrap_or_default())
  }
}

impl TryFrom<Map<String, Value>> for Node {
  type Error = ParseError;

  fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
    let type_name = match map.shift_remove("type") {
      Some(Value::String(name)) => name,
      _ => {
        return Err(ParseError::MissingField {
          node:  "<unknown>".to_owned(),
          field: "type",
        });
      },
    };
    let mut fields = Fields {
      type_name: &type_name,
      map,
    };
    let data: NodeData = fields.take("data")?.unwrap_or_default();

    let kind = match type_name.as_str() {
      "root" => {
        NodeKind::Root {
          children: fields.children()?,
        }
      },
      "paragraph" => {
        NodeKind::Paragraph {
          children: fields.children()?,
        }
      },
      "heading" => {
        NodeKind::Heading {
          depth:    fields.require("depth")?,
          children: fields.children()?,
        }
      },
      "thematicBreak" => NodeKind::ThematicBreak,
      "blockquote" => {
        NodeKind::Blockquote {
          children: fields.children()?,
        }
      },
      "list" => {
        NodeKind::List {
          ordered:  fields.take("ordered")?.unwrap_or_default(),
          start:    fields.take("start")?,
          children: fields.children()?,
        }
      },
      "listItem" => {
        NodeKind::ListItem {
          children: fields.children()?,
        }
      },
      "table" => {
        NodeKind::Table {
          children: fields.children()?,
        }
      },
      "tableRow" => {
        NodeKind::TableRow {
          children: fields.children()?,
        }
      },
      "tableCell" => {
        NodeKind::TableCell {
          children: fields.children()?,
        }
      },
      "code" => {
        NodeKind::Code {
          lang:  fields.take("lang")?,
          value: fields.require("value")?,
        }
      },
      "html" => {
        NodeKind::Html {
          value: fields.require("value")?,
        }
      },
      "jsx" => {
        NodeKind::Jsx {
          value: fields.require("value")?,
        }
      },
      "text" => {
        NodeKind::Text {
          value: fields.require("value")?,
        }
      },
      "emphasis" => {
        NodeKind::Emphasis {
          children: fields.children()?,
        }
      },
      "strong" => {
        NodeKind::Strong {
          children: fields.children()?,
        }
      },
      "delete" => {
        NodeKind::Delete {
          children: fields.children()?,
        }
      },
      "inlineCode" => {
        NodeKind::InlineCode {
          value: fields.require("value")?,
        }
      },
      "break" => NodeKind::Break,
      "link" => {
        NodeKind::Link {
          url:      fields.require("url")?,
          title:    fields.take("title")?,
          children: fields.children()?,
        }
      },
      "image" => {
        NodeKind::Image {
          url:   fields.require("url")?,
          title: fields.take("title")?,
          alt:   fields.take("alt")?.unwrap_or_default(),
        }
      },
      _ => {
        // Only a string value counts as text; MDX attribute values and the
        // like stay in `extra`.
        let value = match fields.map.shift_remove("value") {
          Some(Value::String(value)) => Some(value),
          Some(other) => {
            fields.map.insert("value".to_owned(), other);
            None
          },
          None => None,
        };
        NodeKind::Other {
          type_name: type_name.clone(),
          children: fields.take("children")?,
          value,
        }
      },
    };

    Ok(Self {
      kind,
      data,
      extra: fields.map,
    })
  }
}

impl<'de> Deserialize<'de> for Node {
  fn deserialize<D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Self, D::Error> {
    let map = Map::<String, Value>::deserialize(deserializer)?;
    Self::try_from(map).map_err(D::Error::custom)
  }
}

impl Serialize for Node {
  fn serialize<S: Serializer>(
    &self,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("type", self.type_name())?;

    match &self.kind {
      NodeKind::Heading { depth, .. } => map.serialize_entry("depth", depth)?,
      NodeKind::List { ordered, start, .. } => {
        map.serialize_entry("ordered", ordered)?;
        if let Some(start) = start {
          map.serialize_entry("start", start)?;
        }
      },
      NodeKind::Code { lang, value } => {
        if let Some(lang) = lang {
          map.serialize_entry("lang", lang)?;
        }
        map.serialize_entry("value", value)?;
      },
      NodeKind::Html { value }
      | NodeKind::Jsx { value }
      | NodeKind::Text { value }
      | NodeKind::InlineCode { value }
      | NodeKind::Other {
        value: Some(value), ..
      } => map.serialize_entry("value", value)?,
      NodeKind::Link { url, title, .. } => {
        map.serialize_entry("url", url)?;
        if let Some(title) = title {
          map.serialize_entry("title", title)?;
        }
      },
      NodeKind::Image { url, title, alt } => {
        map.serialize_entry("url", url)?;
        if let Some(title) = title {
          map.serialize_entry("title", title)?;
        }
        map.serialize_entry("alt", alt)?;
      },
      _ => {},
    }

    for (key, value) in &self.extra {
      map.serialize_entry(key, value)?;
    }
    if !self.data.is_empty() {
      map.serialize_entry("data", &self.data)?;
    }
    if let Some(children) = self.children() {
      map.serialize_entry("children", children)?;
    }
    map.end()
  }
}

/// Map every node of a tree, pre-order.
///
/// `f` receives each node by value and returns its replacement; the
/// replacement's children are visited afterwards, so nodes injected by `f`
/// are visited too. The tree keeps its shape apart from what `f` changes.
pub fn map<F>(node: Node, f: &mut F) -> Node
where
  F: FnMut(Node) -> Node,
{
  let mut node = f(node);
  if let Some(children) = node.children_mut() {
    let taken = std::mem::take(children);
    *children = taken.into_iter().map(|child| map(child, f)).collect();
  }
  node
}

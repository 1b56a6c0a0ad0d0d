#![allow(clippy::unwrap_used, clippy::panic, reason = "Fine in tests")]
use anchorlinks_core::{
  AnchorOptions,
  AnchorProcessor,
  AnchorResult,
  HeadingRecord,
  Node,
  NodeKind,
  ParseOptions,
  slug::legacy_slug,
  toc::extract_toc_comment,
};

fn process(markdown: &str) -> AnchorResult {
  process_with(AnchorOptions::default(), markdown)
}

fn process_with(options: AnchorOptions, markdown: &str) -> AnchorResult {
  AnchorProcessor::new(ParseOptions::default(), options).process(markdown)
}

fn top_level(result: &AnchorResult) -> &[Node] {
  result.tree.children().unwrap()
}

/// Children of the n-th list item of the first list in the document.
fn list_item(result: &AnchorResult, n: usize) -> &[Node] {
  let list = top_level(result)
    .iter()
    .find(|node| node.type_name() == "list")
    .unwrap();
  list.children().unwrap()[n].children().unwrap()
}

fn paragraph_of(item: &[Node]) -> &[Node] {
  item
    .iter()
    .find(|node| node.type_name() == "paragraph")
    .unwrap()
    .children()
    .unwrap()
}

fn link_url(node: &Node) -> &str {
  match &node.kind {
    NodeKind::Link { url, .. } => url,
    other => panic!("expected a link, got {other:?}"),
  }
}

#[test]
fn duplicate_headings_are_numbered() {
  let result = process("# hello world\n\n# hello world\n\n# foo\n");

  let slugs: Vec<_> = result.headings.iter().map(|h| h.slug.as_str()).collect();
  assert_eq!(slugs, vec!["hello-world", "hello-world-1", "foo"]);
  assert!(result.headings.iter().all(|h| h.level == 1));

  let ids: Vec<_> = top_level(&result)
    .iter()
    .filter_map(|node| node.h_property("id"))
    .collect();
  assert_eq!(ids, slugs);
}

#[test]
fn heading_record_fields() {
  let result = process("## Getting *started*\n");
  assert_eq!(result.headings, vec![HeadingRecord {
    title:                "Getting started".into(),
    slug:                 "getting-started".into(),
    permalink_slug:       "getting-started".into(),
    level:                2,
    aliases:              Vec::new(),
    tabbed_section_depth: 0,
  }]);

  let json = serde_json::to_value(&result.headings[0]).unwrap();
  assert_eq!(json["permalinkSlug"], "getting-started");
  assert_eq!(json["tabbedSectionDepth"], 0);
}

#[test]
fn duplicate_list_items_link_to_their_slug() {
  let result = process("- `foo`\n- `foo`\n");
  assert!(result.headings.is_empty());

  for (n, slug) in [(0, "foo"), (1, "foo-1")] {
    let item = list_item(&result, n);
    assert_eq!(
      item[0].value().unwrap(),
      format!(r#"<a id="{slug}" class="__target-lic" aria-hidden="true"></a>"#)
    );
    let inline = paragraph_of(item);
    assert_eq!(link_url(&inline[0]), format!("#{slug}"));
    assert_eq!(inline[0].children().unwrap(), &[Node::inline_code("foo")]);
  }
}

#[test]
fn alias_takes_precedence_for_the_permalink() {
  let result = process("# hello world ((#foo, #bar))\n");
  let record = &result.headings[0];
  assert_eq!(record.slug, "hello-world");
  assert_eq!(record.aliases, vec!["foo", "bar"]);
  assert_eq!(record.permalink_slug, "foo");
  assert_eq!(record.title, "hello world");

  let heading = top_level(&result)[0].children().unwrap();
  assert!(heading[0].value().unwrap().contains(r##"href="#foo""##));
  assert!(heading[1].value().unwrap().contains(r#"id="foo""#));
  assert!(heading[2].value().unwrap().contains(r#"id="bar""#));
  assert_eq!(heading[3].value(), Some("hello world"));
}

#[test]
fn escaped_alias_in_list_item() {
  let result = process("- `baz` ((#\\_bar)) text\n");
  let item = list_item(&result, 0);
  assert_eq!(
    item[1].value(),
    Some(r#"<a class="__target-lic __compat" id="_bar" aria-hidden="true"></a>"#)
  );
  let inline = paragraph_of(item);
  assert_eq!(link_url(&inline[0]), "#_bar");
  assert_eq!(inline[1].value(), Some(" text"));
}

#[test]
fn unterminated_alias_is_left_alone() {
  let result = process("- `quux` ((#foo wow\n");
  let item = list_item(&result, 0);
  assert_eq!(item.len(), 2);
  let inline = paragraph_of(item);
  assert_eq!(link_url(&inline[0]), "#quux");
  assert_eq!(inline[1].value(), Some(" ((#foo wow"));
}

#[test]
fn list_items_without_leading_code_are_untouched() {
  let markdown = "- some `code` later\n- plain\n";
  let parsed = AnchorProcessor::default().parse(markdown);
  let result = process(markdown);
  assert_eq!(result.tree, parsed);
}

#[test]
fn tab_depth_follows_tabs_markup() {
  let result = process(
    "# Outside\n\n<Tabs>\n<Tab heading=\"one\">\n\n## Inside\n\n</Tab>\n</Tabs>\n\n## After\n",
  );
  let depths: Vec<_> = result
    .headings
    .iter()
    .map(|h| (h.title.as_str(), h.tabbed_section_depth))
    .collect();
  assert_eq!(depths, vec![("Outside", 0), ("Inside", 1), ("After", 0)]);
}

#[test]
fn several_tab_markers_in_one_block() {
  let result = process(
    "<Tabs>\n<Tab>\n<Tabs>\n<Tab>\n\n# Deep\n\n</Tab>\n</Tabs>\n</Tab>\n</Tabs>\n\n# Out\n\n<Tabs></Tabs><Tabs></Tabs>\n\n# Still out\n",
  );
  let depths: Vec<_> = result
    .headings
    .iter()
    .map(|h| h.tabbed_section_depth)
    .collect();
  assert_eq!(depths, vec![2, 0, 0]);
}

#[test]
fn markup_is_stripped_from_slug_label_and_title() {
  let result = process("# foo <b>bar</b>\n");
  let record = &result.headings[0];
  assert_eq!(record.slug, "foo-bar");
  assert_eq!(record.title, "foo bar");
  let heading = top_level(&result)[0].children().unwrap();
  assert!(heading[0].value().unwrap().contains(r#"aria-label="foo bar permalink""#));
}

#[test]
fn legacy_compatibility_slug() {
  let options = AnchorOptions::default().with_compatibility_slug(legacy_slug);
  let result = process_with(options, "# Hello, World!\n\n- `foo`\n");

  let record = &result.headings[0];
  assert_eq!(record.slug, "hello-world");
  assert_eq!(record.permalink_slug, "hello-world-");
  let heading = top_level(&result)[0].children().unwrap();
  assert_eq!(
    heading[1].value(),
    Some(r#"<a class="__target-h __compat" id="hello-world-" aria-hidden="true"></a>"#)
  );

  // Same slug from both algorithms: no extra target.
  let item = list_item(&result, 0);
  assert_eq!(item.len(), 2);
  assert_eq!(link_url(&paragraph_of(item)[0]), "#foo");
}

#[test]
fn list_prefix_applies_to_the_slug_only() {
  let options = AnchorOptions::default()
    .with_list_prefix("inlinecode")
    .with_compatibility_slug(|text: &str| format!("old-{text}"));
  let result = process_with(options, "- `foo` explained\n");

  let item = list_item(&result, 0);
  assert_eq!(
    item[0].value(),
    Some(r#"<a id="inlinecode-foo" class="__target-lic" aria-hidden="true"></a>"#)
  );
  assert_eq!(
    item[1].value(),
    Some(r#"<a class="__target-lic __compat" id="old-foo" aria-hidden="true"></a>"#)
  );
  assert_eq!(link_url(&paragraph_of(item)[0]), "#old-foo");
}

#[test]
fn headings_and_code_share_numbering() {
  let result = process("# foo\n\n- `foo`\n\n## foo\n");
  assert_eq!(result.headings[1].slug, "foo-2");
  let item = list_item(&result, 0);
  assert!(item[0].value().unwrap().contains(r#"id="foo-1""#));
}

#[test]
fn second_run_keeps_titles() {
  let processor = AnchorProcessor::default();
  let first = processor.process("# Title ((#alias))\n");
  let second = processor.process_tree(first.tree.clone());
  assert_eq!(second.headings[0].title, first.headings[0].title);
}

#[test]
fn toc_comment_is_appended() {
  let processor = AnchorProcessor::default().with_toc_comment(true);
  let result = processor.process("# One\n\n## Two\n\n## Two\n");

  let comment = top_level(&result).last().unwrap().value().unwrap();
  let entries = extract_toc_comment(comment).unwrap();
  let listed: Vec<_> = entries
    .iter()
    .map(|e| (e.title.as_str(), e.slug.as_str(), e.level))
    .collect();
  assert_eq!(listed, vec![
    ("One", "one", 1),
    ("Two", "two", 2),
    ("Two", "two-1", 2)
  ]);
}

#[test]
fn mdast_json_input() {
  let json = r#"{
    "type": "root",
    "children": [
      { "type": "heading", "depth": 3, "children": [{ "type": "text", "value": "From JSON" }] },
      { "type": "jsx", "value": "<Tabs>" },
      { "type": "heading", "depth": 4, "children": [{ "type": "text", "value": "Tabbed" }] }
    ]
  }"#;
  let tree = Node::from_json(json).unwrap();
  let result = AnchorProcessor::default().process_tree(tree);

  assert_eq!(result.headings[0].slug, "from-json");
  assert_eq!(result.headings[0].level, 3);
  assert_eq!(result.headings[1].tabbed_section_depth, 1);

  let out = result.tree.to_json_pretty().unwrap();
  assert!(out.contains(r#""hProperties""#));
  assert!(out.contains(r#""id": "from-json""#));
}

#[test]
fn remark_json_keeps_unmodeled_content() {
  let json = r#"{
    "type": "root",
    "children": [
      {
        "type": "heading",
        "depth": 2,
        "data": { "hProperties": { "className": ["title"] } },
        "children": [
          { "type": "text", "value": "See " },
          {
            "type": "linkReference",
            "identifier": "api",
            "referenceType": "full",
            "children": [{ "type": "text", "value": "the API" }]
          }
        ],
        "position": { "start": { "line": 1, "column": 1 } }
      },
      {
        "type": "list",
        "ordered": false,
        "spread": false,
        "children": [{
          "type": "listItem",
          "checked": true,
          "spread": false,
          "children": [{
            "type": "paragraph",
            "data": { "hName": "span" },
            "children": [{ "type": "inlineCode", "value": "done" }]
          }]
        }]
      },
      { "type": "definition", "identifier": "api", "url": "/api", "title": null }
    ]
  }"#;
  let tree = Node::from_json(json).unwrap();
  let result = AnchorProcessor::default().process_tree(tree);

  assert_eq!(result.headings[0].slug, "see-the-api");

  let out = serde_json::to_value(&result.tree).unwrap();
  let heading = &out["children"][0];
  assert_eq!(heading["data"]["hProperties"]["id"], "see-the-api");
  assert_eq!(heading["data"]["hProperties"]["className"][0], "title");
  assert_eq!(heading["position"]["start"]["line"], 1);
  assert_eq!(heading["children"][2]["type"], "linkReference");
  assert_eq!(heading["children"][2]["identifier"], "api");

  let item = &out["children"][1]["children"][0];
  assert_eq!(item["checked"], true);
  assert_eq!(item["spread"], false);
  assert_eq!(item["children"][1]["data"]["hName"], "span");
  assert_eq!(item["children"][1]["children"][0]["url"], "#done");

  assert_eq!(out["children"][2]["type"], "definition");
  assert_eq!(out["children"][2]["url"], "/api");
}

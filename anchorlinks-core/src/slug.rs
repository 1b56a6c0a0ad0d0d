//! Slug and aria-label generation.
//!
//! Slugs are lowercase, hyphen-separated identifiers derived from heading or
//! inline-code text. Uniqueness is scoped to a [`SlugRegistry`]: the first
//! occurrence of a candidate is issued as is, later ones get `-1`, `-2`, ...
//!
//! ```
//! use anchorlinks_core::slug::{SlugRegistry, generate_aria_label, generate_slug};
//!
//! let mut registry = SlugRegistry::new();
//! assert_eq!(generate_slug("Foo Bar", &mut registry), "foo-bar");
//! assert_eq!(generate_slug("foo bar", &mut registry), "foo-bar-1");
//! assert_eq!(generate_aria_label("Foo <em>Bar</em>"), "Foo Bar");
//! ```
use std::collections::HashSet;

use crate::utils::{
  collapse_hyphens,
  collapse_whitespace,
  replace_non_word,
  strip_markup,
  strip_tags,
};

/// Glyph used by heading permalinks. Dropped from titles so that a tree
/// annotated twice reports the same titles.
pub const PERMALINK_GLYPH: char = '»';

/// Slugs issued during one document run.
///
/// Candidates are kept in issue order; the numeric suffix of a duplicate is
/// the number of times the same candidate was seen before. Final slugs are
/// remembered too, so a suffixed slug never collides with a heading whose
/// text happens to produce the same string.
#[derive(Debug, Clone, Default)]
pub struct SlugRegistry {
  candidates: Vec<String>,
  issued:     HashSet<String>,
}

impl SlugRegistry {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Issue a unique slug for an already-normalized candidate.
  pub fn issue(&mut self, candidate: String) -> String {
    let mut n = self
      .candidates
      .iter()
      .filter(|seen| **seen == candidate)
      .count();

    let mut slug = if n == 0 {
      candidate.clone()
    } else {
      format!("{candidate}-{n}")
    };
    while self.issued.contains(&slug) {
      n += 1;
      slug = format!("{candidate}-{n}");
    }

    self.candidates.push(candidate);
    self.issued.insert(slug.clone());
    slug
  }

  /// Candidates recorded so far, in issue order.
  #[must_use]
  pub fn candidates(&self) -> &[String] {
    &self.candidates
  }

  /// Whether `slug` has been handed out by this registry.
  #[must_use]
  pub fn contains(&self, slug: &str) -> bool {
    self.issued.contains(slug)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.candidates.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.candidates.is_empty()
  }
}

/// Normalize raw text into a slug candidate, without de-duplication.
///
/// Tags and alias tokens are removed, the text is lowercased and trimmed,
/// and every run of non-word characters becomes a single `-`. Leading and
/// trailing hyphens are dropped.
#[must_use]
pub fn slug_candidate(raw: &str) -> String {
  let lowered = strip_markup(raw).to_lowercase();
  let hyphenated = replace_non_word(lowered.trim(), "-");
  let unled = hyphenated.strip_prefix('-').unwrap_or(&hyphenated);
  collapse_hyphens(unled).trim_matches('-').to_owned()
}

/// Generate a slug for `raw` that is unique within `registry`.
pub fn generate_slug(raw: &str, registry: &mut SlugRegistry) -> String {
  registry.issue(slug_candidate(raw))
}

/// Generate a slug against a fresh registry.
#[must_use]
pub fn slug_for(raw: &str) -> String {
  generate_slug(raw, &mut SlugRegistry::new())
}

/// Generate a plain-text accessible label.
///
/// Uses the same stripping as [`slug_candidate`] but keeps the original case
/// and separates words with single spaces.
#[must_use]
pub fn generate_aria_label(raw: &str) -> String {
  replace_non_word(&strip_markup(raw), " ").trim().to_owned()
}

/// Human-readable heading title: tags, alias tokens and the permalink glyph
/// removed, whitespace collapsed.
#[must_use]
pub fn heading_title(raw: &str) -> String {
  let stripped = strip_markup(raw).replace(PERMALINK_GLYPH, "");
  collapse_whitespace(&stripped).trim().to_owned()
}

/// The slug algorithm used before alias support existed.
///
/// Lowercases before stripping tags, does not know about alias tokens and
/// keeps a trailing hyphen. Meant to be passed as a compatibility slug so
/// that old links keep resolving.
#[must_use]
pub fn legacy_slug(raw: &str) -> String {
  let lowered = raw.to_lowercase();
  let untagged = strip_tags(lowered.trim());
  let hyphenated = replace_non_word(&untagged, "-");
  let unled = hyphenated.strip_prefix('-').unwrap_or(&hyphenated);
  collapse_hyphens(unled).into_owned()
}

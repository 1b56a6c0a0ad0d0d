//! Tracking of `<Tabs>` nesting.
//!
//! Headings inside tabbed sections are usually kept out of a visible table of
//! contents, so each heading record carries the depth at which it was found.
//! A single raw markup node may open or close several containers at once,
//! e.g. a block holding `</Tab>\n</Tabs>\n</Tab>\n</Tabs>`.

/// Marker that opens a tabbed container.
pub const OPEN_MARKER: &str = "<Tabs";

/// Marker that closes a tabbed container.
pub const CLOSE_MARKER: &str = "</Tabs";

/// Running `<Tabs>` depth for one document.
///
/// Unbalanced markup is not corrected: the depth may drift or go negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TabDepth(i64);

impl TabDepth {
  #[must_use]
  pub const fn new() -> Self {
    Self(0)
  }

  /// Current depth.
  #[must_use]
  pub const fn get(self) -> i64 {
    self.0
  }

  /// Apply every open and close marker found in a raw markup value.
  pub fn observe(&mut self, markup: &str) {
    let opens = count(markup, OPEN_MARKER);
    let closes = count(markup, CLOSE_MARKER);
    self.0 = self.0.saturating_add(opens).saturating_sub(closes);
    if opens != 0 || closes != 0 {
      log::trace!("Tab depth now {} (+{opens}/-{closes})", self.0);
    }
  }
}

fn count(haystack: &str, needle: &str) -> i64 {
  i64::try_from(haystack.matches(needle).count()).unwrap_or(i64::MAX)
}

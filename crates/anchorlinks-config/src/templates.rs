use thiserror::Error;

/// Error type for template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),
}

/// Default configuration template in TOML, commented so that every key is
/// explained where it is set.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# anchorlinks configuration file

# Output directory for annotated trees and heading records
output_dir = "build"

# Prefix joined with "-" in front of the inline code of a list item before
# it is slugged, e.g. "inlinecode" turns `foo` into #inlinecode-foo
# list_with_inline_code_prefix = "inlinecode"

# Extra slug kept resolving for every heading and code list item.
# "none" or "legacy" (the slug algorithm from before aliases existed)
compatibility_slug = "none"

# Write <name>.headings.json next to every annotated tree
headings = true

# Append an HTML comment listing every heading as JSON to each tree
toc_comment = false

# Parse Markdown with GitHub Flavored Markdown extensions
gfm = true

# Number of threads to use for parallel processing (defaults to number of CPU cores)
# jobs = 4
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "output_dir": "build",
  "list_with_inline_code_prefix": null,
  "compatibility_slug": "none",
  "headings": true,
  "toc_comment": false,
  "gfm": true,
  "jobs": null
}
"#;

/// Get the default configuration template for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns [`TemplateError::UnsupportedFormat`] for any other format.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}

use std::{
  fmt,
  fs,
  path::{Path, PathBuf},
  str::FromStr,
  sync::Arc,
};

use anchorlinks_core::{
  AnchorOptions,
  CompatibilitySlug,
  ParseOptions,
  slug::legacy_slug,
};
use anchorlinks_macros::Configurable;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File names looked up, in order, when no config file is given.
pub const CONFIG_FILENAMES: [&str; 3] =
  ["anchorlinks.toml", ".anchorlinks.toml", "anchorlinks.json"];

/// Which compatibility slug to emit next to the primary slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilitySlugKind {
  /// No compatibility slug.
  #[default]
  None,

  /// The slug algorithm used before aliases existed.
  Legacy,
}

impl CompatibilitySlugKind {
  /// The slug function for this kind, if any.
  #[must_use]
  pub fn slug_function(self) -> Option<CompatibilitySlug> {
    match self {
      Self::None => None,
      Self::Legacy => Some(Arc::new(legacy_slug)),
    }
  }
}

impl FromStr for CompatibilitySlugKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "none" => Ok(Self::None),
      "legacy" => Ok(Self::Legacy),
      other => {
        Err(format!(
          "unknown compatibility slug '{other}', expected 'none' or 'legacy'"
        ))
      },
    }
  }
}

impl fmt::Display for CompatibilitySlugKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::None => "none",
      Self::Legacy => "legacy",
    })
  }
}

/// Configuration for the anchorlinks annotator.
///
/// Fields are usually loaded from a TOML or JSON config file and can be
/// overridden from the command line with `--config KEY=VALUE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct Config {
  /// Output directory for annotated trees and heading records.
  #[config(key = "output_dir")]
  pub output_dir: PathBuf,

  /// Prefix for slugs of list items led by inline code.
  #[config(key = "list_with_inline_code_prefix", allow_empty)]
  pub list_with_inline_code_prefix: Option<String>,

  /// Compatibility slug emitted next to the primary slug.
  #[config(key = "compatibility_slug")]
  pub compatibility_slug: CompatibilitySlugKind,

  /// Whether heading records are written.
  #[config(key = "headings")]
  pub headings: bool,

  /// Whether the headings comment is appended to every tree.
  #[config(key = "toc_comment")]
  pub toc_comment: bool,

  /// Whether Markdown is parsed with GFM extensions.
  #[config(key = "gfm")]
  pub gfm: bool,

  /// Number of threads for parallel processing.
  #[config(key = "jobs", allow_empty)]
  pub jobs: Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      output_dir:                   PathBuf::from("build"),
      list_with_inline_code_prefix: None,
      compatibility_slug:           CompatibilitySlugKind::None,
      headings:                     true,
      toc_comment:                  false,
      gfm:                          true,
      jobs:                         None,
    }
  }
}

impl Config {
  /// Load configuration from a TOML or JSON file, chosen by extension.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content =
      fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
      })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|source| {
          ConfigError::Json {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|source| {
          ConfigError::Toml {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, merged in order, or from a
  /// discovered file, then apply `KEY=VALUE` overrides.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for path in rest {
        merged.merge(Self::from_file(path)?);
      }
      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in KEY=VALUE format, names an
  /// unknown key, or holds a value that does not parse for the key's type.
  ///
  /// # Example
  ///
  /// ```rust
  /// use anchorlinks_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&["compatibility_slug=legacy".to_string()])
  ///   .unwrap();
  /// assert_eq!(config.compatibility_slug.to_string(), "legacy");
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// [`Option`] fields are only replaced when the other config sets them;
  /// every other field is always replaced.
  pub fn merge(&mut self, other: Self) {
    self.merge_fields(other);
  }

  /// Search the current directory for a config file.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search `dir` for the first of [`CONFIG_FILENAMES`].
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|name| dir.join(name))
      .find(|path| path.is_file())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)?;

    fs::write(path, config_content).map_err(|source| {
      ConfigError::Io {
        path: path.to_path_buf(),
        source,
      }
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Annotator options described by this config.
  #[must_use]
  pub fn anchor_options(&self) -> AnchorOptions {
    AnchorOptions {
      compatibility_slug:           self.compatibility_slug.slug_function(),
      list_with_inline_code_prefix: self.list_with_inline_code_prefix.clone(),
    }
  }

  /// Markdown parser options described by this config.
  #[must_use]
  pub const fn parse_options(&self) -> ParseOptions {
    ParseOptions { gfm: self.gfm }
  }
}

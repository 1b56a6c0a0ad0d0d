use std::path::PathBuf;

use anchorlinks_config::{CompatibilitySlugKind, Config};
use clap::{Args, Parser, Subcommand};

/// Command line interface for anchorlinks
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Stable, collision-free anchors for Markdown documents"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append, global = true)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append, global = true)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the anchorlinks CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Annotate Markdown or mdast JSON files and write the resulting trees.
  Annotate(AnnotateArgs),

  /// Print the slug and aria label for each text, numbered as if the texts
  /// were headings of one document.
  Slug {
    /// Texts to slug.
    #[arg(required = true)]
    texts: Vec<String>,
  },

  /// Initialize a new anchorlinks configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "anchorlinks.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

/// Arguments of `anchorlinks annotate`. Set values take precedence over the
/// configuration files.
#[derive(Args, Debug, Default)]
pub struct AnnotateArgs {
  /// Markdown (.md, .mdx) or mdast JSON (.json) files, or directories to
  /// search for them.
  #[arg(required = true)]
  pub inputs: Vec<PathBuf>,

  /// Output directory for annotated trees and heading records.
  #[arg(short, long)]
  pub output_dir: Option<PathBuf>,

  /// Prefix for slugs of list items led by inline code.
  #[arg(short, long)]
  pub prefix: Option<String>,

  /// Compatibility slug to emit next to the primary slug (none, legacy).
  #[arg(long)]
  pub compat: Option<CompatibilitySlugKind>,

  /// Append the headings comment to every tree.
  #[arg(long = "toc-comment", action = clap::ArgAction::SetTrue)]
  pub toc_comment: bool,

  /// Do not write heading records.
  #[arg(long = "no-headings", action = clap::ArgAction::SetTrue)]
  pub no_headings: bool,

  /// Number of threads to use for parallel processing.
  #[arg(short = 'j', long = "jobs")]
  pub jobs: Option<usize>,
}

impl AnnotateArgs {
  /// Layer the arguments that were given over `config`.
  pub fn apply_to(&self, config: &mut Config) {
    if let Some(ref output_dir) = self.output_dir {
      config.output_dir.clone_from(output_dir);
    }
    if let Some(ref prefix) = self.prefix {
      config.list_with_inline_code_prefix = Some(prefix.clone());
    }
    if let Some(compat) = self.compat {
      config.compatibility_slug = compat;
    }
    if self.toc_comment {
      config.toc_comment = true;
    }
    if self.no_headings {
      config.headings = false;
    }
    if self.jobs.is_some() {
      config.jobs = self.jobs;
    }
  }
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

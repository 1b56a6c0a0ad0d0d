//! Subcommand implementations.
use std::{
  fs,
  io::Write,
  path::{Path, PathBuf},
};

use anchorlinks_config::Config;
use anchorlinks_core::{
  AnchorProcessor,
  CompatibilitySlug,
  Node,
  SlugRegistry,
  generate_aria_label,
  generate_slug,
};
use color_eyre::eyre::{Context, Result, bail};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde_json::Value;

use crate::utils::{InputFile, InputKind, collect_input_files};

/// Outcome of annotating one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedFile {
  pub input:         PathBuf,
  pub tree_path:     PathBuf,
  pub headings_path: Option<PathBuf>,
  pub headings:      usize,
}

/// Annotate every input and write the results below `config.output_dir`.
///
/// Files are processed in parallel on a pool of `config.jobs` threads
/// (default: one per CPU). Each file gets its own slug registry.
///
/// JSON files found while walking a directory are skipped with a warning
/// unless they hold an mdast `root`, so `package.json` and friends can live
/// next to the documents.
///
/// # Errors
///
/// Returns an error if no input is found, or if any input cannot be read,
/// parsed or written. Results are returned in input order.
pub fn annotate(
  config: &Config,
  inputs: &[PathBuf],
) -> Result<Vec<AnnotatedFile>> {
  let files = collect_input_files(inputs, Some(&config.output_dir))?;
  if files.is_empty() {
    bail!("No .md, .mdx or .json files found in the given inputs");
  }
  info!("Found {} input files", files.len());

  fs::create_dir_all(&config.output_dir).wrap_err_with(|| {
    format!(
      "Failed to create output directory: {}",
      config.output_dir.display()
    )
  })?;
  info!("Output directory: {}", config.output_dir.display());

  let processor =
    AnchorProcessor::new(config.parse_options(), config.anchor_options())
      .with_toc_comment(config.toc_comment);

  let thread_count = config.jobs.unwrap_or_else(num_cpus::get);
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build()
    .wrap_err("Failed to build thread pool")?;
  debug!("Annotating with {thread_count} threads");

  let annotated: Vec<Option<AnnotatedFile>> = pool.install(|| {
    files
      .par_iter()
      .map(|file| annotate_file(&processor, config, file))
      .collect::<Result<_>>()
  })?;
  Ok(annotated.into_iter().flatten().collect())
}

/// Parse an mdast JSON input. `None` when a walked file is not an mdast
/// tree.
fn read_json_tree(file: &InputFile, content: &str) -> Result<Option<Node>> {
  let value = match serde_json::from_str::<Value>(content) {
    Ok(value) => value,
    Err(err) if file.walked => {
      warn!("Skipping {}: not valid JSON ({err})", file.path.display());
      return Ok(None);
    },
    Err(err) => {
      return Err(err).wrap_err_with(|| {
        format!("Failed to parse mdast JSON: {}", file.path.display())
      });
    },
  };

  if file.walked && value.get("type").and_then(Value::as_str) != Some("root") {
    warn!("Skipping {}: not an mdast root", file.path.display());
    return Ok(None);
  }

  let tree = Node::from_json_value(value).wrap_err_with(|| {
    format!("Failed to parse mdast JSON: {}", file.path.display())
  })?;
  Ok(Some(tree))
}

fn annotate_file(
  processor: &AnchorProcessor,
  config: &Config,
  file: &InputFile,
) -> Result<Option<AnnotatedFile>> {
  let content = fs::read_to_string(&file.path)
    .wrap_err_with(|| format!("Failed to read input: {}", file.path.display()))?;

  let result = match file.kind {
    InputKind::Markdown => processor.process(&content),
    InputKind::Json => {
      let Some(tree) = read_json_tree(file, &content)? else {
        return Ok(None);
      };
      processor.process_tree(tree)
    },
  };

  let tree_path = file.tree_output(&config.output_dir);
  write_output(&tree_path, &result.tree.to_json_pretty()?)?;

  let headings_path = if config.headings {
    let path = file.headings_output(&config.output_dir);
    write_output(&path, &serde_json::to_string_pretty(&result.headings)?)?;
    Some(path)
  } else {
    None
  };

  debug!(
    "Annotated {} ({} headings) -> {}",
    file.path.display(),
    result.headings.len(),
    tree_path.display()
  );

  Ok(Some(AnnotatedFile {
    input: file.path.clone(),
    tree_path,
    headings_path,
    headings: result.headings.len(),
  }))
}

fn write_output(path: &Path, content: &str) -> Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }
  fs::write(path, content)
    .wrap_err_with(|| format!("Failed to write output: {}", path.display()))
}

/// Write one line per text: slug, aria label and, when `compat` is given,
/// the compatibility slug, separated by tabs. All texts share one registry.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn slug<W: Write>(
  texts: &[String],
  compat: Option<&CompatibilitySlug>,
  out: &mut W,
) -> Result<()> {
  let mut registry = SlugRegistry::new();
  for text in texts {
    let slug = generate_slug(text, &mut registry);
    let label = generate_aria_label(text);
    match compat {
      Some(compat) => writeln!(out, "{slug}\t{label}\t{}", compat(text))?,
      None => writeln!(out, "{slug}\t{label}")?,
    }
  }
  Ok(())
}

/// Write a default configuration file.
///
/// # Errors
///
/// Returns an error if `output` exists and `force` is not set, or if the
/// file cannot be written.
pub fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created successfully. Edit it to customize how \
     anchors are generated."
  );
  Ok(())
}

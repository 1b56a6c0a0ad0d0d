use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, bail};
use log::trace;
use walkdir::WalkDir;

/// Suffixes of the files `annotate` writes.
const OUTPUT_SUFFIXES: [&str; 2] = [".mdast.json", ".headings.json"];

/// How an input file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
  /// Markdown or MDX, parsed with the comrak adapter.
  Markdown,
  /// An mdast tree serialized as JSON.
  Json,
}

impl InputKind {
  /// Classify `path` by extension.
  #[must_use]
  pub fn from_path(path: &Path) -> Option<Self> {
    match path.extension()?.to_str()?.to_lowercase().as_str() {
      "md" | "mdx" | "markdown" => Some(Self::Markdown),
      "json" => Some(Self::Json),
      _ => None,
    }
  }
}

/// A file to annotate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
  pub path:     PathBuf,
  pub kind:     InputKind,
  /// Path below the output directory: relative to the walked directory, or
  /// the bare file name for files given directly.
  pub relative: PathBuf,
  /// Found by walking a directory rather than named on the command line.
  pub walked:   bool,
}

impl InputFile {
  /// Where the annotated tree is written.
  #[must_use]
  pub fn tree_output(&self, output_dir: &Path) -> PathBuf {
    output_dir.join(&self.relative).with_extension("mdast.json")
  }

  /// Where the heading records are written.
  #[must_use]
  pub fn headings_output(&self, output_dir: &Path) -> PathBuf {
    output_dir
      .join(&self.relative)
      .with_extension("headings.json")
  }
}

/// Whether `path` looks like something `annotate` wrote earlier.
fn is_generated_output(path: &Path) -> bool {
  path
    .file_name()
    .and_then(|name| name.to_str())
    .is_some_and(|name| {
      OUTPUT_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
    })
}

/// Expand `inputs` into the files to annotate.
///
/// Directories are walked recursively for supported extensions, skipping
/// `exclude` (normally the output directory) and earlier `.mdast.json` or
/// `.headings.json` outputs. Files given directly must have a supported
/// extension.
///
/// # Errors
///
/// Returns an error if an input does not exist, a file input has an
/// unsupported extension, or two inputs would be written to the same output
/// path.
pub fn collect_input_files(
  inputs: &[PathBuf],
  exclude: Option<&Path>,
) -> Result<Vec<InputFile>> {
  let exclude = exclude.and_then(|path| path.canonicalize().ok());
  let mut files = Vec::new();

  for input in inputs {
    if input.is_dir() {
      let walker = WalkDir::new(input)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
          exclude.as_ref().is_none_or(|excluded| {
            entry.path().canonicalize().ok().as_ref() != Some(excluded)
          })
        })
        .filter_map(Result::ok);

      for entry in walker {
        let path = entry.path();
        let Some(kind) = InputKind::from_path(path) else {
          continue;
        };
        if !path.is_file() {
          continue;
        }
        if is_generated_output(path) {
          trace!("Skipping earlier output: {}", path.display());
          continue;
        }
        let relative = path.strip_prefix(input).unwrap_or(path).to_path_buf();
        files.push(InputFile {
          path: path.to_path_buf(),
          kind,
          relative,
          walked: true,
        });
      }
    } else if input.is_file() {
      let Some(kind) = InputKind::from_path(input) else {
        bail!(
          "Unsupported input file: {} (expected .md, .mdx or .json)",
          input.display()
        );
      };
      let Some(name) = input.file_name() else {
        bail!("Input has no file name: {}", input.display());
      };
      files.push(InputFile {
        path: input.clone(),
        kind,
        relative: PathBuf::from(name),
        walked: false,
      });
    } else {
      bail!("Input does not exist: {}", input.display());
    }
  }

  check_output_collisions(&files)?;
  trace!("Found {} input files", files.len());
  Ok(files)
}

/// Fail if two inputs map to the same output file, e.g. `a/guide.md` and
/// `b/guide.md`, or `x.md` next to `x.json`.
fn check_output_collisions(files: &[InputFile]) -> Result<()> {
  let mut targets: HashMap<PathBuf, &Path> = HashMap::new();
  for file in files {
    let target = file.tree_output(Path::new(""));
    if let Some(previous) = targets.insert(target.clone(), &file.path) {
      bail!(
        "Inputs {} and {} would both be written to {}",
        previous.display(),
        file.path.display(),
        target.display()
      );
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use std::fs;

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn input_kinds() {
    assert_eq!(
      InputKind::from_path(Path::new("a.MD")),
      Some(InputKind::Markdown)
    );
    assert_eq!(
      InputKind::from_path(Path::new("a.mdx")),
      Some(InputKind::Markdown)
    );
    assert_eq!(
      InputKind::from_path(Path::new("tree.json")),
      Some(InputKind::Json)
    );
    assert_eq!(InputKind::from_path(Path::new("a.txt")), None);
    assert_eq!(InputKind::from_path(Path::new("Makefile")), None);
  }

  #[test]
  fn output_paths_keep_relative_directories() {
    let input = InputFile {
      path:     PathBuf::from("docs/guide/intro.mdx"),
      kind:     InputKind::Markdown,
      relative: PathBuf::from("guide/intro.mdx"),
      walked:   true,
    };
    let out = Path::new("build");
    assert_eq!(
      input.tree_output(out),
      PathBuf::from("build/guide/intro.mdast.json")
    );
    assert_eq!(
      input.headings_output(out),
      PathBuf::from("build/guide/intro.headings.json")
    );
  }

  #[test]
  fn walks_directories_and_skips_output() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::create_dir_all(root.join("build")).unwrap();
    fs::write(root.join("a.md"), "# a").unwrap();
    fs::write(root.join("notes.txt"), "skip").unwrap();
    fs::write(root.join("sub/b.json"), "{}").unwrap();
    fs::write(root.join("build/a.mdast.json"), "{}").unwrap();

    let files =
      collect_input_files(&[root.to_path_buf()], Some(&root.join("build")))
        .unwrap();
    let relative: Vec<_> = files.iter().map(|f| f.relative.clone()).collect();
    assert_eq!(relative, vec![
      PathBuf::from("a.md"),
      PathBuf::from("sub/b.json")
    ]);
  }

  #[test]
  fn walks_skip_earlier_outputs() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("intro.md"), "# intro").unwrap();
    fs::write(root.join("intro.mdast.json"), "{}").unwrap();
    fs::write(root.join("intro.headings.json"), "[]").unwrap();
    fs::write(root.join("package.json"), "{}").unwrap();

    let files = collect_input_files(&[root.to_path_buf()], None).unwrap();
    let relative: Vec<_> = files.iter().map(|f| f.relative.clone()).collect();
    assert_eq!(relative, vec![
      PathBuf::from("intro.md"),
      PathBuf::from("package.json")
    ]);
    assert!(files.iter().all(|f| f.walked));
  }

  #[test]
  fn rejects_inputs_sharing_an_output() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("a/guide.md"), "# a").unwrap();
    fs::write(root.join("b/guide.md"), "# b").unwrap();
    fs::write(root.join("a/x.md"), "# x").unwrap();
    fs::write(root.join("a/x.json"), "{}").unwrap();

    let err = collect_input_files(
      &[root.join("a/guide.md"), root.join("b/guide.md")],
      None,
    )
    .unwrap_err()
    .to_string();
    assert!(err.contains("a/guide.md") && err.contains("b/guide.md"), "{err}");
    assert!(err.contains("guide.mdast.json"), "{err}");

    let err = collect_input_files(&[root.join("a")], None)
      .unwrap_err()
      .to_string();
    assert!(err.contains("x.mdast.json"), "{err}");

    let files = collect_input_files(
      &[root.join("a/guide.md"), root.join("b")],
      None,
    );
    assert!(files.is_err());
    assert!(collect_input_files(&[root.join("b")], None).is_ok());
  }

  #[test]
  fn rejects_missing_and_unsupported_files() {
    let dir = TempDir::new().unwrap();
    let txt = dir.path().join("notes.txt");
    fs::write(&txt, "x").unwrap();

    assert!(collect_input_files(&[txt], None).is_err());
    assert!(collect_input_files(&[dir.path().join("nope.md")], None).is_err());
  }
}

use std::{
  fs,
  io::{self, Write},
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Command, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;

const BIN_NAME: &str = "anchorlinks";

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build distribution artifacts for the anchorlinks CLI
  Dist {
    /// Output directory for generated files.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Shells to generate completions for. Defaults to every supported shell.
    #[arg(short, long, value_enum, action = clap::ArgAction::Append)]
    shell: Vec<Shell>,

    /// Skip manpage generation.
    #[arg(long)]
    no_manpages: bool,
  },
}

fn main() -> Result<()> {
  let xtask = Xtask::parse();
  let mut stdout = io::stdout().lock();

  match xtask.command {
    Commands::Dist {
      output_dir,
      shell,
      no_manpages,
    } => {
      let shells = if shell.is_empty() {
        Shell::value_variants().to_vec()
      } else {
        shell
      };
      let dir = generate_completions(&output_dir, &shells)?;
      writeln!(stdout, "Shell completions generated in {}", dir.display())?;

      if !no_manpages {
        let pages = generate_manpages(&output_dir)?;
        for page in pages {
          writeln!(stdout, "Manpage generated at {}", page.display())?;
        }
      }
    },
  }

  Ok(())
}

fn generate_completions(
  output_dir: &Path,
  shells: &[Shell],
) -> Result<PathBuf> {
  let completions_dir = output_dir.join("completions");
  fs::create_dir_all(&completions_dir)?;
  let mut cmd = anchorlinks::cli::Cli::command();
  for shell in shells {
    generate_to(*shell, &mut cmd, BIN_NAME, &completions_dir)
      .with_context(|| format!("Failed to generate {shell} completions"))?;
  }
  Ok(completions_dir)
}

/// One page for the CLI and one per subcommand, named like
/// `anchorlinks-annotate.1`.
fn generate_manpages(output_dir: &Path) -> Result<Vec<PathBuf>> {
  let man_dir = output_dir.join("man");
  fs::create_dir_all(&man_dir)?;

  let cmd = anchorlinks::cli::Cli::command().name(BIN_NAME);
  let mut pages = vec![render_manpage(&man_dir, BIN_NAME, cmd.clone())?];
  for sub in cmd.get_subcommands() {
    let name = format!("{BIN_NAME}-{}", sub.get_name());
    pages.push(render_manpage(&man_dir, &name, sub.clone())?);
  }
  Ok(pages)
}

fn render_manpage(man_dir: &Path, name: &str, cmd: Command) -> Result<PathBuf> {
  let file_path = man_dir.join(format!("{name}.1"));
  let mut file = fs::File::create(&file_path).with_context(|| {
    format!("Failed to create manpage file at {}", file_path.display())
  })?;
  Man::new(cmd)
    .render(&mut file)
    .with_context(|| format!("Failed to render manpage {name}"))?;
  Ok(file_path)
}

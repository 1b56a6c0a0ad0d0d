use std::io;

use anchorlinks::{
  cli::{Cli, Commands},
  commands,
};
use anchorlinks_config::Config;
use color_eyre::eyre::Result;
use log::{LevelFilter, info};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => commands::init(output, format, *force),

    Commands::Slug { texts } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)?;
      let compat = config.compatibility_slug.slug_function();
      commands::slug(texts, compat.as_ref(), &mut io::stdout().lock())
    },

    Commands::Annotate(args) => {
      let mut config = Config::load(&cli.config_files, &cli.config_overrides)?;
      args.apply_to(&mut config);

      let annotated = commands::annotate(&config, &args.inputs)?;
      let headings: usize = annotated.iter().map(|file| file.headings).sum();
      info!(
        "Annotated {} files ({headings} headings) in {}",
        annotated.len(),
        config.output_dir.display()
      );
      Ok(())
    },
  }
}

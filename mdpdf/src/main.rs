use std::{
  fs,
  io::{self, Read},
};

use color_eyre::eyre::{Context, Result};
use log::{LevelFilter, info};
use mdpdf::{
  Converter,
  cli::{Cli, Commands, DocumentArgs},
};
use mdpdf_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    // Create parent directories if needed
    if let Some(parent) = output.parent()
      && !parent.as_os_str().is_empty()
      && !parent.exists()
    {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory: {}", parent.display())
      })?;
      info!("Created directory: {}", parent.display());
    }

    Config::generate_default_config(format, output, *force).wrap_err_with(
      || {
        format!(
          "Failed to generate configuration file: {}",
          output.display()
        )
      },
    )?;

    info!(
      "Configuration file created successfully. Edit it to customize your \
       conversions."
    );
    return Ok(());
  }

  let config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;
  config
    .validate_paths()
    .wrap_err("Invalid configuration")?;

  match cli.command {
    Commands::Convert(args) => convert(config, &args),
    Commands::Html(args) => html(config, &args),
    #[cfg(feature = "serve")]
    Commands::Serve { host, port } => serve(config, host, port),
    Commands::Init { .. } => Ok(()),
  }
}

fn read_markdown(args: &DocumentArgs) -> Result<String> {
  if args.reads_stdin() {
    let mut markdown = String::new();
    io::stdin()
      .read_to_string(&mut markdown)
      .wrap_err("Failed to read Markdown from standard input")?;
    return Ok(markdown);
  }

  fs::read_to_string(&args.input)
    .wrap_err_with(|| format!("Failed to read input file: {}", args.input))
}

fn convert(config: Config, args: &DocumentArgs) -> Result<()> {
  let markdown = read_markdown(args)?;
  let output = args.output_path("pdf");
  let include_toc = args.include_toc(config.include_toc);

  let converter =
    Converter::new(config).wrap_err("Failed to set up the converter")?;
  converter
    .convert_to_path(&markdown, &output, include_toc)
    .wrap_err_with(|| format!("Failed to convert {}", args.input))?;

  info!("Converted '{}' to '{}'", args.input, output.display());
  Ok(())
}

fn html(config: Config, args: &DocumentArgs) -> Result<()> {
  let markdown = read_markdown(args)?;
  let output = args.output_path("html");
  let include_toc = args.include_toc(config.include_toc);

  let converter =
    Converter::new(config).wrap_err("Failed to set up the converter")?;
  let document = converter
    .render_html(&markdown, include_toc)
    .wrap_err_with(|| format!("Failed to assemble {}", args.input))?;
  fs::write(&output, document)
    .wrap_err_with(|| format!("Failed to write {}", output.display()))?;

  info!("Wrote HTML document to '{}'", output.display());
  Ok(())
}

#[cfg(feature = "serve")]
fn serve(
  mut config: Config,
  host: Option<String>,
  port: Option<u16>,
) -> Result<()> {
  if let Some(host) = host {
    config.server.host = host;
  }
  if let Some(port) = port {
    config.server.port = port;
  }
  let address = config.server.address();
  mdpdf::serve::run(config)
    .wrap_err_with(|| format!("Failed to serve on {address}"))
}

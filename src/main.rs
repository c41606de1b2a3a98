use clap::{Parser, Subcommand};
use cloaksite::config::{self, SiteConfig};
use cloaksite::{output, pipeline};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cloaksite")]
#[command(version, about = "Static site generator that publishes under randomized paths")]
#[command(long_about = "\
Static site generator that publishes under randomized paths

Markdown pages and asset directories are written under random identifiers,
and an Apache .htaccess maps the readable routes onto them.

Project structure:

  cloaksite.toml          # Optional config (see 'cloaksite gen-config')
  content/
  ├── about.md            # Page → /about (needs exactly one '# ' heading)
  ├── contact.md          # Page → /contact
  └── images/             # Asset directory → /images/* (not recursive)
      └── logo.png
  templates/
  ├── page.html           # Jinja template: title, content
  └── home.html           # Jinja template: pages = [(slug, title)]

Output (build/ must not exist beforehand):

  build/
  ├── .htaccess
  ├── <random>.html       # One per page, plus the homepage
  └── <random>/           # One per asset directory")]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Content directory (overrides config)
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Templates directory (overrides config)
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log pipeline progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Args, Default)]
struct BuildArgs {
    /// Seed the identifier generator for a reproducible build
    #[arg(long)]
    seed: Option<u64>,

    /// Remove an existing output directory before building
    #[arg(long)]
    clean: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site (default)
    Build(BuildArgs),
    /// Validate content without writing output
    Check,
    /// Print a stock cloaksite.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli
        .command
        .take()
        .unwrap_or_else(|| Command::Build(BuildArgs::default()));

    match command {
        Command::Build(args) => {
            let site_config = resolve_config(&cli)?;
            let options = pipeline::BuildOptions {
                seed: args.seed,
                clean: args.clean,
            };
            let report = pipeline::build(&site_config, &options)?;
            output::print_build_output(&report);
        }
        Command::Check => {
            let site_config = resolve_config(&cli)?;
            println!("==> Checking {}", site_config.content_dir.display());
            let (pages, dirs) = pipeline::check(&site_config)?;
            output::print_check_output(&pages, &dirs);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file and apply command-line directory overrides.
fn resolve_config(cli: &Cli) -> Result<SiteConfig, config::ConfigError> {
    let mut site_config = config::load_config(&cli.config)?;
    if let Some(content) = &cli.content {
        site_config.content_dir = content.clone();
    }
    if let Some(templates) = &cli.templates {
        site_config.templates_dir = templates.clone();
    }
    if let Some(output) = &cli.output {
        site_config.output_dir = output.clone();
    }
    site_config.validate()?;
    Ok(site_config)
}

//! quire - asset pipeline and live-reload dev server for a static blog.

mod cli;
mod client;
mod config;
mod core;
mod embed;
mod feed;
mod generator;
mod logger;
mod pipeline;
mod reload;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, init::InitMode};
use config::{SiteConfig, init_config};
use crate::core::BuildEnv;
use pipeline::Pipeline;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // init runs before any config exists
    if let Commands::Init { name } = &cli.command {
        let cwd = std::env::current_dir()?;
        let root = name.as_ref().map_or_else(|| cwd.clone(), |n| cwd.join(n));
        return cli::init::new_site(&root, InitMode::from_name(name.is_some()));
    }

    let config = init_config(SiteConfig::load(&cli)?);
    let env = BuildEnv::resolve(cli.env);

    let ok = match &cli.command {
        Commands::Init { .. } => true,
        Commands::Build { skip_generator } => {
            cli::build::build_site(&config, env, *skip_generator)?;
            true
        }
        Commands::Serve { .. } => {
            cli::serve::serve_site()?;
            true
        }
        Commands::Bundle => run_single(Pipeline::Scripts, &config, env),
        Commands::Styles => run_single(Pipeline::Styles, &config, env),
        Commands::Favicons => run_single(Pipeline::Favicons, &config, env),
        Commands::Fonts => run_single(Pipeline::Fonts, &config, env),
        Commands::Images => run_single(Pipeline::Images, &config, env),
        Commands::ValidateFeed { path } => feed::validate(&config, path.as_deref())?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Run one pipeline; false when it failed or skipped inputs.
fn run_single(pipeline: Pipeline, config: &SiteConfig, env: BuildEnv) -> bool {
    pipeline::run_each(&[pipeline], config, env) == 0
}

//! Command-line interface definitions.

use crate::core::BuildEnv;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Asset pipeline and live-reload dev server for a static blog
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: quire.toml)
    #[arg(short = 'C', long, global = true, default_value = "quire.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Build environment; falls back to QUIRE_ENV, then NODE_ENV, then production
    #[arg(short, long, global = true, value_enum)]
    pub env: Option<BuildEnv>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true, env = "QUIRE_VERBOSE")]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new site skeleton with config and client scripts
    #[command(visible_alias = "i")]
    Init {
        /// Site directory name/path (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        name: Option<PathBuf>,
    },

    /// Run every asset pipeline, then the site generator
    #[command(visible_alias = "b")]
    Build {
        /// Only run the asset pipelines
        #[arg(long)]
        skip_generator: bool,
    },

    /// Build, serve the generated site and rebuild on change
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Serve the current build without watching for changes
        #[arg(long)]
        no_watch: bool,
    },

    /// Bundle client scripts
    #[command(visible_alias = "js")]
    Bundle,

    /// Compile stylesheets into partials
    #[command(visible_alias = "css")]
    Styles,

    /// Regenerate the favicon set
    Favicons,

    /// Copy web fonts
    Fonts,

    /// Resize and recompress images
    Images,

    /// Validate the generated feed against the W3C feed validator
    #[command(name = "validate-feed", visible_alias = "feed")]
    ValidateFeed {
        /// Feed file to validate (default: [feed].path)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["quire", "serve", "--port", "3000", "-e", "development"]);
        assert_eq!(cli.env, Some(BuildEnv::Development));
        match cli.command {
            Commands::Serve { port, no_watch, .. } => {
                assert_eq!(port, Some(3000));
                assert!(!no_watch);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_no_watch() {
        let cli = Cli::parse_from(["quire", "s", "--no-watch"]);
        assert!(matches!(cli.command, Commands::Serve { no_watch: true, .. }));
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::parse_from(["quire", "js"]);
        assert!(matches!(cli.command, Commands::Bundle));
        let cli = Cli::parse_from(["quire", "feed", "out.xml"]);
        assert!(matches!(
            cli.command,
            Commands::ValidateFeed { path: Some(_) }
        ));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["quire", "build", "-C", "site.toml"]);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(matches!(
            cli.command,
            Commands::Build {
                skip_generator: false
            }
        ));
    }
}

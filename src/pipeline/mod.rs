//! Asset pipelines.
//!
//! Each pipeline reprocesses every configured input unconditionally and
//! writes into the generated-partials or static-assets tree.
//!
//! ```text
//! scripts  → bundle client entries into IIFEs
//! styles   → compile stylesheets into partials
//! favicons → regenerate the icon set from one logo
//! fonts    → copy web fonts
//! images   → resize and recompress images
//! ```
//!
//! The orchestrator always runs them in that order, each finishing before
//! the next starts. A failing pipeline is logged and the next one runs.

pub mod favicons;
pub mod fonts;
pub mod images;
pub mod scripts;
pub mod styles;

use crate::config::SiteConfig;
use crate::core::BuildEnv;
use crate::log;
use anyhow::Result;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// One asset pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    Scripts,
    Styles,
    Favicons,
    Fonts,
    Images,
}

impl Pipeline {
    /// Fixed execution order.
    pub const ALL: [Self; 5] = [
        Self::Scripts,
        Self::Styles,
        Self::Favicons,
        Self::Fonts,
        Self::Images,
    ];

    /// Log tag.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scripts => "scripts",
            Self::Styles => "styles",
            Self::Favicons => "favicons",
            Self::Fonts => "fonts",
            Self::Images => "images",
        }
    }

    /// Run this pipeline once over its configured inputs.
    pub fn run(self, config: &SiteConfig, env: BuildEnv) -> Result<Report> {
        match self {
            Self::Scripts => scripts::run(config, env),
            Self::Styles => styles::run(config, env),
            Self::Favicons => favicons::run(config, env),
            Self::Fonts => fonts::run(config, env),
            Self::Images => images::run(config, env),
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Files written, in input order.
    pub written: Vec<PathBuf>,
    /// Inputs skipped after a per-file error (already logged).
    pub failed: usize,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Run `pipelines` in order, logging each outcome.
///
/// Returns the number of pipelines that failed outright or skipped inputs.
pub fn run_each(pipelines: &[Pipeline], config: &SiteConfig, env: BuildEnv) -> usize {
    let mut failures = 0;
    for &pipeline in pipelines {
        let start = Instant::now();
        match pipeline.run(config, env) {
            Ok(report) => {
                crate::debug!(
                    pipeline.name();
                    "{} written, {} failed in {:?}",
                    report.written.len(),
                    report.failed,
                    start.elapsed()
                );
                if !report.is_clean() {
                    failures += 1;
                }
            }
            Err(e) => {
                log!("error"; "{pipeline} failed: {e:#}");
                failures += 1;
            }
        }
    }
    failures
}

/// Run every pipeline in the fixed order.
pub fn run_all(config: &SiteConfig, env: BuildEnv) -> usize {
    log!("build"; "running asset pipelines for {env}");
    run_each(&Pipeline::ALL, config, env)
}

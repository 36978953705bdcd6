//! Script pipeline.
//!
//! Bundles each client entry and everything it imports into a single
//! self-contained IIFE:
//!
//! ```text
//! entry.js ──► resolve ──► graph (import/export and require() rewritten)
//!                               │
//!                               ▼
//!                 emit: registry IIFE ──► dev: inline source map
//!                                     └─► prod: 2 × minify (+ mangle)
//! ```
//!
//! Every bundle is built in memory first; a resolution or syntax error in
//! any of them aborts the run before a single file is written.

mod emit;
mod graph;
mod resolve;
mod transform;


use crate::config::SiteConfig;
use crate::core::BuildEnv;
use crate::log;
use crate::utils::fs::write_with_parents;
use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::Report;

pub use graph::ModuleGraph;

/// Errors that abort a bundle.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot resolve `{specifier}` imported from {importer}")]
    Resolve { specifier: String, importer: PathBuf },

    #[error("syntax error in {path}:\n{message}")]
    Syntax { path: PathBuf, message: String },

    #[error("failed to write source map for {path}: {message}")]
    SourceMap { path: PathBuf, message: String },
}

/// Settings shared by every bundle of one run.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    pub env: BuildEnv,
    /// Identifier replaced with `true` in development, `false` in production.
    pub define: String,
    /// Directory searched first for bare specifiers.
    pub node_modules: PathBuf,
}

impl BundleOptions {
    pub fn from_config(config: &SiteConfig, env: BuildEnv) -> Self {
        Self {
            env,
            define: config.scripts.define.clone(),
            node_modules: config.scripts.node_modules.clone(),
        }
    }
}

/// Bundle every configured entry, then write them all.
pub fn run(config: &SiteConfig, env: BuildEnv) -> Result<Report> {
    let options = BundleOptions::from_config(config, env);
    log!("scripts"; "bundling {} for {env}", config.scripts.bundles.len());

    let bundles = config
        .scripts
        .bundles
        .par_iter()
        .map(|spec| bundle(&spec.input, &options).map(|code| (spec.output.clone(), code)))
        .collect::<Result<Vec<_>, ScriptError>>()?;

    let mut report = Report::default();
    for (output, code) in bundles {
        write_with_parents(&output, &code)?;
        log!(
            "scripts";
            "{} written ({})",
            config.root_relative(&output).display(),
            format_size(code.len())
        );
        report.written.push(output);
    }
    Ok(report)
}

/// Bundle one entry into a finished script.
pub fn bundle(entry: &Path, options: &BundleOptions) -> Result<String, ScriptError> {
    let graph = ModuleGraph::build(entry, options)?;
    let layout = emit::render(&graph);
    emit::finish(&graph, layout, entry, options.env)
}

fn format_size(bytes: usize) -> String {
    match bytes {
        b if b < 1024 => format!("{b} B"),
        b => format!("{:.1} KiB", b as f64 / 1024.0),
    }
}

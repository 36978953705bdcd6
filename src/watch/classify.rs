//! Change classification: which rebuild a batch of paths needs.

use std::path::{Component, Path, PathBuf};

use super::debouncer::ChangeKind;
use crate::config::SiteConfig;
use crate::pipeline::Pipeline;

/// Category of a changed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Config,
    Style,
    Script,
    /// Templates and posts consumed only by the generator.
    Content,
}

const STYLE_EXTENSIONS: [&str; 1] = ["css"];
const SCRIPT_EXTENSIONS: [&str; 3] = ["js", "mjs", "cjs"];

/// Classify one path, or `None` when it must not trigger anything.
pub fn classify(path: &Path, config: &SiteConfig) -> Option<Change> {
    if path == config.config_path {
        return Some(Change::Config);
    }
    if is_ignored(path, config) {
        return None;
    }

    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if path.starts_with(&config.paths.source) {
        if STYLE_EXTENSIONS.contains(&ext.as_str()) {
            return Some(Change::Style);
        }
        if SCRIPT_EXTENSIONS.contains(&ext.as_str()) {
            return Some(Change::Script);
        }
    }
    config
        .generator
        .content
        .iter()
        .any(|c| *c == ext)
        .then_some(Change::Content)
}

/// Outputs of quire and the generator, plus dependency and hidden dirs.
pub(super) fn is_ignored(path: &Path, config: &SiteConfig) -> bool {
    let outputs = [
        &config.paths.generated,
        &config.paths.assets,
        &config.generator.output,
    ];
    if outputs.iter().any(|dir| path.starts_with(dir)) {
        return true;
    }

    let rel = path.strip_prefix(&config.root).unwrap_or(path);
    rel.components().any(|c| match c {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            name == "node_modules" || name.starts_with('.')
        }
        _ => false,
    })
}

/// Work for one debounced batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Re-read `quire.toml` before anything else.
    pub reload_config: bool,
    /// Pipelines to run, in the fixed order.
    pub pipelines: Vec<Pipeline>,
    /// Short description for logs and the browser console.
    pub reason: String,
}

impl Plan {
    /// Build the plan, or `None` when nothing relevant changed.
    pub fn from_batch(batch: &[(PathBuf, ChangeKind)], config: &SiteConfig) -> Option<Self> {
        let changes: Vec<(&Path, Change)> = batch
            .iter()
            .filter_map(|(path, _)| classify(path, config).map(|c| (path.as_path(), c)))
            .collect();
        if changes.is_empty() {
            return None;
        }

        let has = |kind: Change| changes.iter().any(|(_, c)| *c == kind);
        let reload_config = has(Change::Config);
        let pipelines = if reload_config {
            Pipeline::ALL.to_vec()
        } else {
            Pipeline::ALL
                .into_iter()
                .filter(|p| match p {
                    Pipeline::Scripts => has(Change::Script),
                    Pipeline::Styles => has(Change::Style),
                    _ => false,
                })
                .collect()
        };

        Some(Self {
            reload_config,
            pipelines,
            reason: describe(&changes, config),
        })
    }
}

fn describe(changes: &[(&Path, Change)], config: &SiteConfig) -> String {
    const SHOWN: usize = 3;
    let mut names: Vec<String> = changes
        .iter()
        .take(SHOWN)
        .map(|(path, _)| config.root_relative(path).display().to_string())
        .collect();
    if changes.len() > SHOWN {
        names.push(format!("+{} more", changes.len() - SHOWN));
    }
    names.join(", ")
}

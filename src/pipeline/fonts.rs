//! Font pipeline: copy web fonts into the static assets tree.

use anyhow::{Context, Result};
use std::fs;

use super::Report;
use crate::config::SiteConfig;
use crate::core::BuildEnv;
use crate::log;
use crate::utils::fs::list_by_extension;

pub fn run(config: &SiteConfig, _env: BuildEnv) -> Result<Report> {
    let fonts = &config.fonts;
    fs::create_dir_all(&fonts.output)
        .with_context(|| format!("failed to create {}", fonts.output.display()))?;

    let mut report = Report::default();
    for source in list_by_extension(&fonts.input, &fonts.extensions)? {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = fonts.output.join(name);
        fs::copy(&source, &target).with_context(|| {
            format!("failed to copy {} to {}", source.display(), target.display())
        })?;
        report.written.push(target);
    }

    log!(
        "fonts";
        "copied {} to {}",
        report.written.len(),
        config.root_relative(&fonts.output).display()
    );
    Ok(report)
}

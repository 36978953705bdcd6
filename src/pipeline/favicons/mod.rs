//! Favicon pipeline.
//!
//! Generates the complete icon set from one logo:
//!
//! 1. wipe and recreate the output directory,
//! 2. render every icon of the enabled platforms (see [`platform`]),
//! 3. write the manifests those platforms need,
//! 4. write the head partial referencing all of it.
//!
//! The wipe is unconditional, so icons of a platform disabled since the
//! previous run never survive.

mod html;
mod manifest;
mod platform;
mod render;

pub use platform::{Icon, Platform};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::Report;
use crate::config::SiteConfig;
use crate::config::section::parse_hex_color;
use crate::core::BuildEnv;
use crate::log;
use crate::utils::fs::{remove_dir_all_if_exists, write_with_parents};

pub fn run(config: &SiteConfig, _env: BuildEnv) -> Result<Report> {
    let favicon = &config.favicon;
    let Some(source) = &favicon.source else {
        log!("favicons"; "no source logo configured, skipping");
        return Ok(Report::default());
    };

    remove_dir_all_if_exists(&favicon.output)?;
    std::fs::create_dir_all(&favicon.output)
        .with_context(|| format!("failed to create {}", favicon.output.display()))?;

    let logo = image::open(source)
        .with_context(|| format!("failed to decode logo {}", source.display()))?;
    let background = parse_hex_color(&favicon.background)
        .with_context(|| format!("invalid background color `{}`", favicon.background))?;

    let icons: Vec<&Icon> = Platform::selected(&favicon.platforms)
        .flat_map(|p| p.icons())
        .collect();
    let rendered = icons
        .par_iter()
        .map(|icon| {
            render::render(&logo, icon, background)
                .with_context(|| format!("failed to render {}", icon.name))
                .map(|bytes| (icon.name, bytes))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut report = Report::default();
    for (name, bytes) in rendered {
        let path = favicon.output.join(name);
        write_with_parents(&path, &bytes)?;
        report.written.push(path);
    }
    for (name, contents) in manifest::files(favicon)? {
        let path = favicon.output.join(name);
        write_with_parents(&path, &contents)?;
        report.written.push(path);
    }
    log!(
        "favicons";
        "{} files in {}",
        report.written.len(),
        config.root_relative(&favicon.output).display()
    );

    write_with_parents(&favicon.html, html::render(favicon))?;
    log!("favicons"; "{} written", config.root_relative(&favicon.html).display());
    report.written.push(favicon.html.clone());

    Ok(report)
}

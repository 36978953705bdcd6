//! `quire build`: every asset pipeline, then the site generator.

use anyhow::{Result, bail};
use std::time::Instant;

use crate::{config::SiteConfig, core::BuildEnv, generator, log, pipeline};

/// Run all pipelines in their fixed order, then the generator.
///
/// A failing pipeline does not stop the others but fails the build before
/// the generator runs, so a broken partial is never published.
pub fn build_site(config: &SiteConfig, env: BuildEnv, skip_generator: bool) -> Result<()> {
    let start = Instant::now();

    let failures = pipeline::run_all(config, env);
    if failures > 0 {
        bail!("{failures} pipeline(s) reported errors");
    }

    if !skip_generator {
        generator::run(config, env)?;
    }

    log!("build"; "done in {:.2?}", start.elapsed());
    Ok(())
}

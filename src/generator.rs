//! Site generator driver.
//!
//! The generator is an external program (Eleventy by default) that turns
//! templates, content and the generated partials into the output
//! directory. It is told where it runs through environment variables:
//!
//! | Variable       | Value                                 |
//! |----------------|---------------------------------------|
//! | `QUIRE_ENV`    | `development` or `production`         |
//! | `QUIRE_ROOT`   | project root                          |
//! | `QUIRE_OUTPUT` | output directory from `[generator]`   |

use anyhow::{Context, Result, bail};
use std::time::Instant;

use crate::config::SiteConfig;
use crate::core::BuildEnv;
use crate::log;
use crate::utils::exec::{Cmd, FilterRule};

/// Per-file chatter of the default generator.
static GENERATOR_FILTER: FilterRule =
    FilterRule::new(&["[11ty] Writing", "[11ty] Copied", "[11ty] Benchmark"]);

/// Run the generator once from the project root.
pub fn run(config: &SiteConfig, env: BuildEnv) -> Result<()> {
    let command = &config.generator.command;
    if command.is_empty() {
        bail!("no generator command configured");
    }

    let start = Instant::now();
    Cmd::from_slice(command)
        .cwd(&config.root)
        .envs([
            ("QUIRE_ENV", env.as_str().to_string()),
            ("QUIRE_ROOT", config.root.display().to_string()),
            ("QUIRE_OUTPUT", config.generator.output.display().to_string()),
        ])
        .filter(&GENERATOR_FILTER)
        .run()
        .with_context(|| format!("site generator `{}` failed", command.join(" ")))?;

    log!(
        "generator";
        "{} in {:.2?}",
        config.root_relative(&config.generator.output).display(),
        start.elapsed()
    );
    Ok(())
}

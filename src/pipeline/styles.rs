//! Style pipeline.
//!
//! Compiles each configured stylesheet into a template partial:
//! `@import`s are bundled, nesting and `@custom-media` are lowered to
//! plain CSS, vendor prefixes are added for [`StyleTargets`], and the
//! result is either minified (production) or annotated with an inline
//! source map (development).

use crate::config::{SiteConfig, StyleSpec, StyleTargets};
use crate::core::BuildEnv;
use crate::log;
use crate::utils::fs::write_with_parents;
use anyhow::Result;
use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::stylesheet::{MinifyOptions, ParserFlags, ParserOptions, PrinterOptions};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;
use rayon::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

use super::Report;

/// Errors compiling a single stylesheet.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to transform {path}: {message}")]
    Transform { path: PathBuf, message: String },

    #[error("failed to print {path}: {message}")]
    Print { path: PathBuf, message: String },

    #[error("failed to encode source map for {path}: {message}")]
    SourceMap { path: PathBuf, message: String },
}

/// Compile every configured stylesheet. Files fan out across the rayon pool.
pub fn run(config: &SiteConfig, env: BuildEnv) -> Result<Report> {
    let targets = browsers(&config.styles.targets);

    let results: Vec<_> = config
        .styles
        .files
        .par_iter()
        .map(|spec| {
            let css = compile(spec, targets, env)?;
            write_with_parents(&spec.output, &css)?;
            Ok::<_, anyhow::Error>(spec.output.clone())
        })
        .collect();

    let mut report = Report::default();
    for (spec, result) in config.styles.files.iter().zip(results) {
        match result {
            Ok(output) => {
                log!("styles"; "{} written", config.root_relative(&output).display());
                report.written.push(output);
            }
            Err(e) => {
                log!("styles"; "skipped {}: {e:#}", config.root_relative(&spec.input).display());
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

/// Compile one stylesheet to a CSS string.
pub fn compile(spec: &StyleSpec, browsers: Browsers, env: BuildEnv) -> Result<String, StyleError> {
    let path = spec.input.clone();
    let targets = Targets::from(browsers);
    let mut source_map = env.is_dev().then(|| SourceMap::new("/"));

    let fs = FileProvider::new();
    let options = ParserOptions {
        flags: ParserFlags::NESTING | ParserFlags::CUSTOM_MEDIA,
        ..ParserOptions::default()
    };

    // The bundler borrows the source map; release it before printing.
    let mut stylesheet = {
        let mut bundler = Bundler::new(&fs, source_map.as_mut(), options);
        bundler.bundle(&spec.input).map_err(|e| StyleError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?
    };

    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| StyleError::Transform {
            path: path.clone(),
            message: e.to_string(),
        })?;

    let mut printed = stylesheet
        .to_css(PrinterOptions {
            minify: env.is_prod(),
            source_map: source_map.as_mut(),
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| StyleError::Print {
            path: path.clone(),
            message: e.to_string(),
        })?
        .code;

    if let Some(map) = source_map.as_mut() {
        let url = map.to_data_url(None).map_err(|e| StyleError::SourceMap {
            path: path.clone(),
            message: format!("{e:?}"),
        })?;
        printed.push_str(&format!("\n/*# sourceMappingURL={url} */\n"));
    }

    Ok(printed)
}

/// Translate configured minimum versions into lightningcss browser targets.
///
/// Invalid versions are rejected by config validation and ignored here.
pub fn browsers(targets: &StyleTargets) -> Browsers {
    let mut browsers = Browsers::default();
    for (name, version) in targets.entries() {
        let Some(v) = StyleTargets::encode_version(version) else {
            continue;
        };
        let slot = match name {
            "android" => &mut browsers.android,
            "chrome" => &mut browsers.chrome,
            "edge" => &mut browsers.edge,
            "firefox" => &mut browsers.firefox,
            "ie" => &mut browsers.ie,
            "ios_saf" => &mut browsers.ios_saf,
            "opera" => &mut browsers.opera,
            "safari" => &mut browsers.safari,
            "samsung" => &mut browsers.samsung,
            _ => continue,
        };
        *slot = Some(v);
    }
    browsers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[[styles.files]]
input = "src/styles/home.css"
output = "_includes/generated/styles/home.liquid"
"#;

    fn project(css: &str) -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let styles = dir.path().join("src/styles");
        fs::create_dir_all(&styles).unwrap();
        fs::write(styles.join("home.css"), css).unwrap();
        fs::write(styles.join("_vars.css"), ":root { --accent: #c00; }\n").unwrap();
        let config = test_config_at(dir.path(), CONFIG);
        (dir, config)
    }

    fn output(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join("_includes/generated/styles/home.liquid")).unwrap()
    }

    #[test]
    fn test_production_is_minified_without_map() {
        let (dir, config) = project("body {\n  color: red;\n}\n");
        let report = run(&config, BuildEnv::Production).unwrap();
        assert_eq!(report.written.len(), 1);

        let css = output(&dir);
        assert!(!css.contains('\n'));
        assert!(!css.contains("sourceMappingURL"));
        assert!(css.contains("body{color:red}"));
    }

    #[test]
    fn test_development_has_inline_map() {
        let (dir, config) = project("body { color: red; }\n");
        run(&config, BuildEnv::Development).unwrap();

        let css = output(&dir);
        assert!(css.contains("/*# sourceMappingURL=data:application/json;base64,"));
    }

    #[test]
    fn test_imports_and_nesting_are_flattened() {
        let (dir, config) = project(
            "@import \"_vars.css\";\n.post { & a { color: var(--accent); } }\n",
        );
        run(&config, BuildEnv::Production).unwrap();

        let css = output(&dir);
        assert!(css.contains("--accent:#c00"));
        assert!(css.contains(".post a{"));
        assert!(!css.contains("@import"));
        assert!(!css.contains('&'));
    }

    #[test]
    fn test_custom_media_lowered() {
        let (dir, config) = project(
            "@custom-media --wide (min-width: 60em);\n@media (--wide) { body { margin: 0 auto; } }\n",
        );
        run(&config, BuildEnv::Production).unwrap();

        let css = output(&dir);
        assert!(!css.contains("--wide"));
        assert!(css.contains("min-width:60em"));
    }

    #[test]
    fn test_deterministic() {
        let (dir, config) = project(".a { display: flex; user-select: none; }\n");
        run(&config, BuildEnv::Production).unwrap();
        let first = output(&dir);
        run(&config, BuildEnv::Production).unwrap();
        assert_eq!(first, output(&dir));
    }

    #[test]
    fn test_prefixes_for_old_safari() {
        let (dir, config) = project(".a { user-select: none; }\n");
        run(&config, BuildEnv::Production).unwrap();
        assert!(output(&dir).contains("-webkit-user-select:none"));
    }

    #[test]
    fn test_broken_file_skipped_others_continue() {
        let dir = TempDir::new().unwrap();
        let styles = dir.path().join("src/styles");
        fs::create_dir_all(&styles).unwrap();
        fs::write(styles.join("ok.css"), "a { color: blue }").unwrap();
        fs::write(styles.join("bad.css"), "@import \"nope.css\";").unwrap();
        let config = test_config_at(
            dir.path(),
            r#"
[[styles.files]]
input = "src/styles/bad.css"
output = "out/bad.liquid"

[[styles.files]]
input = "src/styles/ok.css"
output = "out/ok.liquid"
"#,
        );

        let report = run(&config, BuildEnv::Production).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.written.len(), 1);
        assert!(dir.path().join("out/ok.liquid").is_file());
        assert!(!dir.path().join("out/bad.liquid").exists());
    }

    #[test]
    fn test_browsers_mapping() {
        let browsers = browsers(&StyleTargets::default());
        assert_eq!(browsers.safari, Some(12 << 16));
        assert_eq!(browsers.ie, None);
    }
}

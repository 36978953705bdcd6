//! Image pipeline.
//!
//! Every entry is decoded, resized to exactly `width × height` and
//! re-encoded in the format implied by its output extension. JPEG output
//! honors `quality`; lossless formats ignore it. Entries run one after
//! another and a failing entry is logged and skipped.

use anyhow::{Context, Result, bail};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use super::Report;
use crate::config::SiteConfig;
use crate::config::section::ImageSpec;
use crate::core::BuildEnv;
use crate::log;
use crate::utils::fs::write_with_parents;

pub fn run(config: &SiteConfig, _env: BuildEnv) -> Result<Report> {
    let mut report = Report::default();
    for spec in &config.images.files {
        let rel = config.root_relative(&spec.output);
        match process(spec) {
            Ok(bytes) => {
                write_with_parents(&spec.output, &bytes)?;
                log!("images"; "{} ({}x{})", rel.display(), spec.width, spec.height);
                report.written.push(spec.output.clone());
            }
            Err(e) => {
                log!("images"; "skipped {}: {e:#}", config.root_relative(&spec.input).display());
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

/// Decode, resize and encode one entry in memory.
pub fn process(spec: &ImageSpec) -> Result<Vec<u8>> {
    let format = ImageFormat::from_path(&spec.output)
        .with_context(|| format!("unknown output format for {}", spec.output.display()))?;
    let image = image::open(&spec.input)
        .with_context(|| format!("failed to decode {}", spec.input.display()))?;
    let resized = image.resize_exact(spec.width, spec.height, FilterType::Lanczos3);
    encode(&resized, format, spec.quality)
}

fn encode(image: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => {
            // no alpha channel in JPEG
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
        }
        ImageFormat::Png | ImageFormat::WebP => image.write_to(&mut buf, format)?,
        other => bail!("unsupported output format {other:?}"),
    }
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::path::Path;
    use tempfile::TempDir;

    fn fixture(path: &Path, width: u32, height: u32) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_resizes_exactly() {
        let dir = TempDir::new().unwrap();
        fixture(&dir.path().join("src/images/me.png"), 120, 80);
        let config = test_config_at(
            dir.path(),
            r#"
[[images.files]]
input = "src/images/me.png"
output = "assets/images/me.jpg"
quality = 70
width = 60
height = 60
"#,
        );

        let report = run(&config, BuildEnv::Production).unwrap();
        assert!(report.is_clean());

        let out = image::open(dir.path().join("assets/images/me.jpg")).unwrap();
        assert_eq!((out.width(), out.height()), (60, 60));
    }

    #[test]
    fn test_quality_affects_jpeg_size() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.png");
        fixture(&input, 64, 64);

        let spec = |quality| ImageSpec {
            input: input.clone(),
            output: dir.path().join("out.jpg"),
            quality,
            width: 64,
            height: 64,
        };
        let low = process(&spec(10)).unwrap();
        let high = process(&spec(95)).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_png_keeps_alpha() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.png");
        RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 0]))
            .save(&input)
            .unwrap();

        let spec = ImageSpec {
            input,
            output: dir.path().join("out.png"),
            quality: 80,
            width: 4,
            height: 4,
        };
        let bytes = process(&spec).unwrap();
        let out = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(out.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_failing_entry_skipped() {
        let dir = TempDir::new().unwrap();
        fixture(&dir.path().join("src/images/ok.png"), 10, 10);
        std::fs::write(dir.path().join("src/images/broken.png"), b"not an image").unwrap();
        let config = test_config_at(
            dir.path(),
            r#"
[[images.files]]
input = "src/images/broken.png"
output = "assets/images/broken.png"
width = 5
height = 5

[[images.files]]
input = "src/images/ok.png"
output = "assets/images/ok.png"
width = 5
height = 5
"#,
        );

        let report = run(&config, BuildEnv::Production).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.written, vec![dir.path().join("assets/images/ok.png")]);
        assert!(!dir.path().join("assets/images/broken.png").exists());
    }
}

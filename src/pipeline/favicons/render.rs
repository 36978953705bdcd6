//! Raster rendering of a single icon.

use anyhow::Result;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

use super::platform::{Encoding, Icon};

/// Render `icon` from `logo`, returning the encoded file.
pub fn render(logo: &DynamicImage, icon: &Icon, background: [u8; 3]) -> Result<Vec<u8>> {
    match icon.encoding {
        Encoding::Png => {
            let canvas = compose(logo, icon, icon.width, icon.height, background);
            let mut buf = Cursor::new(Vec::new());
            DynamicImage::ImageRgba8(canvas).write_to(&mut buf, ImageFormat::Png)?;
            Ok(buf.into_inner())
        }
        Encoding::Ico(sizes) => {
            let frames = sizes
                .iter()
                .map(|&size| {
                    let canvas = compose(logo, icon, size, size, background);
                    IcoFrame::as_png(canvas.as_raw(), size, size, ExtendedColorType::Rgba8)
                })
                .collect::<Result<Vec<_>, _>>()?;
            let mut buf = Vec::new();
            IcoEncoder::new(&mut buf).encode_images(&frames)?;
            Ok(buf)
        }
    }
}

/// Fit the logo into `scale` of the shorter side, centered.
fn compose(
    logo: &DynamicImage,
    icon: &Icon,
    width: u32,
    height: u32,
    background: [u8; 3],
) -> RgbaImage {
    let fill = if icon.opaque {
        Rgba([background[0], background[1], background[2], 255])
    } else {
        Rgba([0, 0, 0, 0])
    };
    let mut canvas = RgbaImage::from_pixel(width, height, fill);

    let side = ((width.min(height) as f32) * icon.scale).round().max(1.0) as u32;
    let fitted = logo.resize(side, side, FilterType::Lanczos3).to_rgba8();
    let x = (width - fitted.width()) / 2;
    let y = (height - fitted.height()) / 2;
    imageops::overlay(&mut canvas, &fitted, i64::from(x), i64::from(y));
    canvas
}

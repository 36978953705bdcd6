//! `<link>`/`<meta>` partial for the page head.

use std::path::Path;

use quick_xml::escape::escape;

use super::manifest::{BROWSER_CONFIG, WEB_MANIFEST, YANDEX_MANIFEST};
use super::platform::{Encoding, Platform};
use crate::config::section::FaviconConfig;
use crate::utils::mime;

/// Render the head tags, one per line, for the enabled platforms.
pub fn render(config: &FaviconConfig) -> String {
    let path = escape(config.path.as_str());
    let app = escape(config.app_name.as_str());
    let theme = escape(config.theme_color.as_str());
    let background = escape(config.background.as_str());

    let mut lines = Vec::new();
    for platform in Platform::selected(&config.platforms) {
        match platform {
            Platform::Android => {
                lines.push(format!(r#"<link rel="manifest" href="{path}{WEB_MANIFEST}">"#));
                lines.push(r#"<meta name="mobile-web-app-capable" content="yes">"#.into());
                lines.push(format!(r#"<meta name="theme-color" content="{theme}">"#));
                lines.push(format!(r#"<meta name="application-name" content="{app}">"#));
            }
            Platform::AppleIcon => {
                for icon in platform.icons().iter().filter(|i| i.name.contains(&i.sizes())) {
                    lines.push(format!(
                        r#"<link rel="apple-touch-icon" sizes="{}" href="{path}{}">"#,
                        icon.sizes(),
                        icon.name
                    ));
                }
                lines.push(r#"<meta name="apple-mobile-web-app-capable" content="yes">"#.into());
                lines.push(
                    r#"<meta name="apple-mobile-web-app-status-bar-style" content="black-translucent">"#
                        .into(),
                );
                lines.push(format!(r#"<meta name="apple-mobile-web-app-title" content="{app}">"#));
            }
            Platform::AppleStartup => {
                for icon in platform.icons() {
                    lines.push(format!(
                        r#"<link rel="apple-touch-startup-image" media="(device-width: {}px) and (device-height: {}px) and (-webkit-device-pixel-ratio: {})" href="{path}{}">"#,
                        icon.width / icon.ratio,
                        icon.height / icon.ratio,
                        icon.ratio,
                        icon.name
                    ));
                }
            }
            Platform::Coast => {
                for icon in platform.icons() {
                    lines.push(format!(
                        r#"<link rel="icon" type="{}" sizes="{}" href="{path}{}">"#,
                        mime::for_icon(Path::new(icon.name)),
                        icon.sizes(),
                        icon.name
                    ));
                }
            }
            Platform::Favicons => {
                for icon in platform.icons() {
                    lines.push(match icon.encoding {
                        Encoding::Ico(_) => {
                            format!(r#"<link rel="shortcut icon" href="{path}{}">"#, icon.name)
                        }
                        Encoding::Png => format!(
                            r#"<link rel="icon" type="{}" sizes="{}" href="{path}{}">"#,
                            mime::for_icon(Path::new(icon.name)),
                            icon.sizes(),
                            icon.name
                        ),
                    });
                }
            }
            Platform::Windows => {
                lines.push(format!(r#"<meta name="msapplication-TileColor" content="{background}">"#));
                lines.push(format!(
                    r#"<meta name="msapplication-TileImage" content="{path}mstile-144x144.png">"#
                ));
                lines.push(format!(
                    r#"<meta name="msapplication-config" content="{path}{BROWSER_CONFIG}">"#
                ));
            }
            Platform::Yandex => {
                lines.push(format!(
                    r#"<link rel="yandex-tableau-widget" href="{path}{YANDEX_MANIFEST}">"#
                ));
            }
            // the open web app manifest is discovered by the store, not the page
            Platform::Firefox => {}
        }
    }
    lines.join("\n")
}

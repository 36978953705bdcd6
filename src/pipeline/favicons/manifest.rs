//! Auxiliary manifests referencing the generated icons.

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Cursor;

use super::platform::{Icon, Platform};
use crate::config::section::FaviconConfig;

pub const WEB_MANIFEST: &str = "site.webmanifest";
pub const BROWSER_CONFIG: &str = "browserconfig.xml";
pub const FIREFOX_MANIFEST: &str = "manifest.webapp";
pub const YANDEX_MANIFEST: &str = "yandex-browser-manifest.json";

/// Manifest files for the enabled platforms, as `(file name, contents)`.
pub fn files(config: &FaviconConfig) -> Result<Vec<(&'static str, String)>> {
    let mut out = Vec::new();
    for platform in Platform::selected(&config.platforms) {
        match platform {
            Platform::Android => out.push((WEB_MANIFEST, web_manifest(config)?)),
            Platform::Windows => out.push((BROWSER_CONFIG, browser_config(config)?)),
            Platform::Firefox => out.push((FIREFOX_MANIFEST, firefox_manifest(config)?)),
            Platform::Yandex => out.push((YANDEX_MANIFEST, yandex_manifest(config)?)),
            _ => {}
        }
    }
    Ok(out)
}

fn href(config: &FaviconConfig, icon: &Icon) -> String {
    format!("{}{}", config.path, icon.name)
}

#[derive(Serialize)]
struct WebManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    description: &'a str,
    dir: &'a str,
    lang: &'a str,
    display: &'a str,
    orientation: &'a str,
    start_url: &'a str,
    background_color: &'a str,
    theme_color: &'a str,
    icons: Vec<ManifestIcon>,
}

#[derive(Serialize)]
struct ManifestIcon {
    src: String,
    sizes: String,
    #[serde(rename = "type")]
    mime: &'static str,
    purpose: &'static str,
}

fn web_manifest(config: &FaviconConfig) -> Result<String> {
    let icons = Platform::Android
        .icons()
        .iter()
        .map(|icon| ManifestIcon {
            src: href(config, icon),
            sizes: icon.sizes(),
            mime: "image/png",
            purpose: "any",
        })
        .collect();
    let manifest = WebManifest {
        name: &config.app_name,
        short_name: config.short_name(),
        description: &config.description,
        dir: "auto",
        lang: &config.lang,
        display: &config.display,
        orientation: "any",
        start_url: &config.start_url,
        background_color: &config.background,
        theme_color: &config.theme_color,
        icons,
    };
    Ok(serde_json::to_string_pretty(&manifest)?)
}

fn browser_config(config: &FaviconConfig) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("browserconfig")))?;
    writer.write_event(Event::Start(BytesStart::new("msapplication")))?;
    writer.write_event(Event::Start(BytesStart::new("tile")))?;

    for icon in Platform::Windows.icons() {
        let tag = match (icon.width, icon.height) {
            (310, 150) => "wide310x150logo".to_string(),
            (w, h) => format!("square{w}x{h}logo"),
        };
        let mut element = BytesStart::new(tag);
        element.push_attribute(("src", href(config, icon).as_str()));
        writer.write_event(Event::Empty(element))?;
    }

    writer.write_event(Event::Start(BytesStart::new("TileColor")))?;
    writer.write_event(Event::Text(BytesText::new(&config.background)))?;
    writer.write_event(Event::End(BytesEnd::new("TileColor")))?;

    writer.write_event(Event::End(BytesEnd::new("tile")))?;
    writer.write_event(Event::End(BytesEnd::new("msapplication")))?;
    writer.write_event(Event::End(BytesEnd::new("browserconfig")))?;

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

#[derive(Serialize)]
struct FirefoxManifest<'a> {
    version: &'a str,
    name: &'a str,
    description: &'a str,
    icons: BTreeMap<u32, String>,
    developer: Developer<'a>,
}

#[derive(Serialize)]
struct Developer<'a> {
    name: &'a str,
    url: &'a str,
}

fn firefox_manifest(config: &FaviconConfig) -> Result<String> {
    let icons = Platform::Firefox
        .icons()
        .iter()
        .map(|icon| (icon.width, href(config, icon)))
        .collect();
    let manifest = FirefoxManifest {
        version: "1.0",
        name: &config.app_name,
        description: &config.description,
        icons,
        developer: Developer {
            name: &config.developer_name,
            url: &config.developer_url,
        },
    };
    Ok(serde_json::to_string_pretty(&manifest)?)
}

fn yandex_manifest(config: &FaviconConfig) -> Result<String> {
    let logo = Platform::Yandex
        .icons()
        .first()
        .map(|icon| href(config, icon))
        .unwrap_or_default();
    let manifest = serde_json::json!({
        "version": "1.0",
        "api_version": 1,
        "layout": {
            "logo": logo,
            "color": config.background,
            "show_title": true,
        },
    });
    Ok(serde_json::to_string_pretty(&manifest)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FaviconConfig {
        FaviconConfig {
            app_name: "Field Notes".into(),
            ..FaviconConfig::default()
        }
    }

    #[test]
    fn test_default_files() {
        let names: Vec<_> = files(&config()).unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, [WEB_MANIFEST, BROWSER_CONFIG]);
    }

    #[test]
    fn test_web_manifest_icons() {
        let json: serde_json::Value = serde_json::from_str(&web_manifest(&config()).unwrap()).unwrap();
        assert_eq!(json["name"], "Field Notes");
        assert_eq!(json["short_name"], "Field Notes");
        assert_eq!(json["icons"][0]["src"], "/assets/favicons/android-chrome-36x36.png");
        assert_eq!(json["icons"][0]["type"], "image/png");
    }

    #[test]
    fn test_browser_config() {
        let xml = browser_config(&config()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<square150x150logo src=\"/assets/favicons/mstile-150x150.png\"/>"));
        assert!(xml.contains("<wide310x150logo"));
        assert!(xml.contains("<TileColor>#010120</TileColor>"));
    }

    #[test]
    fn test_firefox_manifest_keyed_by_size() {
        let json: serde_json::Value =
            serde_json::from_str(&firefox_manifest(&config()).unwrap()).unwrap();
        assert_eq!(json["icons"]["60"], "/assets/favicons/firefox_app_60x60.png");
    }
}

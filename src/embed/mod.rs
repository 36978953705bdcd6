//! Embedded static resources.
//!
//! - `scripts` - bundle runtime wrapped around every multi-module bundle
//! - `serve` - hot reload client injected by the dev server
//! - `client` - browser scripts written into new sites
//! - `init` - remaining scaffold files for `quire init`

mod template;

pub use template::{NoVars, Template, TemplateVars};

pub mod scripts {
    use super::{Template, TemplateVars};

    /// Variables for runtime.js.
    pub struct RuntimeVars {
        /// Comma separated module factories, in id order.
        pub modules: String,
    }

    impl TemplateVars for RuntimeVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__QUIRE_MODULES__", &self.modules)
        }
    }

    /// Module registry and interop helpers for bundles.
    pub const RUNTIME_JS: Template<RuntimeVars> =
        Template::new(include_str!("scripts/runtime.js"));
}

pub mod serve {
    use super::{Template, TemplateVars};

    /// Variables for hotreload.js.
    pub struct HotreloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for HotreloadVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__QUIRE_WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Hot reload JavaScript with WebSocket port injection.
    pub const HOTRELOAD_JS: Template<HotreloadVars> =
        Template::new(include_str!("serve/hotreload.js"));
}

pub mod client {
    use super::{NoVars, Template, TemplateVars};
    use crate::client::{self, fonts};

    /// Shared constants of the client scripts.
    pub struct ClientVars;

    impl TemplateVars for ClientVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__QUIRE_DARK_MODE_KEY__", client::DARK_MODE_KEY)
                .replace("__QUIRE_DARK_VALUE__", client::DARK_VALUE)
                .replace("__QUIRE_LIGHT_VALUE__", client::LIGHT_VALUE)
                .replace("__QUIRE_DARK_CLASS__", client::DARK_CLASS)
                .replace("__QUIRE_TOGGLE_SELECTOR__", client::TOGGLE_SELECTOR)
                .replace("__QUIRE_FONTS_CACHED_KEY__", client::FONTS_CACHED_KEY)
                .replace("__QUIRE_FONTS_LOADED_CLASS__", client::FONTS_LOADED_CLASS)
                .replace("__QUIRE_FONTS_FAILED_CLASS__", client::FONTS_FAILED_CLASS)
                .replace("__QUIRE_FONT_VARIANTS__", &fonts::variants_js())
                .replace(
                    "__QUIRE_FONT_TIMEOUT__",
                    &fonts::FONT_TIMEOUT.as_millis().to_string(),
                )
                .replace("__QUIRE_FONT_SCRIPT__", client::FONT_SCRIPT)
                .replace("__QUIRE_PREFETCH_SCRIPT__", client::PREFETCH_SCRIPT)
                .replace("__QUIRE_MAIN_TARGET__", client::MAIN_TARGET)
                .replace("__QUIRE_SKIP_NAV_CLASS__", client::SKIP_NAV_CLASS)
                .replace("__QUIRE_HEADING_ANCHOR_CLASS__", client::HEADING_ANCHOR_CLASS)
                .replace("__QUIRE_FEED_PATH__", client::FEED_PATH)
                .replace("__QUIRE_HIGHLIGHT_STYLESHEET__", client::HIGHLIGHT_STYLESHEET)
        }
    }

    pub const INLINE_JS: Template<ClientVars> = Template::new(include_str!("client/inline.js"));
    pub const FONT_JS: Template<ClientVars> = Template::new(include_str!("client/font.js"));
    pub const PREFETCH_JS: Template<ClientVars> =
        Template::new(include_str!("client/prefetch.js"));
    pub const HIGHLIGHTING_JS: Template<ClientVars> =
        Template::new(include_str!("client/highlighting.js"));
    pub const MAIN_CSS: Template<ClientVars> = Template::new(include_str!("client/main.css"));
    pub const HIGHLIGHTING_CSS: Template<NoVars> =
        Template::new(include_str!("client/highlighting.css"));
}

pub mod init {
    use super::{Template, TemplateVars};

    /// Variables for the scaffolded config and package manifest.
    pub struct InitVars {
        pub name: String,
    }

    impl TemplateVars for InitVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__QUIRE_NAME__", &self.name)
                .replace("__QUIRE_VERSION__", env!("CARGO_PKG_VERSION"))
        }
    }

    pub const QUIRE_TOML: Template<InitVars> =
        Template::new(include_str!("init/quire.toml"));
    pub const PACKAGE_JSON: Template<InitVars> =
        Template::new(include_str!("init/package.json"));
    pub const GITIGNORE: &str = include_str!("init/gitignore");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotreload_js_with_vars() {
        let rendered = serve::HOTRELOAD_JS.render(&serve::HotreloadVars { ws_port: 35729 });
        assert!(rendered.contains("35729"));
        assert!(!rendered.contains("__QUIRE_WS_PORT__"));
    }

    #[test]
    fn test_runtime_modules_injected() {
        let rendered = scripts::RUNTIME_JS.render(&scripts::RuntimeVars {
            modules: "function (module) {}".into(),
        });
        assert!(rendered.contains("function (module) {}"));
        assert!(!rendered.contains("__QUIRE_MODULES__"));
    }

    #[test]
    fn test_client_templates_fully_rendered() {
        for template in [
            client::INLINE_JS,
            client::FONT_JS,
            client::PREFETCH_JS,
            client::HIGHLIGHTING_JS,
            client::MAIN_CSS,
        ] {
            let rendered = template.render(&client::ClientVars);
            assert!(!rendered.contains("__QUIRE_"), "{rendered}");
        }
    }

    #[test]
    fn test_inline_script_uses_shared_keys() {
        let rendered = client::INLINE_JS.render(&client::ClientVars);
        assert!(rendered.contains("'dark-mode'"));
        assert!(rendered.contains("'fonts-cached'"));
        assert!(rendered.contains("/assets/js/font.js"));
    }

    #[test]
    fn test_init_templates() {
        let vars = init::InitVars {
            name: "my-blog".into(),
        };
        let toml = init::QUIRE_TOML.render(&vars);
        assert!(!toml.contains("__QUIRE_"));
        let package = init::PACKAGE_JSON.render(&vars);
        let json: serde_json::Value = serde_json::from_str(&package).unwrap();
        assert_eq!(json["name"], "my-blog");
    }
}

//! Icon table per platform.

use crate::config::section::PlatformFlags;

/// Icon families a logo can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Android,
    AppleIcon,
    AppleStartup,
    Coast,
    Favicons,
    Firefox,
    Windows,
    Yandex,
}

impl Platform {
    pub const ALL: [Self; 8] = [
        Self::Android,
        Self::AppleIcon,
        Self::AppleStartup,
        Self::Coast,
        Self::Favicons,
        Self::Firefox,
        Self::Windows,
        Self::Yandex,
    ];

    pub const fn enabled(self, flags: &PlatformFlags) -> bool {
        match self {
            Self::Android => flags.android,
            Self::AppleIcon => flags.apple_icon,
            Self::AppleStartup => flags.apple_startup,
            Self::Coast => flags.coast,
            Self::Favicons => flags.favicons,
            Self::Firefox => flags.firefox,
            Self::Windows => flags.windows,
            Self::Yandex => flags.yandex,
        }
    }

    pub const fn icons(self) -> &'static [Icon] {
        match self {
            Self::Android => ANDROID,
            Self::AppleIcon => APPLE_ICON,
            Self::AppleStartup => APPLE_STARTUP,
            Self::Coast => COAST,
            Self::Favicons => FAVICONS,
            Self::Firefox => FIREFOX,
            Self::Windows => WINDOWS,
            Self::Yandex => YANDEX,
        }
    }

    /// Enabled platforms in table order.
    pub fn selected(flags: &PlatformFlags) -> impl Iterator<Item = Self> + '_ {
        Self::ALL.into_iter().filter(|p| p.enabled(flags))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Png,
    /// Multi-resolution icon with these square sizes.
    Ico(&'static [u32]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Icon {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub encoding: Encoding,
    /// Fill with the configured background instead of transparency.
    pub opaque: bool,
    /// Share of the shorter side the logo occupies.
    pub scale: f32,
    /// Device pixel ratio, startup images only.
    pub ratio: u32,
}

impl Icon {
    const fn png(name: &'static str, size: u32) -> Self {
        Self {
            name,
            width: size,
            height: size,
            encoding: Encoding::Png,
            opaque: false,
            scale: 1.0,
            ratio: 1,
        }
    }

    const fn opaque(mut self, scale: f32) -> Self {
        self.opaque = true;
        self.scale = scale;
        self
    }

    const fn tile(name: &'static str, width: u32, height: u32) -> Self {
        Self {
            name,
            width,
            height,
            encoding: Encoding::Png,
            opaque: false,
            scale: 0.6,
            ratio: 1,
        }
    }

    const fn startup(name: &'static str, width: u32, height: u32, ratio: u32) -> Self {
        Self {
            name,
            width,
            height,
            encoding: Encoding::Png,
            opaque: true,
            scale: 0.4,
            ratio,
        }
    }

    pub fn sizes(&self) -> String {
        match self.encoding {
            Encoding::Png => format!("{}x{}", self.width, self.height),
            Encoding::Ico(sizes) => sizes
                .iter()
                .map(|s| format!("{s}x{s}"))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

const ANDROID: &[Icon] = &[
    Icon::png("android-chrome-36x36.png", 36),
    Icon::png("android-chrome-48x48.png", 48),
    Icon::png("android-chrome-72x72.png", 72),
    Icon::png("android-chrome-96x96.png", 96),
    Icon::png("android-chrome-144x144.png", 144),
    Icon::png("android-chrome-192x192.png", 192),
    Icon::png("android-chrome-256x256.png", 256),
    Icon::png("android-chrome-384x384.png", 384),
    Icon::png("android-chrome-512x512.png", 512),
];

const APPLE_ICON: &[Icon] = &[
    Icon::png("apple-touch-icon-57x57.png", 57).opaque(0.9),
    Icon::png("apple-touch-icon-60x60.png", 60).opaque(0.9),
    Icon::png("apple-touch-icon-72x72.png", 72).opaque(0.9),
    Icon::png("apple-touch-icon-76x76.png", 76).opaque(0.9),
    Icon::png("apple-touch-icon-114x114.png", 114).opaque(0.9),
    Icon::png("apple-touch-icon-120x120.png", 120).opaque(0.9),
    Icon::png("apple-touch-icon-144x144.png", 144).opaque(0.9),
    Icon::png("apple-touch-icon-152x152.png", 152).opaque(0.9),
    Icon::png("apple-touch-icon-167x167.png", 167).opaque(0.9),
    Icon::png("apple-touch-icon-180x180.png", 180).opaque(0.9),
    Icon::png("apple-touch-icon.png", 180).opaque(0.9),
    Icon::png("apple-touch-icon-precomposed.png", 180).opaque(0.9),
];

const APPLE_STARTUP: &[Icon] = &[
    Icon::startup("apple-touch-startup-image-640x1136.png", 640, 1136, 2),
    Icon::startup("apple-touch-startup-image-750x1334.png", 750, 1334, 2),
    Icon::startup("apple-touch-startup-image-828x1792.png", 828, 1792, 2),
    Icon::startup("apple-touch-startup-image-1125x2436.png", 1125, 2436, 3),
    Icon::startup("apple-touch-startup-image-1242x2208.png", 1242, 2208, 3),
    Icon::startup("apple-touch-startup-image-1242x2688.png", 1242, 2688, 3),
    Icon::startup("apple-touch-startup-image-1536x2048.png", 1536, 2048, 2),
    Icon::startup("apple-touch-startup-image-1668x2224.png", 1668, 2224, 2),
    Icon::startup("apple-touch-startup-image-1668x2388.png", 1668, 2388, 2),
    Icon::startup("apple-touch-startup-image-2048x2732.png", 2048, 2732, 2),
];

const COAST: &[Icon] = &[Icon::png("coast-228x228.png", 228).opaque(0.7)];

const FAVICONS: &[Icon] = &[
    Icon::png("favicon-16x16.png", 16),
    Icon::png("favicon-32x32.png", 32),
    Icon::png("favicon-48x48.png", 48),
    Icon {
        name: "favicon.ico",
        width: 48,
        height: 48,
        encoding: Encoding::Ico(&[16, 24, 32, 48]),
        opaque: false,
        scale: 1.0,
        ratio: 1,
    },
];

const FIREFOX: &[Icon] = &[
    Icon::png("firefox_app_60x60.png", 60),
    Icon::png("firefox_app_128x128.png", 128),
    Icon::png("firefox_app_512x512.png", 512),
];

const WINDOWS: &[Icon] = &[
    Icon::tile("mstile-70x70.png", 70, 70),
    Icon::tile("mstile-144x144.png", 144, 144),
    Icon::tile("mstile-150x150.png", 150, 150),
    Icon::tile("mstile-310x150.png", 310, 150),
    Icon::tile("mstile-310x310.png", 310, 310),
];

const YANDEX: &[Icon] = &[Icon::png("yandex-browser-50x50.png", 50)];

//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement,
//! so the watch loop can pick up `quire.toml` edits during `serve`.

use crate::config::SiteConfig;
use crate::utils::hash;
use anyhow::Result;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<SiteConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SiteConfig::default()));

/// Hash of the config file content currently loaded.
static CONFIG_HASH: AtomicU64 = AtomicU64::new(0);

#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    CONFIG.load_full()
}

/// Reload config from disk if its content changed.
///
/// Returns `Ok(true)` if config was updated, `Ok(false)` if unchanged.
/// On error the previous config stays in place.
pub fn reload_config() -> Result<bool> {
    let current = cfg();
    let content = std::fs::read_to_string(&current.config_path)?;
    let new_hash = hash::compute(content.as_bytes());

    if new_hash == CONFIG_HASH.load(Ordering::Relaxed) {
        return Ok(false);
    }

    let mut next = SiteConfig::from_str(&content)?;
    next.config_path = current.config_path.clone();
    next.finalize(&current.root);
    // Sockets are already bound; keep the running server settings.
    next.serve = current.serve.clone();
    next.validate()?;

    CONFIG.store(Arc::new(next));
    CONFIG_HASH.store(new_hash, Ordering::Relaxed);
    Ok(true)
}

#[inline]
pub fn init_config(config: SiteConfig) -> Arc<SiteConfig> {
    if let Ok(content) = std::fs::read_to_string(&config.config_path) {
        CONFIG_HASH.store(hash::compute(content.as_bytes()), Ordering::Relaxed);
    }

    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

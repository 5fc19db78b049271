//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from the proxy, the watcher and the
//! supervisor threads.

use crate::config::DevConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<DevConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(DevConfig::default()));

#[inline]
pub fn cfg() -> Arc<DevConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: DevConfig) -> Arc<DevConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

//! Configuration section definitions for `ego.toml`.

mod app;
mod serve;
mod toolchain;
mod watch;

pub use app::AppConfig;
pub use serve::ServeConfig;
pub use toolchain::BuildConfig;
pub use watch::WatchConfig;

//! Utility modules shared by the supervisor, proxy and diagnostics.

pub mod exec;
pub mod html;
pub mod path;

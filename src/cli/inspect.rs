//! `ego inspect`: print the discovered actions as JSON.

use std::io::Write;

use anyhow::{Context, Result};

use crate::{config::DevConfig, inspector};

pub fn inspect(config: &DevConfig, pretty: bool) -> Result<()> {
    let layout = config.layout();
    let actions = inspector::inspect(&layout.controllers)?;

    let json = if pretty {
        serde_json::to_string_pretty(&actions)
    } else {
        serde_json::to_string(&actions)
    }
    .context("Failed to serialize actions")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

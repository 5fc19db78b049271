//! `ego build`: generate and compile once.

use anyhow::Result;

use crate::{
    config::DevConfig,
    logger,
    supervisor::{CycleOutcome, Supervisor},
    utils::path::display_relative,
};

pub fn build(config: &DevConfig) -> Result<()> {
    let supervisor = Supervisor::from_config(config);
    let layout = &supervisor.settings().layout;

    match supervisor.build_once() {
        CycleOutcome::Built => {
            logger::status_success(&format!(
                "built {}",
                display_relative(&layout.binary, &layout.root)
            ));
            Ok(())
        }
        CycleOutcome::Failed(failure) => {
            logger::status_error("build failed", &failure.to_string());
            crate::core::request_shutdown(1);
            Ok(())
        }
        CycleOutcome::Fatal(err) => Err(err.into()),
    }
}

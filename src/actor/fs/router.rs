use std::path::PathBuf;

use super::types::ClassifiedEvents;
use crate::actor::messages::SupervisorMsg;

pub(super) fn log_events(events: &ClassifiedEvents) {
    for (path, kind) in &events.restart {
        crate::debug!("watch"; "{}: {}", kind.label(), path.display());
    }
    for (path, kind) in &events.log_only {
        crate::log!("watch"; "{} {} (no restart)", kind.label(), path.display());
    }
}

/// One restart for the whole batch, or nothing when only log-only paths
/// changed.
pub(super) fn events_to_message(events: ClassifiedEvents) -> Option<SupervisorMsg> {
    if events.restart.is_empty() {
        return None;
    }
    let changed: Vec<PathBuf> = events.restart.into_iter().map(|(p, _)| p).collect();
    Some(SupervisorMsg::Restart { changed })
}

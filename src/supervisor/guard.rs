//! Panic containment for cycle steps.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use crate::diagnostic::FailureInfo;

/// Run `f`, turning a panic into a [`FailureInfo`] carrying its message.
pub fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, FailureInfo> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| FailureInfo::classify(&panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

//! In-memory render-status tracker.
//!
//! The render pipeline is fire-and-forget from the HTTP caller's
//! perspective, so this tracker is the sanctioned way to find out whether a
//! detached render landed. State lives only for the process lifetime;
//! documents rendered by an earlier process are resolved by checking the
//! directory instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum RenderStatus {
    Pending,
    Completed,
    Failed { error: String },
}

#[derive(Debug, Clone, Default)]
pub struct RenderTracker {
    inner: Arc<Mutex<HashMap<String, RenderStatus>>>,
}

impl RenderTracker {
    pub fn mark_pending(&self, filename: &str) {
        self.insert(filename, RenderStatus::Pending);
    }

    pub fn mark_completed(&self, filename: &str) {
        self.insert(filename, RenderStatus::Completed);
    }

    pub fn mark_failed(&self, filename: &str, error: String) {
        self.insert(filename, RenderStatus::Failed { error });
    }

    pub fn get(&self, filename: &str) -> Option<RenderStatus> {
        self.inner
            .lock()
            .expect("render tracker lock poisoned")
            .get(filename)
            .cloned()
    }

    fn insert(&self, filename: &str, status: RenderStatus) {
        self.inner
            .lock()
            .expect("render tracker lock poisoned")
            .insert(filename.to_string(), status);
    }
}

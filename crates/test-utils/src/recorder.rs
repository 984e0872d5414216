use std::sync::{Arc, Mutex};

use idlesched::queue::Work;

/// Shared, ordered log of what ran.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// A work unit that records `name` when it runs.
    pub fn task(&self, name: &str) -> Work {
        let log = self.clone();
        let name = name.to_string();
        Box::new(move || -> anyhow::Result<()> {
            log.push(name);
            Ok(())
        })
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

use std::cell::RefCell;

use anyhow::Result;

use crate::store::ProgressStore;
use crate::store::schema::ProgressData;

/// Progress kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RefCell<ProgressData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ProgressData {
        self.data.borrow().clone()
    }
}

impl ProgressStore for MemoryStore {
    fn load_progress(&self) -> ProgressData {
        self.data.borrow().clone()
    }

    fn save_progress(&self, data: &ProgressData) -> Result<()> {
        *self.data.borrow_mut() = data.clone();
        Ok(())
    }
}

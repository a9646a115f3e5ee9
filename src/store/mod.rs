pub mod json_store;
pub mod memory;
pub mod schema;

use std::rc::Rc;

use anyhow::Result;

use crate::store::schema::ProgressData;

/// Durable home of per-lesson progress.
pub trait ProgressStore {
    /// Read the full progress mapping; empty when nothing was saved yet.
    fn load_progress(&self) -> ProgressData;

    /// Replace the stored mapping with `data`.
    fn save_progress(&self, data: &ProgressData) -> Result<()>;
}

impl<S: ProgressStore + ?Sized> ProgressStore for Rc<S> {
    fn load_progress(&self) -> ProgressData {
        (**self).load_progress()
    }

    fn save_progress(&self, data: &ProgressData) -> Result<()> {
        (**self).save_progress(data)
    }
}

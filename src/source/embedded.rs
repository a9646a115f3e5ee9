use rust_embed::Embed;

use crate::quiz::category::Category;
use crate::source::{DataLoadError, ProblemSource};

#[derive(Embed)]
#[folder = "data/"]
struct ProblemAssets;

/// Problem data bundled into the binary from `data/`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedSource;

impl ProblemSource for EmbeddedSource {
    fn fetch_category(&self, category: Category) -> Result<Option<Vec<u8>>, DataLoadError> {
        Ok(ProblemAssets::get(category.file_name()).map(|file| file.data.into_owned()))
    }
}

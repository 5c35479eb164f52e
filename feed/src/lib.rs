pub mod pagination;
pub mod store;

pub use pagination::*;
pub use store::*;

use codefeed_core::FeedConfig;

/// Everything the feed view owns: the loaded posts with their drafts and the
/// infinite-scroll state.
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub store: FeedStore,
    pub scroll: ScrollController,
}

impl FeedPage {
    pub fn new(page_size: usize) -> Self {
        Self {
            store: FeedStore::new(),
            scroll: ScrollController::new(page_size),
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.page_size)
    }
}

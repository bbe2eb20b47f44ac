pub mod mock;
pub mod news;

use async_trait::async_trait;

use crate::error::Result;
use crate::news::Article;

pub use mock::StaticSource;
pub use news::RssSource;

/// Upstream provider normalising its raw items into [`Article`]s.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Article>>;
}

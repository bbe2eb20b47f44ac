pub mod model;
pub mod search;
pub mod service;

pub use model::{Article, Category, title_contains_ticker};
pub use search::{relevance_score, search};
pub use service::{NewsService, Snapshot, hot_of, pick_featured};

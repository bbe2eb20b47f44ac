pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod news;
pub mod server;
pub mod ui;

pub use error::{NewsError, Result};

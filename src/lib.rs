pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;
pub mod submission;
pub mod upload;

#[cfg(feature = "tui")]
pub mod tui;

pub use error::{LostFoundError, Result};

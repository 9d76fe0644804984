pub mod cache;
pub mod config;
pub mod error;
pub mod lastfm;
pub mod models;
pub mod rate_limit;

// Re-export commonly used items
pub use cache::Resolver;
pub use cache::storage::{DocumentStore, FileStore, MemoryStore};
pub use cache::types::{Document, DocumentBody, Lookup, StoreKey};
pub use config::Config;
pub use error::{Error, Result};
pub use lastfm::{LastfmApi, LastfmClient};
pub use rate_limit::RateLimiter;

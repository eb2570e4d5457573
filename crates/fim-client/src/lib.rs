// Async access to the league API: HTTP client, response cache, request
// supersession, retry, EPA lookups and polling.

pub mod api;
pub mod cache;
pub mod epa;
pub mod memory;
pub mod poll;
pub mod retry;
pub mod supersession;

pub use api::{ApiClient, ApiError, DataSource};
pub use cache::{CachePolicy, Lookup, QueryCache, QueryKey};
pub use epa::lookup_epa;
pub use memory::{MemoryData, MemorySource};
pub use poll::spawn_poller;
pub use retry::{retry_fixed, RetryPolicy};
pub use supersession::Supersession;

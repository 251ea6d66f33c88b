//! Repository 実装
//!
//! - `inmemory`: HashMap を使ったインメモリ実装
//! - 将来的に: MongoDB などの永続ストア

pub mod inmemory;

pub use inmemory::{InMemoryIncidentGateway, InMemoryPresenceStore};

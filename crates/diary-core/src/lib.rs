//! diary/crates/diary-core/src/lib.rs
//!
//! The domain model and storage contract shared by the diary server and client.

pub mod models;
pub mod traits;
pub mod error;
pub mod store;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;
pub use store::*;

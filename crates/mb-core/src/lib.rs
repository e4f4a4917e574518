//! message-board/crates/mb-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the message board.

pub mod models;
pub mod traits;
pub mod error;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;

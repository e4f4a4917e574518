//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Message, VoteDirection, VoteTally};

/// Persistence contract for the message collection.
///
/// Implementations own the exclusive scope around each
/// load-mutate-save cycle.
#[async_trait]
pub trait MessageRepo: Send + Sync {
    /// All messages in insertion order.
    async fn list_messages(&self) -> Result<Vec<Message>>;

    async fn append_message(&self, message: Message) -> Result<()>;

    /// Fails with `AppError::NotFound` when no message has `id`.
    async fn cast_vote(&self, id: &str, direction: VoteDirection) -> Result<VoteTally>;
}

/// Issues identity tokens for clients that arrive without one.
pub trait IdentityProvider: Send + Sync {
    fn issue_token(&self) -> Result<String>;
}

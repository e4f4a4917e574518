//! # Domain Models
//!
//! The board has a single entity, the `Message`, kept in one flat,
//! insertion-ordered collection. Message IDs are UUID v7 in simple form.

use std::fmt;
use std::str::FromStr;

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Timestamp layout used in storage and on the page.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single post on the board.
///
/// Everything except the two vote counters is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    /// Identity token of the posting client
    pub user: String,
    /// Best-effort client address at post time
    pub ip: String,
    /// Local creation time, formatted with [`TIME_FORMAT`]
    pub time: String,
    /// Raw, unrendered text
    pub text: String,
    pub upvotes: u64,
    pub downvotes: u64,
}

impl Message {
    /// Builds a fresh message, rejecting blank text.
    pub fn compose(user: &str, ip: &str, text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(AppError::ValidationRejected("message is blank".into()));
        }

        Ok(Self {
            id: Uuid::now_v7().simple().to_string(),
            user: user.to_string(),
            ip: ip.to_string(),
            time: Local::now().format(TIME_FORMAT).to_string(),
            text: text.to_string(),
            upvotes: 0,
            downvotes: 0,
        })
    }

    pub fn tally(&self) -> VoteTally {
        VoteTally {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }

    /// Bumps the counter for `direction` and returns the new pair.
    pub fn apply_vote(&mut self, direction: VoteDirection) -> VoteTally {
        match direction {
            VoteDirection::Up => self.upvotes = self.upvotes.saturating_add(1),
            VoteDirection::Down => self.downvotes = self.downvotes.saturating_add(1),
        }
        self.tally()
    }

    /// Case-insensitive substring match. `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle)
    }
}

/// Which counter a vote goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl FromStr for VoteDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(AppError::ValidationRejected(format!(
                "unknown vote direction '{other}'"
            ))),
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Counter pair returned after a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTally {
    pub upvotes: u64,
    pub downvotes: u64,
}

/// Keeps the messages whose text contains `term`, ignoring case.
pub fn filter_messages(messages: Vec<Message>, term: &str) -> Vec<Message> {
    let needle = term.to_lowercase();
    messages.into_iter().filter(|m| m.matches(&needle)).collect()
}

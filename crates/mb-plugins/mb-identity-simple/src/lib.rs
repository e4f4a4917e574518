//! # mb-identity-simple
//!
//! OS-randomness implementation of `IdentityProvider`.
//! Tokens are unsigned and only used to attribute posts on the page; nothing
//! is remembered server-side, so uniqueness is probabilistic.

use mb_core::error::{AppError, Result};
use mb_core::traits::IdentityProvider;

/// 32 bits, rendered as 8 uppercase hex characters.
const TOKEN_BYTES: usize = 4;

#[derive(Debug, Default)]
pub struct SimpleIdentityProvider;

impl SimpleIdentityProvider {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityProvider for SimpleIdentityProvider {
    /// Generates a token such as `9F03A7C1`.
    fn issue_token(&self) -> Result<String> {
        let mut bytes = [0u8; TOKEN_BYTES];
        getrandom::getrandom(&mut bytes)
            .map_err(|e| AppError::Internal(format!("OS randomness unavailable: {e}")))?;
        Ok(hex::encode_upper(bytes))
    }
}

//! # Client identity
//!
//! Reads or issues the `user_id` cookie and works out the caller's address.
//! The cookie value is trusted verbatim; it only attributes posts.

use actix_web::cookie::{time::Duration, Cookie};
use actix_web::{HttpRequest, HttpResponseBuilder};
use mb_core::error::Result;
use mb_core::traits::IdentityProvider;

pub const IDENTITY_COOKIE: &str = "user_id";

const COOKIE_LIFETIME_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub token: String,
    /// True when the token was minted for this request and still has to be
    /// sent back as a cookie.
    pub issued: bool,
}

impl ClientIdentity {
    pub fn resolve(req: &HttpRequest, provider: &dyn IdentityProvider) -> Result<Self> {
        if let Some(cookie) = req.cookie(IDENTITY_COOKIE) {
            return Ok(Self {
                token: cookie.value().to_string(),
                issued: false,
            });
        }

        let token = provider.issue_token()?;
        log::debug!("Issued identity {token}");
        Ok(Self {
            token,
            issued: true,
        })
    }

    /// Adds the identity cookie to `builder` if it was just issued.
    pub fn attach(&self, builder: &mut HttpResponseBuilder) {
        if self.issued {
            builder.cookie(
                Cookie::build(IDENTITY_COOKIE, self.token.clone())
                    .path("/")
                    .max_age(Duration::days(COOKIE_LIFETIME_DAYS))
                    .finish(),
            );
        }
    }
}

/// Best-effort caller address: `Client-IP`, then `X-Forwarded-For`, then the
/// socket peer. Only the first comma-separated entry is kept.
pub fn client_ip(req: &HttpRequest) -> String {
    let headers = req.headers();
    let forwarded = ["client-ip", "x-forwarded-for"]
        .iter()
        .find_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()));

    let raw = match forwarded {
        Some(value) => value.to_string(),
        None => match req.peer_addr() {
            Some(addr) => addr.ip().to_string(),
            None => return "unknown".to_string(),
        },
    };

    raw.split(',').next().unwrap_or_default().trim().to_string()
}

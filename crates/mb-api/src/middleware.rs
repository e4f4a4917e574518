//! message-board/crates/mb-api/src/middleware.rs Middleware
//!
//! Custom middleware for security and logging.

use actix_web::middleware::{DefaultHeaders, Logger};

// Returns the request logger for the board.
pub fn standard_middleware() -> Logger {
    // We use the 'default' logger which outputs:
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

// Security headers added to every response. No CSP: the page relies on
// inline script and style.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
        .add(("X-Frame-Options", "DENY"))
}

//! Cart session cookie middleware.
//!
//! Assigns every visitor a session id carried in the `bistro_cart` cookie.
//! The id keys the in-memory cart session store; it identifies a cart, not a
//! user, and carries no other data. If the incoming request has no cookie
//! (or an unparseable one), a new id is generated and set on the response.

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// The cart session cookie name.
pub const SESSION_COOKIE: &str = "bistro_cart";

/// A visitor's cart session id, available to handlers as an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CartSessionId(pub Uuid);

/// Middleware that ensures every request has a cart session id.
pub async fn cart_session(mut request: Request, next: Next) -> Response {
    let existing = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_session_cookie);

    let (id, is_new) = match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    };

    request.extensions_mut().insert(CartSessionId(id));

    let mut response = next.run(request).await;

    if is_new {
        // Uuid's hyphenated form is plain ASCII, so the header value is valid
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Pull the session id out of a `Cookie` header value.
fn parse_session_cookie(header: &str) -> Option<Uuid> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .and_then(|value| Uuid::parse_str(value).ok())
}

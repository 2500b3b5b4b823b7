//! Le porteur de session: un cookie `access_token` HttpOnly qui survit
//! entre deux requêtes. Les handlers le lisent en entrée et renvoient
//! la nouvelle valeur via Set-Cookie; rien d'autre ne le mute.

use crate::error::AppError;
use axum::http::{HeaderMap, HeaderValue, header};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Extrait l'access token du header Cookie, s'il est présent.
pub fn read_access_token(headers: &HeaderMap) -> Option<String> {
    let raw_cookie = headers.get(header::COOKIE)?.to_str().ok()?;

    raw_cookie.split(';').find_map(|kv| {
        let mut it = kv.trim().splitn(2, '=');
        match (it.next(), it.next()) {
            (Some(ACCESS_TOKEN_COOKIE), Some(v)) if !v.trim().is_empty() => {
                Some(v.trim().to_string())
            }
            _ => None,
        }
    })
}

/// Headers remplaçant la valeur stockée en session par `token`.
pub fn store_access_token(token: &str) -> Result<HeaderMap, AppError> {
    let cookie_val =
        format!("{ACCESS_TOKEN_COOKIE}={token}; HttpOnly; Secure; SameSite=Strict; Path=/");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie_val)
            .map_err(|_| AppError::internal("Failed to build session cookie"))?,
    );
    Ok(headers)
}

/// Headers effaçant la valeur stockée en session.
pub fn clear_access_token() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static(
            "access_token=; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age=0",
        ),
    );
    headers
}

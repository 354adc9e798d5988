use chrono::{DateTime, Utc};
use headers::{Cookie, HeaderMapExt};
use http::header::{HeaderMap, SET_COOKIE};

use crate::errors::SessionError;

pub(super) fn header_set_cookie<'a>(
    headers: &'a mut HeaderMap,
    name: &str,
    value: &str,
    expires_at: DateTime<Utc>,
    max_age: i64,
    http_only: bool,
) -> Result<&'a HeaderMap, SessionError> {
    let http_only_attr = if http_only { " HttpOnly;" } else { "" };
    let expires = expires_at.format("%a, %d %b %Y %H:%M:%S GMT");
    let cookie = format!(
        "{name}={value}; SameSite=Strict; Secure;{http_only_attr} Path=/; Max-Age={max_age}; Expires={expires}"
    );
    tracing::trace!("Set-Cookie: {name}=..; HttpOnly={http_only}");

    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| SessionError::System("Failed to parse cookie".to_string()))?,
    );
    Ok(headers)
}

/// Value of the named cookie, treating an empty value as absent.
pub(super) fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.typed_get::<Cookie>()?;
    cookies
        .get(name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(super) fn get_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

use http::HeaderMap;
use token_session::{SessionConfig, TokenPair};

use crate::error::SessionRejection;

/// `Set-Cookie` headers for a freshly minted or rotated pair.
///
/// `None` yields an empty map, so a handler can always attach the result
/// of [`token_session::VerifiedSession::rotated`].
pub fn session_cookie_headers(
    pair: Option<&TokenPair>,
    config: &SessionConfig,
) -> Result<HeaderMap, SessionRejection> {
    match pair {
        Some(pair) => Ok(pair.to_headers(config)?),
        None => Ok(HeaderMap::new()),
    }
}

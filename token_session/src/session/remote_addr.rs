use std::net::IpAddr;

use http::HeaderMap;

use crate::errors::SessionError;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// First `x-forwarded-for` entry that parses as an IP address.
pub fn remote_addr_from_headers(headers: &HeaderMap) -> Result<String, SessionError> {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    forwarded
        .split(',')
        .map(str::trim)
        .find(|item| item.parse::<IpAddr>().is_ok())
        .map(str::to_string)
        .ok_or_else(|| {
            tracing::debug!("No usable address in x-forwarded-for: {forwarded:?}");
            SessionError::BadRequest("can not fetch client ip".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::headers_with_forwarded_for;

    #[test]
    fn test_first_valid_entry_wins() {
        let headers = headers_with_forwarded_for("203.0.113.7, 10.0.0.1");
        assert_eq!(remote_addr_from_headers(&headers).unwrap(), "203.0.113.7");
    }

    #[test]
    fn test_skips_unparsable_entries() {
        let headers = headers_with_forwarded_for("unknown, 2001:db8::1, 10.0.0.1");
        assert_eq!(remote_addr_from_headers(&headers).unwrap(), "2001:db8::1");
    }

    #[test]
    fn test_no_valid_entry() {
        let headers = headers_with_forwarded_for("unknown, garbage");
        assert!(matches!(
            remote_addr_from_headers(&headers),
            Err(SessionError::BadRequest(_))
        ));
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            remote_addr_from_headers(&HeaderMap::new()),
            Err(SessionError::BadRequest(_))
        ));
    }
}

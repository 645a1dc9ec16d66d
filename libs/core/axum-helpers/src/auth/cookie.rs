//! Session cookie helpers.

use axum::http::{HeaderMap, HeaderValue, header};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_token";

/// `Set-Cookie` value for a freshly issued session.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure = if secure { " Secure;" } else { "" };
    format!("{SESSION_COOKIE}={token}; HttpOnly;{secure} SameSite=Strict; Path=/; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Pulls the session token from `Authorization: Bearer` or the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| {
            headers
                .get_all(header::COOKIE)
                .iter()
                .filter_map(|v: &HeaderValue| v.to_str().ok())
                .flat_map(|cookies| cookies.split(';'))
                .find_map(|pair| {
                    let (name, value) = pair.trim().split_once('=')?;
                    (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
                })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", 60, true);
        assert!(cookie.starts_with("session_token=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=60"));

        assert!(!session_cookie("abc", 60, false).contains("Secure"));
        assert!(clear_session_cookie(false).contains("Max-Age=0"));
    }

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session_token=from-cookie"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_token_read_from_cookie_list() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session_token=tok; lang=en"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("tok"));
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_token="));
        assert_eq!(token_from_headers(&headers), None);
    }
}

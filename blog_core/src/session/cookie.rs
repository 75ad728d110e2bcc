use std::fmt;

use chrono::{DateTime, Utc};
use http::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};

use crate::config::{COOKIE_SECURE, CSRF_COOKIE_NAME, SESSION_COOKIE_NAME, SESSION_MAX_AGE};
use crate::session::errors::SessionError;
use crate::session::token::session_ttl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
        }
    }
}

/// Cookie names and flags shared by every cookie the auth gate sets.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub session_name: String,
    pub csrf_name: String,
    pub max_age: u64,
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieSettings {
    pub fn from_env() -> Self {
        Self {
            session_name: SESSION_COOKIE_NAME.to_string(),
            csrf_name: CSRF_COOKIE_NAME.to_string(),
            max_age: *SESSION_MAX_AGE,
            secure: *COOKIE_SECURE,
            same_site: SameSite::Lax,
        }
    }
}

/// Attributes of a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub max_age: i64,
    pub expires: DateTime<Utc>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl SessionCookie {
    /// Cookie carrying a freshly issued session token.
    pub fn session(settings: &CookieSettings, token: &str) -> Self {
        Self::live(settings, &settings.session_name, token, true)
    }

    /// Script-readable cookie carrying the CSRF token for the session.
    pub fn csrf(settings: &CookieSettings, csrf_token: &str) -> Self {
        Self::live(settings, &settings.csrf_name, csrf_token, false)
    }

    /// Already-expired session cookie; browsers discard it immediately.
    pub fn clear(settings: &CookieSettings) -> Self {
        Self::expired(settings, &settings.session_name, true)
    }

    pub fn clear_csrf(settings: &CookieSettings) -> Self {
        Self::expired(settings, &settings.csrf_name, false)
    }

    fn live(settings: &CookieSettings, name: &str, value: &str, http_only: bool) -> Self {
        let ttl = session_ttl(settings.max_age);
        Self {
            name: name.to_string(),
            value: value.to_string(),
            max_age: ttl.num_seconds(),
            expires: Utc::now()
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            http_only,
            secure: settings.secure,
            same_site: settings.same_site,
            path: "/".to_string(),
        }
    }

    fn expired(settings: &CookieSettings, name: &str, http_only: bool) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            max_age: 0,
            expires: DateTime::<Utc>::UNIX_EPOCH,
            http_only,
            secure: settings.secure,
            same_site: settings.same_site,
            path: "/".to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.max_age <= 0 || self.expires <= Utc::now()
    }

    pub fn to_header_value(&self) -> Result<HeaderValue, SessionError> {
        self.to_string()
            .parse()
            .map_err(|_| SessionError::Cookie("Failed to build cookie header".to_string()))
    }

    /// Append this cookie as a `Set-Cookie` header.
    pub fn append_to(&self, headers: &mut HeaderMap) -> Result<(), SessionError> {
        headers.append(SET_COOKIE, self.to_header_value()?);
        Ok(())
    }
}

impl fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Path={}; Max-Age={}; Expires={}; SameSite={}",
            self.name,
            self.value,
            self.path,
            self.max_age,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.same_site
        )?;
        if self.http_only {
            write!(f, "; HttpOnly")?;
        }
        if self.secure {
            write!(f, "; Secure")?;
        }
        Ok(())
    }
}

/// Find the value of cookie `name` in the request's `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, SessionError> {
    for cookie_header in headers.get_all(COOKIE) {
        let cookie_str = cookie_header.to_str().map_err(|e| {
            tracing::error!("Invalid cookie header: {}", e);
            SessionError::HeaderError("Invalid cookie header".to_string())
        })?;

        let found = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
            let mut parts = s.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(k), Some(v)) if k == name => Some(v),
                _ => None,
            }
        });

        if found.is_some() {
            return Ok(found);
        }
    }

    tracing::debug!("No cookie '{}' found in request", name);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_SESSION_AGE_SECS;

    fn settings(secure: bool) -> CookieSettings {
        CookieSettings {
            session_name: "admin_session".to_string(),
            csrf_name: "csrf_token".to_string(),
            max_age: 3600,
            secure,
            same_site: SameSite::Lax,
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = SessionCookie::session(&settings(true), "tok");
        assert_eq!(cookie.name, "admin_session");
        assert_eq!(cookie.value, "tok");
        assert_eq!(cookie.max_age, 3600);
        assert!(cookie.http_only);
        assert!(cookie.secure);
        assert_eq!(cookie.path, "/");
        assert!(!cookie.is_expired());

        let header = cookie.to_string();
        assert!(header.starts_with("admin_session=tok; Path=/; Max-Age=3600; Expires="));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.ends_with("; HttpOnly; Secure"));
    }

    #[test]
    fn test_oversized_max_age_is_capped() {
        let settings = CookieSettings {
            max_age: u64::MAX,
            ..settings(true)
        };
        let cookie = SessionCookie::session(&settings, "tok");
        assert_eq!(cookie.max_age, MAX_SESSION_AGE_SECS as i64);
        assert!(!cookie.is_expired());
    }

    #[test]
    fn test_insecure_in_development() {
        let header = SessionCookie::session(&settings(false), "tok").to_string();
        assert!(!header.contains("Secure"));
        assert!(header.contains("HttpOnly"));
    }

    #[test]
    fn test_csrf_cookie_is_script_readable() {
        let cookie = SessionCookie::csrf(&settings(false), "csrf");
        assert_eq!(cookie.name, "csrf_token");
        assert!(!cookie.http_only);
        assert!(!cookie.to_string().contains("HttpOnly"));
    }

    #[test]
    fn test_clear_cookie_is_expired() {
        let cookie = SessionCookie::clear(&settings(true));
        assert_eq!(cookie.value, "");
        assert_eq!(cookie.max_age, 0);
        assert!(cookie.is_expired());
        assert_eq!(
            cookie.to_string(),
            "admin_session=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; SameSite=Lax; HttpOnly; Secure"
        );
        assert_eq!(cookie, SessionCookie::clear(&settings(true)));
    }

    #[test]
    fn test_append_to_headers() {
        let mut headers = HeaderMap::new();
        let settings = settings(false);
        SessionCookie::session(&settings, "a").append_to(&mut headers).unwrap();
        SessionCookie::csrf(&settings, "b").append_to(&mut headers).unwrap();
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn test_cookie_value_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; admin_session=abc.def=; other=1"),
        );
        assert_eq!(
            cookie_value(&headers, "admin_session").unwrap(),
            Some("abc.def=")
        );
        assert_eq!(cookie_value(&headers, "missing").unwrap(), None);
    }

    #[test]
    fn test_cookie_value_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("admin_session=xyz"));
        assert_eq!(cookie_value(&headers, "admin_session").unwrap(), Some("xyz"));
    }

    #[test]
    fn test_cookie_value_without_header() {
        assert_eq!(cookie_value(&HeaderMap::new(), "admin_session").unwrap(), None);
    }

    #[test]
    fn test_cookie_value_does_not_match_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("admin_session_old=1"));
        assert_eq!(cookie_value(&headers, "admin_session").unwrap(), None);
    }
}

// Cookie plumbing for the auth flows.
//
// Three cookies are involved: the host's session cookie, the short-lived
// flow cookie written between the outgoing redirect and the provider
// callback, and the one-shot flash cookie the host renders and clears.

use axum::http::HeaderMap;

/// The host's session cookie.
pub const SESSION_COOKIE: &str = "minni.sid";
/// Flow state between the outgoing redirect and the callback.
pub const FLOW_COOKIE: &str = "minni.flow";
/// One-shot flash message for the host to render.
pub const FLASH_COOKIE: &str = "minni.flash";

/// How long a flow cookie stays valid, in seconds.
const FLOW_MAX_AGE: i64 = 600;

/// Read a cookie value from the request headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// A Set-Cookie header under construction.
#[derive(Debug, Clone)]
pub struct SetCookie {
    name: &'static str,
    value: String,
    max_age: Option<i64>,
}

impl SetCookie {
    /// Record flow state for the upcoming callback.
    pub fn flow(value: String) -> Self {
        Self {
            name: FLOW_COOKIE,
            value,
            max_age: Some(FLOW_MAX_AGE),
        }
    }

    /// Drop the flow cookie once the callback has consumed it.
    pub fn clear_flow() -> Self {
        Self {
            name: FLOW_COOKIE,
            value: String::new(),
            max_age: Some(0),
        }
    }

    /// Establish the host session cookie.
    pub fn session(token: String) -> Self {
        Self {
            name: SESSION_COOKIE,
            value: token,
            max_age: None,
        }
    }

    /// Leave a one-shot flash message.
    pub fn flash(value: String) -> Self {
        Self {
            name: FLASH_COOKIE,
            value,
            max_age: None,
        }
    }

    /// Render the Set-Cookie header value.
    ///
    /// Values are url-encoded; all cookies are HttpOnly, Path=/ and
    /// SameSite=Lax so they survive the provider's cross-site redirect.
    pub fn header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.name,
            urlencoding::encode(&self.value),
        );
        if let Some(max_age) = self.max_age {
            header.push_str(&format!("; Max-Age={max_age}"));
        }
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn read_cookie_picks_the_right_pair() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "a=1; minni.sid=tok-42; b=2".parse().unwrap());

        assert_eq!(
            read_cookie(&headers, SESSION_COOKIE).as_deref(),
            Some("tok-42")
        );
        assert!(read_cookie(&headers, FLOW_COOKIE).is_none());
    }

    #[test]
    fn read_cookie_without_header_is_none() {
        let headers = HeaderMap::new();
        assert!(read_cookie(&headers, SESSION_COOKIE).is_none());
    }

    #[test]
    fn flow_cookie_sets_max_age_and_flags() {
        let header = SetCookie::flow("abc".into()).header_value();
        assert!(header.starts_with("minni.flow=abc; "));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Max-Age=600"));
    }

    #[test]
    fn clear_flow_expires_immediately() {
        let header = SetCookie::clear_flow().header_value();
        assert!(header.contains("Max-Age=0"));
    }

    #[test]
    fn values_are_url_encoded() {
        let header = SetCookie::flash("a b;c".into()).header_value();
        assert!(header.starts_with("minni.flash=a%20b%3Bc"));
    }
}

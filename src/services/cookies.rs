use tracing::debug;

/// Where the raw `document.cookie` string comes from.
pub trait CookieSource {
    fn raw_cookies(&self) -> Option<String>;
}

/// Look up `name` in a `document.cookie` style string (`a=1; b=2`) and
/// percent-decode its value. The first matching pair wins.
pub fn read_cookie(raw: &str, name: &str) -> Option<String> {
    if raw.is_empty() || name.is_empty() {
        return None;
    }

    let value = raw
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))?;

    match urlencoding::decode(value) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(err) => {
            debug!(cookie = %name, error = %err, "Cookie value is not valid UTF-8 after decoding");
            None
        }
    }
}

/// Fixed cookie string, for pages rendered without a browser document.
#[derive(Debug, Clone, Default)]
pub struct StaticCookies(pub Option<String>);

impl CookieSource for StaticCookies {
    fn raw_cookies(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_named_cookie() {
        let raw = "sessionid=abc; csrftoken=tok123; theme=dark";
        assert_eq!(read_cookie(raw, "csrftoken").as_deref(), Some("tok123"));
        assert_eq!(read_cookie(raw, "sessionid").as_deref(), Some("abc"));
    }

    #[test]
    fn test_prefix_names_do_not_match() {
        let raw = "csrftoken_old=stale; csrftoken=fresh";
        assert_eq!(read_cookie(raw, "csrftoken").as_deref(), Some("fresh"));
        assert_eq!(read_cookie("xcsrftoken=1", "csrftoken"), None);
    }

    #[test]
    fn test_value_is_percent_decoded() {
        assert_eq!(
            read_cookie("note=hello%20world%3B", "note").as_deref(),
            Some("hello world;")
        );
    }

    #[test]
    fn test_missing_or_empty() {
        assert_eq!(read_cookie("", "csrftoken"), None);
        assert_eq!(read_cookie("a=1", "csrftoken"), None);
        assert_eq!(read_cookie("csrftoken=", "csrftoken").as_deref(), Some(""));
    }
}

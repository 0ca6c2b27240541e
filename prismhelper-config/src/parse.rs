//! Parsing helpers for environment values.

use serde_json::Value;
use url::Url;

/// Parses a user supplied flag.
///
/// `true`, `1`, `yes` and `y` (any case) are true; everything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

/// Parses a flag supplied as JSON.
///
/// Strings follow [`parse_bool`] and the number `1` is true. Any other value,
/// including JSON `true`, is false.
pub fn parse_bool_value(value: &Value) -> bool {
    match value {
        Value::String(s) => parse_bool(s),
        Value::Number(n) => n.as_u64() == Some(1) || n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Returns true if `url` parses as an absolute http(s) URL.
pub fn is_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Normalises a base URL.
///
/// A trailing `/` is appended when missing. If the result is not a valid
/// http(s) URL, `default_url` is returned instead.
pub fn clean_url(url: &str, default_url: &str) -> String {
    let mut url = url.trim().to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    if is_url(&url) {
        url
    } else {
        default_url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DEFAULT: &str = "http://localhost:2342/";

    #[test]
    fn test_parse_bool_truthy() {
        for value in ["true", "TRUE", "1", "yes", "Yes", "y", "Y"] {
            assert!(parse_bool(value), "{value} should be true");
        }
    }

    #[test]
    fn test_parse_bool_falsy() {
        for value in ["0", "false", "no", "", "on", "2", "truthy"] {
            assert!(!parse_bool(value), "{value} should be false");
        }
    }

    #[test]
    fn test_parse_bool_value() {
        assert!(parse_bool_value(&json!(1)));
        assert!(parse_bool_value(&json!("yes")));
        assert!(!parse_bool_value(&json!(0)));
        assert!(!parse_bool_value(&json!(2)));
        assert!(!parse_bool_value(&json!(null)));
        assert!(!parse_bool_value(&json!(true)));
    }

    #[test]
    fn test_clean_url_appends_slash() {
        assert_eq!(clean_url("http://host", DEFAULT), "http://host/");
        assert_eq!(clean_url("https://photos.example.com/prism", DEFAULT), "https://photos.example.com/prism/");
    }

    #[test]
    fn test_clean_url_keeps_valid() {
        assert_eq!(clean_url("http://host:2342/", DEFAULT), "http://host:2342/");
    }

    #[test]
    fn test_clean_url_falls_back() {
        assert_eq!(clean_url("not-a-url", DEFAULT), DEFAULT);
        assert_eq!(clean_url("ftp://files.example.com", DEFAULT), DEFAULT);
        assert_eq!(clean_url("", DEFAULT), DEFAULT);
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("http://localhost/"));
        assert!(is_url("https://example.com/a/b"));
        assert!(!is_url("localhost:2342"));
        assert!(!is_url("mailto:me@example.com"));
    }
}

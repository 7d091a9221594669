//! Utility functions and helpers.

pub mod seeds;

use url::Url;

/// Extract the domain from a URL string.
///
/// The domain is the host plus the explicit port when one is present, so
/// `http://dev.example.com:8080/x` yields `dev.example.com:8080` while
/// `https://example.com/x` yields `example.com`. Two URLs share a domain
/// exactly when this value matches, regardless of path.
pub fn domain_of(url_str: &str) -> Option<String> {
    let parsed = Url::parse(url_str).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_of() {
        assert_eq!(
            domain_of("https://Example.COM/path"),
            Some("example.com".to_string())
        );
        assert_eq!(
            domain_of("http://sub.example.com/a/b?c=d"),
            Some("sub.example.com".to_string())
        );
    }

    #[test]
    fn test_domain_of_keeps_explicit_port() {
        assert_eq!(
            domain_of("http://127.0.0.1:8080/path"),
            Some("127.0.0.1:8080".to_string())
        );
        // Default port for the scheme is not part of the domain
        assert_eq!(
            domain_of("https://example.com:443/"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_domain_of_rejects_hostless_urls() {
        assert_eq!(domain_of("not a url"), None);
        assert_eq!(domain_of("mailto:someone@example.com"), None);
        assert_eq!(domain_of("javascript:void(0)"), None);
    }
}

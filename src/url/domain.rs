use url::Url;

/// Extracts the host from a URL
///
/// This returns the lowercase hostname without any port. If the URL has no
/// host (e.g. `mailto:`), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_scout::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `url` is on `base_host`
///
/// Only the hostname is compared; scheme and port are ignored, so
/// `http://a.com` and `https://a.com:8443` are the same site.
pub fn is_same_host(url: &Url, base_host: &str) -> bool {
    extract_host(url).is_some_and(|host| host == base_host)
}

use crate::UrlError;
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use url::{ParseError, Url};

/// Canonical dedup key for a page: `host[:port]/path` without a trailing slash
///
/// Scheme, query string and fragment are not part of the key, so
/// `http://a.com/x/`, `https://a.com/x?q=1` and `http://a.com/x#top` all map
/// to `a.com/x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key and returns the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedUrl {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Normalizes a URL string into its dedup key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or host-less
/// 2. Take the host (lowercased by the parser) plus any non-default port
/// 3. Append the path
/// 4. Strip one trailing slash
///
/// A scheme-less input such as an already-normalized key (`a.com/x`) is read
/// as `http://a.com/x`, which makes normalization idempotent.
///
/// # Examples
///
/// ```
/// use ripple_scout::url::normalize_url;
///
/// let key = normalize_url("https://Example.com/page/?q=1#top").unwrap();
/// assert_eq!(key.as_str(), "example.com/page");
/// assert_eq!(normalize_url(key.as_str()).unwrap(), key);
/// ```
pub fn normalize_url(url_str: &str) -> Result<NormalizedUrl, UrlError> {
    let url = parse_lenient(url_str)?;
    normalize_parsed(&url)
}

/// Normalizes an already-parsed URL
pub fn normalize_parsed(url: &Url) -> Result<NormalizedUrl, UrlError> {
    let host = url
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    let mut key = match url.port() {
        Some(port) => format!("{}:{}{}", host, port, url.path()),
        None => format!("{}{}", host, url.path()),
    };

    if key.ends_with('/') {
        key.pop();
    }

    Ok(NormalizedUrl(key))
}

/// Parses `input`, retrying with an `http://` prefix when it has no scheme
///
/// A key with a port (`a.com:8080/x`) parses as scheme `a.com` with no host,
/// so that shape is retried as well.
fn parse_lenient(input: &str) -> Result<Url, UrlError> {
    let parse_error = |e: ParseError| UrlError::Parse {
        url: input.to_string(),
        message: e.to_string(),
    };

    match Url::parse(input) {
        Ok(url) if is_host_and_port(&url) => {
            Url::parse(&format!("http://{}", input)).map_err(parse_error)
        }
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) if !input.trim().is_empty() => {
            Url::parse(&format!("http://{}", input)).map_err(parse_error)
        }
        Err(e) => Err(parse_error(e)),
    }
}

/// True for a host-less URL whose path starts with a port number
fn is_host_and_port(url: &Url) -> bool {
    if url.host_str().is_some() {
        return false;
    }

    let path = url.path();
    let digits = path.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && matches!(path.as_bytes().get(digits), None | Some(b'/'))
}

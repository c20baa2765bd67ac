//! Safe rendering of external links.
//!
//! Links to hosts outside the configured allow-list are routed through the
//! `/linkout` interstitial instead of being handed to the browser directly.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Characters left as-is by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Hosts whose links can be followed without an interstitial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeHosts(Vec<String>);

impl SafeHosts {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            hosts
                .into_iter()
                .map(|h| h.into().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        )
    }

    /// True if `host` is a listed host or a subdomain of one.
    pub fn contains(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.0.iter().any(|safe| {
            host == *safe
                || host
                    .strip_suffix(safe.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// Whether `url` can be linked to directly.
///
/// `mailto:` links are always safe. `http` and `https` links are safe when
/// their host is listed. Any other scheme (`javascript:`, `data:`, ...) and
/// unparseable input never is.
pub fn is_safe(url: &str, safe_hosts: &SafeHosts) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    match parsed.scheme() {
        "mailto" => true,
        "http" | "https" => parsed
            .host_str()
            .is_some_and(|host| safe_hosts.contains(host)),
        _ => false,
    }
}

/// The href to render for `url`.
pub fn linkout(url: &str, safe_hosts: &SafeHosts) -> String {
    if is_safe(url, safe_hosts) {
        url.to_string()
    } else {
        format!("/linkout?remoteUrl={}", utf8_percent_encode(url, URI_COMPONENT))
    }
}

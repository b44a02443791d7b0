use url::Url;

/// Extracts the network location (`host` or `host:port`) from a URL string
///
/// The port is included when one is carried explicitly by the parsed URL;
/// default ports are elided by the parser and do not appear.
///
/// # Arguments
///
/// * `url` - The URL string to extract the network location from
///
/// # Returns
///
/// * `Some(String)` - The network location
/// * `None` - If the URL does not parse or has no host
///
/// # Examples
///
/// ```
/// use sitemapper::url::netloc;
///
/// assert_eq!(netloc("http://example.com/path"), Some("example.com".to_string()));
/// assert_eq!(netloc("http://example.com:8080/"), Some("example.com:8080".to_string()));
/// assert_eq!(netloc("not a url"), None);
/// ```
pub fn netloc(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

/// Decides whether a candidate URL stays inside the crawl's target domain
///
/// Compares the network locations of the two URLs for exact string equality.
/// No subdomain equivalence: `blog.example.com` is a different domain than
/// `example.com`. A URL that does not parse, or has no host (such as
/// `mailto:` or `javascript:` targets), is out of scope: the check fails
/// closed.
///
/// # Arguments
///
/// * `parent` - The URL whose domain defines the scope
/// * `child` - The candidate URL to test
///
/// # Returns
///
/// `true` only when both URLs parse and their network locations are equal
pub fn same_domain(parent: &str, child: &str) -> bool {
    match (netloc(parent), netloc(child)) {
        (Some(p), Some(c)) => p == c,
        _ => false,
    }
}

/// Resolves a raw link target against the page it was found on
///
/// Relative targets are joined onto the base; absolute targets pass through
/// the parser unchanged. A target that cannot be resolved to a well-formed
/// absolute URL yields `None` and is dropped by the caller.
pub fn resolve_target(base: &Url, target: &str) -> Option<Url> {
    base.join(target).ok()
}

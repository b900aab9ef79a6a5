use percent_encoding::percent_decode_str;

/// Human-readable form of a URL: no scheme, no leading `www.`, percent-decoded
///
/// # Examples
///
/// ```
/// use history_clusters::utils::display_url_from_raw;
///
/// assert_eq!(display_url_from_raw("https://www.example.com/a%20b"), "example.com/a b");
/// ```
pub fn display_url_from_raw(raw_url: &str) -> String {
    let without_scheme = raw_url.split_once("://").map(|(_, rest)| rest).unwrap_or(raw_url);
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    let trimmed = without_www.strip_suffix('/').unwrap_or(without_www);

    percent_decode_str(trimmed).decode_utf8_lossy().into_owned()
}

/// Host portion of a URL, if it has one
pub fn host_of(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map(|(_, rest)| rest)?;
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.rsplit_once('@').map(|(_, h)| h).unwrap_or(host);
    let host = host.split(':').next()?;
    if host.is_empty() { None } else { Some(host) }
}

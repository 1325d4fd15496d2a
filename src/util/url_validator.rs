use thiserror::Error;
use url::Url;

/// Errors that can occur when validating a fact's source link.
#[derive(Error, Debug)]
pub enum SourceUrlError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Validates a URL string for use as a fact's source link.
///
/// Source links are community-supplied references that the app only ever
/// hands to the system browser, so the check is deliberately permissive:
/// the string must parse as an absolute URL and use an http or https
/// scheme. Anything a browser would refuse to navigate to (a `file://`
/// path, a bare word with no scheme) is rejected here instead of at
/// submit time on the server.
///
/// # Examples
///
/// ```
/// use til::util::validate_source_url;
///
/// let url = validate_source_url("https://example.com/article").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// // Any http(s) URL with a host passes, however terse.
/// assert!(validate_source_url("http://x").is_ok());
///
/// // Schemes a browser should not be handed are rejected.
/// assert!(validate_source_url("file:///etc/passwd").is_err());
///
/// // So are strings that are not absolute URLs at all.
/// assert!(validate_source_url("example.com/article").is_err());
/// ```
pub fn validate_source_url(url_str: &str) -> Result<Url, SourceUrlError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(SourceUrlError::UnsupportedScheme(scheme.to_owned())),
    }

    Ok(url)
}

/// Boolean form of [`validate_source_url`] for the submission form.
pub fn is_valid_http_url(url_str: &str) -> bool {
    validate_source_url(url_str).is_ok()
}

use url::Url;

use crate::error::{Error, Result};

/// Syntactic URL check performed before any fetch attempt.
///
/// A URL passes when its scheme is `http` or `https` and its host contains
/// at least one `.`. Anything else (missing scheme, other protocols, bare
/// single-label hosts) fails.
pub fn validate_url(url_arg: &str) -> bool {
    let Ok(parsed) = Url::parse(url_arg) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    parsed.host_str().is_some_and(|host| host.contains('.'))
}

/// clap value parser wiring [`validate_url`] into argument parsing.
///
/// Rejection surfaces through clap as a usage error naming the offending
/// URL, so the process exits non-zero before any network activity.
pub fn parse_url_arg(value: &str) -> Result<String> {
    if validate_url(value) {
        Ok(value.to_string())
    } else {
        Err(Error::InvalidUrl {
            url: value.to_string(),
        })
    }
}

/// Fetch the page body as text.
///
/// One blocking GET per invocation; no retries, no timeout policy beyond the
/// client defaults. A transport failure or non-success status is fatal to
/// the run.
pub fn fetch_page(url: &str) -> Result<String> {
    let response = reqwest::blocking::get(url).map_err(|source| Error::Fetch {
        url: url.to_string(),
        source,
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status,
        });
    }
    response.text().map_err(|source| Error::Fetch {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_url() {
        assert!(validate_url("http://www.example.com"));
    }

    #[test]
    fn no_protocol() {
        assert!(!validate_url("www.example.com"));
    }

    #[test]
    fn not_http_protocol() {
        assert!(!validate_url("ftp://www.example.com"));
    }

    #[test]
    fn custom_tld() {
        assert!(validate_url("http://www.example.anything"));
    }

    #[test]
    fn malformed_url() {
        assert!(!validate_url("http://example"));
    }

    #[test]
    fn https_passes() {
        assert!(validate_url("https://example.com/some/page?q=1"));
    }

    #[test]
    fn url_arg_error_names_the_url() {
        let err = parse_url_arg("example.com").unwrap_err();
        assert!(err.to_string().contains("example.com"));
    }
}

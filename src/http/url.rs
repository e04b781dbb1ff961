//! Absolute URL decomposition.

use crate::error::Error;
use crate::transport::Scheme;

/// The pieces of an absolute `http://` or `https://` URL.
///
/// Borrowed from the URL string; nothing is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UrlParts<'a> {
    pub scheme: Scheme,
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
}

/// Split an absolute URL into scheme, host, port, and path.
///
/// The port defaults to the scheme's well-known port. An explicit `:port`
/// is only recognized between the host and the first `/`; a `:` inside the
/// path never counts as a port separator. A URL without a recognized
/// scheme, without a `/` after the host, with an empty host, or with an
/// unparsable port is a precondition violation reported as
/// [`Error::InvalidUrl`].
pub(crate) fn split(url: &str) -> Result<UrlParts<'_>, Error> {
    let (scheme, rest) = if let Some(rest) = url.strip_prefix("https://") {
        (Scheme::Https, rest)
    } else if let Some(rest) = url.strip_prefix("http://") {
        (Scheme::Http, rest)
    } else {
        return Err(Error::InvalidUrl);
    };

    let slash = rest.find('/').ok_or(Error::InvalidUrl)?;
    let (authority, path) = rest.split_at(slash);

    let (host, port) = match authority.find(':') {
        Some(colon) => {
            let port = authority[colon + 1..]
                .parse::<u16>()
                .map_err(|_| Error::InvalidUrl)?;
            (&authority[..colon], port)
        }
        None => (authority, scheme.default_port()),
    };

    if host.is_empty() {
        return Err(Error::InvalidUrl);
    }

    Ok(UrlParts {
        scheme,
        host,
        port,
        path,
    })
}

//! The client and its redirect-following request loop.

use crate::error::Error;
use crate::http::request::{Request, serialize};
use crate::http::response::Response;
use crate::http::{MAX_URL_LEN, url};
use crate::transport::Connect;
use heapless::String;

/// An HTTP/1.1 client executing one request at a time.
///
/// The client owns a [`Connect`] implementation and asks it for a fresh
/// connection per request leg; redirects close the previous connection
/// before the next one is opened, so at most one connection is ever live.
///
/// # Type Parameters
///
/// * `T` - The connector type implementing [`Connect`]
#[derive(Debug)]
pub struct Client<T: Connect> {
    connector: T,
}

impl<T: Connect> Client<T> {
    /// Create a client around a connector.
    pub fn new(connector: T) -> Self {
        Self { connector }
    }

    /// Execute a request, following redirects up to the request's limit.
    ///
    /// Each leg splits the URL, opens a connection, sends the serialized
    /// request, and parses the response headers into the same [`Response`].
    /// When the response carries a `Location` header and the redirect limit
    /// allows it, the current connection is closed and the next leg runs
    /// against the redirect target. Exceeding the limit is not an error:
    /// the redirect response itself is returned, unfollowed.
    ///
    /// The returned response still owns its connection; consume the body
    /// through [`Response::read`] or the `read_to_*` collectors, which
    /// close it, or call [`Response::close`] directly.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidUrl`] - The URL (or a redirect target) is malformed
    /// * [`Error::ConnectionRefused`] - The connector failed to open a leg
    /// * [`Error::WriteError`] - The transport accepted a short write
    /// * [`Error::IncompleteHeaders`] - The transport ended mid-headers
    ///
    /// On any failed leg the connection is closed before returning; no
    /// partial response survives.
    pub fn execute(&mut self, request: &Request<'_>) -> Result<Response<T::Connection>, Error> {
        let mut response = Response::new();
        let mut url: String<MAX_URL_LEN> =
            String::try_from(request.url).map_err(|_| Error::InvalidUrl)?;
        loop {
            let target = url::split(&url)?;
            let connection = self
                .connector
                .connect(target.scheme, target.host, target.port)
                .map_err(|_| Error::ConnectionRefused)?;
            response.attach(connection);

            let wire = serialize(request, &target)?;
            if let Err(e) = response.send(&wire) {
                response.close();
                return Err(e);
            }
            if let Err(e) = response.read_headers() {
                response.close();
                return Err(e);
            }

            let follow = response.is_redirect
                && (request.max_redirects < 0
                    || response.redirect_count < request.max_redirects as u32);
            if !follow {
                return Ok(response);
            }
            response.redirect_count += 1;
            url = response.location.clone();
            response.close();
        }
    }
}

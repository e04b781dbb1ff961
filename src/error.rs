//! Common error types for client operations

/// A common error type for HTTP client operations.
///
/// This enum defines the set of failures the client can report. It is
/// designed to be simple and portable for `no_std` environments; transport
/// end-of-stream during a body read is deliberately *not* an error and is
/// reported as a short or zero-length read instead.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An operation was attempted on a response whose transport is gone.
    NotOpen,
    /// The connector failed to establish a connection.
    ConnectionRefused,
    /// The transport accepted fewer bytes than the serialized request.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// The transport ended before the header terminator was seen.
    IncompleteHeaders,
    /// The URL is missing a scheme, host, path, or has an unparsable port.
    InvalidUrl,
    /// The serialized request does not fit the request buffer.
    RequestTooLarge,
    /// A caller-supplied buffer is too small for the declared body.
    BufferOverflow,
    /// A protocol-level error occurred (e.g. a non-UTF-8 text body).
    ProtocolError,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::IncompleteHeaders => defmt::write!(f, "IncompleteHeaders"),
            Error::InvalidUrl => defmt::write!(f, "InvalidUrl"),
            Error::RequestTooLarge => defmt::write!(f, "RequestTooLarge"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
        }
    }
}

//! A byte-stream transport abstraction for embedded systems
//!
//! The client is transport agnostic: it sends and receives over anything
//! implementing the [`Connection`] trait family. Plain TCP and TLS socket
//! implementations are expected to live outside this crate; DNS resolution
//! and TLS handshakes happen inside [`Connect::connect`].

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Blocking read half of a connection.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection. `Ok(0)` means no more data for
    /// now/end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Blocking write half of a connection.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection, returning how many bytes were accepted.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Non-blocking readability check.
pub trait Poll {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Number of bytes readable without blocking. The client uses this only
    /// as a heuristic, never to wait.
    fn poll(&mut self) -> Result<usize, Self::Error>;
}

/// Connection teardown.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Poll + Close {}

/// URL scheme, which selects the transport variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Plain `http://`
    Http,
    /// TLS-encrypted `https://`
    Https,
}

impl Scheme {
    /// The well-known port used when the URL carries no explicit `:port`.
    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Scheme {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Scheme::Http => defmt::write!(f, "Http"),
            Scheme::Https => defmt::write!(f, "Https"),
        }
    }
}

/// A synchronous connector (client side).
///
/// One connector serves a whole logical call: every request leg, including
/// redirect legs, asks it for a fresh connection. The previous leg's
/// connection is always closed before the next one is opened.
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `host:port` using the transport variant for
    /// `scheme`.
    fn connect(
        &mut self,
        scheme: Scheme,
        host: &str,
        port: u16,
    ) -> Result<Self::Connection, Self::Error>;
}

//! # picohttp - Embedded HTTP/1.1 Client
//!
//! A minimal, synchronous HTTP/1.1 client designed for embedded systems and
//! `no_std` environments. It issues a single request over a caller-supplied
//! byte-stream transport, parses the response status line and headers, and
//! exposes the body through a pull-based reader that handles both
//! `Content-Length`-delimited and chunked transfer encodings with one fixed
//! receive buffer per response.
//!
//! ## Features
//!
//! - HTTP/1.1 request serialization (GET and POST)
//! - Incremental, bounded-memory response parsing
//! - Chunked and content-length body decoding, plus a streaming mode for
//!   bodies of unknown length
//! - Redirect following with a caller-supplied limit
//! - Fixed-size buffers for predictable memory usage
//! - Transport agnostic: plain TCP, TLS, or anything implementing the
//!   [`transport::Connection`] trait family
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! picohttp = "0.1.0"
//! ```
//!
//! ### Basic GET request
//!
//! ```rust,no_run
//! use picohttp::http::{Client, Method, Request};
//! # use picohttp::transport::{Connect, Connection, Scheme};
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl picohttp::transport::Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl picohttp::transport::Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl picohttp::transport::Poll for MockConnection {
//! #     type Error = ();
//! #     fn poll(&mut self) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl picohttp::transport::Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockNetwork;
//! # impl Connect for MockNetwork {
//! #     type Connection = MockConnection;
//! #     type Error = ();
//! #     fn connect(&mut self, _s: Scheme, _h: &str, _p: u16) -> Result<MockConnection, ()> {
//! #         Ok(MockConnection)
//! #     }
//! # }
//!
//! let network = MockNetwork;
//! let mut client = Client::new(network);
//!
//! let request = Request {
//!     method: Method::Get,
//!     url: "http://example.com/api/status",
//!     headers: heapless::Vec::new(),
//!     body: None,
//!     content_type: "",
//!     max_redirects: 5,
//! };
//!
//! // let mut response = client.execute(&request)?;
//! // let body = response.read_to_string::<1024>()?;
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based IoT devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[cfg(test)]
extern crate std;

/// Common error types for client operations.
pub mod error;

/// Byte-stream transport abstraction over which requests are sent.
///
/// Implement these traits for your platform's plain and TLS sockets; the
/// client never opens sockets itself.
pub mod transport;

/// The HTTP/1.1 client: request building, response parsing, body decoding.
pub mod http;

/// Re-exports of common traits and types.
pub mod prelude {
    pub use super::http::{Client, Header, Method, Request, Response};
    pub use super::transport::{Close, Connect, Connection, Poll, Read, Scheme, Write};
}

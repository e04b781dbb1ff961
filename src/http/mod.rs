//! HTTP/1.1 client implementation for embedded systems.
//!
//! This module provides a lightweight HTTP client designed for `no_std`
//! environments and resource-constrained devices. It focuses on predictable
//! memory usage: every response is decoded through a single fixed-size
//! receive buffer, no matter how large the body is.
//!
//! # Features
//!
//! - GET and POST over HTTP/1.1
//! - Synchronous request/response model
//! - Pull-based body reader handling content-length, chunked, and
//!   unknown-length ("streaming") bodies
//! - Redirect following bounded by a caller-supplied count
//! - Works with any transport implementing
//!   [`crate::transport::Connection`], opened through
//!   [`crate::transport::Connect`]
//!
//! # Usage
//!
//! The main entry point is [`Client`], which takes a connector and executes
//! one [`Request`] at a time, producing a [`Response`] whose body is then
//! read incrementally or collected in one call.

/// The client and its redirect-following request loop.
pub mod client;
/// Request description and wire-format serialization.
pub mod request;
/// Response metadata, header parsing, and the body decoder.
pub mod response;

pub(crate) mod url;

pub use client::Client;
pub use request::{Header, Method, Request};
pub use response::Response;

/// Capacity of the fixed receive buffer, in bytes.
pub(crate) const BUF_SIZE: usize = 1024;
/// Capacity of the serialized-request buffer, in bytes.
pub(crate) const REQUEST_BUF_SIZE: usize = 2048;
pub(crate) const MAX_HEADERS: usize = 16;
pub(crate) const MAX_HEADER_NAME_LEN: usize = 64;
pub(crate) const MAX_HEADER_VALUE_LEN: usize = 256;
/// A single header line, name and value included, must fit this many bytes.
pub(crate) const MAX_HEADER_LINE_LEN: usize = 384;
pub(crate) const MAX_URL_LEN: usize = 256;
pub(crate) const MAX_CONTENT_TYPE_LEN: usize = 128;

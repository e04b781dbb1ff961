//! Response metadata, header parsing, and the body decoder.
//!
//! A [`Response`] owns the transport connection for the current request leg
//! and one fixed-size receive buffer. Headers are parsed line by line as the
//! buffer fills; the body is then decoded out of the same buffer on demand,
//! so memory stays bounded no matter how large the body is.

use crate::error::Error;
use crate::http::request::Header;
use crate::http::{
    BUF_SIZE, MAX_CONTENT_TYPE_LEN, MAX_HEADERS, MAX_HEADER_LINE_LEN, MAX_HEADER_NAME_LEN,
    MAX_URL_LEN,
};
use crate::transport::Connection;
use heapless::{String, Vec};

/// An HTTP response being received over a [`Connection`].
///
/// One `Response` lives for a whole logical call: on a redirect its
/// header fields are reset and its connection replaced, but the receive
/// buffer is reused. The body is pulled through [`Response::read`] or
/// collected with [`Response::read_to_vec`] / [`Response::read_to_string`].
pub struct Response<C: Connection> {
    /// Parsed status code, `0` until the status line has been seen.
    pub status_code: u16,
    /// Value of the `Content-Type` header, empty if absent.
    pub content_type: String<MAX_CONTENT_TYPE_LEN>,
    /// Declared body length; `0` means unknown or absent.
    pub content_length: usize,
    /// Redirect target from the `Location` header, empty if none.
    pub location: String<MAX_URL_LEN>,
    /// Remaining headers, names lower-cased. Headers with dedicated fields
    /// above are not duplicated here.
    pub headers: Vec<Header, MAX_HEADERS>,
    /// The body uses chunked transfer encoding.
    pub is_chunked: bool,
    /// The body is gzip-compressed. Recorded from `Content-Encoding`, never
    /// decoded by this crate.
    pub is_gzip: bool,
    /// The body has been fully delivered (or is known to be empty).
    pub is_complete: bool,
    /// A `Location` header was present.
    pub is_redirect: bool,
    /// The body length is unknown and the transport has stopped yielding
    /// bytes for now; reads may return short without that being an error.
    pub is_streaming: bool,
    /// Number of redirects followed so far during this call.
    pub redirect_count: u32,
    buf: [u8; BUF_SIZE],
    buf_pos: usize,
    buf_remaining: usize,
    delivered: usize,
    chunk_remaining: usize,
    connection: Option<C>,
}

impl<C: Connection> core::fmt::Debug for Response<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Response")
            .field("status_code", &self.status_code)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("is_chunked", &self.is_chunked)
            .field("is_complete", &self.is_complete)
            .field("is_redirect", &self.is_redirect)
            .field("is_streaming", &self.is_streaming)
            .field("redirect_count", &self.redirect_count)
            .finish_non_exhaustive()
    }
}

fn find_crlf(window: &[u8]) -> Option<usize> {
    window.windows(2).position(|pair| pair == b"\r\n")
}

/// Parse the leading hexadecimal digits of a chunk-size line. Stops at the
/// first non-hex byte, so chunk extensions (`;...`) are tolerated.
fn parse_hex(line: &[u8]) -> Option<usize> {
    let end = line
        .iter()
        .position(|b| !b.is_ascii_hexdigit())
        .unwrap_or(line.len());
    if end == 0 {
        return None;
    }
    let digits = core::str::from_utf8(&line[..end]).ok()?;
    usize::from_str_radix(digits, 16).ok()
}

/// Case-insensitive match of `name` (including its trailing `:`) against the
/// start of `line`; on a hit, returns the value with leading spaces trimmed.
fn header_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let (prefix, rest) = line.split_at_checked(name.len())?;
    if prefix.eq_ignore_ascii_case(name) {
        Some(rest.trim_start_matches(' '))
    } else {
        None
    }
}

impl<C: Connection> Response<C> {
    pub(crate) fn new() -> Self {
        Self {
            status_code: 0,
            content_type: String::new(),
            content_length: 0,
            location: String::new(),
            headers: Vec::new(),
            is_chunked: false,
            is_gzip: false,
            is_complete: false,
            is_redirect: false,
            is_streaming: false,
            redirect_count: 0,
            buf: [0; BUF_SIZE],
            buf_pos: 0,
            buf_remaining: 0,
            delivered: 0,
            chunk_remaining: 0,
            connection: None,
        }
    }

    /// Hand this response the connection for the next leg.
    pub(crate) fn attach(&mut self, connection: C) {
        debug_assert!(self.connection.is_none());
        self.connection = Some(connection);
    }

    /// Write the serialized request for this leg. A short write is fatal.
    pub(crate) fn send(&mut self, wire: &[u8]) -> Result<(), Error> {
        let connection = self.connection.as_mut().ok_or(Error::NotOpen)?;
        let written = connection.write(wire).map_err(|_| Error::WriteError)?;
        if written != wire.len() {
            return Err(Error::WriteError);
        }
        connection.flush().map_err(|_| Error::WriteError)
    }

    /// Look up a header from the generic map, case-insensitively.
    ///
    /// Headers with dedicated fields (`Content-Type`, `Content-Length`,
    /// `Transfer-Encoding`, `Location`, `Content-Encoding`) are not found
    /// here.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
    }

    /// Release the transport and the buffered state.
    ///
    /// Idempotent: closing an already-closed response does nothing. Every
    /// exit path (normal completion, short streaming read, failed leg)
    /// funnels through here.
    pub fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            let _ = connection.close();
        }
        self.buf_pos = 0;
        self.buf_remaining = 0;
    }

    fn reset_leg(&mut self) {
        self.status_code = 0;
        self.content_type = String::new();
        self.content_length = 0;
        self.location = String::new();
        self.headers = Vec::new();
        self.is_chunked = false;
        self.is_gzip = false;
        self.is_complete = false;
        self.is_redirect = false;
        self.is_streaming = false;
        self.buf_pos = 0;
        self.buf_remaining = 0;
        self.delivered = 0;
        self.chunk_remaining = 0;
    }

    /// Fill the whole receive buffer with one transport read.
    fn fill_raw(&mut self) -> Result<usize, Error> {
        let connection = self.connection.as_mut().ok_or(Error::NotOpen)?;
        connection.read(&mut self.buf).map_err(|_| Error::ReadError)
    }

    /// Bytes readable without blocking, best effort. Used only by the
    /// streaming heuristic, so a transport error just reads as "none".
    fn poll_available(&mut self) -> usize {
        self.connection
            .as_mut()
            .and_then(|connection| connection.poll().ok())
            .unwrap_or(0)
    }

    /// Read and parse the status line and headers for the current leg.
    ///
    /// All per-leg fields are reset first, so the same `Response` can parse
    /// each leg of a redirect chain. Bytes received past the blank-line
    /// terminator stay in the buffer as the first body bytes.
    pub(crate) fn read_headers(&mut self) -> Result<(), Error> {
        self.reset_leg();
        let mut line: Vec<u8, MAX_HEADER_LINE_LEN> = Vec::new();
        loop {
            let len = self.fill_raw()?;
            if len == 0 {
                return Err(Error::IncompleteHeaders);
            }
            let mut pos = 0;
            // A terminator split exactly between two fills leaves the `\r`
            // at the end of the accumulated line.
            if line.last() == Some(&b'\r') && self.buf[0] == b'\n' {
                line.pop();
                if line.is_empty() {
                    self.finish_headers(1, len);
                    return Ok(());
                }
                self.parse_line(&line);
                line.clear();
                pos = 1;
            }
            loop {
                let window = &self.buf[pos..len];
                match find_crlf(window) {
                    None => {
                        line.extend_from_slice(window)
                            .map_err(|_| Error::ProtocolError)?;
                        break;
                    }
                    Some(end) => {
                        line.extend_from_slice(&window[..end])
                            .map_err(|_| Error::ProtocolError)?;
                        if line.is_empty() {
                            self.finish_headers(pos + end + 2, len);
                            return Ok(());
                        }
                        self.parse_line(&line);
                        line.clear();
                        pos += end + 2;
                    }
                }
            }
        }
    }

    /// Record body bytes already sitting in the buffer past the header
    /// terminator and decide whether this leg is a streaming one.
    fn finish_headers(&mut self, body_start: usize, fill_len: usize) {
        if body_start < fill_len {
            self.buf_pos = body_start;
            self.buf_remaining = fill_len - body_start;
            // Length unknown and the server appears to have paused: the
            // fill was not saturated and nothing more is waiting.
            self.is_streaming = !self.is_complete
                && self.content_length == 0
                && !self.is_chunked
                && (fill_len < BUF_SIZE || self.poll_available() == 0);
        }
    }

    fn parse_line(&mut self, line: &[u8]) {
        let Ok(line) = core::str::from_utf8(line) else {
            return;
        };
        if line.starts_with("HTTP/") {
            // Status code sits at a fixed offset after "HTTP/x.y ".
            if let Some(rest) = line.get(9..) {
                let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
                self.status_code = rest[..digits].parse().unwrap_or(0);
            }
        } else if let Some(value) = header_value(line, "content-type:") {
            if let Ok(value) = String::try_from(value) {
                self.content_type = value;
            }
        } else if let Some(value) = header_value(line, "content-length:") {
            let digits = value.bytes().take_while(|b| b.is_ascii_digit()).count();
            self.content_length = value[..digits].parse().unwrap_or(0);
            if self.content_length == 0 {
                // Explicitly empty body: forbid any body read.
                self.is_complete = true;
            }
        } else if let Some(value) = header_value(line, "transfer-encoding:") {
            self.is_chunked = value
                .get(..7)
                .is_some_and(|v| v.eq_ignore_ascii_case("chunked"));
        } else if let Some(value) = header_value(line, "content-encoding:") {
            self.is_gzip = value.contains("gzip");
        } else if let Some(value) = header_value(line, "location:") {
            self.is_redirect = true;
            if let Ok(value) = String::try_from(value) {
                self.location = value;
            }
        } else if let Some(colon) = line.find(':') {
            let mut name: String<MAX_HEADER_NAME_LEN> = String::new();
            for c in line[..colon].chars() {
                if name.push(c.to_ascii_lowercase()).is_err() {
                    return;
                }
            }
            let Ok(value) = String::try_from(line[colon + 1..].trim_start_matches(' ')) else {
                return;
            };
            // Dropped silently once the map is full.
            let _ = self.headers.push(Header { name, value });
        }
        // Lines without a colon are ignored.
    }

    /// Advance past `len` bytes that are already accounted for, refilling
    /// the buffer from the transport when it runs dry.
    ///
    /// This is the single consume/refill primitive shared by the body
    /// decoder: `Ok(false)` means the transport yielded nothing on a refill
    /// that was needed (end of data, not an error). `dont_read` suppresses
    /// the refill so a skip at a chunk boundary cannot block in streaming
    /// mode. Each fresh fill re-evaluates the streaming heuristic.
    fn skip(&mut self, len: usize, dont_read: bool) -> Result<bool, Error> {
        let mut len = len;
        let mut carry = 0;
        if len > self.buf_remaining {
            carry = len - self.buf_remaining;
            len = self.buf_remaining;
        }
        self.buf_pos += len;
        self.buf_remaining -= len;
        debug_assert!(self.buf_pos + self.buf_remaining <= BUF_SIZE);
        if self.buf_remaining == 0 && !dont_read {
            if self.is_complete
                || (!self.is_chunked
                    && self.content_length > 0
                    && self.delivered >= self.content_length
                    && self.chunk_remaining == 0)
            {
                self.is_complete = true;
                return Ok(false);
            }
            let filled = self.fill_raw()?;
            if filled == 0 {
                return Ok(false);
            }
            if filled <= carry {
                // The refill was smaller than the bytes to discard.
                self.buf_pos = filled;
                self.buf_remaining = 0;
                return Ok(false);
            }
            self.buf_pos = carry;
            self.buf_remaining = filled - carry;
            if self.content_length == 0 && self.buf_remaining < BUF_SIZE {
                self.is_streaming = true;
            }
        }
        Ok(true)
    }

    /// Parse the next chunk-size line at the read cursor. The line may
    /// straddle a buffer refill; its already-buffered digits are stashed and
    /// the scan resumes after the refill. `Ok(None)` means the framing was
    /// truncated and the read should end with what it has.
    fn next_chunk_size(&mut self) -> Result<Option<usize>, Error> {
        let window = &self.buf[self.buf_pos..self.buf_pos + self.buf_remaining];
        if let Some(end) = window.iter().position(|&b| b == b'\r') {
            let size = parse_hex(&window[..end]);
            if size.is_some() && !self.skip(end + 2, false)? {
                return Ok(None);
            }
            return Ok(size);
        }
        let mut stash: Vec<u8, MAX_HEADER_LINE_LEN> = Vec::new();
        if stash.extend_from_slice(window).is_err() {
            return Ok(None);
        }
        if !self.skip(self.buf_remaining, false)? {
            return Ok(None);
        }
        let window = &self.buf[self.buf_pos..self.buf_pos + self.buf_remaining];
        let Some(end) = window.iter().position(|&b| b == b'\r') else {
            return Ok(None);
        };
        if stash.extend_from_slice(&window[..end]).is_err() {
            return Ok(None);
        }
        let size = parse_hex(&stash);
        if size.is_some() && !self.skip(end + 2, false)? {
            return Ok(None);
        }
        Ok(size)
    }

    /// Pull body bytes into `dst`, returning how many were copied.
    ///
    /// Returns `Ok(0)` once the body is complete. Decoding follows whichever
    /// framing the headers declared: chunked (which wins over a stray
    /// content-length), content-length, or none. With no declared length the
    /// body simply runs until the transport stops yielding bytes; in
    /// streaming mode the call returns what it has gathered rather than
    /// block for more, so a short read is a normal outcome.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize, Error> {
        if self.is_complete {
            return Ok(0);
        }
        let mut copied = 0;
        let mut to_read = dst.len();
        'outer: while to_read > 0 {
            // Make sure at least one byte is buffered; this refill is the
            // only place a body read can block.
            if !self.skip(0, false)? {
                break;
            }
            if self.is_chunked && self.chunk_remaining == 0 {
                // A chunk trailer the previous read could not consume
                // without blocking is still in the stream; it shows up
                // as a leading CR (or a lone LF) before the size line.
                let debt = match self.buf[self.buf_pos] {
                    b'\r' => 2,
                    b'\n' => 1,
                    _ => 0,
                };
                if debt > 0 && !self.skip(debt, false)? {
                    break;
                }
                if self.buf[self.buf_pos] == b'0' {
                    // Terminal chunk: everything was read and emitted.
                    self.is_complete = true;
                    break;
                }
                match self.next_chunk_size()? {
                    Some(size) => self.chunk_remaining = size,
                    None => break,
                }
            } else if !self.is_chunked && self.content_length > 0 && self.chunk_remaining == 0 {
                if self.delivered >= self.content_length {
                    self.is_complete = true;
                    break;
                }
                self.chunk_remaining = self.content_length - self.delivered;
            } else if !self.is_chunked && self.content_length == 0 {
                // Unknown length: the current "unit" is unbounded and runs
                // until the transport is exhausted.
                self.chunk_remaining = usize::MAX;
            }
            while self.chunk_remaining > 0 && to_read > 0 {
                let count = to_read.min(self.buf_remaining).min(self.chunk_remaining);
                dst[copied..copied + count]
                    .copy_from_slice(&self.buf[self.buf_pos..self.buf_pos + count]);
                copied += count;
                to_read -= count;
                self.chunk_remaining -= count;
                self.delivered += count;
                if !self.skip(count, self.is_streaming)? {
                    break 'outer;
                }
                if self.is_chunked && self.chunk_remaining == 0 {
                    // Skip the chunk's trailing CRLF, but never block for it
                    // past a caller-visible chunk boundary.
                    if !self.skip(2, self.is_streaming)? {
                        break 'outer;
                    }
                }
                if self.is_streaming && self.buf_remaining == 0 {
                    break 'outer;
                }
            }
            if self.is_streaming && self.buf_remaining == 0 {
                break;
            }
        }
        if !self.is_chunked
            && self.content_length > 0
            && self.delivered >= self.content_length
            && self.chunk_remaining == 0
        {
            self.is_complete = true;
        }
        Ok(copied)
    }

    /// Collect the whole body into a fixed-capacity vector and close the
    /// transport.
    ///
    /// With a declared content length the vector is sized exactly and filled
    /// by one bounded read ([`Error::BufferOverflow`] if `N` is too small);
    /// otherwise reads are looped until a zero-length read signals the end.
    pub fn read_to_vec<const N: usize>(&mut self) -> Result<Vec<u8, N>, Error> {
        let mut body: Vec<u8, N> = Vec::new();
        if self.content_length > 0 && !self.is_chunked {
            if self.content_length > N {
                self.close();
                return Err(Error::BufferOverflow);
            }
            body.resize_default(self.content_length).ok();
            match self.read(&mut body) {
                Ok(len) => body.truncate(len),
                Err(e) => {
                    self.close();
                    return Err(e);
                }
            }
            self.close();
            return Ok(body);
        }
        let mut scratch = [0u8; BUF_SIZE];
        loop {
            let len = match self.read(&mut scratch) {
                Ok(len) => len,
                Err(e) => {
                    self.close();
                    return Err(e);
                }
            };
            if len == 0 {
                break;
            }
            if body.extend_from_slice(&scratch[..len]).is_err() {
                self.close();
                return Err(Error::BufferOverflow);
            }
        }
        self.close();
        Ok(body)
    }

    /// Collect the whole body as UTF-8 text and close the transport.
    pub fn read_to_string<const N: usize>(&mut self) -> Result<String<N>, Error> {
        let body = self.read_to_vec::<N>()?;
        String::from_utf8(body).map_err(|_| Error::ProtocolError)
    }
}

impl<C: Connection> Drop for Response<C> {
    fn drop(&mut self) {
        self.close();
    }
}

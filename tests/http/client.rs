use super::mock::{MockConnection, MockNetwork};
use picohttp::error::Error;
use picohttp::http::{Client, Method, Request};
use picohttp::transport::Scheme;

fn get(url: &str) -> Request<'_> {
    Request {
        method: Method::Get,
        url,
        headers: heapless::Vec::new(),
        body: None,
        content_type: "",
        max_redirects: 0,
    }
}

#[test]
fn content_length_body_is_read_exactly() {
    let (conn, handles) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/data")).unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type.as_str(), "text/plain");
    assert_eq!(response.content_length, 5);
    assert!(!response.is_chunked);
    assert!(!response.is_streaming);

    let body = response.read_to_string::<64>().unwrap();
    assert_eq!(body.as_str(), "hello");
    assert!(response.is_complete);
    // The body arrived with the header fill; no further transport read.
    assert_eq!(handles.reads(), 1);

    let wire = handles.written_string();
    assert!(wire.starts_with("GET /data HTTP/1.1\r\n"));
    assert!(wire.contains("Host: example.com:80\r\n"));
    assert!(wire.contains("Accept: */*\r\n"));
    assert!(!wire.contains("Content-Length"));
}

#[test]
fn chunked_body_is_reassembled() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/w")).unwrap();
    assert!(response.is_chunked);

    let body = response.read_to_string::<64>().unwrap();
    assert_eq!(body.as_str(), "Wikipedia");
    assert!(response.is_complete);
}

#[test]
fn chunked_framing_wins_over_stray_content_length() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 999\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/w")).unwrap();
    let body = response.read_to_string::<64>().unwrap();
    assert_eq!(body.as_str(), "Wikipedia");
}

#[test]
fn stray_short_content_length_does_not_truncate_chunked_body() {
    // A stray length smaller than the chunked payload, with a transport
    // pause right where the stray length would claim the body ends.
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n"
            as &[u8],
        b"5\r\npedia\r\n0\r\n\r\n",
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/w")).unwrap();
    let body = response.read_to_string::<64>().unwrap();
    assert_eq!(body.as_str(), "Wikipedia");
    assert!(response.is_complete);
}

#[test]
fn header_split_mid_token_parses_identically() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Le" as &[u8],
        b"ngth: 5\r\n\r\nhello",
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/")).unwrap();
    assert_eq!(response.content_length, 5);
    let body = response.read_to_string::<16>().unwrap();
    assert_eq!(body.as_str(), "hello");
}

#[test]
fn header_terminator_split_between_reads() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r" as &[u8],
        b"\nhello",
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/")).unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_length, 5);
    let body = response.read_to_string::<16>().unwrap();
    assert_eq!(body.as_str(), "hello");
}

#[test]
fn chunk_size_line_split_across_refill() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4" as &[u8],
        b"\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n",
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/w")).unwrap();
    let body = response.read_to_string::<64>().unwrap();
    assert_eq!(body.as_str(), "Wikipedia");
}

#[test]
fn unknown_length_paused_body_enters_streaming_mode() {
    let (conn, handles) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\n\r\nhello" as &[u8],
        b" world",
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/live")).unwrap();
    assert!(response.is_streaming);
    assert_eq!(response.content_length, 0);

    // The first read must hand back what is buffered without waiting for
    // the rest of the stream.
    let mut buf = [0u8; 64];
    let n = response.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"hello");
    assert_eq!(handles.reads(), 1, "read must not touch the transport again");

    let n = response.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b" world");

    // End of stream reads as zero, not as an error.
    assert_eq!(response.read(&mut buf).unwrap(), 0);
    response.close();
    assert_eq!(handles.closes(), 1);
}

#[test]
fn unknown_length_body_is_collected_to_end() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\n\r\n" as &[u8],
        b"part1",
        b"part2",
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/live")).unwrap();
    let body = response.read_to_string::<64>().unwrap();
    assert_eq!(body.as_str(), "part1part2");
}

#[test]
fn redirect_followed_once() {
    let (leg1, handles1) = MockConnection::new(&[
        b"HTTP/1.1 302 Found\r\nLocation: http://other.example:8080/next\r\n\r\n" as &[u8],
    ]);
    let (leg2, handles2) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok" as &[u8],
    ]);
    let network = MockNetwork::new(vec![leg1, leg2]);
    let mut client = Client::new(network);

    let mut request = get("http://example.com/start");
    request.max_redirects = 1;
    let mut response = client.execute(&request).unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.redirect_count, 1);
    assert!(!response.is_redirect);
    // First leg's transport was closed before the second leg opened.
    assert_eq!(handles1.closes(), 1);
    assert!(handles2.written_string().starts_with("GET /next HTTP/1.1\r\n"));
    assert!(handles2.written_string().contains("Host: other.example:8080\r\n"));

    let body = response.read_to_string::<16>().unwrap();
    assert_eq!(body.as_str(), "ok");
}

#[test]
fn redirect_limit_zero_returns_redirect_response() {
    let (leg1, _) = MockConnection::new(&[
        b"HTTP/1.1 302 Found\r\nLocation: http://other.example/next\r\n\r\n" as &[u8],
    ]);
    let network = MockNetwork::new(vec![leg1]);
    let mut client = Client::new(network);

    let response = client.execute(&get("http://example.com/start")).unwrap();
    assert_eq!(response.status_code, 302);
    assert!(response.is_redirect);
    assert_eq!(response.location.as_str(), "http://other.example/next");
    assert_eq!(response.redirect_count, 0);
}

#[test]
fn negative_redirect_limit_is_unlimited() {
    let (leg1, _) = MockConnection::new(&[
        b"HTTP/1.1 301 Moved\r\nLocation: http://a.example/1\r\n\r\n" as &[u8],
    ]);
    let (leg2, _) = MockConnection::new(&[
        b"HTTP/1.1 301 Moved\r\nLocation: http://b.example/2\r\n\r\n" as &[u8],
    ]);
    let (leg3, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\ndone" as &[u8],
    ]);
    let network = MockNetwork::new(vec![leg1, leg2, leg3]);
    let mut client = Client::new(network);

    let mut request = get("http://example.com/start");
    request.max_redirects = -1;
    let mut response = client.execute(&request).unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.redirect_count, 2);
    assert_eq!(response.read_to_string::<16>().unwrap().as_str(), "done");
}

#[test]
fn redirect_records_scheme_host_port_per_leg() {
    let (leg1, _) = MockConnection::new(&[
        b"HTTP/1.1 302 Found\r\nLocation: https://secure.example/in\r\n\r\n" as &[u8],
    ]);
    let (leg2, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n" as &[u8],
    ]);
    let network = MockNetwork::new(vec![leg1, leg2]);
    let connects = network.connects.clone();
    let mut client = Client::new(network);

    let mut request = get("http://example.com/out");
    request.max_redirects = 1;
    client.execute(&request).unwrap();

    let log = connects.lock().unwrap().clone();
    assert_eq!(
        log,
        vec![
            (Scheme::Http, "example.com".to_string(), 80),
            (Scheme::Https, "secure.example".to_string(), 443),
        ]
    );
}

#[test]
fn close_is_idempotent() {
    let (conn, handles) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/")).unwrap();
    response.close();
    response.close();
    assert_eq!(handles.closes(), 1);
    drop(response);
    assert_eq!(handles.closes(), 1);
}

#[test]
fn header_names_match_case_insensitively_and_store_lowercase() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nCONTENT-LENGTH: 5\r\nX-Device-Id: sensor-7\r\n\r\nhello" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let response = client.execute(&get("http://example.com/")).unwrap();
    assert_eq!(response.content_length, 5);
    assert_eq!(response.headers.len(), 1);
    assert_eq!(response.headers[0].name.as_str(), "x-device-id");
    assert_eq!(response.header("X-DEVICE-ID"), Some("sensor-7"));
    assert_eq!(response.header("x-device-id"), Some("sensor-7"));
}

#[test]
fn content_length_zero_means_empty_complete_body() {
    let (conn, handles) = MockConnection::new(&[
        b"HTTP/1.1 204 No Content\r\nContent-Length: 0\r\n\r\n" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/")).unwrap();
    assert_eq!(response.status_code, 204);
    assert!(response.is_complete);

    let mut buf = [0u8; 8];
    assert_eq!(response.read(&mut buf).unwrap(), 0);
    // No body read was ever attempted.
    assert_eq!(handles.reads(), 1);
}

#[test]
fn gzip_flag_is_recorded_not_acted_on() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\nContent-Length: 3\r\n\r\nabc" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/")).unwrap();
    assert!(response.is_gzip);
    // Bytes come through undecoded.
    assert_eq!(response.read_to_string::<8>().unwrap().as_str(), "abc");
}

#[test]
fn premature_eof_during_headers_is_an_error() {
    let (conn, handles) = MockConnection::new(&[b"HTTP/1.1 200 OK\r\nContent-" as &[u8]]);
    let mut client = Client::new(MockNetwork::single(conn));

    let result = client.execute(&get("http://example.com/"));
    assert_eq!(result.unwrap_err(), Error::IncompleteHeaders);
    assert_eq!(handles.closes(), 1);
}

#[test]
fn short_write_fails_the_leg() {
    let (conn, handles) = MockConnection::with_write_limit(&[b"" as &[u8]], 10);
    let mut client = Client::new(MockNetwork::single(conn));

    let result = client.execute(&get("http://example.com/"));
    assert_eq!(result.unwrap_err(), Error::WriteError);
    assert_eq!(handles.closes(), 1);
}

#[test]
fn malformed_url_is_rejected_up_front() {
    let (conn, _) = MockConnection::new(&[b"" as &[u8]]);
    let mut client = Client::new(MockNetwork::single(conn));

    assert_eq!(
        client.execute(&get("example.com/no-scheme")).unwrap_err(),
        Error::InvalidUrl
    );
    assert_eq!(
        client.execute(&get("http://example.com")).unwrap_err(),
        Error::InvalidUrl
    );
}

#[test]
fn post_sends_body_with_exact_content_length() {
    let (conn, handles) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let payload = br#"{"temp":23.5}"#;
    let mut request = get("http://example.com/v1/data");
    request.method = Method::Post;
    request.body = Some(payload);
    request.content_type = "application/json";
    client.execute(&request).unwrap();

    let wire = handles.written_string();
    assert!(wire.starts_with("POST /v1/data HTTP/1.1\r\n"));
    assert!(wire.contains("Content-Type: application/json\r\n"));
    assert!(wire.contains("Content-Length: 13\r\n"));
    assert!(wire.ends_with("\r\n\r\n{\"temp\":23.5}"));
}

#[test]
fn body_too_large_for_collector_is_reported() {
    let (conn, handles) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/")).unwrap();
    assert_eq!(
        response.read_to_vec::<4>().unwrap_err(),
        Error::BufferOverflow
    );
    // The collector still released the transport.
    assert_eq!(handles.closes(), 1);
}

#[test]
fn partial_reads_resume_where_they_left_off() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n0123456789" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/")).unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(response.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf, b"0123");
    assert_eq!(response.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf, b"4567");
    assert_eq!(response.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], b"89");
    assert!(response.is_complete);
    assert_eq!(response.read(&mut buf).unwrap(), 0);
}

#[test]
fn empty_destination_read_leaves_the_body_intact() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello" as &[u8],
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/")).unwrap();
    let mut empty = [0u8; 0];
    assert_eq!(response.read(&mut empty).unwrap(), 0);
    assert!(!response.is_complete);

    let body = response.read_to_string::<16>().unwrap();
    assert_eq!(body.as_str(), "hello");
    assert!(response.is_complete);
}

#[test]
fn chunked_body_delivered_across_transport_pauses() {
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki" as &[u8],
        b"\r\n5\r\npedia\r\n0\r\n\r\n",
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/w")).unwrap();
    let body = response.read_to_string::<64>().unwrap();
    assert_eq!(body.as_str(), "Wikipedia");
    assert!(response.is_complete);
}

#[test]
fn chunk_trailer_straddling_a_pause_is_recovered() {
    // The pause lands mid-chunk, so the trailing CRLF cannot be consumed
    // without blocking and must be dealt with on the next read.
    let (conn, _) = MockConnection::new(&[
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWi" as &[u8],
        b"ki",
        b"\r\n5\r\npedia\r\n0\r\n\r\n",
    ]);
    let mut client = Client::new(MockNetwork::single(conn));

    let mut response = client.execute(&get("http://example.com/w")).unwrap();
    let body = response.read_to_string::<64>().unwrap();
    assert_eq!(body.as_str(), "Wikipedia");
    assert!(response.is_complete);
}

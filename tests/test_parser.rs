use devserve::http::parser::{MAX_BODY_SIZE, ParseError, parse_http_request};
use devserve::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.header("Host"), Some("localhost"));
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_keeps_query_and_fragment_in_path() {
    let req = b"GET /page.html?x=1#y HTTP/1.1\r\nHost: localhost\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.path, "/page.html?x=1#y");
}

#[test]
fn test_parse_http10_request() {
    let req = b"GET /index.html HTTP/1.0\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.version, "HTTP/1.0");
}

#[test]
fn test_parse_options_preflight() {
    let req = b"OPTIONS /api/login HTTP/1.1\r\nOrigin: http://localhost:5173\r\nAccess-Control-Request-Method: POST\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::OPTIONS);
    assert_eq!(parsed.header("origin"), Some("http://localhost:5173"));
}

#[test]
fn test_parse_pipelined_requests() {
    let req = b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n";
    let (first, consumed) = parse_http_request(req).unwrap();
    let (second, rest) = parse_http_request(&req[consumed..]).unwrap();

    assert_eq!(first.path, "/a");
    assert_eq!(second.path, "/b");
    assert_eq!(consumed + rest, req.len());
}

#[test]
fn test_parse_post_request_with_body() {
    let req = b"POST /api HTTP/1.1\r\ncontent-length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.body, b"hello".to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_incomplete_request() {
    let req = b"GET / HTTP/1.1\r\nHost: localhost\r\n";
    assert_eq!(parse_http_request(req).unwrap_err(), ParseError::Incomplete);

    let req = b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
    assert_eq!(parse_http_request(req).unwrap_err(), ParseError::Incomplete);
}

#[test]
fn test_parse_rejects_unknown_method() {
    let req = b"BREW / HTTP/1.1\r\n\r\n";
    assert_eq!(parse_http_request(req).unwrap_err(), ParseError::InvalidMethod);
}

#[test]
fn test_parse_rejects_malformed_lines() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\n\r\n";
    assert_eq!(parse_http_request(req).unwrap_err(), ParseError::InvalidHeader);

    let req = b"GET /\r\n\r\n";
    assert_eq!(parse_http_request(req).unwrap_err(), ParseError::InvalidRequest);

    let req = b"GET / extra HTTP/1.1\r\n\r\n";
    assert_eq!(parse_http_request(req).unwrap_err(), ParseError::InvalidRequest);
}

#[test]
fn test_parse_rejects_unsupported_version() {
    let req = b"GET / HTTP/2.0\r\n\r\n";
    assert_eq!(
        parse_http_request(req).unwrap_err(),
        ParseError::UnsupportedVersion
    );
}

#[test]
fn test_parse_content_length_errors() {
    let req = b"POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\n";
    assert_eq!(
        parse_http_request(req).unwrap_err(),
        ParseError::InvalidContentLength
    );

    let req = format!(
        "POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        MAX_BODY_SIZE + 1
    );
    assert_eq!(
        parse_http_request(req.as_bytes()).unwrap_err(),
        ParseError::BodyTooLarge
    );
}

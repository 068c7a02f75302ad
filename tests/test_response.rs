use devserve::http::response::{Body, Response, ResponseBuilder, StatusCode, error_page};
use devserve::http::writer::serialize_head;

#[test]
fn test_status_codes() {
    let cases = [
        (StatusCode::Ok, 200, "OK"),
        (StatusCode::MovedPermanently, 301, "Moved Permanently"),
        (StatusCode::Forbidden, 403, "Forbidden"),
        (StatusCode::NotFound, 404, "Not Found"),
        (StatusCode::MethodNotAllowed, 405, "Method Not Allowed"),
        (StatusCode::PayloadTooLarge, 413, "Payload Too Large"),
        (StatusCode::HttpVersionNotSupported, 505, "HTTP Version Not Supported"),
    ];

    for (status, code, reason) in cases {
        assert_eq!(status.as_u16(), code);
        assert_eq!(status.reason_phrase(), reason);
    }
}

#[test]
fn test_response_builder_auto_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .body(b"This is the body".to_vec())
        .build();

    assert_eq!(response.header("content-length"), Some("16"));
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
}

#[test]
fn test_response_builder_preserves_custom_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.header("Content-Length"), Some("999"));
}

#[test]
fn test_response_builder_empty_body() {
    let response = ResponseBuilder::new(StatusCode::NoContent).build();

    assert!(response.body.is_empty());
    assert_eq!(response.header("Content-Length"), Some("0"));
}

#[test]
fn test_response_ok_helper() {
    let response = Response::ok(b"test content".to_vec());

    assert_eq!(response.status, StatusCode::Ok);
    assert!(matches!(&response.body, Body::Bytes(bytes) if bytes == b"test content"));
}

#[test]
fn test_error_pages_are_html() {
    for response in [Response::not_found(), Response::forbidden(), Response::bad_request()] {
        let Body::Bytes(bytes) = &response.body else {
            panic!("error page must be in memory");
        };
        let body = String::from_utf8(bytes.clone()).unwrap();
        assert!(body.contains(&response.status.as_u16().to_string()));
        assert_eq!(
            response.header("Content-Type"),
            Some("text/html; charset=utf-8")
        );
    }
    assert_eq!(
        error_page(StatusCode::InternalServerError).status,
        StatusCode::InternalServerError
    );
}

#[test]
fn test_method_not_allowed_lists_methods() {
    let response = Response::method_not_allowed("GET, HEAD");

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
    assert_eq!(response.header("Allow"), Some("GET, HEAD"));
}

#[test]
fn test_redirect_has_location_and_no_body() {
    let response = Response::redirect("/docs/");

    assert_eq!(response.status, StatusCode::MovedPermanently);
    assert_eq!(response.header("Location"), Some("/docs/"));
    assert!(matches!(response.body, Body::Empty));
}

#[test]
fn test_serialize_head() {
    let response = ResponseBuilder::new(StatusCode::NotFound)
        .header("X-Test", "1")
        .build();
    let head = String::from_utf8(serialize_head(&response)).unwrap();

    assert_eq!(
        head,
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nX-Test: 1\r\n\r\n"
    );
}

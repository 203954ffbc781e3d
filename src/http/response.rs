//! HTTP response building module
//!
//! Every response on the entry path is JSON and carries permissive CORS
//! headers; builders never panic and fall back to a bare response on error.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde_json::json;

use crate::config::HttpConfig;
use crate::store::Record;

pub const ACK_MESSAGE: &str = "Data appended successfully!";
pub const NO_DATA_MESSAGE: &str = "No data found.";
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Common headers for the entry path
fn entry_builder(status: StatusCode, http: &HttpConfig) -> Builder {
    let builder = Response::builder()
        .status(status)
        .header("Server", http.server_name.as_str())
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
        .header("Content-Type", "application/json");

    if http.noindex {
        builder.header("X-Robots-Tag", "noindex, nofollow")
    } else {
        builder
    }
}

/// Build a JSON response from pre-encoded bytes
pub fn build_json_response(
    status: StatusCode,
    body: Bytes,
    http: &HttpConfig,
) -> Response<Full<Bytes>> {
    entry_builder(status, http)
        .header("Content-Length", body.len())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// `{"message": "Data appended successfully!"}`
pub fn build_ack_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    let body = json!({ "message": ACK_MESSAGE }).to_string();
    build_json_response(StatusCode::OK, Bytes::from(body), http)
}

/// Trailing records as a JSON array
pub fn build_entries_response(entries: &[Record], http: &HttpConfig) -> Response<Full<Bytes>> {
    match serde_json::to_vec(entries) {
        Ok(body) => build_json_response(StatusCode::OK, Bytes::from(body), http),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to encode entries: {e}"));
            build_500_response(http)
        }
    }
}

/// Raw log file content, passed through untouched
pub fn build_raw_response(content: Bytes, http: &HttpConfig) -> Response<Full<Bytes>> {
    build_json_response(StatusCode::OK, content, http)
}

/// `{"error": ...}` with the given status
pub fn build_error_response(
    status: StatusCode,
    message: &str,
    http: &HttpConfig,
) -> Response<Full<Bytes>> {
    let body = json!({ "error": message }).to_string();
    build_json_response(status, Bytes::from(body), http)
}

/// Missing log in raw mode; status stays 200
pub fn build_no_data_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    build_error_response(StatusCode::OK, NO_DATA_MESSAGE, http)
}

pub fn build_400_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    build_error_response(StatusCode::BAD_REQUEST, "Bad request.", http)
}

pub fn build_404_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, "Not found.", http)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    let body = json!({ "error": "Method not allowed." }).to_string();
    entry_builder(StatusCode::METHOD_NOT_ALLOWED, http)
        .header("Allow", ALLOWED_METHODS)
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

pub fn build_413_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    build_error_response(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large.", http)
}

pub fn build_500_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    build_error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error",
        http,
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    entry_builder(StatusCode::NO_CONTENT, http)
        .header("Allow", ALLOWED_METHODS)
        .header("Access-Control-Max-Age", "86400")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build health check response
pub fn build_health_response(status: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(status.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

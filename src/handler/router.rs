//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: health probes, path check, then a
//! fixed dispatch on the method (GET reads, POST appends, OPTIONS preflight).

use crate::config::AppState;
use crate::handler::{ingest, retrieve};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Boxed error produced by request bodies
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let access_log = state.cached_access_log.load(Ordering::Relaxed);

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    if access_log {
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = format_version(req.version());
        entry.user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
    }

    let response = route_request(req, &state).await;

    if access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().map_or(0, |n| {
            usize::try_from(n).unwrap_or(usize::MAX)
        });
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and method
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let http_config = &state.config.http;
    let path = req.uri().path();

    // Health check endpoints (highest priority, always fast)
    let health = &http_config.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_health_response("ok");
    }

    if path != http_config.entry_path {
        return http::build_404_response(http_config);
    }

    let method = req.method().clone();
    match method {
        Method::GET => retrieve::handle_get(req.uri().query(), state).await,
        Method::POST => {
            if let Some(resp) = check_body_size(&req, http_config) {
                return resp;
            }
            let body = req.into_body();
            ingest::handle_post(body, state).await
        }
        Method::OPTIONS => http::build_options_response(http_config),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response(http_config)
        }
    }
}

/// Reject a declared Content-Length above the limit before reading the body
fn check_body_size<B>(
    req: &Request<B>,
    http_config: &crate::config::HttpConfig,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let size = content_length.to_str().ok()?.trim().parse::<u64>().ok()?;
    if size > http_config.max_body_size {
        logger::log_error(&format!(
            "Request body too large: {size} bytes (max: {})",
            http_config.max_body_size
        ));
        return Some(http::build_413_response(http_config));
    }
    None
}

fn format_version(version: hyper::Version) -> String {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
    .to_string()
}

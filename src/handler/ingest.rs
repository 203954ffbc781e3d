//! POST: append one record to the entry log

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::Response;

use super::router::BoxError;
use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::payload;

enum BodyError {
    TooLarge,
    Read(BoxError),
}

pub async fn handle_post<B>(body: B, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let http_config = &state.config.http;

    let bytes = match read_body(body, http_config.max_body_size).await {
        Ok(bytes) => bytes,
        Err(BodyError::TooLarge) => {
            logger::log_error(&format!(
                "Request body exceeds {} bytes",
                http_config.max_body_size
            ));
            return http::build_413_response(http_config);
        }
        Err(BodyError::Read(e)) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return http::build_400_response(http_config);
        }
    };

    let record = payload::normalize(&bytes);
    match state.store.append(record).await {
        Ok(()) => http::build_ack_response(http_config),
        Err(e) => {
            logger::log_error(&format!("Failed to append record: {e}"));
            http::build_500_response(http_config)
        }
    }
}

/// Collect the whole body, refusing more than `max_size` bytes
async fn read_body<B>(body: B, max_size: u64) -> Result<Bytes, BodyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(BodyError::TooLarge),
        Err(e) => Err(BodyError::Read(e)),
    }
}

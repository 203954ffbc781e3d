//! GET: read back the entry log

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::{AppState, ReadMode};
use crate::http;
use crate::logger;

pub async fn handle_get(query: Option<&str>, state: &AppState) -> Response<Full<Bytes>> {
    let http_config = &state.config.http;

    match state.config.store.read_mode {
        ReadMode::Recent => {
            let limit = http::parse_limit(query, state.config.store.default_limit);
            match state.store.read_recent(limit).await {
                Ok(entries) => http::build_entries_response(&entries, http_config),
                Err(e) => {
                    logger::log_error(&format!("Failed to read entry log: {e}"));
                    http::build_500_response(http_config)
                }
            }
        }
        ReadMode::Raw => match state.store.read_raw().await {
            Ok(Some(content)) => http::build_raw_response(content, http_config),
            Ok(None) => http::build_no_data_response(http_config),
            Err(e) => {
                logger::log_error(&format!("Failed to read entry log: {e}"));
                http::build_500_response(http_config)
            }
        },
    }
}

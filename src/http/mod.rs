//! HTTP protocol layer module
//!
//! Response builders and query string parsing, decoupled from the handlers.

pub mod query;
pub mod response;

// Re-export commonly used types
pub use query::parse_limit;
pub use response::{
    build_400_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_ack_response, build_entries_response, build_health_response,
    build_no_data_response, build_options_response, build_raw_response,
};

//! Request handler module
//!
//! Routes requests on the entry path to the ingestion (POST) and retrieval
//! (GET) handlers.

mod ingest;
mod retrieve;
pub mod router;

// Re-export main entry point
pub use router::handle_request;

//! DPFrame Server
//!
//! HTTP adapter for the framing pipeline: accepts one photo per request
//! as multipart form data and responds with the framed variants, either
//! inline as base64 data URLs or persisted under a public uploads path.

pub mod routes;

pub use routes::{router, AppState};

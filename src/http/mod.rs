//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by the request handler: MIME resolution,
//! range parsing, conditional request handling, response building and the
//! cross-origin isolation header injection point.

pub mod cache;
pub mod isolation;
pub mod mime;
pub mod range;
pub mod response;

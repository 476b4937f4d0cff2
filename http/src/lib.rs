//! JSON surface of the Connect dashboard.
//!
//! - `GET /healthz`
//! - `GET /api/metrics`: every metrics aggregate, fetched per request
//! - `GET /api/system-info`: server, license and runtime record for the visitor
//! - `GET /api/visitor-auth`: whether the visitor's session can be exchanged for API credentials

#[macro_use]
extern crate tracing;

pub mod error;
pub mod handlers;
pub mod router;

//! # Connect Dashboard Admin
//!
//! Client for the administrative API of a Connect server.
//!
//! - **`client`**: [`AdminClient`], API key authentication and the visitor token exchange
//! - **`cache`**: [`ClientCache`], visitor clients per session token with a time-to-live
//! - **`settings`**: typed server settings and runtime installations
//! - **`system_info`**: the product, license and runtime record shown by the dashboard

#[macro_use]
extern crate tracing;

pub mod cache;
pub mod client;
pub mod error;
pub mod settings;
pub mod system_info;

pub use cache::{
    ClientCache,
    ClientKey,
};
pub use client::AdminClient;
pub use error::AdminError;
pub use settings::{
    Installations,
    Runtime,
    ServerSettings,
};
pub use system_info::{
    system_info,
    SystemInfo,
};

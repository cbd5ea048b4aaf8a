//! HTTP client for the Recipe Sniper API.
//!
//! [`client`] holds the request plumbing, [`types`] the wire format. The API
//! speaks camelCase JSON; failures carry an `error` string field that the
//! client surfaces verbatim.

#[allow(clippy::module_inception)]
pub mod client;
pub mod types;

pub use client::SniperClient;

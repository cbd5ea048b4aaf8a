//! Recipe Sniper terminal client.
//!
//! Scrape recipes by URL, browse and search them, and assemble editable
//! shopping lists against the Recipe Sniper REST API. The [`api`] module
//! talks to the backend, [`tui`] holds the interactive views, and [`export`]
//! renders a list into a printable HTML document.

pub mod api;
pub mod error;
pub mod export;
pub mod tui;

pub use api::SniperClient;

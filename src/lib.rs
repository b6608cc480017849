//! Watches classified-ad RSS feeds for underpriced antiques and collectibles.
//!
//! Each listing is scored against weighted keyword tables, priced against sold
//! listings on a marketplace search, and sent to Telegram when the estimated value
//! is far above the asking price.

pub mod api;
pub mod core;
pub mod scanner;
pub mod scoring;
pub mod store;

//! Flash News - a news site front-end over a single JSON feed
//!
//! This crate proxies one upstream feed (news, blogs, videos, galleries),
//! normalizes it into typed records and renders it as server-side pages.

pub mod config;
pub mod content;
pub mod error;
pub mod routes;
pub mod upstream;
pub mod utils;
pub mod views;

//! HTTP inbound adapter: page bootstraps, JSON endpoints and the plumbing
//! they share (sessions, signed URLs, error mapping).

pub mod auth;
pub mod bookmarks;
pub mod cache_control;
pub mod caches;
pub mod discoveries;
pub mod dto;
pub mod error;
pub mod health;
pub mod pages;
pub mod routes;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod url_signer;
pub mod users;
pub mod validation;

//! HTTP front end for contentmix.
//!
//! `GET /?count=N&offset=O` answers with the JSON array produced by
//! [`contentmix::Mixer::fetch`]. The caller identity handed to providers is the
//! first `X-Forwarded-For` value, or the peer address when the header is absent.

pub mod config;
pub mod web;

pub use config::Config;
pub use web::{AppState, app, router};

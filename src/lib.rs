//! spurgo: an edge-cache purge sidecar for a publishing platform.
//!
//! The platform reports content status transitions over a webhook; spurgo
//! maps them onto per-URL, per-host or site-wide purges against the remote
//! edge-cache API and keeps a bounded history of every attempt.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;

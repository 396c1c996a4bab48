//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Persistent key/value storage backends (the client-side stand-in for
//!   browser local storage) with environment probing
//! - Outbound HTTP client construction (cookie jar, timeout, user agent)

pub mod http;
pub mod storage;

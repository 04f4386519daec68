//! In-process ad server implementations
//!
//! - [`CannedAdServer`]: serves pre-staged payloads from a queue

pub mod canned;

pub use canned::CannedAdServer;

//! HTTP client layer — `SigningHttp`, the single chokepoint for API calls.

pub mod client;

pub use client::{error_message, Bearer, BinaryResponse, SigningHttp};

//! HTTP client for the remote user-directory API.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

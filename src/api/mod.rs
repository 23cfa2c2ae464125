//! API client module for communicating with the GitHub REST API.

mod client;

pub use client::ApiClient;

pub mod auth;
pub mod client;
pub mod error;

pub use client::GcpClient;
pub use error::{GcpError, Result};

use std::time::Duration;

pub const DEFAULT_COMPUTE_ENDPOINT: &str = "https://compute.googleapis.com/compute/v1";

pub struct ClientConfig<A: auth::AuthProvider + 'static> {
    pub auth_provider: A,
    pub timeout: Duration,
    /// Overrides the public API endpoint. Used for emulators and tests.
    pub endpoint: Option<String>,
}

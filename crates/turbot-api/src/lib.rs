// turbot-api: Async Rust client for the Turbot workspace REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::TurbotClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::ControlSelector;

//! Client configuration: TOML schema, loader, and secret handling

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ClientConfig, CredentialsConfig, EndpointConfig, HttpConfig, PollingConfig, RetryConfig,
};
pub use secret::{SecretString, SecretValue};

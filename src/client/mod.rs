//! Endpoint, REST transport and asynchronous-operation polling

pub mod endpoint;
pub mod poll;
pub mod rest;

pub use endpoint::Endpoint;
pub use poll::{FutureResult, PollHandler, PollResponse, SimplePollHandler};
pub use rest::RestClient;

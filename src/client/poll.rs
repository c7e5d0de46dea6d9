//! Polling of long-running asynchronous platform operations
//!
//! Fire-and-poll endpoints answer the initial POST with a task URI. A
//! [`FutureResult`] wraps that URI together with a [`PollHandler`] that
//! classifies each poll response and produces the final value once the
//! operation is done. The default classification ([`SimplePollHandler`])
//! maps 200 to finished and 202 to pending; report export and process
//! execution install their own handlers with wider mappings.

use crate::client::RestClient;
use crate::domain::{GoodDataError, RestApiError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// One observed response of a status URI poll
#[derive(Debug)]
pub struct PollResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl PollResponse {
    /// Builds a poll response from a status and raw body
    pub fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GoodDataError::Connection(e.to_string()))?
            .to_vec();
        Ok(Self::new(status, body))
    }

    /// HTTP status of the poll
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw response body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Deserializes the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| GoodDataError::Serialization(format!("Invalid poll response: {e}")))
    }

    /// Translates this response into a REST error
    pub fn to_rest_error(&self) -> RestApiError {
        RestApiError::from_body(self.status.as_u16(), &self.body)
    }
}

/// Classifies poll responses and produces the final value of an operation
#[async_trait]
pub trait PollHandler<T: Send>: Send + Sync {
    /// Status URI polled on a fixed interval
    fn polling_uri(&self) -> &str;

    /// Whether this poll response means the operation finished
    ///
    /// Returning an error aborts the poll loop (e.g. a report with no data).
    fn is_finished(&self, response: &PollResponse) -> Result<bool>;

    /// Produces the final value once [`is_finished`](Self::is_finished) said so
    ///
    /// Receives the finishing response plus the client for handlers that need
    /// a follow-up request (document download, execution detail).
    async fn on_finish(&self, client: &RestClient, response: PollResponse) -> Result<T>;
}

/// Default handler: 200 finishes with the deserialized body, 202 keeps polling
pub struct SimplePollHandler<T> {
    uri: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SimplePollHandler<T> {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T> PollHandler<T> for SimplePollHandler<T>
where
    T: DeserializeOwned + Send + Sync,
{
    fn polling_uri(&self) -> &str {
        &self.uri
    }

    fn is_finished(&self, response: &PollResponse) -> Result<bool> {
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::ACCEPTED => Ok(false),
            _ => Err(response.to_rest_error().into()),
        }
    }

    async fn on_finish(&self, _client: &RestClient, response: PollResponse) -> Result<T> {
        response.json()
    }
}

/// Handle on a server-side asynchronous operation
///
/// Obtained from service methods that fire an operation. Poll once with
/// [`is_done`](Self::is_done) or block on the value with
/// [`wait_for`](Self::wait_for). Dropping the handle abandons the operation;
/// the platform offers no cancellation.
pub struct FutureResult<T: Send> {
    client: RestClient,
    handler: Box<dyn PollHandler<T>>,
    result: Option<T>,
}

impl<T: Send> FutureResult<T> {
    pub fn new(client: RestClient, handler: Box<dyn PollHandler<T>>) -> Self {
        Self {
            client,
            handler,
            result: None,
        }
    }

    /// Status URI this result polls
    pub fn polling_uri(&self) -> &str {
        self.handler.polling_uri()
    }

    /// Performs a single poll
    ///
    /// Finished is sticky: once the operation completed, the value is cached
    /// and no further request is made.
    pub async fn is_done(&mut self) -> Result<bool> {
        if self.result.is_some() {
            return Ok(true);
        }

        let uri = self.handler.polling_uri().to_string();
        let response =
            PollResponse::from_response(self.client.get_response(&uri).await?).await?;

        tracing::debug!(uri = %uri, status = response.status().as_u16(), "Polled operation");

        if self.handler.is_finished(&response)? {
            let value = self.handler.on_finish(&self.client, response).await?;
            self.result = Some(value);
            return Ok(true);
        }
        Ok(false)
    }

    /// Polls until the operation reaches a terminal state
    ///
    /// Sleeps the client's poll interval between attempts and gives up with a
    /// polling error after the configured number of attempts.
    pub async fn wait_for(mut self) -> Result<T> {
        let uri = self.polling_uri().to_string();
        let interval = self.client.poll_interval();
        let max_attempts = self.client.max_poll_attempts();

        for attempt in 1..=max_attempts {
            if self.is_done().await? {
                return self.result.take().ok_or_else(|| {
                    GoodDataError::Polling(format!("{uri} finished without a result"))
                });
            }
            tracing::debug!(uri = %uri, attempt = attempt, "Operation still running");
            tokio::time::sleep(interval).await;
        }

        Err(GoodDataError::Polling(format!(
            "Gave up polling {uri} after {max_attempts} attempts"
        )))
    }
}

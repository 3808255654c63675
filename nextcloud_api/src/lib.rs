//! Rust bindings to the Nextcloud API.
//!
//! Every API action is a value implementing [`RemoteOperation`]. Executing it against a
//! [`Client`] performs a single request and returns a [`RemoteOperationResult`], which is never
//! an error: transport and parse failures are captured in the result instead.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

use async_trait::async_trait;
use std::result::Result as StdResult;

pub use client::{Client, ClientOptions, Credentials};
pub use error::Error;
pub use result::RemoteOperationResult;

#[macro_use]
mod util;

mod client;
mod error;
mod result;
mod webdav;

pub mod assistant;
pub mod files;
pub mod status;
pub mod tags;

/// Type alias for `Result<T, Error>`.
pub type Result<T> = StdResult<T, Error>;

/// Trait for an action on the server.
#[async_trait]
pub trait RemoteOperation: Sync {
    /// The payload of a successful result.
    type Output: Send;

    /// Performs the request and checks the response.
    ///
    /// Errors returned here are turned into a failed [`RemoteOperationResult`] by
    /// [`execute`](Self::execute).
    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>>;

    /// Executes the operation.
    async fn execute(&self, client: &Client) -> RemoteOperationResult<Self::Output> {
        let operation = std::any::type_name::<Self>();
        let result = self
            .run(client)
            .await
            .unwrap_or_else(RemoteOperationResult::from_error);
        match &result {
            RemoteOperationResult::Success { status, .. } => {
                log::debug!("{} finished with status {}", operation, status);
            }
            RemoteOperationResult::Failure {
                log_message,
                error: Some(_),
                ..
            } => log::error!("{} failed: {}", operation, log_message),
            RemoteOperationResult::Failure { log_message, .. } => {
                log::warn!("{} failed: {}", operation, log_message)
            }
        }
        result
    }
}

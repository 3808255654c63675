//! Module for tasks of the assistant app.

use crate::util::ResponseExt;
use crate::{Client, Error, RemoteOperation, RemoteOperationResult, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};

/// Deletes a text processing task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeleteTask {
    pub task_id: u64,
}

impl DeleteTask {
    /// Creates a new [`DeleteTask`].
    pub fn new(task_id: u64) -> Self {
        Self { task_id }
    }
}

#[async_trait]
impl RemoteOperation for DeleteTask {
    type Output = ();

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        if self.task_id == 0 {
            return Err(Error::InvalidArgument("task id must not be zero"));
        }
        Ok(client
            .ocs_request(
                Method::DELETE,
                path!("textprocessing", "task", self.task_id),
            )?
            .send()
            .await?
            .into_status_result(|v| v == StatusCode::OK))
    }
}

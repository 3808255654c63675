use crate::{RemoteOperationResult, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};

/// Builds a list of URL path segments from displayable values.
macro_rules! path {
    ($($segment:expr),* $(,)?) => {
        vec![$($segment.to_string()),*]
    };
}

pub fn propfind() -> Method {
    Method::from_bytes(b"PROPFIND").unwrap()
}

pub fn mkcol() -> Method {
    Method::from_bytes(b"MKCOL").unwrap()
}

pub fn is_multi_status(status: StatusCode) -> bool {
    status == StatusCode::MULTI_STATUS
}

#[async_trait]
pub trait ResponseExt {
    /// Checks the status code of a response without a meaningful body.
    fn into_status_result(self, accepted: fn(StatusCode) -> bool) -> RemoteOperationResult<()>;

    /// Reads the body and hands it to `parse` if the status code is accepted.
    async fn parse_text<T, F>(
        self,
        accepted: fn(StatusCode) -> bool,
        parse: F,
    ) -> Result<RemoteOperationResult<T>>
    where
        T: Send,
        F: FnOnce(&str) -> Result<T> + Send;
}

#[async_trait]
impl ResponseExt for reqwest::Response {
    fn into_status_result(self, accepted: fn(StatusCode) -> bool) -> RemoteOperationResult<()> {
        RemoteOperationResult::from_status(self.status(), accepted, || ())
    }

    async fn parse_text<T, F>(
        self,
        accepted: fn(StatusCode) -> bool,
        parse: F,
    ) -> Result<RemoteOperationResult<T>>
    where
        T: Send,
        F: FnOnce(&str) -> Result<T> + Send,
    {
        let status = self.status();
        if !accepted(status) {
            return Ok(RemoteOperationResult::rejected(status));
        }
        let body = self.text().await?;
        Ok(match parse(&body) {
            Ok(data) => RemoteOperationResult::Success { status, data },
            Err(e) => RemoteOperationResult::from_error_with_status(Some(status), e),
        })
    }
}

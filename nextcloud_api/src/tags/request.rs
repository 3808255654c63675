use crate::tags::{parse_tags, propfind_body, Tag};
use crate::util::{self, ResponseExt};
use crate::{Client, Error, RemoteOperation, RemoteOperationResult, Result};
use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTagRequestModel<'a> {
    name: &'a str,
    user_visible: bool,
    user_assignable: bool,
}

/// Creates a system tag that is visible to and assignable by users.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreateTag {
    pub name: String,
}

impl CreateTag {
    /// Creates a new [`CreateTag`].
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl RemoteOperation for CreateTag {
    type Output = ();

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidArgument("tag name must not be empty"));
        }
        Ok(client
            .request(
                Method::POST,
                client.url(path!("remote.php", "dav", "systemtags"))?,
            )
            .json(&CreateTagRequestModel {
                name: &self.name,
                user_visible: true,
                user_assignable: true,
            })
            .send()
            .await?
            .into_status_result(|v| v == StatusCode::CREATED))
    }
}

/// Lists all system tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GetTags;

#[async_trait]
impl RemoteOperation for GetTags {
    type Output = Vec<Tag>;

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        client
            .request(
                util::propfind(),
                client.url(path!("remote.php", "dav", "systemtags", ""))?,
            )
            .header("Depth", "1")
            .header(header::CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(propfind_body())
            .send()
            .await?
            .parse_text(util::is_multi_status, parse_tags)
            .await
    }
}

/// Assigns a system tag to a file.
///
/// Assigning a tag that is already assigned succeeds as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PutTag {
    pub tag_id: u64,
    pub file_id: u64,
}

impl PutTag {
    /// Creates a new [`PutTag`].
    pub fn new(tag_id: u64, file_id: u64) -> Self {
        Self { tag_id, file_id }
    }
}

#[async_trait]
impl RemoteOperation for PutTag {
    type Output = ();

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        if self.tag_id == 0 {
            return Err(Error::InvalidArgument("tag id must not be zero"));
        }
        if self.file_id == 0 {
            return Err(Error::InvalidArgument("file id must not be zero"));
        }
        let url = client.url(path!(
            "remote.php",
            "dav",
            "systemtags-relations",
            "files",
            self.file_id,
            self.tag_id
        ))?;
        Ok(client
            .request(Method::PUT, url)
            .send()
            .await?
            // 409 means that the tag is already assigned
            .into_status_result(|v| v == StatusCode::CREATED || v == StatusCode::CONFLICT))
    }
}

/// Deletes a system tag, which also removes it from all files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeleteTag {
    pub tag_id: u64,
}

impl DeleteTag {
    /// Creates a new [`DeleteTag`].
    pub fn new(tag_id: u64) -> Self {
        Self { tag_id }
    }
}

#[async_trait]
impl RemoteOperation for DeleteTag {
    type Output = ();

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        if self.tag_id == 0 {
            return Err(Error::InvalidArgument("tag id must not be zero"));
        }
        Ok(client
            .request(
                Method::DELETE,
                client.url(path!("remote.php", "dav", "systemtags", self.tag_id))?,
            )
            .send()
            .await?
            .into_status_result(|v| v == StatusCode::NO_CONTENT))
    }
}

use crate::client::check_remote_path;
use crate::files::{parse_listing, propfind_body, RemoteFile};
use crate::status::Capability;
use crate::util::{self, ResponseExt};
use crate::{Client, Error, RemoteOperation, RemoteOperationResult, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_setters::Setters;
use reqwest::{header, Method, StatusCode};
use std::path::PathBuf;

async fn read<T, F>(
    client: &Client,
    remote_path: &str,
    depth: &str,
    convert: F,
) -> Result<RemoteOperationResult<T>>
where
    T: Send,
    F: FnOnce(Vec<RemoteFile>) -> Result<T> + Send,
{
    let with_tags = client.supports(Capability::FileTags);
    let files_root = client.files_root()?;
    client
        .request(util::propfind(), client.files_url(remote_path)?)
        .header("Depth", depth)
        .header(header::CONTENT_TYPE, "application/xml; charset=utf-8")
        .body(propfind_body(with_tags))
        .send()
        .await?
        .parse_text(util::is_multi_status, |body| {
            convert(parse_listing(body, &files_root, with_tags)?)
        })
        .await
}

/// Lists a folder.
///
/// The first entry of the result is the folder itself, followed by its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadFolder {
    /// Path of the folder, always ending with `/`.
    pub remote_path: String,
}

impl ReadFolder {
    /// Creates a new [`ReadFolder`]. A missing trailing `/` is appended.
    pub fn new<S: Into<String>>(remote_path: S) -> Self {
        let mut remote_path = remote_path.into();
        if !remote_path.ends_with('/') {
            remote_path.push('/');
        }
        Self { remote_path }
    }
}

#[async_trait]
impl RemoteOperation for ReadFolder {
    type Output = Vec<RemoteFile>;

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        read(client, &self.remote_path, "1", Ok).await
    }
}

/// Reads the properties of a single file or folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadFile {
    pub remote_path: String,
}

impl ReadFile {
    /// Creates a new [`ReadFile`].
    pub fn new<S: Into<String>>(remote_path: S) -> Self {
        Self {
            remote_path: remote_path.into(),
        }
    }
}

#[async_trait]
impl RemoteOperation for ReadFile {
    type Output = RemoteFile;

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        read(client, &self.remote_path, "0", |files| {
            files.into_iter().next().ok_or(Error::EmptyResponse)
        })
        .await
    }
}

/// Creates a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Setters)]
#[setters(prefix = "with_")]
pub struct CreateFolder {
    #[setters(skip)]
    pub remote_path: String,
    /// Whether missing parent folders are created as well.
    #[setters(bool)]
    pub create_full_path: bool,
}

impl CreateFolder {
    /// Creates a new [`CreateFolder`].
    pub fn new<S: Into<String>>(remote_path: S) -> Self {
        Self {
            remote_path: remote_path.into(),
            create_full_path: false,
        }
    }
}

/// Returns the paths of all parent folders below the root, outermost first.
fn ancestors(remote_path: &str) -> Vec<&str> {
    remote_path
        .trim_end_matches('/')
        .match_indices('/')
        .skip(1)
        .map(|(i, _)| &remote_path[..=i])
        .collect()
}

#[async_trait]
impl RemoteOperation for CreateFolder {
    type Output = ();

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        let url = client.files_url(&self.remote_path)?;
        if self.create_full_path {
            for ancestor in ancestors(&self.remote_path) {
                let status = client
                    .request(util::mkcol(), client.files_url(ancestor)?)
                    .send()
                    .await?
                    .status();
                // 405 means that the folder exists already
                if status != StatusCode::CREATED && status != StatusCode::METHOD_NOT_ALLOWED {
                    return Ok(RemoteOperationResult::rejected(status));
                }
            }
        }
        Ok(client
            .request(util::mkcol(), url)
            .send()
            .await?
            .into_status_result(|v| v == StatusCode::CREATED))
    }
}

/// Uploads a local file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadFile {
    pub local_path: PathBuf,
    pub remote_path: String,
    pub mime_type: String,
    /// Modification time stored on the server.
    pub modified: DateTime<Utc>,
}

impl UploadFile {
    /// Creates a new [`UploadFile`].
    pub fn new<P, R, M>(local_path: P, remote_path: R, mime_type: M, modified: DateTime<Utc>) -> Self
    where
        P: Into<PathBuf>,
        R: Into<String>,
        M: Into<String>,
    {
        Self {
            local_path: local_path.into(),
            remote_path: remote_path.into(),
            mime_type: mime_type.into(),
            modified,
        }
    }
}

#[async_trait]
impl RemoteOperation for UploadFile {
    type Output = ();

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        if self.remote_path.ends_with('/') {
            return Err(Error::InvalidPath(self.remote_path.clone()));
        }
        let url = client.files_url(&self.remote_path)?;
        let body = tokio::fs::read(&self.local_path).await?;
        Ok(client
            .request(Method::PUT, url)
            .header(header::CONTENT_TYPE, self.mime_type.as_str())
            .header("X-OC-MTime", self.modified.timestamp().to_string())
            .header("OC-Total-Length", body.len().to_string())
            .body(body)
            .send()
            .await?
            // 204 is returned when an existing file is overwritten
            .into_status_result(|v| v == StatusCode::CREATED || v == StatusCode::NO_CONTENT))
    }
}

/// Deletes a file or folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoveFile {
    pub remote_path: String,
}

impl RemoveFile {
    /// Creates a new [`RemoveFile`].
    pub fn new<S: Into<String>>(remote_path: S) -> Self {
        Self {
            remote_path: remote_path.into(),
        }
    }
}

#[async_trait]
impl RemoteOperation for RemoveFile {
    type Output = ();

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        check_remote_path(&self.remote_path)?;
        if self.remote_path == "/" {
            return Err(Error::InvalidPath(self.remote_path.clone()));
        }
        Ok(client
            .request(Method::DELETE, client.files_url(&self.remote_path)?)
            .send()
            .await?
            .into_status_result(|v| v == StatusCode::NO_CONTENT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestors_of_nested_folder() {
        assert_eq!(ancestors("/a/b/c/"), vec!["/a/", "/a/b/"]);
        assert_eq!(ancestors("/a/b/c.txt"), vec!["/a/", "/a/b/"]);
        assert!(ancestors("/test/").is_empty());
        assert!(ancestors("/").is_empty());
    }

    #[test]
    fn folder_path_ends_with_slash() {
        assert_eq!(ReadFolder::new("/test").remote_path, "/test/");
        assert_eq!(ReadFolder::new("/test/").remote_path, "/test/");
        assert_eq!(ReadFolder::new("/").remote_path, "/");
    }

    #[test]
    fn create_full_path_setter() {
        let operation = CreateFolder::new("/a/b/").with_create_full_path();
        assert!(operation.create_full_path);
        assert_eq!(operation.remote_path, "/a/b/");
    }
}

use displaydoc::Display;
use reqwest::StatusCode;
use thiserror::Error as ThisError;

/// Errors that can occur while interacting with the Nextcloud API.
#[derive(Debug, Display, ThisError)]
pub enum Error {
    /// Failed to send request.
    Request(#[from] reqwest::Error),
    /// Failed to parse URL.
    ParseUrl(#[from] url::ParseError),
    /// Failed to parse XML response.
    Xml(#[from] quick_xml::Error),
    /// Failed to parse JSON response.
    Json(#[from] serde_json::Error),
    /// Failed to read local file.
    Io(#[from] std::io::Error),
    /// Remote path `{0}` is not absolute.
    InvalidPath(String),
    /// Invalid argument: {0}.
    InvalidArgument(&'static str),
    /// Response for `{href}` is missing the `{property}` property.
    MissingProperty { href: String, property: &'static str },
    /// Response for `{href}` has an invalid `{property}` property: `{value}`.
    InvalidProperty {
        href: String,
        property: &'static str,
        value: String,
    },
    /// Invalid server version `{0}`.
    InvalidVersion(String),
    /// Server returned an empty multi-status response.
    EmptyResponse,
}

impl Error {
    /// Returns the HTTP status code attached to this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Request(e) => e.status(),
            _ => None,
        }
    }
}

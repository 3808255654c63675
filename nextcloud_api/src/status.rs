//! Module for the server status and version-gated capabilities.

use crate::util::ResponseExt;
use crate::{Client, Error, RemoteOperation, RemoteOperationResult, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::{fmt, str::FromStr};

/// Version of a Nextcloud server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct NextcloudVersion {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl NextcloudVersion {
    pub const NEXTCLOUD_24: Self = Self::new(24, 0, 0);
    pub const NEXTCLOUD_25: Self = Self::new(25, 0, 0);
    pub const NEXTCLOUD_26: Self = Self::new(26, 0, 0);
    pub const NEXTCLOUD_27: Self = Self::new(27, 0, 0);
    pub const NEXTCLOUD_28: Self = Self::new(28, 0, 0);

    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }

    /// Returns whether a server of this version provides the given capability.
    pub fn supports(&self, capability: Capability) -> bool {
        *self >= capability.min_version()
    }
}

impl FromStr for NextcloudVersion {
    type Err = Error;

    /// Parses a dotted version string such as `27.1.3.2`. Components after the third are
    /// ignored and missing components default to zero.
    fn from_str(s: &str) -> Result<Self> {
        let mut components = s.trim().split('.').map(|v| v.parse::<u32>());
        let mut next = |required: bool| match components.next() {
            Some(Ok(v)) => Ok(v),
            None if !required => Ok(0),
            _ => Err(Error::InvalidVersion(s.to_owned())),
        };
        Ok(Self {
            major: next(true)?,
            minor: next(false)?,
            micro: next(false)?,
        })
    }
}

impl TryFrom<String> for NextcloudVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<NextcloudVersion> for String {
    fn from(value: NextcloudVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for NextcloudVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

/// A feature that is only available from a certain server version onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// System tags are included in folder listings.
    FileTags,
}

impl Capability {
    /// Returns the first server version that provides this capability.
    pub fn min_version(self) -> NextcloudVersion {
        match self {
            Self::FileTags => NextcloudVersion::NEXTCLOUD_27,
        }
    }
}

/// Status information published by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub installed: bool,
    pub maintenance: bool,
    pub version: NextcloudVersion,
    #[serde(rename = "versionstring")]
    pub version_string: String,
    #[serde(rename = "productname", default)]
    pub product_name: String,
    #[serde(default)]
    pub extended_support: bool,
}

/// Retrieves the [`ServerStatus`] from `status.php`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GetStatus;

#[async_trait]
impl RemoteOperation for GetStatus {
    type Output = ServerStatus;

    async fn run(&self, client: &Client) -> Result<RemoteOperationResult<Self::Output>> {
        client
            .request(Method::GET, client.url(path!("status.php"))?)
            .send()
            .await?
            .parse_text(
                |v| v == StatusCode::OK,
                |body| Ok(serde_json::from_str(body)?),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_version() {
        let version = "27.1.3.2".parse::<NextcloudVersion>().unwrap();
        assert_eq!(version, NextcloudVersion::new(27, 1, 3));
        assert_eq!(version.to_string(), "27.1.3");
        assert_eq!(
            "26".parse::<NextcloudVersion>().unwrap(),
            NextcloudVersion::NEXTCLOUD_26
        );
        assert!("".parse::<NextcloudVersion>().is_err());
        assert!("27.x".parse::<NextcloudVersion>().is_err());
    }

    #[test]
    fn file_tags_need_nextcloud_27() {
        assert!(!NextcloudVersion::new(26, 0, 10).supports(Capability::FileTags));
        assert!(NextcloudVersion::NEXTCLOUD_27.supports(Capability::FileTags));
        assert!(NextcloudVersion::new(28, 0, 1).supports(Capability::FileTags));
    }

    #[test]
    fn deserialize_status() {
        let status: ServerStatus = serde_json::from_str(
            r#"{"installed":true,"maintenance":false,"needsDbUpgrade":false,
                "version":"27.1.3.2","versionstring":"27.1.3","edition":"",
                "productname":"Nextcloud","extendedSupport":false}"#,
        )
        .unwrap();
        assert!(status.installed);
        assert_eq!(status.version, NextcloudVersion::new(27, 1, 3));
        assert_eq!(status.product_name, "Nextcloud");
    }
}

use crate::status::{Capability, NextcloudVersion};
use crate::{Error, RemoteOperation, RemoteOperationResult, Result};
use derive_setters::Setters;
use reqwest::{header, Method, RequestBuilder};
use std::{fmt, time::Duration};
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("nextcloud_api/", env!("CARGO_PKG_VERSION"));

/// Credentials used for authenticating against the server.
///
/// The password can be the account password or an app password.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
}

impl Credentials {
    /// Creates new [`Credentials`].
    pub fn new<U, P>(user_id: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            user_id: user_id.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Options for creating a [`Client`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Setters)]
#[setters(strip_option, prefix = "with_")]
pub struct ClientOptions {
    /// The user agent sent with every request.
    #[setters(into)]
    pub user_agent: Option<String>,
    /// Timeout of a whole request, from connecting until the body has been read.
    pub timeout: Option<Duration>,
    /// PEM encoded certificates that are trusted in addition to the system roots.
    #[setters(skip)]
    pub trusted_certificates: Vec<Vec<u8>>,
    /// The version of the server, if it is already known.
    pub server_version: Option<NextcloudVersion>,
}

impl ClientOptions {
    /// Creates new [`ClientOptions`] with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a PEM encoded certificate that is trusted in addition to the system roots.
    pub fn with_trusted_certificate<B: Into<Vec<u8>>>(mut self, pem: B) -> Self {
        self.trusted_certificates.push(pem.into());
        self
    }
}

/// An authenticated connection to a Nextcloud server.
///
/// The client is cheap to clone and can be shared by operations running concurrently, it is
/// never modified by them.
///
/// # Example
///
/// ```no_run
/// use nextcloud_api::{files::ReadFolder, Client, Credentials, RemoteOperation};
/// use url::Url;
///
/// # async fn example() -> nextcloud_api::Result<()> {
/// let client = Client::new(
///     Url::parse("https://cloud.example.com")?,
///     Credentials::new("alice", "app-password"),
/// )?;
/// let result = ReadFolder::new("/Documents/").execute(&client).await;
/// if let Some(files) = result.data() {
///     for file in files {
///         println!("{}", file.remote_path);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    credentials: Credentials,
    server_version: Option<NextcloudVersion>,
    client: reqwest::Client,
}

impl Client {
    /// Creates a new [`Client`] with default options.
    pub fn new(base_url: Url, credentials: Credentials) -> Result<Self> {
        Self::with_options(base_url, credentials, ClientOptions::default())
    }

    /// Creates a new [`Client`].
    pub fn with_options(
        base_url: Url,
        credentials: Credentials,
        options: ClientOptions,
    ) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        let mut builder = reqwest::Client::builder().user_agent(
            options
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
        );
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        for pem in &options.trusted_certificates {
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(pem)?);
        }
        Ok(Self {
            base_url,
            credentials,
            server_version: options.server_version,
            client: builder.build()?,
        })
    }

    /// Returns the base URL of the server.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the ID of the authenticated user.
    pub fn user_id(&self) -> &str {
        &self.credentials.user_id
    }

    /// Returns the version of the server, if known.
    pub fn server_version(&self) -> Option<NextcloudVersion> {
        self.server_version
    }

    /// Sets the version of the server, usually taken from [`GetStatus`](crate::status::GetStatus).
    pub fn with_server_version(mut self, version: NextcloudVersion) -> Self {
        self.server_version = Some(version);
        self
    }

    /// Returns whether the server is known to provide the given capability.
    ///
    /// This is `false` as long as the server version is unknown.
    pub fn supports(&self, capability: Capability) -> bool {
        self.server_version.map_or(false, |v| v.supports(capability))
    }

    /// Executes an operation. Same as [`RemoteOperation::execute`].
    pub async fn send<O>(&self, operation: &O) -> RemoteOperationResult<O::Output>
    where
        O: RemoteOperation,
    {
        operation.execute(self).await
    }

    pub(crate) fn url<I>(&self, path_segments: I) -> Result<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(path_segments);
        Ok(url)
    }

    /// Returns the WebDAV URL of a path in the user's files.
    ///
    /// A trailing slash of `remote_path` is kept.
    pub(crate) fn files_url(&self, remote_path: &str) -> Result<Url> {
        check_remote_path(remote_path)?;
        let segments = vec!["remote.php", "dav", "files", self.user_id()]
            .into_iter()
            .chain(remote_path.split('/').skip(1));
        self.url(segments)
    }

    /// Returns the decoded URL path of the user's files root, without a trailing slash.
    pub(crate) fn files_root(&self) -> Result<String> {
        let url = self.url(path!("remote.php", "dav", "files", self.user_id()))?;
        let root = urlencoding::decode(url.path())
            .map_err(|_| Error::InvalidPath(url.path().to_owned()))?;
        Ok(root.trim_end_matches('/').to_owned())
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        log::debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .basic_auth(&self.credentials.user_id, Some(&self.credentials.password))
    }

    /// Creates a request for an OCS endpoint below `ocs/v2.php`.
    pub(crate) fn ocs_request<I>(
        &self,
        method: Method,
        path_segments: I,
    ) -> Result<RequestBuilder>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let segments = path!("ocs", "v2.php")
            .into_iter()
            .chain(path_segments.into_iter().map(|v| v.as_ref().to_owned()));
        Ok(self
            .request(method, self.url(segments)?)
            .header("OCS-APIRequest", "true")
            .header(header::ACCEPT, "application/json"))
    }
}

/// Checks that a remote path is absolute.
pub(crate) fn check_remote_path(remote_path: &str) -> Result<()> {
    if remote_path.starts_with('/') && !remote_path.contains('\\') {
        Ok(())
    } else {
        Err(Error::InvalidPath(remote_path.to_owned()))
    }
}

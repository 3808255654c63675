//! Module for file resources.

use crate::webdav::{self, DavResponse, Ns};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

pub use request::*;

mod request;

/// A file or folder on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Path relative to the user's files root. Folder paths end with `/`.
    pub remote_path: String,
    /// The file ID, which stays the same when the file is moved or renamed.
    pub local_id: u64,
    /// The file ID combined with the instance ID.
    pub remote_id: Option<String>,
    pub modified: DateTime<FixedOffset>,
    pub is_folder: bool,
    pub etag: Option<String>,
    pub mime_type: Option<String>,
    /// Size in bytes. For folders this is the size of all contained files.
    pub size: Option<u64>,
    pub permissions: Option<String>,
    /// Names of the system tags assigned to the file.
    ///
    /// This is `None` if the server does not report tags in listings (before Nextcloud 27) and
    /// empty if it does but no tag is assigned.
    pub tags: Option<Vec<String>>,
}

impl RemoteFile {
    /// Returns the last segment of the path.
    pub fn name(&self) -> &str {
        self.remote_path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// Sorts the tag names alphabetically.
    pub fn sort_tags(&mut self) {
        if let Some(tags) = &mut self.tags {
            tags.sort();
        }
    }
}

const PROPERTIES: &[(Ns, &str)] = &[
    (Ns::Dav, "getlastmodified"),
    (Ns::Dav, "getetag"),
    (Ns::Dav, "getcontenttype"),
    (Ns::Dav, "resourcetype"),
    (Ns::Dav, "getcontentlength"),
    (Ns::OwnCloud, "fileid"),
    (Ns::OwnCloud, "id"),
    (Ns::OwnCloud, "permissions"),
    (Ns::OwnCloud, "size"),
];

const TAGS: (Ns, &str) = (Ns::Nextcloud, "system-tags");

pub(crate) fn propfind_body(with_tags: bool) -> String {
    let mut properties = PROPERTIES.to_vec();
    if with_tags {
        properties.push(TAGS);
    }
    webdav::propfind_body(&properties)
}

/// Parses a multi-status listing into files, in the order the server returned them.
///
/// `files_root` is the decoded URL path of the user's files root without trailing slash. Tags
/// are only read if `with_tags` is set. A path that occurs twice fails the whole listing.
pub(crate) fn parse_listing(
    body: &str,
    files_root: &str,
    with_tags: bool,
) -> Result<Vec<RemoteFile>> {
    let responses = webdav::parse_multistatus(body)?;
    let mut seen = HashSet::with_capacity(responses.len());
    let mut files = Vec::with_capacity(responses.len());
    for response in &responses {
        let file = parse_file(response, files_root, with_tags)?;
        if !seen.insert(file.remote_path.clone()) {
            return Err(Error::InvalidProperty {
                href: response.href().unwrap_or_default().to_owned(),
                property: "href",
                value: file.remote_path,
            });
        }
        files.push(file);
    }
    Ok(files)
}

fn parse_file(response: &DavResponse, files_root: &str, with_tags: bool) -> Result<RemoteFile> {
    let href = response.href().ok_or_else(|| Error::MissingProperty {
        href: String::new(),
        property: "href",
    })?;
    let missing = |property| Error::MissingProperty {
        href: href.to_owned(),
        property,
    };
    let invalid = |property, value: &str| Error::InvalidProperty {
        href: href.to_owned(),
        property,
        value: value.to_owned(),
    };

    let remote_path = remote_path(href, files_root).ok_or_else(|| invalid("href", href))?;
    let modified = response
        .text(Ns::Dav, "getlastmodified")
        .ok_or_else(|| missing("getlastmodified"))?;
    let modified =
        DateTime::parse_from_rfc2822(modified).map_err(|_| invalid("getlastmodified", modified))?;
    let local_id = response
        .text(Ns::OwnCloud, "fileid")
        .ok_or_else(|| missing("fileid"))?;
    let local_id = local_id
        .parse::<u64>()
        .map_err(|_| invalid("fileid", local_id))?;
    let size = match response
        .text(Ns::OwnCloud, "size")
        .or_else(|| response.text(Ns::Dav, "getcontentlength"))
    {
        Some(v) => Some(v.parse::<u64>().map_err(|_| invalid("size", v))?),
        None => None,
    };
    let is_folder = response
        .property(Ns::Dav, "resourcetype")
        .map_or(false, |v| v.children_named(Ns::Dav, "collection").next().is_some());
    let tags = if with_tags {
        Some(
            response
                .property(TAGS.0, TAGS.1)
                .map(|v| {
                    v.children_named(Ns::Nextcloud, "system-tag")
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
        )
    } else {
        None
    };

    Ok(RemoteFile {
        remote_path,
        local_id,
        remote_id: response.text(Ns::OwnCloud, "id").map(str::to_owned),
        modified,
        is_folder,
        etag: response
            .text(Ns::Dav, "getetag")
            .map(|v| v.trim_matches('"').to_owned()),
        mime_type: response.text(Ns::Dav, "getcontenttype").map(str::to_owned),
        size,
        permissions: response.text(Ns::OwnCloud, "permissions").map(str::to_owned),
        tags,
    })
}

/// Converts an `href` into a path relative to the files root.
fn remote_path(href: &str, files_root: &str) -> Option<String> {
    let path = match Url::parse(href) {
        Ok(url) => url.path().to_owned(),
        Err(_) => href.to_owned(),
    };
    let path = urlencoding::decode(&path).ok()?;
    match path.strip_prefix(files_root)? {
        "" => Some("/".to_owned()),
        v if v.starts_with('/') => Some(v.to_owned()),
        _ => None,
    }
}

//! Module for system tags.

use crate::webdav::{self, DavResponse, Ns};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub use request::*;

mod request;

/// A system tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub user_visible: Option<bool>,
    pub user_assignable: Option<bool>,
}

const PROPERTIES: &[(Ns, &str)] = &[
    (Ns::OwnCloud, "id"),
    (Ns::OwnCloud, "display-name"),
    (Ns::OwnCloud, "user-visible"),
    (Ns::OwnCloud, "user-assignable"),
];

pub(crate) fn propfind_body() -> String {
    webdav::propfind_body(PROPERTIES)
}

/// Parses the multi-status listing of the `systemtags` collection.
///
/// The entry of the collection itself has no ID and is skipped.
pub(crate) fn parse_tags(body: &str) -> Result<Vec<Tag>> {
    webdav::parse_multistatus(body)?
        .iter()
        .filter(|v| v.text(Ns::OwnCloud, "id").is_some())
        .map(parse_tag)
        .collect()
}

fn parse_tag(response: &DavResponse) -> Result<Tag> {
    let href = response.href().unwrap_or_default();
    let invalid = |property, value: &str| Error::InvalidProperty {
        href: href.to_owned(),
        property,
        value: value.to_owned(),
    };
    let flag = |property| match response.text(Ns::OwnCloud, property) {
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(v) => Err(invalid(property, v)),
        None => Ok(None),
    };

    let id = response.text(Ns::OwnCloud, "id").unwrap_or_default();
    let id = id.parse::<u64>().map_err(|_| invalid("id", id))?;
    let name = response
        .text(Ns::OwnCloud, "display-name")
        .ok_or_else(|| Error::MissingProperty {
            href: href.to_owned(),
            property: "display-name",
        })?;

    Ok(Tag {
        id,
        name: name.to_owned(),
        user_visible: flag("user-visible")?,
        user_assignable: flag("user-assignable")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS: &str = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:response>
    <d:href>/remote.php/dav/systemtags/</d:href>
    <d:propstat>
      <d:prop/>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
    <d:propstat>
      <d:prop><oc:id/><oc:display-name/></d:prop>
      <d:status>HTTP/1.1 404 Not Found</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/systemtags/4</d:href>
    <d:propstat>
      <d:prop>
        <oc:id>4</oc:id>
        <oc:display-name>urgent</oc:display-name>
        <oc:user-visible>true</oc:user-visible>
        <oc:user-assignable>false</oc:user-assignable>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/remote.php/dav/systemtags/7</d:href>
    <d:propstat>
      <d:prop><oc:id>7</oc:id><oc:display-name>later</oc:display-name></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

    #[test]
    fn collection_entry_is_skipped() {
        let tags = parse_tags(TAGS).unwrap();
        assert_eq!(
            tags,
            vec![
                Tag {
                    id: 4,
                    name: "urgent".to_owned(),
                    user_visible: Some(true),
                    user_assignable: Some(false),
                },
                Tag {
                    id: 7,
                    name: "later".to_owned(),
                    user_visible: None,
                    user_assignable: None,
                },
            ]
        );
    }

    #[test]
    fn invalid_id_fails() {
        let body = TAGS.replace("<oc:id>7</oc:id>", "<oc:id>seven</oc:id>");
        assert!(matches!(
            parse_tags(&body),
            Err(Error::InvalidProperty { property: "id", .. })
        ));
    }

    #[test]
    fn missing_name_fails() {
        let body = TAGS.replace("<oc:display-name>later</oc:display-name>", "");
        assert!(matches!(
            parse_tags(&body),
            Err(Error::MissingProperty {
                property: "display-name",
                ..
            })
        ));
    }
}

#![allow(dead_code)] // https://github.com/rust-lang/rust/issues/46379

use nextcloud_api::status::NextcloudVersion;
use nextcloud_api::{Client, ClientOptions, Credentials};
use std::env;
use url::Url;

pub const USER: &str = "alice";
pub const PASSWORD: &str = "secret";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Client for a mock server that is known to support tags in listings.
pub fn client(base_url: &str) -> Client {
    init_logger();
    Client::with_options(
        Url::parse(base_url).unwrap(),
        Credentials::new(USER, PASSWORD),
        ClientOptions::new().with_server_version(NextcloudVersion::NEXTCLOUD_27),
    )
    .unwrap()
}

/// Client for a mock server of unknown version.
pub fn legacy_client(base_url: &str) -> Client {
    init_logger();
    Client::new(
        Url::parse(base_url).unwrap(),
        Credentials::new(USER, PASSWORD),
    )
    .unwrap()
}

/// Client for a real server, configured through `NEXTCLOUD_BASE_URL`, `NEXTCLOUD_USER` and
/// `NEXTCLOUD_PASSWORD`.
pub fn live_client() -> Client {
    init_logger();
    let var = |name| env::var(name).unwrap_or_else(|_| panic!("{} is not set", name));
    Client::new(
        Url::parse(&var("NEXTCLOUD_BASE_URL")).unwrap(),
        Credentials::new(var("NEXTCLOUD_USER"), var("NEXTCLOUD_PASSWORD")),
    )
    .unwrap()
}

/// Wraps `<d:response>` elements into a multi-status document.
pub fn multistatus(responses: &[String]) -> String {
    format!(
        r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">{}</d:multistatus>"#,
        responses.concat()
    )
}

pub fn response(href: &str, props: &str) -> String {
    format!(
        "<d:response><d:href>{}</d:href><d:propstat><d:prop>{}</d:prop>\
         <d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>",
        href, props
    )
}

pub fn folder_props(file_id: u64, tags: &[&str]) -> String {
    format!(
        "<d:getlastmodified>Tue, 10 Oct 2023 08:12:03 GMT</d:getlastmodified>\
         <d:getetag>&quot;65250{}&quot;</d:getetag>\
         <d:resourcetype><d:collection/></d:resourcetype>\
         <oc:fileid>{}</oc:fileid><oc:permissions>RGDNVCK</oc:permissions>\
         <oc:size>4</oc:size>{}",
        file_id,
        file_id,
        system_tags(tags)
    )
}

pub fn file_props(file_id: u64, tags: &[&str]) -> String {
    format!(
        "<d:getlastmodified>Tue, 10 Oct 2023 08:12:04 GMT</d:getlastmodified>\
         <d:getetag>&quot;65250{}&quot;</d:getetag>\
         <d:getcontenttype>text/markdown</d:getcontenttype>\
         <d:resourcetype/><d:getcontentlength>4</d:getcontentlength>\
         <oc:fileid>{}</oc:fileid><oc:permissions>RGDNVW</oc:permissions>{}",
        file_id,
        file_id,
        system_tags(tags)
    )
}

fn system_tags(tags: &[&str]) -> String {
    let tags = tags
        .iter()
        .map(|v| format!("<nc:system-tag>{}</nc:system-tag>", v))
        .collect::<String>();
    format!("<nc:system-tags>{}</nc:system-tags>", tags)
}

//! Parser for WebDAV multi-status responses.
//!
//! Namespaces are resolved, so the prefixes chosen by the server do not matter. Only the
//! properties of `propstat` blocks with a `2xx` status are kept.

use crate::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::collections::HashMap;
use std::mem;

/// XML namespaces used by Nextcloud's WebDAV endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ns {
    Dav,
    OwnCloud,
    Nextcloud,
    Other,
}

impl Ns {
    const DAV: &'static [u8] = b"DAV:";
    const OWNCLOUD: &'static [u8] = b"http://owncloud.org/ns";
    const NEXTCLOUD: &'static [u8] = b"http://nextcloud.org/ns";

    fn from_resolved(value: &ResolveResult<'_>) -> Self {
        let uri = match value {
            ResolveResult::Bound(Namespace(uri)) => *uri,
            _ => return Self::Other,
        };
        if uri == Self::DAV {
            Self::Dav
        } else if uri == Self::OWNCLOUD {
            Self::OwnCloud
        } else if uri == Self::NEXTCLOUD {
            Self::Nextcloud
        } else {
            Self::Other
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Dav | Self::Other => "d",
            Self::OwnCloud => "oc",
            Self::Nextcloud => "nc",
        }
    }
}

/// Qualified name of an XML element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub ns: Ns,
    pub local: String,
}

impl Name {
    fn new(ns: Ns, local: &str) -> Self {
        Self {
            ns,
            local: local.to_owned(),
        }
    }

    fn is(&self, ns: Ns, local: &str) -> bool {
        self.ns == ns && self.local == local
    }
}

/// Value of a WebDAV property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    /// Text content of the property element.
    pub text: String,
    /// Direct child elements with their text content, in document order.
    pub children: Vec<(Name, String)>,
}

impl Property {
    /// Returns the text of every child element with the given name.
    pub fn children_named<'a>(
        &'a self,
        ns: Ns,
        local: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.children
            .iter()
            .filter(move |(name, _)| name.is(ns, local))
            .map(|(_, text)| text.as_str())
    }
}

/// One `response` element of a multi-status body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DavResponse {
    href: Option<String>,
    properties: HashMap<Name, Property>,
}

impl DavResponse {
    /// Returns the raw `href` of the response.
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn property(&self, ns: Ns, local: &str) -> Option<&Property> {
        self.properties.get(&Name::new(ns, local))
    }

    /// Returns the text of a property, treating empty text as absent.
    pub fn text(&self, ns: Ns, local: &str) -> Option<&str> {
        self.property(ns, local)
            .map(|v| v.text.as_str())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Default)]
struct PropStat {
    status: Option<String>,
    properties: HashMap<Name, Property>,
}

impl PropStat {
    fn is_success(&self) -> bool {
        self.status
            .as_deref()
            .and_then(|v| v.split_whitespace().nth(1))
            .and_then(|v| v.parse::<u16>().ok())
            .map_or(false, |v| (200..300).contains(&v))
    }
}

#[derive(Debug, Default)]
struct Parser {
    stack: Vec<Name>,
    text: String,
    responses: Vec<DavResponse>,
    response: Option<DavResponse>,
    propstat: Option<PropStat>,
    property: Option<(Name, Property)>,
}

impl Parser {
    fn start(&mut self, name: Name) {
        let parent = self.stack.last();
        if name.is(Ns::Dav, "response") {
            self.response = Some(DavResponse::default());
        } else if name.is(Ns::Dav, "propstat") && self.response.is_some() {
            self.propstat = Some(PropStat::default());
        } else if parent.map_or(false, |v| v.is(Ns::Dav, "prop")) && self.propstat.is_some() {
            self.property = Some((name.clone(), Property::default()));
        }
        self.stack.push(name);
        self.text.clear();
    }

    fn end(&mut self) {
        let name = match self.stack.pop() {
            Some(v) => v,
            None => return,
        };
        let text = mem::take(&mut self.text);
        let parent = self.stack.last();
        let parent_is = |ns, local| parent.map_or(false, |v: &Name| v.is(ns, local));

        if name.is(Ns::Dav, "href") && parent_is(Ns::Dav, "response") {
            if let Some(response) = &mut self.response {
                response.href = Some(text);
            }
        } else if name.is(Ns::Dav, "status") && parent_is(Ns::Dav, "propstat") {
            if let Some(propstat) = &mut self.propstat {
                propstat.status = Some(text);
            }
        } else if parent_is(Ns::Dav, "prop") {
            if let (Some((prop_name, mut property)), Some(propstat)) =
                (self.property.take(), &mut self.propstat)
            {
                property.text = text;
                propstat.properties.insert(prop_name, property);
            }
        } else if let Some((prop_name, property)) = &mut self.property {
            if parent == Some(&*prop_name) {
                property.children.push((name, text));
            }
        } else if name.is(Ns::Dav, "propstat") {
            if let (Some(propstat), Some(response)) = (self.propstat.take(), &mut self.response) {
                if propstat.is_success() {
                    response.properties.extend(propstat.properties);
                }
            }
        } else if name.is(Ns::Dav, "response") {
            if let Some(response) = self.response.take() {
                self.responses.push(response);
            }
        }
    }
}

fn name_of(ns: &ResolveResult<'_>, element: &BytesStart<'_>) -> Name {
    Name {
        ns: Ns::from_resolved(ns),
        local: String::from_utf8_lossy(element.local_name().as_ref()).into_owned(),
    }
}

/// Parses a multi-status body into its responses, in document order.
pub fn parse_multistatus(body: &str) -> Result<Vec<DavResponse>> {
    let mut reader = NsReader::from_str(body);
    reader.config_mut().trim_text(true);
    let mut parser = Parser::default();
    loop {
        let (ns, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(e) => parser.start(name_of(&ns, &e)),
            Event::Empty(e) => {
                parser.start(name_of(&ns, &e));
                parser.end();
            }
            Event::End(_) => parser.end(),
            Event::Text(e) => parser.text.push_str(&e.unescape()?),
            Event::CData(e) => parser.text.push_str(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(parser.responses)
}

/// Builds a `PROPFIND` request body asking for the given properties.
pub fn propfind_body(properties: &[(Ns, &str)]) -> String {
    let mut body = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<d:propfind xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" "#,
        r#"xmlns:nc="http://nextcloud.org/ns"><d:prop>"#,
    ));
    for (ns, local) in properties {
        body.push_str(&format!("<{}:{}/>", ns.prefix(), local));
    }
    body.push_str("</d:prop></d:propfind>");
    body
}

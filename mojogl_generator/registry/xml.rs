////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

//! Loads the registry document into a small in-memory element tree.
//!
//! Only well-formedness is checked here; the tree says nothing about whether the document is a
//!  usable registry.

use std::{fs::File, io, path::Path};

use xml::{
    common::Position,
    reader::{ParserConfig, XmlEvent},
};

use crate::error::{Error, Location, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub location: Location,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Child elements in document order, text nodes skipped.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// All descendant text concatenated.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }
}

/// A loaded registry document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path or label used in error messages.
    pub source_name: String,
    pub root: Element,
}

impl Document {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Document> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Document::from_reader(path.display().to_string(), io::BufReader::new(file))
    }

    pub fn from_str(source_name: impl Into<String>, text: &str) -> Result<Document> {
        Document::from_reader(source_name, text.as_bytes())
    }

    pub fn from_reader<R: io::Read>(source_name: impl Into<String>, reader: R) -> Result<Document> {
        let source_name = source_name.into();
        let mut events = ParserConfig::new()
            .trim_whitespace(false)
            .whitespace_to_characters(true)
            .cdata_to_characters(true)
            .ignore_comments(true)
            .coalesce_characters(true)
            .create_reader(reader);

        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            let event = events.next().map_err(|e| Error::RegistryParse {
                source_name: source_name.clone(),
                location: location_of(e.position()),
                message: e.msg().to_string(),
            })?;

            match event {
                XmlEvent::StartElement { name, attributes, .. } => {
                    stack.push(Element {
                        name: name.local_name,
                        attributes: attributes.into_iter().map(|a| (a.name.local_name, a.value)).collect(),
                        children: Vec::new(),
                        location: location_of(events.position()),
                    });
                },
                XmlEvent::EndElement { .. } => {
                    // the reader guarantees balanced tags
                    if let Some(done) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(Node::Element(done)),
                            None => root = Some(done),
                        }
                    }
                },
                XmlEvent::Characters(text) => {
                    if let Some(parent) = stack.last_mut() {
                        match parent.children.last_mut() {
                            Some(Node::Text(prev)) => prev.push_str(&text),
                            _ => parent.children.push(Node::Text(text)),
                        }
                    }
                },
                XmlEvent::EndDocument => break,
                _ => {},
            }
        }

        let root = root.ok_or_else(|| Error::RegistryParse {
            source_name: source_name.clone(),
            location: Location::new(1, 1),
            message: "document has no root element".to_owned(),
        })?;

        debug!("loaded registry document {} (root <{}>)", source_name, root.name);

        Ok(Document { source_name, root })
    }
}

fn location_of(pos: xml::common::TextPosition) -> Location {
    Location::new(pos.row + 1, pos.column + 1)
}

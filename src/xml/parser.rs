//! XML text to element tree
//!
//! Tokenizing is done by quick-xml; this module turns its event stream into an
//! owned [`Element`] tree using an explicit stack of open elements.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, instrument};

use crate::config::{Config, DepthContext};
use crate::error::{Error, Result};
use crate::value::Scalar;
use crate::xml::element::{Element, NamespaceMap};

const BOM: char = '\u{feff}';

/// Parses XML documents into element trees
#[derive(Debug, Clone, Default)]
pub struct XmlParser {
    config: Config,
}

/// An element whose end tag has not been seen yet
#[derive(Debug)]
struct OpenElement {
    element: Element,
    text: String,
    cdata: bool,
}

impl XmlParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load an XML file and transform it into an element tree.
    ///
    /// The file is decoded as UTF-8; a leading byte order mark is ignored.
    #[instrument(level = "debug", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn from_file(&self, path: impl AsRef<Path>) -> Result<Element> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let missing = |e: std::io::Error| {
            debug!("failed to read file: {}", e);
            Error::missing_file(display.as_str()).with_context(e.to_string())
        };

        // Reject oversized files before loading them
        let len = fs::metadata(path).map_err(missing)?.len();
        self.config
            .validate_size(usize::try_from(len).unwrap_or(usize::MAX))?;

        let bytes = fs::read(path).map_err(missing)?;
        self.config.validate_size(bytes.len())?;

        let text = String::from_utf8(bytes).map_err(|e| {
            Error::parse(format!("invalid utf-8: {}", e.utf8_error())).with_context(display.as_str())
        })?;

        self.from_string(&text)
            .map_err(|e| e.with_context(display.as_str()))
    }

    /// Transform an XML document held in a string into an element tree
    #[instrument(level = "debug", skip(self, text), fields(len = text.len()))]
    pub fn from_string(&self, text: &str) -> Result<Element> {
        self.config.validate_size(text.len())?;
        let text = text.strip_prefix(BOM).unwrap_or(text);

        let mut reader = Reader::from_str(text);
        let mut ctx = DepthContext::new();
        let mut stack: Vec<OpenElement> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| Error::from(e).with_position(to_u64(reader.error_position())))?;
            let position = to_u64(reader.buffer_position());

            match event {
                Event::Start(start) => {
                    ctx.enter_nested(&self.config)?;
                    let open = open_element(&start, stack.last())?;
                    stack.push(open);
                }
                Event::Empty(start) => {
                    ctx.enter_nested(&self.config)?;
                    let open = open_element(&start, stack.last())?;
                    attach(open.finish(), &mut stack, &mut root)
                        .map_err(|e| e.with_position(position))?;
                    ctx.exit_nested();
                }
                Event::End(_) => {
                    let open = stack.pop().ok_or_else(|| {
                        Error::parse("closing tag without an open element").with_position(position)
                    })?;
                    attach(open.finish(), &mut stack, &mut root)
                        .map_err(|e| e.with_position(position))?;
                    ctx.exit_nested();
                }
                Event::Text(content) => {
                    let content = content.unescape()?;
                    match stack.last_mut() {
                        Some(open) => open.text.push_str(&content),
                        None if content.trim().is_empty() => {}
                        None => {
                            return Err(Error::parse("text outside of the root element")
                                .with_position(position))
                        }
                    }
                }
                Event::CData(content) => {
                    let content = String::from_utf8(content.into_inner().into_owned())
                        .map_err(|e| Error::parse(e.to_string()).with_position(position))?;
                    match stack.last_mut() {
                        Some(open) => {
                            open.text.push_str(&content);
                            open.cdata = true;
                        }
                        None => {
                            return Err(Error::parse("CDATA outside of the root element")
                                .with_position(position))
                        }
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and doctypes
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::parse(format!(
                "unclosed element <{}>",
                open.element.name()
            ))
            .with_position(to_u64(reader.buffer_position())));
        }

        root.ok_or_else(|| Error::parse("no root element found"))
    }
}

fn open_element(start: &BytesStart<'_>, parent: Option<&OpenElement>) -> Result<OpenElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| Error::parse(e.to_string()))?
        .to_string();
    let mut element = Element::with_raw_name(name);

    // Namespaces declared by ancestors stay in scope
    let mut namespaces: NamespaceMap = parent
        .map(|p| p.element.namespaces().clone())
        .unwrap_or_default();

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| Error::parse(e.to_string()))?;
        let value = attribute.unescape_value()?.into_owned();

        if key == "xmlns" {
            namespaces.insert(String::new(), value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            namespaces.insert(prefix.to_string(), value);
        } else {
            element.insert_raw_attribute(key.to_string(), value);
        }
    }

    element.set_namespaces(namespaces);

    Ok(OpenElement {
        element,
        text: String::new(),
        cdata: false,
    })
}

impl OpenElement {
    /// Close the element, storing its own trimmed text as a string value
    fn finish(self) -> Element {
        let mut element = self.element;
        let text = self.text.trim();
        element.set_value(Scalar::String(text.to_string()), self.cdata && !text.is_empty());
        element
    }
}

fn attach(element: Element, stack: &mut [OpenElement], root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.element.add_child(element);
            Ok(())
        }
        None if root.is_some() => Err(Error::parse("multiple root elements")),
        None => {
            *root = Some(element);
            Ok(())
        }
    }
}

fn to_u64<T: TryInto<u64>>(position: T) -> u64 {
    position.try_into().unwrap_or(u64::MAX)
}

//! XML element tree

use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

use quick_xml::escape::escape;

use crate::boxing::{box_value, unbox};
use crate::config::FormatConfig;
use crate::error::{Error, Result};
use crate::name::format_name;
use crate::value::{List, Map, Scalar, Value};
use crate::xml::builder::{ATTRIBUTES_KEY, CDATA_KEY, VALUE_KEY};
use crate::xml::parser::XmlParser;

/// Attribute name to value, in insertion order
pub type AttributeMap = IndexMap<String, String>;
/// Namespace prefix to URI, in insertion order; the default namespace uses `""`
pub type NamespaceMap = IndexMap<String, String>;

/// A single element (node) within an XML document tree.
///
/// An element owns its children. There are no parent pointers: the tree is a
/// strict hierarchy and every element is reachable only through its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    value: Scalar,
    cdata: bool,
    attributes: AttributeMap,
    namespaces: NamespaceMap,
    children: Vec<Element>,
}

impl Element {
    /// Create an element; the name is sanitized with `format_name`
    pub fn new(name: &str) -> Self {
        Self::with_raw_name(format_name(name))
    }

    /// Create an element keeping the name exactly as given
    pub(crate) fn with_raw_name(name: String) -> Self {
        Self {
            name,
            value: Scalar::String(String::new()),
            cdata: false,
            attributes: AttributeMap::new(),
            namespaces: NamespaceMap::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = format_name(name);
        self
    }

    /// The stored value. Elements read from XML text always hold strings.
    pub fn value(&self) -> &Scalar {
        &self.value
    }

    /// The value as it appears in markup
    pub fn text(&self) -> String {
        unbox(&self.value)
    }

    /// The text type cast back into a scalar
    pub fn boxed_value(&self) -> Scalar {
        box_value(&self.text())
    }

    pub fn is_cdata(&self) -> bool {
        self.cdata
    }

    /// Set the value; with `cdata` it is written inside a CDATA block
    pub fn set_value(&mut self, value: impl Into<Scalar>, cdata: bool) -> &mut Self {
        self.value = value.into();
        self.cdata = cdata;
        self
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Set an attribute; the name is sanitized and the value unboxed to text.
    ///
    /// `xmlns` and `xmlns:<prefix>` are namespace declarations and are stored
    /// with [`Self::set_namespace`] instead, the same way the parser reads them.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<Scalar>) -> &mut Self {
        let key = format_name(key);
        let value = unbox(&value.into());

        if key == "xmlns" {
            self.namespaces.insert(String::new(), value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            self.namespaces.insert(prefix.to_string(), value);
        } else {
            self.attributes.insert(key, value);
        }
        self
    }

    pub fn set_attributes<K, V>(&mut self, attributes: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<Scalar>,
    {
        for (key, value) in attributes {
            self.set_attribute(key.as_ref(), value);
        }
        self
    }

    pub(crate) fn insert_raw_attribute(&mut self, key: String, value: String) {
        self.attributes.insert(key, value);
    }

    /// Attributes whose name carries the given namespace prefix
    pub fn namespace_attributes<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.attributes
            .iter()
            .filter(move |(key, _)| has_prefix(key, prefix))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn namespaces(&self) -> &NamespaceMap {
        &self.namespaces
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    pub fn has_namespace(&self, prefix: &str) -> bool {
        self.namespaces.contains_key(prefix)
    }

    pub fn has_namespaces(&self) -> bool {
        !self.namespaces.is_empty()
    }

    pub fn set_namespace(&mut self, prefix: &str, uri: &str) -> &mut Self {
        self.namespaces.insert(prefix.to_string(), uri.to_string());
        self
    }

    pub fn set_namespaces<K, V>(&mut self, namespaces: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (prefix, uri) in namespaces {
            self.set_namespace(prefix.as_ref(), uri.as_ref());
        }
        self
    }

    /// Append a child, taking ownership of it
    pub fn add_child(&mut self, child: Self) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn add_children(&mut self, children: impl IntoIterator<Item = Self>) -> &mut Self {
        self.children.extend(children);
        self
    }

    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Children whose name carries the given namespace prefix
    pub fn namespace_children<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a Self> + 'a {
        self.children
            .iter()
            .filter(move |child| has_prefix(&child.name, prefix))
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Self> {
        self.children.iter()
    }

    /// Render this element and its subtree as compact XML markup
    pub fn serialize(&self) -> String {
        self.to_string_with(&FormatConfig::default())
    }

    /// Render this element and its subtree with the given output options
    pub fn to_string_with(&self, config: &FormatConfig) -> String {
        let mut output = String::new();

        if config.declaration {
            output.push_str("<?xml version=\"");
            output.push_str(&escape(config.version.as_str()));
            output.push_str("\" encoding=\"");
            output.push_str(&escape(config.encoding.as_str()));
            output.push('"');
            for (name, value) in &config.declaration_attributes {
                output.push(' ');
                output.push_str(name);
                output.push_str("=\"");
                output.push_str(&escape(value.as_str()));
                output.push('"');
            }
            output.push_str("?>\n");
        }

        let mut scope = Vec::new();
        self.write_element(&mut output, config.indent_spaces, 0, &mut scope);
        output
    }

    fn write_element<'a>(
        &'a self,
        output: &mut String,
        indent: Option<usize>,
        depth: usize,
        scope: &mut Vec<(&'a str, &'a str)>,
    ) {
        push_indent(output, indent, depth);
        output.push('<');
        output.push_str(&self.name);

        let scope_len = scope.len();
        for (prefix, uri) in &self.namespaces {
            // Declarations inherited unchanged from an ancestor are not repeated
            let inherited = scope
                .iter()
                .rev()
                .find(|(p, _)| *p == prefix.as_str())
                .is_some_and(|(_, u)| *u == uri.as_str());
            if inherited {
                continue;
            }

            if prefix.is_empty() {
                output.push_str(" xmlns=\"");
            } else {
                output.push_str(" xmlns:");
                output.push_str(prefix);
                output.push_str("=\"");
            }
            output.push_str(&escape(uri.as_str()));
            output.push('"');
            scope.push((prefix.as_str(), uri.as_str()));
        }

        for (key, value) in &self.attributes {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape(value.as_str()));
            output.push('"');
        }

        let text = self.text();
        if self.children.is_empty() && text.is_empty() {
            output.push_str("/>");
            push_newline(output, indent);
            scope.truncate(scope_len);
            return;
        }

        output.push('>');

        // Children take precedence over a value
        if self.children.is_empty() {
            if self.cdata {
                output.push_str("<![CDATA[");
                output.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
                output.push_str("]]>");
            } else {
                output.push_str(&escape(text.as_str()));
            }
        } else {
            push_newline(output, indent);
            for child in &self.children {
                child.write_element(output, indent, depth + 1, scope);
            }
            push_indent(output, indent, depth);
        }

        output.push_str("</");
        output.push_str(&self.name);
        output.push('>');
        push_newline(output, indent);
        scope.truncate(scope_len);
    }

    /// Convert the tree back into a structured value.
    ///
    /// Attributes are stored under `@attributes`, a leaf value (boxed) under
    /// `@value`, and repeated child names collapse into a list. With
    /// `include_root` the result is wrapped in a map keyed by this element's name.
    pub fn to_value(&self, include_root: bool) -> Value {
        let mut map = Map::new();

        if self.has_attributes() {
            let attributes: Map = self
                .attributes
                .iter()
                .map(|(key, value)| (key.clone(), Value::from(value.as_str())))
                .collect();
            map.insert(ATTRIBUTES_KEY, attributes);
        }

        if self.has_children() {
            for child in &self.children {
                let value = child.to_value(false);
                match map.get_mut(&child.name) {
                    Some(Value::List(list)) => list.push(value),
                    Some(existing) => {
                        let first = std::mem::take(existing);
                        *existing = Value::List(List::from(vec![first, value]));
                    }
                    None => {
                        map.insert(child.name.clone(), value);
                    }
                }
            }
        } else {
            map.insert(VALUE_KEY, self.boxed_value());
            if self.cdata {
                map.insert(CDATA_KEY, true);
            }
        }

        if include_root {
            Value::Map(Map::new().with(self.name.clone(), map))
        } else {
            Value::Map(map)
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for Element {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        XmlParser::new().from_string(s)
    }
}

impl<'a> IntoIterator for &'a Element {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

fn has_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with(':'))
}

fn push_indent(output: &mut String, indent: Option<usize>, depth: usize) {
    if let Some(spaces) = indent {
        output.extend(std::iter::repeat(' ').take(spaces * depth));
    }
}

fn push_newline(output: &mut String, indent: Option<usize>) {
    if indent.is_some() {
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sanitizes_name() {
        let element = Element::new("1st item!");
        assert_eq!(element.name(), "_1stitem");
    }

    #[test]
    fn test_defaults() {
        let element = Element::new("empty");
        assert_eq!(element.value(), &Scalar::from(""));
        assert!(!element.is_cdata());
        assert!(!element.has_attributes());
        assert!(!element.has_namespaces());
        assert!(element.is_empty());
        assert_eq!(element.serialize(), "<empty/>");
    }

    #[test]
    fn test_attributes_are_unboxed_and_ordered() {
        let mut element = Element::new("user");
        element
            .set_attribute("zeta", true)
            .set_attribute("alpha", 5)
            .set_attribute("gamma", Scalar::Null);

        assert_eq!(element.attribute("zeta"), Some("true"));
        assert_eq!(element.attribute("alpha"), Some("5"));
        assert_eq!(element.attribute("gamma"), Some("null"));
        assert_eq!(element.attribute("missing"), None);
        assert_eq!(
            element.serialize(),
            r#"<user zeta="true" alpha="5" gamma="null"/>"#
        );
    }

    #[test]
    fn test_xmlns_attributes_become_namespaces() {
        let mut element = Element::new("feed");
        element
            .set_attribute("xmlns", "urn:atom")
            .set_attribute("xmlns:a", "urn:a")
            .set_attribute("id", 1);

        assert_eq!(element.namespace(""), Some("urn:atom"));
        assert_eq!(element.namespace("a"), Some("urn:a"));
        assert!(!element.has_attribute("xmlns:a"));
        assert_eq!(element.attributes().len(), 1);
        assert_eq!(
            element.serialize(),
            r#"<feed xmlns="urn:atom" xmlns:a="urn:a" id="1"/>"#
        );
    }

    #[test]
    fn test_escaping_in_text_and_attributes() {
        let mut element = Element::new("note");
        element
            .set_attribute("title", "a \"b\" & 'c'")
            .set_value("1 < 2 > 0 & done", false);

        assert_eq!(
            element.serialize(),
            "<note title=\"a &quot;b&quot; &amp; &apos;c&apos;\">1 &lt; 2 &gt; 0 &amp; done</note>"
        );
    }

    #[test]
    fn test_cdata_is_not_escaped() {
        let mut element = Element::new("script");
        element.set_value("if (a < b && c) {}", true);
        assert_eq!(
            element.serialize(),
            "<script><![CDATA[if (a < b && c) {}]]></script>"
        );
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let mut element = Element::new("raw");
        element.set_value("a]]>b", true);
        assert_eq!(
            element.serialize(),
            "<raw><![CDATA[a]]]]><![CDATA[>b]]></raw>"
        );
    }

    #[test]
    fn test_empty_cdata_self_closes() {
        let mut element = Element::new("raw");
        element.set_value("", true);
        assert_eq!(element.serialize(), "<raw/>");
    }

    #[test]
    fn test_children_take_precedence_over_value() {
        let mut parent = Element::new("parent");
        parent.set_value("ignored", false);
        parent.add_child(Element::new("child"));
        assert_eq!(parent.serialize(), "<parent><child/></parent>");
    }

    #[test]
    fn test_namespaces_before_attributes() {
        let mut element = Element::new("feed");
        element
            .set_attribute("id", 1)
            .set_namespace("", "http://www.w3.org/2005/Atom")
            .set_namespace("media", "http://search.yahoo.com/mrss/");

        assert_eq!(
            element.serialize(),
            r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:media="http://search.yahoo.com/mrss/" id="1"/>"#
        );
    }

    #[test]
    fn test_inherited_namespace_is_not_repeated() {
        let mut child = Element::new("media:title");
        child.set_namespace("media", "urn:media").set_value("x", false);

        let mut root = Element::new("feed");
        root.set_namespace("media", "urn:media").add_child(child);

        assert_eq!(
            root.serialize(),
            r#"<feed xmlns:media="urn:media"><media:title>x</media:title></feed>"#
        );
    }

    #[test]
    fn test_pretty_output_with_declaration() {
        let mut item = Element::new("item");
        item.set_value(1, false);
        let mut root = Element::new("root");
        root.add_child(item).add_child(Element::new("empty"));

        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                        <root>\n    <item>1</item>\n    <empty/>\n</root>\n";
        assert_eq!(root.to_string_with(&FormatConfig::pretty()), expected);
    }

    #[test]
    fn test_child_queries() {
        let mut root = Element::new("root");
        for name in ["a", "b", "a", "ns:c"] {
            root.add_child(Element::new(name));
        }
        root.set_attribute("ns:id", 1).set_attribute("plain", 2);

        assert_eq!(root.len(), 4);
        assert_eq!(root.child("b").map(Element::name), Some("b"));
        assert!(root.child("z").is_none());
        assert_eq!(root.children_by_name("a").count(), 2);
        assert_eq!(root.namespace_children("ns").count(), 1);
        assert_eq!(root.namespace_children("n").count(), 0);
        assert_eq!(
            root.namespace_attributes("ns").collect::<Vec<_>>(),
            vec![("ns:id", "1")]
        );
        assert_eq!((&root).into_iter().count(), 4);
    }

    #[test]
    fn test_boxed_value() {
        let mut element = Element::new("n");
        element.set_value("4.5", false);
        assert_eq!(element.boxed_value(), Scalar::Float(4.5));
    }

    #[test]
    fn test_to_value_groups_repeated_children() {
        let mut root = Element::new("root");
        root.set_attribute("id", 7);
        for i in 1..=2 {
            let mut item = Element::new("item");
            item.set_value(i, false);
            root.add_child(item);
        }
        let mut title = Element::new("title");
        title.set_value("hello", true);
        root.add_child(title);

        let value = root.to_value(true);
        let expected = Value::Map(Map::new().with(
            "root",
            Map::new()
                .with("@attributes", Map::new().with("id", "7"))
                .with(
                    "item",
                    vec![
                        Value::Map(Map::new().with("@value", 1)),
                        Value::Map(Map::new().with("@value", 2)),
                    ],
                )
                .with(
                    "title",
                    Map::new().with("@value", "hello").with("@cdata", true),
                ),
        ));
        assert_eq!(value, expected);
    }
}

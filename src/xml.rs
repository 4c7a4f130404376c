//! XML element tree, builder and parser

pub mod builder;
pub mod element;
pub mod parser;

pub use builder::{TreeBuilder, ATTRIBUTES_KEY, CDATA_KEY, DEFAULT_ITEM, DEFAULT_ROOT, VALUE_KEY};
pub use element::{AttributeMap, Element, NamespaceMap};
pub use parser::XmlParser;

//! zxml: convert between structured values and XML element trees
//!
//! This crate provides functionality to:
//! - Build an [`Element`] tree from nested maps, lists and scalars
//! - Parse XML files and strings into the same tree
//! - Serialize trees as compact or indented XML
//! - Turn a tree back into a structured value
//!
//! # Examples
//! ```
//! use zxml::{from_map, from_str, List, Map, Result, Value};
//!
//! fn example() -> Result<()> {
//!     let tags = List::from(vec![Value::from("xml"), Value::from("tree")]);
//!     let data = Map::new().with("name", "zxml").with("tags", tags);
//!     let element = from_map("crate", &data)?;
//!     assert_eq!(
//!         element.serialize(),
//!         "<crate><name>zxml</name><tags>xml</tags><tags>tree</tags></crate>"
//!     );
//!
//!     let parsed = from_str(&element.serialize())?;
//!     assert_eq!(parsed.children().len(), 3);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]

use std::path::Path;

use tracing::{debug, instrument};

pub mod boxing;
pub mod config;
pub mod error;
pub mod list;
pub mod name;
pub mod test_utils;
pub mod value;
pub mod xml;

// Re-exports
pub use boxing::{box_value, unbox};
pub use config::{Config, DepthContext, FormatConfig};
pub use error::{Error, ErrorKind, Result};
pub use list::{OrderedList, ToXml};
pub use name::format_name;
pub use value::{List, Map, Scalar, Value};
pub use xml::{
    AttributeMap, Element, NamespaceMap, TreeBuilder, XmlParser, ATTRIBUTES_KEY, CDATA_KEY,
    DEFAULT_ITEM, DEFAULT_ROOT, VALUE_KEY,
};

/// Build an element tree from any structured value with default limits
pub fn from(data: &Value, root: &str) -> Result<Element> {
    TreeBuilder::new().from(data, root)
}

/// Build an element named `name` from a map
pub fn from_map(name: &str, map: &Map) -> Result<Element> {
    TreeBuilder::new().from_map(name, map)
}

/// Build an element named `name` holding one `item` child per list entry
pub fn from_vector(name: &str, item: &str, list: &List) -> Result<Element> {
    TreeBuilder::new().from_vector(name, item, list)
}

/// Parse an XML file into an element tree
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn from_file(path: impl AsRef<Path>) -> Result<Element> {
    debug!("Starting to parse file");
    let element = XmlParser::new().from_file(path)?;
    debug!(root = element.name(), "Parsing completed");
    Ok(element)
}

/// Parse an XML string into an element tree
pub fn from_str(text: &str) -> Result<Element> {
    XmlParser::new().from_string(text)
}

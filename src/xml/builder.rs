//! Building element trees from structured values
//!
//! The whole conversion grammar is the four-way dispatch in
//! [`TreeBuilder::create_element`]:
//!
//! - a map holding `@value` becomes a leaf element with that value, an optional
//!   CDATA flag from `@cdata` and attributes from `@attributes`
//! - any other map becomes an element whose children are built from its entries
//! - a list repeats the key once per item, producing same-named siblings
//! - a scalar becomes a leaf element

use tracing::{instrument, trace};

use crate::boxing::unbox;
use crate::config::{Config, DepthContext};
use crate::error::{Error, Result};
use crate::value::{List, Map, Value};
use crate::xml::element::Element;
use crate::xml::parser::XmlParser;

/// Map key holding attributes for the element built from that map
pub const ATTRIBUTES_KEY: &str = "@attributes";
/// Map key holding the element value
pub const VALUE_KEY: &str = "@value";
/// Map key that wraps the value in a CDATA block when truthy
pub const CDATA_KEY: &str = "@cdata";
/// Root element name used when none is given
pub const DEFAULT_ROOT: &str = "root";
/// Element name used for items of a top-level list
pub const DEFAULT_ITEM: &str = "item";

fn is_reserved(key: &str) -> bool {
    matches!(key, ATTRIBUTES_KEY | VALUE_KEY | CDATA_KEY)
}

/// Turns structured values into element trees
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    config: Config,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build a tree from any structured value.
    ///
    /// Maps go through [`Self::from_map`] and lists through
    /// [`Self::from_vector`] with items named `item`. A scalar is unboxed and
    /// parsed as XML text.
    #[instrument(level = "debug", skip(self, data))]
    pub fn from(&self, data: &Value, root: &str) -> Result<Element> {
        match data {
            Value::Map(map) => self.from_map(root, map),
            Value::List(list) => self.from_vector(root, DEFAULT_ITEM, list),
            Value::Scalar(scalar) => {
                trace!("scalar input, parsing as xml text");
                XmlParser::with_config(self.config).from_string(&unbox(scalar))
            }
        }
    }

    /// Build an element named `name` whose children come from the map entries
    pub fn from_map(&self, name: &str, map: &Map) -> Result<Element> {
        let mut ctx = DepthContext::new();
        self.build_map(name, map, &mut ctx)
    }

    /// Build an element named `name` with one `item` child per list entry
    pub fn from_vector(&self, name: &str, item: &str, list: &List) -> Result<Element> {
        let mut ctx = DepthContext::new();
        let mut root = Element::new(name);
        self.create_list(&mut root, item, list, &mut ctx)?;
        Ok(root)
    }

    fn build_map(&self, name: &str, map: &Map, ctx: &mut DepthContext) -> Result<Element> {
        ctx.enter_nested(&self.config)?;

        let mut root = Element::new(name);
        apply_attributes(&mut root, map.get(ATTRIBUTES_KEY))?;

        for (key, value) in map {
            if is_reserved(key) {
                continue;
            }
            self.create_element(&mut root, key, value, ctx)?;
        }

        ctx.exit_nested();
        Ok(root)
    }

    fn create_element(
        &self,
        parent: &mut Element,
        key: &str,
        value: &Value,
        ctx: &mut DepthContext,
    ) -> Result<()> {
        match value {
            Value::Map(map) => match map.get(VALUE_KEY) {
                Some(inner) => {
                    trace!(key, "element with value");
                    let Value::Scalar(scalar) = inner else {
                        return Err(Error::invalid_structure(format!(
                            "{VALUE_KEY} of <{key}> must be a scalar"
                        )));
                    };

                    let cdata = map.get(CDATA_KEY).is_some_and(Value::is_truthy);
                    let mut child = Element::new(key);
                    child.set_value(scalar.clone(), cdata);
                    apply_attributes(&mut child, map.get(ATTRIBUTES_KEY))?;
                    parent.add_child(child);
                }
                None => {
                    trace!(key, "element with children");
                    let child = self.build_map(key, map, ctx)?;
                    parent.add_child(child);
                }
            },
            Value::List(list) => {
                trace!(key, items = list.len(), "repeated element");
                self.create_list(parent, key, list, ctx)?;
            }
            Value::Scalar(scalar) => {
                let mut child = Element::new(key);
                child.set_value(scalar.clone(), false);
                parent.add_child(child);
            }
        }

        Ok(())
    }

    fn create_list(
        &self,
        parent: &mut Element,
        key: &str,
        list: &List,
        ctx: &mut DepthContext,
    ) -> Result<()> {
        ctx.enter_nested(&self.config)?;
        for item in list {
            self.create_element(parent, key, item, ctx)?;
        }
        ctx.exit_nested();
        Ok(())
    }
}

fn apply_attributes(element: &mut Element, attributes: Option<&Value>) -> Result<()> {
    let attributes = match attributes {
        None => return Ok(()),
        Some(Value::Map(attributes)) => attributes,
        Some(_) => {
            return Err(Error::invalid_structure(format!(
                "{ATTRIBUTES_KEY} of <{}> must be a map",
                element.name()
            )))
        }
    };

    for (key, value) in attributes {
        let Value::Scalar(scalar) = value else {
            return Err(Error::invalid_structure(format!(
                "attribute {key} of <{}> must be a scalar",
                element.name()
            )));
        };
        element.set_attribute(key, scalar.clone());
    }

    Ok(())
}

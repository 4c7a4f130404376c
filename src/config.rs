use indexmap::IndexMap;
use std::fmt;

use crate::error::{Error, ErrorKind, Result};

/// Maximum nesting depth (128) for built and parsed trees
pub const DEFAULT_MAX_DEPTH: usize = 128;
/// Maximum XML input size (16MB) accepted by the parser
pub const DEFAULT_MAX_SIZE: usize = 16 * 1_048_576;
/// Indentation used by `FormatConfig::pretty`
pub const DEFAULT_INDENT_SPACES: usize = 4;

/// Limits applied while building or parsing a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting depth of maps/lists or XML elements
    pub max_depth: usize,
    /// Maximum XML input size in bytes
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ max_depth: {}, max_size: {} }}",
            self.max_depth, self.max_size
        )
    }
}

impl Config {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn validate_size(&self, len: usize) -> Result<()> {
        if len > self.max_size {
            return Err(Error::new(ErrorKind::MaxSizeExceeded { max: self.max_size }));
        }
        Ok(())
    }
}

/// Tracks nesting depth during a single build or parse pass
#[derive(Debug, Default)]
pub struct DepthContext {
    pub current_depth: usize,
}

impl DepthContext {
    pub fn new() -> Self {
        Self { current_depth: 0 }
    }

    pub fn enter_nested(&mut self, config: &Config) -> Result<()> {
        self.current_depth += 1;
        if self.current_depth > config.max_depth {
            return Err(Error::new(ErrorKind::RecursionLimitExceeded {
                max: config.max_depth,
            }));
        }
        Ok(())
    }

    pub fn exit_nested(&mut self) {
        if self.current_depth > 0 {
            self.current_depth -= 1;
        }
    }
}

/// Output options for `Element::to_string_with`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// Spaces per nesting level; `None` writes everything on one line
    pub indent_spaces: Option<usize>,
    /// Whether the root is preceded by an `<?xml ...?>` declaration
    pub declaration: bool,
    /// Declared XML version
    pub version: String,
    /// Declared document encoding
    pub encoding: String,
    /// Further declaration pseudo-attributes such as `standalone`, in order
    pub declaration_attributes: IndexMap<String, String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_spaces: None,
            declaration: false,
            version: "1.0".to_string(),
            encoding: "UTF-8".to_string(),
            declaration_attributes: IndexMap::new(),
        }
    }
}

impl FormatConfig {
    /// Indented output preceded by a declaration
    pub fn pretty() -> Self {
        Self {
            indent_spaces: Some(DEFAULT_INDENT_SPACES),
            declaration: true,
            ..Self::default()
        }
    }

    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent_spaces = Some(spaces);
        self
    }

    pub fn with_declaration(mut self, version: &str, encoding: &str) -> Self {
        self.declaration = true;
        self.version = version.to_string();
        self.encoding = encoding.to_string();
        self
    }

    /// Add a pseudo-attribute written after `encoding`; enables the declaration
    pub fn with_declaration_attribute(mut self, name: &str, value: &str) -> Self {
        self.declaration = true;
        self.declaration_attributes
            .insert(name.to_string(), value.to_string());
        self
    }
}

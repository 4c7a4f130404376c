//! Helpers shared by the integration tests and benchmarks

use std::{env, fs, path::PathBuf};

use crate::error::{Error, Result};
use crate::value::{List, Map, Value};

pub fn tmp_file_path(name: &str) -> PathBuf {
    let mut dir = env::temp_dir();
    dir.push("zxml_tests");
    let _ = fs::create_dir_all(&dir);
    dir.push(name);
    dir
}

/// Read a fixture below `tests/input`
pub fn read_test_file(name: &str) -> Result<String> {
    let path = format!("tests/input/{name}");
    fs::read_to_string(&path)
        .map_err(|e| Error::missing_file(path.as_str()).with_context(e.to_string()))
}

/// A small catalog exercising attributes, values, CDATA, lists and nesting
pub fn sample_catalog() -> Map {
    let first = Map::new()
        .with(
            "@attributes",
            Map::new().with("id", "bk101").with("available", true),
        )
        .with("title", "XML Developer's Guide")
        .with("price", 44.95)
        .with(
            "summary",
            Map::new()
                .with("@value", "Tags like <b> & friends")
                .with("@cdata", true),
        );

    let second = Map::new()
        .with("@attributes", Map::new().with("id", "bk102"))
        .with("title", "Midnight Rain")
        .with("price", 5)
        .with("tags", List::from(vec![Value::from("fantasy"), Value::from("new")]));

    Map::new()
        .with("@attributes", Map::new().with("version", 2))
        .with("book", List::from(vec![Value::from(first), Value::from(second)]))
}

/// A map nested `depth` levels deep under the key `level`
pub fn nested_map(depth: usize) -> Map {
    let mut map = Map::new().with("leaf", "bottom");
    for _ in 1..depth {
        map = Map::new().with("level", map);
    }
    map
}

/// A flat list of `count` scalar items
pub fn scalar_list(count: usize) -> List {
    (0..count)
        .map(|i| Value::from(format!("item {i}")))
        .collect()
}

#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use zxml::test_utils::{sample_catalog, scalar_list};
use zxml::{
    from, from_map, from_vector, ErrorKind, List, Map, Result, Scalar, TreeBuilder, Value,
};

#[test]
fn test_simple_map() -> Result<()> {
    let data = Map::new().with("name", "Alice").with("age", 30);
    let element = from_map("person", &data)?;

    assert_eq!(element.name(), "person");
    assert_eq!(element.len(), 2);
    assert_eq!(element.children()[0].name(), "name");
    assert_eq!(element.children()[0].text(), "Alice");
    assert_eq!(element.children()[1].name(), "age");
    assert_eq!(element.children()[1].value(), &Scalar::Integer(30));
    assert_eq!(
        element.serialize(),
        "<person><name>Alice</name><age>30</age></person>"
    );
    Ok(())
}

#[test]
fn test_list_becomes_repeated_siblings() -> Result<()> {
    let tags = List::from(vec![Value::from("x"), Value::from("y")]);
    let element = from_map("root", &Map::new().with("tags", tags))?;

    let names: Vec<_> = element.iter().map(|c| c.name()).collect();
    let texts: Vec<_> = element.iter().map(|c| c.text()).collect();
    assert_eq!(names, vec!["tags", "tags"]);
    assert_eq!(texts, vec!["x", "y"]);
    Ok(())
}

#[test]
fn test_value_map_with_attributes_and_cdata() -> Result<()> {
    let note = Map::new()
        .with("@value", "<b>hi</b>")
        .with("@cdata", true)
        .with("@attributes", Map::new().with("lang", "en"));
    let element = from_map("root", &Map::new().with("note", note))?;

    let note = &element.children()[0];
    assert!(note.is_cdata());
    assert_eq!(note.attribute("lang"), Some("en"));
    assert_eq!(note.text(), "<b>hi</b>");
    assert_eq!(
        element.serialize(),
        r#"<root><note lang="en"><![CDATA[<b>hi</b>]]></note></root>"#
    );
    Ok(())
}

#[test]
fn test_value_map_ignores_other_keys() -> Result<()> {
    let leaf = Map::new().with("@value", 1).with("ignored", "child");
    let element = from_map("root", &Map::new().with("leaf", leaf))?;
    assert_eq!(element.serialize(), "<root><leaf>1</leaf></root>");
    Ok(())
}

#[test]
fn test_root_attributes_are_unboxed() -> Result<()> {
    let data = Map::new()
        .with(
            "@attributes",
            Map::new()
                .with("id", 7)
                .with("active", false)
                .with("ratio", 0.5)
                .with("missing", Value::Scalar(Scalar::Null)),
        )
        .with("child", "c");
    let element = from_map("root", &data)?;

    assert_eq!(element.attribute("id"), Some("7"));
    assert_eq!(element.attribute("active"), Some("false"));
    assert_eq!(element.attribute("ratio"), Some("0.5"));
    assert_eq!(element.attribute("missing"), Some("null"));
    assert_eq!(element.len(), 1);
    Ok(())
}

#[test]
fn test_empty_map_gives_childless_element() -> Result<()> {
    let element = from_map("root", &Map::new().with("empty", Map::new()))?;
    let empty = &element.children()[0];
    assert!(!empty.has_children());
    assert!(!empty.has_attributes());
    assert_eq!(element.serialize(), "<root><empty/></root>");
    Ok(())
}

#[test]
fn test_names_are_sanitized() -> Result<()> {
    let data = Map::new().with("1st place", "gold").with("na!me", "x");
    let element = from_map("my root", &data)?;
    assert_eq!(element.name(), "myroot");
    assert_eq!(element.children()[0].name(), "_1stplace");
    assert_eq!(element.children()[1].name(), "name");
    Ok(())
}

#[test]
fn test_escaping_in_text_and_attributes() -> Result<()> {
    let data = Map::new()
        .with("@attributes", Map::new().with("q", r#"say "hi""#))
        .with("text", "a < b & c > d");
    let element = from_map("root", &data)?;
    assert_eq!(
        element.serialize(),
        r#"<root q="say &quot;hi&quot;"><text>a &lt; b &amp; c &gt; d</text></root>"#
    );
    Ok(())
}

#[test]
fn test_from_vector() -> Result<()> {
    let element = from_vector("list", "entry", &scalar_list(3))?;
    assert_eq!(element.name(), "list");
    assert_eq!(element.len(), 3);
    assert!(element.iter().all(|c| c.name() == "entry"));
    assert_eq!(element.children()[2].text(), "item 2");
    Ok(())
}

#[test]
fn test_from_dispatches_on_shape() -> Result<()> {
    let map = Value::from(Map::new().with("a", 1));
    assert_eq!(from(&map, "root")?.serialize(), "<root><a>1</a></root>");

    let list = Value::from(vec![Value::from(1), Value::from(2)]);
    assert_eq!(
        from(&list, "root")?.serialize(),
        "<root><item>1</item><item>2</item></root>"
    );

    let text = Value::from("<greeting>hi</greeting>");
    let element = from(&text, "ignored")?;
    assert_eq!(element.name(), "greeting");
    assert_eq!(element.text(), "hi");
    Ok(())
}

#[test]
fn test_nested_lists_flatten_into_siblings() -> Result<()> {
    let inner = Value::from(vec![Value::from("b"), Value::from("c")]);
    let outer = List::from(vec![Value::from("a"), inner]);
    let element = from_map("root", &Map::new().with("x", outer))?;
    let texts: Vec<_> = element.iter().map(|c| c.text()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
    Ok(())
}

#[test]
fn test_catalog_serialization() -> Result<()> {
    let element = from_map("catalog", &sample_catalog())?;
    assert_eq!(
        element.serialize(),
        concat!(
            r#"<catalog version="2">"#,
            r#"<book id="bk101" available="true">"#,
            "<title>XML Developer&apos;s Guide</title>",
            "<price>44.95</price>",
            "<summary><![CDATA[Tags like <b> & friends]]></summary>",
            "</book>",
            r#"<book id="bk102">"#,
            "<title>Midnight Rain</title>",
            "<price>5</price>",
            "<tags>fantasy</tags>",
            "<tags>new</tags>",
            "</book>",
            "</catalog>"
        )
    );
    Ok(())
}

#[test]
fn test_invalid_attributes_shape() {
    let data = Map::new().with("@attributes", "not a map");
    let result = TreeBuilder::new().from_map("root", &data);
    assert!(matches!(
        result.map_err(|e| e.kind().clone()),
        Err(ErrorKind::InvalidStructure { .. })
    ));
}

#[test]
fn test_invalid_value_shape() {
    let leaf = Map::new().with("@value", Map::new());
    let result = from_map("root", &Map::new().with("leaf", leaf));
    assert!(matches!(
        result.map_err(|e| e.kind().clone()),
        Err(ErrorKind::InvalidStructure { .. })
    ));
}

use super::*;
use serde::Deserialize;
use serde_json::json;

#[test]
fn test_valid_json_is_parsed_strictly() {
    let value = unserialize("  {\"a\": \"x\\ny\", \"n\": [1, 2]}  ").unwrap();
    assert_eq!(value, json!({"a": "x\ny", "n": [1, 2]}));
}

#[test]
fn test_raw_newline_in_string() {
    let value = unserialize("{\"note\": \"line1\nline2\"}").unwrap();
    assert_eq!(value["note"], "line1\nline2");
}

#[test]
fn test_unescaped_inner_quotes() {
    let value = unserialize(r#"{"title": "The "Best" shoe", "sku": "A-1"}"#).unwrap();
    assert_eq!(value["title"], "The \"Best\" shoe");
    assert_eq!(value["sku"], "A-1");
}

#[test]
fn test_invalid_escape_kept_as_raw_text() {
    let value = unserialize(r#"{"path": "C:\Temp\new"}"#).unwrap();
    assert_eq!(value["path"], r"C:\Temp\new");
}

#[test]
fn test_escaped_forward_slash_restored() {
    let value = unserialize(r#"{"url": "http:\/\/shop.test", "bad": "a\qb"}"#).unwrap();
    assert_eq!(value["url"], "http://shop.test");
    assert_eq!(value["bad"], r"a\qb");
}

#[test]
fn test_nested_values_are_restored() {
    let value = unserialize("{\"rows\": [{\"text\": \"a\nb\"}, \"c\\d\"]}").unwrap();
    assert_eq!(value["rows"][0]["text"], "a\nb");
    assert_eq!(value["rows"][1], r"c\d");
}

#[test]
fn test_garbage_fails() {
    let err = unserialize("definitely not json").unwrap_err();
    assert!(matches!(err, CoreError::JsonParse { .. }));
    assert!(err.to_string().contains("[J001]"));
}

#[test]
fn test_bytes_with_invalid_utf8() {
    let value = unserialize_bytes(b"{\"name\": \"caf\xe9\"}").unwrap();
    let name = value["name"].as_str().unwrap();
    assert!(name.starts_with("caf"));
    assert!(name.ends_with('\u{FFFD}'));
}

#[test]
fn test_unserialize_as_typed() {
    #[derive(Deserialize)]
    struct Product {
        name: String,
        qty: u32,
    }

    let product: Product = unserialize_as("{\"name\": \"Tee\nShirt\", \"qty\": 3}").unwrap();
    assert_eq!(product.name, "Tee\nShirt");
    assert_eq!(product.qty, 3);
}

#[test]
fn test_serialize_compact() {
    let out = serialize(&json!({"a": [1, 2]})).unwrap();
    assert_eq!(out, "{\"a\":[1,2]}");
}

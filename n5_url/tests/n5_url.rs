//! Integration tests for N5 URL parsing, normalization, and resolution.

use n5_url::normalize::{normalize_attribute_path, normalize_path};
use n5_url::{N5Url, NormalizationError, ParseError};

#[test]
fn test_from_parts_round_trip() {
    let parts = [
        (Some("/tmp/data.n5"), Some("/a/b"), Some("c[1]/d")),
        (Some("file:///tmp/data.n5"), Some("a/./b"), None),
        (Some("s3://bucket/x"), None, Some("")),
        (Some("relative"), Some(""), None),
        (None, None, Some("x/../y")),
        (Some("C:/data.n5"), Some("g"), Some("a")),
    ];
    for (container, group, attribute) in parts {
        let url = N5Url::from_parts(container, group, attribute).unwrap();
        let reparsed = N5Url::parse(&url.to_string()).unwrap();
        assert_eq!(reparsed, url);
        assert_eq!(
            reparsed.normalize_container_path().unwrap(),
            normalize_path(container.unwrap_or_default()).unwrap()
        );
        assert_eq!(reparsed.group_path(), group);
        assert_eq!(reparsed.attribute_path(), attribute);
        if let Some(group) = group {
            assert_eq!(
                reparsed.normalize_group_path().unwrap(),
                normalize_path(group).unwrap()
            );
        }
        if let Some(attribute) = attribute {
            assert_eq!(
                reparsed.normalize_attribute_path().unwrap(),
                normalize_attribute_path(attribute).unwrap()
            );
        }
    }
}

#[test]
fn test_absent_and_empty_are_distinct() {
    let absent = N5Url::from_parts(Some("/a"), None, None).unwrap();
    let empty = N5Url::from_parts(Some("/a"), Some(""), Some("")).unwrap();
    assert_ne!(absent, empty);
    assert_eq!(absent.to_string(), "/a");
    assert_eq!(empty.to_string(), "/a?#");
    assert_eq!(N5Url::parse("/a?#").unwrap(), empty);
    assert_eq!(absent.normalize_group_path().unwrap(), "");
    assert_eq!(empty.normalize_group_path().unwrap(), "");
}

#[test]
fn test_normalize_examples() {
    assert_eq!(normalize_path("/a/b/../c").unwrap(), "/a/c");
    assert_eq!(normalize_path("./a/./b").unwrap(), "a/b");
    assert_eq!(normalize_path("a\\/b/c").unwrap(), "a/b/c");
    assert_eq!(normalize_attribute_path("a/b[2]/c").unwrap(), "a/b/[2]/c");
}

#[test]
fn test_normalize_url_components() {
    let url = N5Url::parse("/data/./sample.n5?/volumes/../labels#a/./b[0]/..").unwrap();
    assert_eq!(url.normalize_container_path().unwrap(), "/data/sample.n5");
    assert_eq!(url.normalize_group_path().unwrap(), "/labels");
    assert_eq!(url.normalize_attribute_path().unwrap(), "a/b");

    let url = N5Url::parse("/data?..").unwrap();
    assert_eq!(
        url.normalize_group_path(),
        Err(NormalizationError::from("..".to_string()))
    );
}

#[test]
fn test_is_absolute() {
    assert!(N5Url::parse("/a").unwrap().is_absolute());
    assert!(N5Url::parse("file:/a").unwrap().is_absolute());
    assert!(N5Url::parse("C:/a").unwrap().is_absolute());
    assert!(N5Url::parse("s3://bucket/a").unwrap().is_absolute());
    assert!(!N5Url::parse("a/b").unwrap().is_absolute());
    assert!(!N5Url::parse("?g").unwrap().is_absolute());
    assert!(!N5Url::parse("s3://bucket").unwrap().is_absolute());
}

#[test]
fn test_resolve() {
    let base = N5Url::parse("file:/root?group1").unwrap();
    assert_eq!(
        base.resolve_str("?sub").unwrap().to_string(),
        "file:/root?group1/sub"
    );
    assert_eq!(base.resolve_str("/other").unwrap().to_string(), "file:/other");
    assert_eq!(
        base.resolve_str("#attr").unwrap().to_string(),
        "file:/root?group1#attr"
    );
}

#[test]
fn test_resolve_chain() {
    let base = N5Url::parse("s3://bucket/sample.n5").unwrap();
    let group = base.resolve_str("?volumes").unwrap();
    let group = group.resolve_str("?raw").unwrap();
    let attribute = group.resolve_str("#scales").unwrap();
    let attribute = attribute.resolve_str("#[0]").unwrap();
    assert_eq!(
        attribute.to_string(),
        "s3://bucket/sample.n5?volumes/raw#scales/[0]"
    );
    assert_eq!(attribute.normalize_attribute_path().unwrap(), "scales/[0]");
}

#[test]
fn test_resolve_logs() {
    testing_logger::setup();
    let base = N5Url::parse("file:/root?g").unwrap();
    base.resolve_str("?h").unwrap();
    testing_logger::validate(|captured_logs| {
        assert_eq!(captured_logs.len(), 1);
        assert_eq!(captured_logs[0].level, log::Level::Trace);
        assert_eq!(
            captured_logs[0].body,
            "Resolved ?h against file:/root?g as file:/root?g/h"
        );
    });
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        N5Url::parse("abc\\"),
        Err(ParseError::DanglingEscape(_))
    ));
    assert!(matches!(
        N5Url::parse(":abc"),
        Err(ParseError::MissingScheme(_))
    ));
    assert!(matches!(
        N5Url::parse("a_b:c"),
        Err(ParseError::InvalidScheme(_))
    ));
}

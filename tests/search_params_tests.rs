//! Tests for `UrlSearchParams` and its link to the owning `Url`.

use pretty_assertions::assert_eq;
use wurl::{Url, UrlSearchParams};

#[test]
fn test_query_parsing() {
    let test_cases = vec![
        ("a=b&c=d", vec![("a", "b"), ("c", "d")]),
        ("?a=b", vec![("a", "b")]),
        ("a=b&&c", vec![("a", "b"), ("c", "")]),
        ("a=1=2", vec![("a", "1=2")]),
        ("%61+%62=%zz", vec![("a b", "%zz")]),
        ("q=%E2%9C%93", vec![("q", "✓")]),
    ];

    for (input, expected) in test_cases {
        let params = UrlSearchParams::from_query(input);
        let expected: Vec<(String, String)> = expected
            .into_iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
        assert_eq!(params.pairs(), expected, "Parsing failed for: {:?}", input);
    }
}

#[test]
fn test_serialization() {
    let params = UrlSearchParams::from_pairs([("a b", "1+1"), ("€", "~*"), ("x", "")]);
    assert_eq!(params.to_string(), "a+b=1%2B1&%E2%82%AC=%7E*&x=");
}

#[test]
fn test_mutations_write_back_to_url() {
    let url = Url::new("https://example.com/?a=1&b=2", None).unwrap();
    let params = url.search_params();

    params.append("c", "3");
    assert_eq!(url.search(), "?a=1&b=2&c=3");

    params.set("a", "x y");
    assert_eq!(url.search(), "?a=x+y&b=2&c=3");

    params.delete("b", None);
    assert_eq!(url.search(), "?a=x+y&c=3");

    params.append("0", "z");
    params.sort();
    assert_eq!(url.search(), "?0=z&a=x+y&c=3");
}

#[test]
fn test_write_back_normalizes_query() {
    let url = Url::new("http://h/?a=%7e&b", None).unwrap();
    url.search_params().sort();
    assert_eq!(url.href(), "http://h/?a=%7E&b=");
}

#[test]
fn test_clearing_params_removes_query() {
    let url = Url::new("http://h/p?only=1#f", None).unwrap();
    url.search_params().delete("only", None);
    assert_eq!(url.href(), "http://h/p#f");
    assert_eq!(url.record().query, None);
}

#[test]
fn test_url_changes_replace_list() {
    let url = Url::new("http://h/?a=1", None).unwrap();
    let params = url.search_params();

    url.set_search("?x=1&y=2");
    assert_eq!(params.keys().collect::<Vec<_>>(), vec!["x", "y"]);

    url.set_href("http://h/").unwrap();
    assert_eq!(params.size(), 0);

    url.set_hash("ignored");
    params.append("k", "v");
    assert_eq!(url.href(), "http://h/?k=v#ignored");
}

#[test]
fn test_values_and_for_each() {
    let params = UrlSearchParams::from_query("a=1&b=2&a=3");
    assert_eq!(params.values().collect::<Vec<_>>(), vec!["1", "2", "3"]);

    let mut seen = Vec::new();
    params.for_each(|value, name, owner| {
        if name == "b" && owner.size() < 4 {
            owner.append("late", "4");
        }
        seen.push(format!("{}={}", name, value));
    });
    assert_eq!(seen, vec!["a=1", "b=2", "a=3", "late=4"]);
}

#[test]
fn test_detached_params_survive_url() {
    let params = {
        let url = Url::new("http://h/?keep=me", None).unwrap();
        url.search_params()
    };
    params.append("more", "1");
    assert_eq!(params.to_string(), "keep=me&more=1");
}

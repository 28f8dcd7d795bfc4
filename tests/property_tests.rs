//! Property tests for parsing, setters and the form codec.

use proptest::prelude::*;
use wurl::url::form_urlencoded;
use wurl::{Url, UrlSearchParams};

fn url_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["http", "https", "ftp", "ws", "file", "sc", "git+ssh"]),
        "[a-z0-9-]{1,12}(\\.[a-z0-9-]{1,8}){0,2}",
        prop::option::of(1u32..70000),
        "(/[a-zA-Z0-9._~%-]{0,8}){0,4}",
        prop::option::of("[a-z0-9=&+% ]{0,16}"),
        prop::option::of("[a-z0-9 #?]{0,8}"),
    )
        .prop_map(|(scheme, host, port, path, query, fragment)| {
            let mut url = format!("{}://{}", scheme, host);
            if let Some(port) = port {
                url.push_str(&format!(":{}", port));
            }
            url.push_str(&path);
            if let Some(query) = query {
                url.push('?');
                url.push_str(&query);
            }
            if let Some(fragment) = fragment {
                url.push('#');
                url.push_str(&fragment);
            }
            url
        })
}

proptest! {
    #[test]
    fn prop_parse_never_panics(input in "\\PC{0,40}") {
        let parsed = Url::new(&input, None);
        prop_assert_eq!(parsed.is_ok(), Url::can_parse(&input, None));
    }

    #[test]
    fn prop_href_is_a_fixed_point(input in url_strategy()) {
        if let Ok(url) = Url::new(&input, None) {
            let href = url.href();
            let reparsed = Url::new(&href, None);
            prop_assert!(reparsed.is_ok(), "href {:?} did not reparse", href);
            if let Ok(reparsed) = reparsed {
                prop_assert_eq!(reparsed.record(), url.record());
                prop_assert_eq!(reparsed.href(), href);
            }
        }
    }

    #[test]
    fn prop_rejected_port_leaves_url_unchanged(input in url_strategy(), port in "\\PC{0,8}") {
        if let Ok(url) = Url::new(&input, None) {
            let before = url.record();
            url.set_port(&port);
            let after = url.record();
            prop_assert_eq!(&after.scheme, &before.scheme);
            prop_assert_eq!(&after.host, &before.host);
            prop_assert_eq!(&after.path, &before.path);
            prop_assert_eq!(&after.query, &before.query);
        }
    }

    #[test]
    fn prop_form_codec_preserves_pairs(
        pairs in prop::collection::vec(("\\PC{0,8}", "\\PC{0,8}"), 0..6)
    ) {
        let serialized = form_urlencoded::serialize(
            pairs.iter().map(|(n, v)| (n.as_str(), v.as_str())),
        );
        prop_assert_eq!(form_urlencoded::parse(&serialized), pairs);
    }

    #[test]
    fn prop_sort_orders_names_and_keeps_ties(
        pairs in prop::collection::vec(("[a-c]{0,2}", "[0-9]"), 0..10)
    ) {
        let params = UrlSearchParams::from_pairs(pairs.clone());
        params.sort();
        let sorted = params.pairs();

        let mut expected = pairs;
        expected.sort_by(|(a, _), (b, _)| a.cmp(b));
        prop_assert_eq!(sorted, expected);
    }
}

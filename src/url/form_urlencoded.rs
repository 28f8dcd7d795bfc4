//! The `application/x-www-form-urlencoded` codec behind query parameter lists.

use crate::core::percent::push_escaped_byte;
use crate::encoding::decode_utf8_without_bom;

/// Bytes the serializer writes through unchanged.
const NO_ESCAPE: [bool; 128] = {
    let mut table = [false; 128];
    let mut b = 0;
    while b < 128 {
        table[b] = (b as u8).is_ascii_alphanumeric() || matches!(b as u8, b'*' | b'-' | b'.' | b'_');
        b += 1;
    }
    table
};

/// Parse a form-encoded string into name/value pairs.
///
/// Sequences are split on `&` and empty ones dropped. Each sequence splits on its
/// first `=`; a missing `=` gives an empty value. `+` decodes to a space and only
/// well-formed `%XX` escapes are decoded.
///
/// # Examples
///
/// ```
/// use wurl::url::form_urlencoded::parse;
///
/// let pairs = parse("a=1&&b=x+y%21&c");
/// assert_eq!(pairs, vec![
///     ("a".to_string(), "1".to_string()),
///     ("b".to_string(), "x y!".to_string()),
///     ("c".to_string(), String::new()),
/// ]);
/// ```
pub fn parse(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|sequence| !sequence.is_empty())
        .map(|sequence| {
            let (name, value) = sequence.split_once('=').unwrap_or((sequence, ""));
            (decode_component(name), decode_component(value))
        })
        .collect()
}

fn decode_component(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() && is_hex_pair(bytes[i + 1], bytes[i + 2]) => {
                out.push((hex_value(bytes[i + 1]) << 4) | hex_value(bytes[i + 2]));
                i += 2;
            }
            other => out.push(other),
        }
        i += 1;
    }
    decode_utf8_without_bom(&out)
}

fn is_hex_pair(high: u8, low: u8) -> bool {
    high.is_ascii_hexdigit() && low.is_ascii_hexdigit()
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// Serialize name/value pairs, joining them with `&`.
///
/// # Examples
///
/// ```
/// use wurl::url::form_urlencoded::serialize;
///
/// assert_eq!(serialize([("q", "a b&c"), ("é", "~")]), "q=a+b%26c&%C3%A9=%7E");
/// ```
pub fn serialize<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (index, (name, value)) in pairs.into_iter().enumerate() {
        if index > 0 {
            out.push('&');
        }
        serialize_component(name, &mut out);
        out.push('=');
        serialize_component(value, &mut out);
    }
    out
}

fn serialize_component(input: &str, out: &mut String) {
    for b in input.bytes() {
        if b == b' ' {
            out.push('+');
        } else if b < 0x80 && NO_ESCAPE[b as usize] {
            out.push(char::from(b));
        } else {
            push_escaped_byte(b, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_parse() {
        let test_cases = vec![
            ("", pairs(&[])),
            ("&&&", pairs(&[])),
            ("a", pairs(&[("a", "")])),
            ("=b", pairs(&[("", "b")])),
            ("a=b=c", pairs(&[("a", "b=c")])),
            ("a+b=c+d", pairs(&[("a b", "c d")])),
            ("%2B=%2b", pairs(&[("+", "+")])),
            ("a=%zz%4", pairs(&[("a", "%zz%4")])),
            ("a=%E2%82%AC", pairs(&[("a", "€")])),
            ("a=%FF", pairs(&[("a", "\u{FFFD}")])),
            ("x=1&x=2", pairs(&[("x", "1"), ("x", "2")])),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse(input), expected, "parsing {:?}", input);
        }
    }

    #[test]
    fn test_parse_keeps_leading_bom() {
        assert_eq!(parse("%EF%BB%BFa=1"), pairs(&[("\u{FEFF}a", "1")]));
    }

    #[test]
    fn test_serialize() {
        let test_cases = vec![
            (vec![], ""),
            (vec![("a", "")], "a="),
            (vec![("a b", "c+d")], "a+b=c%2Bd"),
            (vec![("*-._", "~!'()")], "*-._=%7E%21%27%28%29"),
            (vec![("x", "1"), ("y", "2")], "x=1&y=2"),
            (vec![("😀", "\u{0}")], "%F0%9F%98%80=%00"),
            (vec![("\u{7f}\n", "é/")], "%7F%0A=%C3%A9%2F"),
        ];

        for (input, expected) in test_cases {
            assert_eq!(serialize(input.clone()), expected, "serializing {:?}", input);
        }
    }

    #[test]
    fn test_serialize_then_parse_preserves_pairs() {
        let original = pairs(&[("a&b", "c=d"), ("sp ace", "100%"), ("", "")]);
        let serialized = serialize(original.iter().map(|(n, v)| (n.as_str(), v.as_str())));
        assert_eq!(parse(&serialized), original);
    }
}

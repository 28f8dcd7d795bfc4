//! Percent-encoding under the URL component encode sets.
//!
//! Each encode set is a 128-entry table marking the ASCII bytes that pass through
//! unescaped. Code points at or above U+0080 are always UTF-8 encoded and every
//! resulting byte is escaped.

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// A table of ASCII bytes that do not need escaping in a given component.
#[derive(Debug, Clone, Copy)]
pub struct EncodeSet {
    passthrough: [bool; 128],
}

impl EncodeSet {
    /// Everything printable except DEL passes; C0 controls and DEL are escaped.
    const fn c0_control() -> Self {
        let mut passthrough = [false; 128];
        let mut byte = 0x20;
        while byte < 0x7F {
            passthrough[byte] = true;
            byte += 1;
        }
        EncodeSet { passthrough }
    }

    /// This set widened by the given extra bytes.
    const fn add(mut self, extra: &[u8]) -> Self {
        let mut i = 0;
        while i < extra.len() {
            self.passthrough[extra[i] as usize] = false;
            i += 1;
        }
        self
    }

    /// Whether `c` must be percent-encoded under this set.
    pub fn should_encode(&self, c: char) -> bool {
        let code = c as u32;
        code >= 0x80 || !self.passthrough[code as usize]
    }
}

/// C0 controls and everything above U+007E.
pub const C0_CONTROL: EncodeSet = EncodeSet::c0_control();

/// Used for the fragment.
pub const FRAGMENT: EncodeSet = C0_CONTROL.add(b" \"<>`");

/// Used for the query of non-special URLs.
pub const QUERY: EncodeSet = C0_CONTROL.add(b" \"#<>");

/// Used for the query of special URLs.
pub const SPECIAL_QUERY: EncodeSet = QUERY.add(b"'");

/// Used for path segments.
pub const PATH: EncodeSet = QUERY.add(b"?`{}");

/// Used for usernames and passwords.
pub const USERINFO: EncodeSet = PATH.add(b"/:;=@[\\]^|");

/// Used by component-level encoding helpers.
pub const COMPONENT: EncodeSet = USERINFO.add(b"$%&+,");

/// Append the percent-encoded form of `c` to `out`.
pub fn encode_char_into(c: char, set: &EncodeSet, out: &mut String) {
    if !set.should_encode(c) {
        out.push(c);
        return;
    }
    let mut utf8 = [0u8; 4];
    for byte in c.encode_utf8(&mut utf8).as_bytes() {
        push_escaped_byte(*byte, out);
    }
}

/// Percent-encode every code point of `input` under `set`.
pub fn utf8_percent_encode(input: &str, set: &EncodeSet) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        encode_char_into(c, set, &mut out);
    }
    out
}

/// Append `%XX` for `byte` to `out`.
pub(crate) fn push_escaped_byte(byte: u8, out: &mut String) {
    out.push('%');
    out.push(HEX_UPPER[(byte >> 4) as usize] as char);
    out.push(HEX_UPPER[(byte & 0x0F) as usize] as char);
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Percent-decode a byte sequence.
///
/// Only `%` followed by exactly two hex digits is decoded; any other `%` is kept as-is.
pub fn percent_decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let byte = input[i];
        if byte == b'%' && i + 2 < input.len() {
            if let (Some(high), Some(low)) = (hex_value(input[i + 1]), hex_value(input[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(byte);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c0_control_set() {
        assert!(C0_CONTROL.should_encode('\u{0}'));
        assert!(C0_CONTROL.should_encode('\u{1F}'));
        assert!(C0_CONTROL.should_encode('\u{7F}'));
        assert!(C0_CONTROL.should_encode('é'));
        assert!(!C0_CONTROL.should_encode(' '));
        assert!(!C0_CONTROL.should_encode('~'));
    }

    #[test]
    fn test_sets_widen_each_other() {
        assert!(!QUERY.should_encode('\''));
        assert!(SPECIAL_QUERY.should_encode('\''));
        assert!(!QUERY.should_encode('?'));
        assert!(PATH.should_encode('?'));
        assert!(!PATH.should_encode('@'));
        assert!(USERINFO.should_encode('@'));
        assert!(!USERINFO.should_encode('&'));
        assert!(COMPONENT.should_encode('&'));
        assert!(FRAGMENT.should_encode('`'));
        assert!(!FRAGMENT.should_encode('#'));
    }

    #[test]
    fn test_utf8_percent_encode() {
        assert_eq!(utf8_percent_encode("a b", &PATH), "a%20b");
        assert_eq!(utf8_percent_encode("é", &C0_CONTROL), "%C3%A9");
        assert_eq!(utf8_percent_encode("💩", &FRAGMENT), "%F0%9F%92%A9");
        assert_eq!(utf8_percent_encode("user:pass", &USERINFO), "user%3Apass");
        assert_eq!(utf8_percent_encode("plain", &COMPONENT), "plain");
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode(b"%41%42c"), b"ABc".to_vec());
        assert_eq!(percent_decode(b"%zz"), b"%zz".to_vec());
        assert_eq!(percent_decode(b"100%"), b"100%".to_vec());
        assert_eq!(percent_decode(b"%4"), b"%4".to_vec());
        assert_eq!(percent_decode(b"%c3%A9"), "é".as_bytes().to_vec());
    }
}

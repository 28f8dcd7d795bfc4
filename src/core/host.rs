//! Host parsing and serialization: domains, IPv4, IPv6 and opaque hosts.

use tracing::debug;

use crate::core::domain::DomainToAscii;
use crate::core::percent::{percent_decode, utf8_percent_encode, C0_CONTROL};
use crate::error::ParseError;
use crate::types::Host;

/// Code points that may not appear in any host.
pub fn is_forbidden_host_code_point(c: char) -> bool {
    matches!(
        c,
        '\0' | '\t'
            | '\n'
            | '\r'
            | ' '
            | '#'
            | '/'
            | ':'
            | '<'
            | '>'
            | '?'
            | '@'
            | '['
            | '\\'
            | ']'
            | '^'
            | '|'
    )
}

/// Code points that may not appear in a domain: the forbidden host code points,
/// C0 controls, `%` and DEL.
pub fn is_forbidden_domain_code_point(c: char) -> bool {
    is_forbidden_host_code_point(c) || c <= '\u{1F}' || c == '%' || c == '\u{7F}'
}

/// Parse a host string.
///
/// `is_opaque` is set for non-special URLs, whose non-bracketed hosts are only
/// percent-encoded rather than run through IDNA.
pub fn parse_host(
    input: &str,
    is_opaque: bool,
    domain_to_ascii: &dyn DomainToAscii,
) -> Result<Host, ParseError> {
    if let Some(inner) = input.strip_prefix('[') {
        let Some(address) = inner.strip_suffix(']') else {
            return Err(ParseError::InvalidIpv6Address);
        };
        return parse_ipv6(address).map(Host::Ipv6);
    }

    if is_opaque {
        return parse_opaque_host(input);
    }

    let decoded = percent_decode(input.as_bytes());
    let domain = String::from_utf8_lossy(&decoded);

    let ascii_domain = match domain_to_ascii.to_ascii(&domain) {
        Ok(ascii) if !ascii.is_empty() => ascii,
        Ok(_) => {
            debug!(domain = %domain, "domain to ASCII produced an empty domain");
            return Err(ParseError::IdnaError);
        }
        Err(err) => {
            debug!(domain = %domain, error = %err, "domain to ASCII failed");
            return Err(ParseError::IdnaError);
        }
    };

    if ascii_domain.chars().any(is_forbidden_domain_code_point) {
        return Err(ParseError::ForbiddenDomainCodePoint);
    }

    if ends_in_a_number(&ascii_domain) {
        return parse_ipv4(&ascii_domain).map(Host::Ipv4);
    }

    Ok(Host::Domain(ascii_domain))
}

/// Parse the host of a non-special URL.
fn parse_opaque_host(input: &str) -> Result<Host, ParseError> {
    if input.chars().any(is_forbidden_host_code_point) {
        return Err(ParseError::ForbiddenHostCodePoint);
    }
    if input.is_empty() {
        return Ok(Host::Empty);
    }
    Ok(Host::Opaque(utf8_percent_encode(input, &C0_CONTROL)))
}

/// Whether the last dot-separated label of `input` looks numeric, which routes
/// the whole host through the IPv4 parser.
fn ends_in_a_number(input: &str) -> bool {
    let mut parts: Vec<&str> = input.split('.').collect();
    if parts.last() == Some(&"") {
        if parts.len() == 1 {
            return false;
        }
        parts.pop();
    }
    let Some(last) = parts.last() else {
        return false;
    };
    if !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    parse_ipv4_number(last).is_some()
}

/// Parse one IPv4 part: decimal, `0`-prefixed octal or `0x`-prefixed hex.
///
/// Values too large for `u64` saturate, which every caller rejects as out of range.
fn parse_ipv4_number(input: &str) -> Option<u64> {
    if input.is_empty() {
        return None;
    }
    let (digits, radix) = if let Some(hex) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        (hex, 16)
    } else if input.len() >= 2 && input.starts_with('0') {
        (&input[1..], 8)
    } else {
        (input, 10)
    };

    if digits.is_empty() {
        return Some(0);
    }

    let mut value: u64 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(radix)?;
        value = value
            .saturating_mul(u64::from(radix))
            .saturating_add(u64::from(digit));
    }
    Some(value)
}

/// Parse a dotted IPv4 address using the legacy one-to-four-part forms.
pub fn parse_ipv4(input: &str) -> Result<u32, ParseError> {
    let mut parts: Vec<&str> = input.split('.').collect();
    if parts.last() == Some(&"") && parts.len() > 1 {
        parts.pop();
    }
    if parts.len() > 4 {
        return Err(ParseError::InvalidIpv4Address);
    }

    let mut numbers = Vec::with_capacity(parts.len());
    for part in parts {
        numbers.push(parse_ipv4_number(part).ok_or(ParseError::InvalidIpv4Address)?);
    }

    let Some((&last, init)) = numbers.split_last() else {
        return Err(ParseError::InvalidIpv4Address);
    };
    if init.iter().any(|&n| n > 255) {
        return Err(ParseError::InvalidIpv4Address);
    }
    // The last part fills every byte the earlier parts did not claim.
    let limit = 256u64.pow(5 - numbers.len() as u32);
    if last >= limit {
        return Err(ParseError::InvalidIpv4Address);
    }

    let mut ipv4 = last;
    for (i, &n) in init.iter().enumerate() {
        ipv4 += n * 256u64.pow(3 - i as u32);
    }
    u32::try_from(ipv4).map_err(|_| ParseError::InvalidIpv4Address)
}

/// Parse the text between the brackets of an IPv6 host.
pub fn parse_ipv6(input: &str) -> Result<[u16; 8], ParseError> {
    let input: Vec<char> = input.chars().collect();
    let at = |i: usize| input.get(i).copied();

    let mut address = [0u16; 8];
    let mut piece_index = 0usize;
    let mut compress: Option<usize> = None;
    let mut pointer = 0usize;

    if at(pointer) == Some(':') {
        if at(pointer + 1) != Some(':') {
            return Err(ParseError::InvalidIpv6Address);
        }
        pointer += 2;
        piece_index += 1;
        compress = Some(piece_index);
    }

    while let Some(c) = at(pointer) {
        if piece_index == 8 {
            return Err(ParseError::InvalidIpv6Address);
        }
        if c == ':' {
            if compress.is_some() {
                return Err(ParseError::InvalidIpv6Address);
            }
            pointer += 1;
            piece_index += 1;
            compress = Some(piece_index);
            continue;
        }

        let mut value: u32 = 0;
        let mut length = 0;
        while length < 4 {
            match at(pointer).and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    value = value * 0x10 + digit;
                    pointer += 1;
                    length += 1;
                }
                None => break,
            }
        }

        match at(pointer) {
            Some('.') => {
                if length == 0 {
                    return Err(ParseError::InvalidIpv6Address);
                }
                pointer -= length;
                if piece_index > 6 {
                    return Err(ParseError::InvalidIpv6Address);
                }
                let mut numbers_seen = 0;
                while at(pointer).is_some() {
                    if numbers_seen > 0 {
                        if at(pointer) == Some('.') && numbers_seen < 4 {
                            pointer += 1;
                        } else {
                            return Err(ParseError::InvalidIpv6Address);
                        }
                    }
                    if !at(pointer).is_some_and(|c| c.is_ascii_digit()) {
                        return Err(ParseError::InvalidIpv6Address);
                    }
                    let mut ipv4_piece: Option<u32> = None;
                    while let Some(digit) = at(pointer).and_then(|c| c.to_digit(10)) {
                        ipv4_piece = match ipv4_piece {
                            None => Some(digit),
                            Some(0) => return Err(ParseError::InvalidIpv6Address),
                            Some(piece) => Some(piece * 10 + digit),
                        };
                        if ipv4_piece.is_some_and(|piece| piece > 255) {
                            return Err(ParseError::InvalidIpv6Address);
                        }
                        pointer += 1;
                    }
                    let piece = ipv4_piece.unwrap_or(0) as u16;
                    address[piece_index] = address[piece_index].wrapping_mul(0x100) + piece;
                    numbers_seen += 1;
                    if numbers_seen == 2 || numbers_seen == 4 {
                        piece_index += 1;
                    }
                }
                if numbers_seen != 4 {
                    return Err(ParseError::InvalidIpv6Address);
                }
                break;
            }
            Some(':') => {
                pointer += 1;
                if at(pointer).is_none() {
                    return Err(ParseError::InvalidIpv6Address);
                }
            }
            Some(_) => return Err(ParseError::InvalidIpv6Address),
            None => {}
        }

        address[piece_index] = value as u16;
        piece_index += 1;
    }

    match compress {
        Some(compress) => {
            let mut swaps = piece_index - compress;
            piece_index = 7;
            while piece_index != 0 && swaps > 0 {
                address.swap(piece_index, compress + swaps - 1);
                piece_index -= 1;
                swaps -= 1;
            }
        }
        None if piece_index != 8 => return Err(ParseError::InvalidIpv6Address),
        None => {}
    }

    Ok(address)
}

/// Serialize an IPv4 address in dotted-decimal form.
pub fn serialize_ipv4(address: u32) -> String {
    let [a, b, c, d] = address.to_be_bytes();
    format!("{}.{}.{}.{}", a, b, c, d)
}

/// Serialize an IPv6 address, compressing the first longest run of two or more zero pieces.
pub fn serialize_ipv6(address: &[u16; 8]) -> String {
    let compress = longest_zero_run(address);
    let mut output = String::with_capacity(39);
    let mut ignore_zero = false;
    for (index, piece) in address.iter().enumerate() {
        if ignore_zero && *piece == 0 {
            continue;
        }
        ignore_zero = false;
        if compress == Some(index) {
            output.push_str(if index == 0 { "::" } else { ":" });
            ignore_zero = true;
            continue;
        }
        output.push_str(&format!("{:x}", piece));
        if index != 7 {
            output.push(':');
        }
    }
    output
}

fn longest_zero_run(address: &[u16; 8]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    let mut index = 0;
    while index < 8 {
        if address[index] != 0 {
            index += 1;
            continue;
        }
        let start = index;
        while index < 8 && address[index] == 0 {
            index += 1;
        }
        let length = index - start;
        if length >= 2 && best.map_or(true, |(_, best_length)| length > best_length) {
            best = Some((start, length));
        }
    }
    best.map(|(start, _)| start)
}

/// Serialize a host as it appears in the authority.
pub fn serialize_host(host: &Host) -> String {
    match host {
        Host::Domain(domain) => domain.clone(),
        Host::Opaque(opaque) => opaque.clone(),
        Host::Ipv4(address) => serialize_ipv4(*address),
        Host::Ipv6(address) => format!("[{}]", serialize_ipv6(address)),
        Host::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::IdnaDomainToAscii;

    fn host(input: &str) -> Result<Host, ParseError> {
        parse_host(input, false, &IdnaDomainToAscii)
    }

    #[test]
    fn test_ipv4_forms() {
        let cases = vec![
            ("127.0.0.1", 0x7F00_0001),
            ("0x7f.1", 0x7F00_0001),
            ("0177.0.0.1", 0x7F00_0001),
            ("2130706433", 0x7F00_0001),
            ("192.168.257", 0xC0A8_0101),
            ("1.2.3.4.", 0x0102_0304),
            ("0x", 0),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_ipv4(input), Ok(expected), "IPv4 mismatch for: {}", input);
        }
    }

    #[test]
    fn test_ipv4_rejections() {
        for input in ["256.0.0.1", "1.2.3.4.5", "4294967296", "09", "1.2.3.0x100"] {
            assert!(parse_ipv4(input).is_err(), "should reject: {}", input);
        }
    }

    #[test]
    fn test_ends_in_a_number() {
        assert!(ends_in_a_number("example.123"));
        assert!(ends_in_a_number("example.0x1f"));
        assert!(ends_in_a_number("1.2.3.4."));
        assert!(!ends_in_a_number("example.com"));
        assert!(!ends_in_a_number("0xg"));
        assert!(!ends_in_a_number("."));
    }

    #[test]
    fn test_ipv6_parse_and_serialize() {
        let cases = vec![
            ("::1", "::1"),
            ("::", "::"),
            ("1:0:0:0:0:0:0:1", "1::1"),
            ("2001:db8::8:800:200C:417A", "2001:db8::8:800:200c:417a"),
            ("1:0:0:2:0:0:0:3", "1:0:0:2::3"),
            ("::ffff:192.168.0.1", "::ffff:c0a8:1"),
            ("1:2:3:4:5:6:7:8", "1:2:3:4:5:6:7:8"),
            ("0:0:1:0:0:0:0:0", "0:0:1::"),
        ];
        for (input, expected) in cases {
            let address = parse_ipv6(input).unwrap();
            assert_eq!(serialize_ipv6(&address), expected, "IPv6 mismatch for: {}", input);
        }
    }

    #[test]
    fn test_ipv6_rejections() {
        for input in [":1", "1:::2", "1:2:3:4:5:6:7:8:9", "1:2", "::1.2.3", "::01.2.3.4", "12345::", "1:"] {
            assert!(parse_ipv6(input).is_err(), "should reject: {}", input);
        }
    }

    #[test]
    fn test_parse_host_variants() {
        assert_eq!(host("EXAMPLE.com"), Ok(Host::Domain("example.com".to_string())));
        assert_eq!(host("%65xample.com"), Ok(Host::Domain("example.com".to_string())));
        assert_eq!(host("0x7f.0.0.1"), Ok(Host::Ipv4(0x7F00_0001)));
        assert_eq!(host("[::1]"), Ok(Host::Ipv6([0, 0, 0, 0, 0, 0, 0, 1])));
        assert_eq!(host("[::1"), Err(ParseError::InvalidIpv6Address));
        assert!(host("exa mple.com").is_err());
        assert_eq!(host("example.999"), Err(ParseError::InvalidIpv4Address));
    }

    #[test]
    fn test_opaque_hosts() {
        assert_eq!(
            parse_host("ExAmPlE", true, &IdnaDomainToAscii),
            Ok(Host::Opaque("ExAmPlE".to_string()))
        );
        assert_eq!(
            parse_host("é", true, &IdnaDomainToAscii),
            Ok(Host::Opaque("%C3%A9".to_string()))
        );
        assert_eq!(
            parse_host("a<b", true, &IdnaDomainToAscii),
            Err(ParseError::ForbiddenHostCodePoint)
        );
    }

    #[test]
    fn test_serialize_host() {
        assert_eq!(serialize_host(&Host::Ipv4(0x0102_0304)), "1.2.3.4");
        assert_eq!(serialize_host(&Host::Ipv6([0, 0, 0, 0, 0, 0, 0, 1])), "[::1]");
        assert_eq!(serialize_host(&Host::Empty), "");
    }
}

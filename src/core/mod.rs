//! Core URL algorithms.
//!
//! This module contains the string-level machinery:
//! - The basic URL parser and its state overrides
//! - Host parsing (domains, IPv4, IPv6, opaque hosts)
//! - The pluggable domain-to-ASCII capability
//! - Percent-encoding under the component encode sets
//! - Record serialization and origin derivation

pub mod domain;
pub mod host;
pub mod parser;
pub mod percent;
pub mod serializer;

// Re-export main functionality
pub use domain::{DomainError, DomainToAscii, IdnaDomainToAscii};
pub use host::{parse_host, parse_ipv4, parse_ipv6, serialize_host, serialize_ipv4, serialize_ipv6};
pub use parser::{basic_url_parse, reparse_with_override, StateOverride};
pub use percent::{
    percent_decode, utf8_percent_encode, EncodeSet, C0_CONTROL, COMPONENT, FRAGMENT, PATH, QUERY,
    SPECIAL_QUERY, USERINFO,
};
pub use serializer::{serialize_host_and_port, serialize_origin, serialize_path, serialize_url};

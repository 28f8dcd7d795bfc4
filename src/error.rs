//! Error types for URL parsing, component setters and argument coercion.

use thiserror::Error;

/// Errors surfaced by the public entry points of this crate.
///
/// Every variant except [`UrlError::RangeError`] corresponds to a script-visible
/// `TypeError`; see [`UrlError::is_type_error`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// An argument could not be converted to the expected shape.
    #[error("{0}")]
    TypeError(String),

    /// An argument was well-typed but outside the supported set of values.
    #[error("{0}")]
    RangeError(String),

    /// The input string is not a valid URL (optionally relative to the given base).
    #[error("Invalid URL: {input}")]
    InvalidUrl {
        /// The rejected input.
        input: String,
    },

    /// The base string passed next to an input is not itself a valid URL.
    #[error("Invalid base URL: {base}")]
    InvalidBase {
        /// The rejected base.
        base: String,
    },

    /// A method or accessor was invoked on a value this crate did not construct.
    #[error("Illegal invocation")]
    IllegalInvocation,

    /// Fatal UTF-8 decoding met an invalid byte sequence.
    #[error("The encoded data was not valid.")]
    InvalidData,
}

impl UrlError {
    /// Whether this error would be raised as a `TypeError` by a script host.
    pub fn is_type_error(&self) -> bool {
        !matches!(self, UrlError::RangeError(_))
    }
}

/// Why the basic URL parser rejected an input.
///
/// The parser is all-or-nothing: a `ParseError` is never accompanied by a partially
/// populated record.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A special URL, or a URL with credentials, has an empty host.
    #[error("empty host")]
    EmptyHost,

    /// Credentials were given but no host follows them.
    #[error("credentials without a host")]
    HostMissing,

    /// A non-digit appeared inside the port.
    #[error("invalid port number")]
    InvalidPort,

    /// The port is larger than 65535.
    #[error("port number out of range")]
    PortOutOfRange,

    /// A host that ends in a number is not a valid IPv4 address.
    #[error("invalid IPv4 address")]
    InvalidIpv4Address,

    /// A bracketed host is not a valid IPv6 address.
    #[error("invalid IPv6 address")]
    InvalidIpv6Address,

    /// An opaque host contains a forbidden host code point.
    #[error("forbidden host code point")]
    ForbiddenHostCodePoint,

    /// A domain contains a forbidden domain code point after IDNA processing.
    #[error("forbidden domain code point")]
    ForbiddenDomainCodePoint,

    /// The Unicode-to-ASCII domain transform failed or produced an empty domain.
    #[error("invalid international domain name")]
    IdnaError,

    /// A relative input was given without a usable base URL.
    #[error("relative URL without a base")]
    MissingSchemeNonRelativeUrl,

    /// The scheme contains a code point outside `[A-Za-z0-9+\-.]`, or is empty.
    #[error("invalid scheme")]
    InvalidScheme,

    /// A scheme setter tried to cross the special/non-special boundary or to
    /// switch to `file` while credentials, a port or an empty host are present.
    #[error("scheme change not permitted")]
    SchemeChangeRejected,

    /// A component setter input was rejected by its state override.
    #[error("component rejected by state override")]
    StateOverrideRejected,
}

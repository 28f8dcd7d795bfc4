//! wurl - WHATWG URL parsing for Rust
//!
//! This crate parses, resolves, serializes and edits URLs the way web browsers do,
//! and exposes the `URL` and `URLSearchParams` interfaces on top of that.
//!
//! # Features
//!
//! - **Standard parsing**: A full state machine parser with relative resolution
//!   against a base URL, special and non-special schemes, and `file:` handling
//! - **Hosts**: Domains through IDNA, IPv4 in all its numeric forms, IPv6 with
//!   canonical compression, and opaque hosts
//! - **Setters**: Component setters that either apply cleanly or leave the URL untouched
//! - **Query lists**: A live `URLSearchParams` that writes back into its URL
//! - **Dynamic bindings**: Web IDL style conversions with the same error messages
//!   scripts see
//!
//! # Quick Start
//!
//! ```
//! use wurl::{Url, UrlSearchParams};
//!
//! let url = Url::new("/search?q=rust", Some("https://EXAMPLE.org:443/docs/"))?;
//! assert_eq!(url.href(), "https://example.org/search?q=rust");
//!
//! // Setters never fail; bad input is ignored
//! url.set_port("8443");
//! url.set_port("not a port");
//! assert_eq!(url.host(), "example.org:8443");
//!
//! // The query as a live list
//! let params = url.search_params();
//! params.append("page", "2");
//! assert_eq!(url.search(), "?q=rust&page=2");
//!
//! let standalone = UrlSearchParams::from_query("b=2&a=1");
//! standalone.sort();
//! assert_eq!(standalone.to_string(), "a=1&b=2");
//! # Ok::<(), wurl::UrlError>(())
//! ```
//!
//! # Layers
//!
//! | Module     | Contents |
//! |------------|----------|
//! | [`core`](crate::core) | Parser, host parsing, percent-encoding, serializers |
//! | [`url`]    | `Url`, `UrlSearchParams`, form codec, dynamic bindings |
//! | [`webidl`] | Dynamic values, conversions, brand checks |
//! | [`encoding`] | UTF-8 `TextEncoder` / `TextDecoder` |
//!
//! # Error Handling
//!
//! Fallible entry points return `Result<T, UrlError>`:
//!
//! - `Invalid URL: ...` and `Invalid base URL: ...` from constructors and `href`
//! - Conversion failures prefixed with the failing operation, e.g.
//!   `Failed to construct 'URL': 1 argument required, but only 0 present`
//! - `Illegal invocation` when a receiver was not built by this crate
//!
//! The low-level parser reports a [`ParseError`] instead.

// Re-export the object layer
pub use url::{Url, UrlSearchParams};

// Re-export the core algorithms
pub use crate::core::{basic_url_parse, reparse_with_override, StateOverride};
pub use crate::core::{serialize_host, serialize_origin, serialize_path, serialize_url};
pub use crate::core::{utf8_percent_encode, DomainError, DomainToAscii, EncodeSet, IdnaDomainToAscii};

// Re-export public types
pub use config::UrlConfig;
pub use error::{ParseError, UrlError};
pub use types::{default_port, is_special_scheme, Host, UrlPath, UrlRecord};

// Module declarations
pub mod config;
pub mod core;
pub mod encoding;
pub mod error;
pub mod types;
pub mod url;
pub mod webidl;

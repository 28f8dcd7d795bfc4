//! Turning a URL record back into strings.
//!
//! These are pure functions of the record; none of them re-parses anything.

use crate::config::UrlConfig;
use crate::core::host::serialize_host;
use crate::core::parser::basic_url_parse;
use crate::types::{UrlPath, UrlRecord};

/// Serialize a record to its canonical string form.
///
/// # Examples
///
/// ```
/// use wurl::{basic_url_parse, serialize_url, UrlConfig};
///
/// let record = basic_url_parse("HTTP://Example.COM:80/a/../b", None, &UrlConfig::default()).unwrap();
/// assert_eq!(serialize_url(&record, false), "http://example.com/b");
/// ```
pub fn serialize_url(url: &UrlRecord, exclude_fragment: bool) -> String {
    let mut output = String::with_capacity(url.scheme.len() + 16);
    output.push_str(&url.scheme);
    output.push(':');

    if let Some(host) = &url.host {
        output.push_str("//");
        if url.includes_credentials() {
            output.push_str(&url.username);
            if !url.password.is_empty() {
                output.push(':');
                output.push_str(&url.password);
            }
            output.push('@');
        }
        output.push_str(&serialize_host(host));
        if let Some(port) = url.port {
            output.push(':');
            output.push_str(&port.to_string());
        }
    }

    // Keeps a path such as `//x` from being read back as an authority.
    if url.host.is_none() {
        if let UrlPath::Segments(segments) = &url.path {
            if segments.len() > 1 && segments[0].is_empty() {
                output.push_str("/.");
            }
        }
    }

    output.push_str(&serialize_path(url));

    if let Some(query) = &url.query {
        output.push('?');
        output.push_str(query);
    }

    if !exclude_fragment {
        if let Some(fragment) = &url.fragment {
            output.push('#');
            output.push_str(fragment);
        }
    }

    output
}

/// Serialize the path component, as returned by the `pathname` getter.
pub fn serialize_path(url: &UrlRecord) -> String {
    match &url.path {
        UrlPath::Opaque(path) => {
            if url.query.is_none() && url.fragment.is_none() {
                path.trim_end_matches(' ').to_string()
            } else {
                path.clone()
            }
        }
        UrlPath::Segments(segments) => {
            let mut output = String::new();
            for segment in segments {
                output.push('/');
                output.push_str(segment);
            }
            output
        }
    }
}

/// Serialize `host[:port]`, or the empty string when there is no host.
pub fn serialize_host_and_port(url: &UrlRecord) -> String {
    match (&url.host, url.port) {
        (None, _) => String::new(),
        (Some(host), None) => serialize_host(host),
        (Some(host), Some(port)) => format!("{}:{}", serialize_host(host), port),
    }
}

/// Serialize the origin of a URL.
///
/// Special non-file schemes produce a tuple origin `scheme://host[:port]`; a `blob:`
/// URL takes the origin of the http(s) URL in its path; everything else is the
/// opaque origin `"null"`.
pub fn serialize_origin(url: &UrlRecord, config: &UrlConfig) -> String {
    match url.scheme.as_str() {
        "http" | "https" | "ws" | "wss" | "ftp" => {
            format!("{}://{}", url.scheme, serialize_host_and_port(url))
        }
        "blob" => {
            let path = serialize_path(url);
            match basic_url_parse(&path, None, config) {
                Ok(inner) if inner.scheme == "http" || inner.scheme == "https" => {
                    serialize_origin(&inner, config)
                }
                _ => "null".to_string(),
            }
        }
        _ => "null".to_string(),
    }
}

//! Core data structures: the URL record and its tagged host and path variants.

/// Schemes with a mandated authority, hierarchical path and (except `file`) a default port.
pub const SPECIAL_SCHEMES: [&str; 6] = ["ftp", "file", "http", "https", "ws", "wss"];

/// Whether `scheme` is one of the special schemes.
pub fn is_special_scheme(scheme: &str) -> bool {
    SPECIAL_SCHEMES.contains(&scheme)
}

/// The default port of a special scheme, if it has one.
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        "ftp" => Some(21),
        _ => None,
    }
}

/// A parsed host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Host {
    /// An ASCII domain after IDNA processing (lowercase).
    Domain(String),
    /// An IPv4 address in host byte order.
    Ipv4(u32),
    /// An IPv6 address as eight 16-bit pieces.
    Ipv6([u16; 8]),
    /// A percent-encoded host of a non-special URL.
    Opaque(String),
    /// The empty host (`file:///`, `foo://`).
    Empty,
}

impl Host {
    /// Whether this is the empty host.
    pub fn is_empty(&self) -> bool {
        matches!(self, Host::Empty)
    }
}

/// A URL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPath {
    /// A single unstructured string, used by non-special URLs without `//`.
    Opaque(String),
    /// Hierarchical segments joined with `/` on serialization.
    Segments(Vec<String>),
}

impl Default for UrlPath {
    fn default() -> Self {
        UrlPath::Segments(Vec::new())
    }
}

impl UrlPath {
    /// Whether the path is opaque.
    pub fn is_opaque(&self) -> bool {
        matches!(self, UrlPath::Opaque(_))
    }

    /// The segments of a hierarchical path; an opaque path has none.
    pub fn segments(&self) -> &[String] {
        match self {
            UrlPath::Segments(segments) => segments,
            UrlPath::Opaque(_) => &[],
        }
    }

    /// Append a segment, turning an opaque path into a segment list first.
    pub(crate) fn push_segment(&mut self, segment: String) {
        match self {
            UrlPath::Segments(segments) => segments.push(segment),
            UrlPath::Opaque(_) => *self = UrlPath::Segments(vec![segment]),
        }
    }

    /// Remove the last segment. An opaque path becomes an empty segment list.
    pub(crate) fn pop_segment(&mut self) {
        match self {
            UrlPath::Segments(segments) => {
                segments.pop();
            }
            UrlPath::Opaque(_) => *self = UrlPath::Segments(Vec::new()),
        }
    }
}

/// The canonical parsed representation of a URL.
///
/// Records are produced whole by the parser and only changed afterwards by the
/// component setters, which either replace a component or leave the record untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlRecord {
    /// Lowercase, non-empty scheme without the trailing `:`.
    pub scheme: String,
    /// Percent-encoded username; empty means absent.
    pub username: String,
    /// Percent-encoded password; empty means absent.
    pub password: String,
    /// Host, present whenever the URL has an authority.
    pub host: Option<Host>,
    /// Port, `None` when absent or equal to the scheme's default port.
    pub port: Option<u16>,
    /// Opaque or hierarchical path.
    pub path: UrlPath,
    /// Percent-encoded query without the leading `?`.
    pub query: Option<String>,
    /// Percent-encoded fragment without the leading `#`.
    pub fragment: Option<String>,
}

impl UrlRecord {
    /// Whether the scheme is special.
    pub fn is_special(&self) -> bool {
        is_special_scheme(&self.scheme)
    }

    /// Whether the path is opaque.
    pub fn has_opaque_path(&self) -> bool {
        self.path.is_opaque()
    }

    /// Whether a username or password is set.
    pub fn includes_credentials(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }

    /// URLs without a host, with the empty host, or with the `file` scheme cannot
    /// carry a username, password or port.
    pub fn cannot_have_username_password_port(&self) -> bool {
        match &self.host {
            None | Some(Host::Empty) => true,
            Some(_) => self.scheme == "file",
        }
    }

    /// Remove trailing U+0020 from an opaque path once no query or fragment follows it.
    pub(crate) fn strip_trailing_spaces_from_opaque_path(&mut self) {
        if self.fragment.is_some() || self.query.is_some() {
            return;
        }
        if let UrlPath::Opaque(path) = &mut self.path {
            let trimmed = path.trim_end_matches(' ').len();
            path.truncate(trimmed);
        }
    }
}

//! The `URL` object: a parsed record plus its lazily created query view.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::config::UrlConfig;
use crate::core::host::serialize_host;
use crate::core::parser::basic_url_parse;
use crate::core::serializer::{
    serialize_host_and_port, serialize_origin, serialize_path, serialize_url,
};
use crate::error::UrlError;
use crate::types::UrlRecord;
use crate::url::form_urlencoded;
use crate::url::search_params::UrlSearchParams;
use crate::webidl::{Brand, InterfaceKind};

/// A shared handle to a parsed URL.
///
/// Cloning the handle does not copy the URL; clones see each other's setter calls.
///
/// # Examples
///
/// ```
/// use wurl::Url;
///
/// let url = Url::new("../guide?lang=en#intro", Some("https://example.com/docs/api/")).unwrap();
/// assert_eq!(url.href(), "https://example.com/docs/guide?lang=en#intro");
/// assert_eq!(url.search(), "?lang=en");
/// assert_eq!(url.origin(), "https://example.com");
/// ```
#[derive(Clone)]
pub struct Url(pub(crate) Rc<RefCell<UrlInner>>);

pub(crate) struct UrlInner {
    brand: Brand,
    pub(crate) record: UrlRecord,
    pub(crate) config: UrlConfig,
    pub(crate) query_object: Option<UrlSearchParams>,
}

impl UrlInner {
    /// Store the serialization of the attached search params as the query.
    pub(crate) fn apply_serialized_query(&mut self, serialized: String) {
        if serialized.is_empty() {
            self.record.query = None;
            self.record.strip_trailing_spaces_from_opaque_path();
        } else {
            self.record.query = Some(serialized);
        }
    }

    /// Rebuild the attached search params list from the current query.
    pub(crate) fn sync_search_params(&self) {
        if let Some(params) = &self.query_object {
            let list = self
                .record
                .query
                .as_deref()
                .map(form_urlencoded::parse)
                .unwrap_or_default();
            params.replace_list(list);
        }
    }
}

impl Url {
    /// Parse `input`, resolving it against `base` when one is given.
    pub fn new(input: &str, base: Option<&str>) -> Result<Self, UrlError> {
        Self::new_with_config(input, base, UrlConfig::default())
    }

    pub fn new_with_config(
        input: &str,
        base: Option<&str>,
        config: UrlConfig,
    ) -> Result<Self, UrlError> {
        let record = parse_record(input, base, &config)?;
        Ok(Self::from_record(record, config))
    }

    /// Like [`Url::new`], but failure is `None`.
    pub fn parse(input: &str, base: Option<&str>) -> Option<Self> {
        Self::parse_with_config(input, base, UrlConfig::default())
    }

    pub fn parse_with_config(input: &str, base: Option<&str>, config: UrlConfig) -> Option<Self> {
        Self::new_with_config(input, base, config).ok()
    }

    /// Whether [`Url::new`] would succeed, without building the object.
    pub fn can_parse(input: &str, base: Option<&str>) -> bool {
        Self::can_parse_with_config(input, base, &UrlConfig::default())
    }

    pub fn can_parse_with_config(input: &str, base: Option<&str>, config: &UrlConfig) -> bool {
        parse_record(input, base, config).is_ok()
    }

    /// Wrap an existing record.
    pub fn from_record(record: UrlRecord, config: UrlConfig) -> Self {
        Url(Rc::new(RefCell::new(UrlInner {
            brand: Brand::stamp(InterfaceKind::Url),
            record,
            config,
            query_object: None,
        })))
    }

    /// A copy of the underlying record.
    pub fn record(&self) -> UrlRecord {
        self.0.borrow().record.clone()
    }

    /// The configuration this URL was parsed with.
    pub fn config(&self) -> UrlConfig {
        self.0.borrow().config.clone()
    }

    /// The brand stamped at construction.
    pub fn brand(&self) -> Brand {
        self.0.borrow().brand
    }

    /// Whether both handles refer to the same URL.
    pub fn ptr_eq(&self, other: &Url) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn href(&self) -> String {
        serialize_url(&self.0.borrow().record, false)
    }

    pub fn origin(&self) -> String {
        let inner = self.0.borrow();
        serialize_origin(&inner.record, &inner.config)
    }

    /// The scheme followed by `:`.
    pub fn protocol(&self) -> String {
        format!("{}:", self.0.borrow().record.scheme)
    }

    pub fn username(&self) -> String {
        self.0.borrow().record.username.clone()
    }

    pub fn password(&self) -> String {
        self.0.borrow().record.password.clone()
    }

    /// Host and, when present, `:port`.
    pub fn host(&self) -> String {
        serialize_host_and_port(&self.0.borrow().record)
    }

    pub fn hostname(&self) -> String {
        self.0
            .borrow()
            .record
            .host
            .as_ref()
            .map(serialize_host)
            .unwrap_or_default()
    }

    /// The port as a decimal string; empty when absent or default.
    pub fn port(&self) -> String {
        self.0
            .borrow()
            .record
            .port
            .map(|port| port.to_string())
            .unwrap_or_default()
    }

    pub fn pathname(&self) -> String {
        serialize_path(&self.0.borrow().record)
    }

    /// `?` plus the query, or empty when the query is absent or empty.
    pub fn search(&self) -> String {
        prefixed('?', self.0.borrow().record.query.as_deref())
    }

    /// `#` plus the fragment, or empty when the fragment is absent or empty.
    pub fn hash(&self) -> String {
        prefixed('#', self.0.borrow().record.fragment.as_deref())
    }

    /// The query as a live parameter list.
    ///
    /// The first call creates the list; later calls return the same object. The list
    /// only holds a weak link back, so it never keeps the URL alive.
    pub fn search_params(&self) -> UrlSearchParams {
        let mut inner = self.0.borrow_mut();
        if let Some(params) = &inner.query_object {
            return params.clone();
        }
        let params = UrlSearchParams::from_query(inner.record.query.as_deref().unwrap_or(""));
        params.attach(Rc::downgrade(&self.0));
        inner.query_object = Some(params.clone());
        params
    }

    /// Same as [`Url::href`].
    pub fn to_json(&self) -> String {
        self.href()
    }
}

fn prefixed(prefix: char, component: Option<&str>) -> String {
    match component {
        Some(value) if !value.is_empty() => format!("{}{}", prefix, value),
        _ => String::new(),
    }
}

fn parse_record(
    input: &str,
    base: Option<&str>,
    config: &UrlConfig,
) -> Result<UrlRecord, UrlError> {
    let base = match base {
        Some(base) => Some(basic_url_parse(base, None, config).map_err(|reason| {
            debug!(base = %base, reason = %reason, "rejected base URL");
            UrlError::InvalidBase {
                base: base.to_string(),
            }
        })?),
        None => None,
    };

    basic_url_parse(input, base.as_ref(), config).map_err(|reason| {
        debug!(input = %input, reason = %reason, "rejected URL");
        UrlError::InvalidUrl {
            input: input.to_string(),
        }
    })
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

impl fmt::Debug for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Url").field(&self.href()).finish()
    }
}

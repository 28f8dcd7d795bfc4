//! `URLSearchParams`: an ordered, mutable list of query name/value pairs.
//!
//! A list created through [`Url::search_params`](crate::Url::search_params) keeps a
//! weak link to its URL. Every mutation writes the serialized list back into the
//! URL's query, and URL-side changes to the query replace the list.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::error::UrlError;
use crate::url::form_urlencoded;
use crate::url::object::UrlInner;
use crate::webidl::{Brand, InterfaceKind, SearchParamsInit};

/// A shared handle to a query parameter list.
///
/// Cloning the handle does not copy the list; clones observe each other's changes.
#[derive(Clone)]
pub struct UrlSearchParams(Rc<RefCell<ParamsInner>>);

struct ParamsInner {
    brand: Brand,
    list: Vec<(String, String)>,
    url: Option<Weak<RefCell<UrlInner>>>,
}

impl UrlSearchParams {
    /// An empty, detached list.
    pub fn new() -> Self {
        Self::from_list(Vec::new())
    }

    fn from_list(list: Vec<(String, String)>) -> Self {
        UrlSearchParams(Rc::new(RefCell::new(ParamsInner {
            brand: Brand::stamp(InterfaceKind::UrlSearchParams),
            list,
            url: None,
        })))
    }

    /// Parse a query string; a single leading `?` is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use wurl::UrlSearchParams;
    ///
    /// let params = UrlSearchParams::from_query("?a=1&b=2&a=3");
    /// assert_eq!(params.get_all("a"), vec!["1", "3"]);
    /// assert_eq!(params.to_string(), "a=1&b=2&a=3");
    /// ```
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_list(form_urlencoded::parse(query))
    }

    /// Build from name/value pairs, in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_list(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Build from an already-converted constructor argument.
    ///
    /// Every inner sequence must hold exactly two strings.
    pub fn from_init(init: SearchParamsInit) -> Result<Self, UrlError> {
        match init {
            SearchParamsInit::String(query) => Ok(Self::from_query(&query)),
            SearchParamsInit::Record(record) => Ok(Self::from_pairs(record)),
            SearchParamsInit::Sequence(sequence) => {
                let mut list = Vec::with_capacity(sequence.len());
                for (index, pair) in sequence.into_iter().enumerate() {
                    let [name, value]: [String; 2] = pair.try_into().map_err(|_| {
                        UrlError::TypeError(format!(
                            "Failed to construct 'URLSearchParams': Item {} in the parameter list does not have length 2 exactly",
                            index
                        ))
                    })?;
                    list.push((name, value));
                }
                Ok(Self::from_list(list))
            }
        }
    }

    pub(crate) fn attach(&self, url: Weak<RefCell<UrlInner>>) {
        self.0.borrow_mut().url = Some(url);
    }

    pub(crate) fn replace_list(&self, list: Vec<(String, String)>) {
        self.0.borrow_mut().list = list;
    }

    /// The brand stamped at construction.
    pub fn brand(&self) -> Brand {
        self.0.borrow().brand
    }

    /// Whether both handles share the same list.
    pub fn ptr_eq(&self, other: &UrlSearchParams) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of pairs, duplicates included.
    pub fn size(&self) -> usize {
        self.0.borrow().list.len()
    }

    /// A snapshot of the pairs.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.0.borrow().list.clone()
    }

    pub fn append(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .list
            .push((name.to_string(), value.to_string()));
        self.update();
    }

    /// Remove every pair named `name`, or only those that also carry `value`.
    pub fn delete(&self, name: &str, value: Option<&str>) {
        self.0
            .borrow_mut()
            .list
            .retain(|(n, v)| !(n == name && value.map_or(true, |value| v == value)));
        self.update();
    }

    /// The value of the first pair named `name`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .list
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn get_all(&self, name: &str) -> Vec<String> {
        self.0
            .borrow()
            .list
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn has(&self, name: &str, value: Option<&str>) -> bool {
        self.0
            .borrow()
            .list
            .iter()
            .any(|(n, v)| n == name && value.map_or(true, |value| v == value))
    }

    /// Replace the first pair named `name` and drop the others; append if none exists.
    pub fn set(&self, name: &str, value: &str) {
        {
            let mut inner = self.0.borrow_mut();
            match inner.list.iter().position(|(n, _)| n == name) {
                Some(first) => {
                    inner.list[first].1 = value.to_string();
                    let mut index = 0;
                    inner.list.retain(|(n, _)| {
                        let keep = index <= first || n != name;
                        index += 1;
                        keep
                    });
                }
                None => inner.list.push((name.to_string(), value.to_string())),
            }
        }
        self.update();
    }

    /// Stable sort by name, comparing UTF-16 code units.
    pub fn sort(&self) {
        self.0
            .borrow_mut()
            .list
            .sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));
        self.update();
    }

    /// Live iterator over `(name, value)` pairs.
    ///
    /// The iterator reads the list by position on every step, so pairs appended
    /// while iterating are visited.
    pub fn entries(&self) -> Entries {
        Entries {
            params: self.clone(),
            index: 0,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = String> {
        self.entries().map(|(name, _)| name)
    }

    pub fn values(&self) -> impl Iterator<Item = String> {
        self.entries().map(|(_, value)| value)
    }

    /// Call `callback(value, name, self)` for each pair, re-reading the list after each call.
    pub fn for_each<F>(&self, mut callback: F)
    where
        F: FnMut(&str, &str, &UrlSearchParams),
    {
        let mut index = 0;
        loop {
            let pair = self.0.borrow().list.get(index).cloned();
            let Some((name, value)) = pair else { break };
            callback(&value, &name, self);
            index += 1;
        }
    }

    fn update(&self) {
        let url = self.0.borrow().url.as_ref().and_then(Weak::upgrade);
        let Some(url) = url else { return };
        let serialized = self.to_string();
        trace!(query = %serialized, "writing search params back to URL");
        url.borrow_mut().apply_serialized_query(serialized);
    }
}

impl Default for UrlSearchParams {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UrlSearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        let serialized = form_urlencoded::serialize(
            inner
                .list
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        f.write_str(&serialized)
    }
}

impl fmt::Debug for UrlSearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlSearchParams")
            .field("list", &self.0.borrow().list)
            .field("attached", &self.0.borrow().url.is_some())
            .finish()
    }
}

/// Iterator returned by [`UrlSearchParams::entries`].
pub struct Entries {
    params: UrlSearchParams,
    index: usize,
}

impl Iterator for Entries {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.params.0.borrow().list.get(self.index).cloned()?;
        self.index += 1;
        Some(item)
    }
}

//! A dynamic value model for the coercion layer.
//!
//! [`Value`] mirrors the ECMAScript language types closely enough for the converters
//! to apply their contracts: primitives, symbols with identity, and objects that
//! are ordinary (keyed properties), arrays, opaque iterables or platform objects
//! created by this crate.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::UrlError;
use crate::url::{Url, UrlSearchParams};
use crate::webidl::brand::Brand;
use crate::webidl::number::{number_to_string, string_to_number};

/// An ECMAScript language value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Symbol(Symbol),
    Object(Object),
}

/// A symbol; two symbols are equal only if they are the same symbol.
#[derive(Clone)]
pub struct Symbol(Rc<Option<String>>);

impl Symbol {
    /// Create a new, unique symbol.
    pub fn new(description: Option<&str>) -> Self {
        Symbol(Rc::new(description.map(str::to_string)))
    }

    /// The description given at creation.
    pub fn description(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// What `String(symbol)` returns.
    pub fn descriptive_string(&self) -> String {
        format!("Symbol({})", self.description().unwrap_or(""))
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptive_string())
    }
}

/// A property key: a string or a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(String),
    Symbol(Symbol),
}

impl PropertyKey {
    /// The key as a value, as seen by a key converter.
    pub fn to_value(&self) -> Value {
        match self {
            PropertyKey::String(s) => Value::String(s.clone()),
            PropertyKey::Symbol(symbol) => Value::Symbol(symbol.clone()),
        }
    }

    fn array_index(&self) -> Option<u32> {
        match self {
            PropertyKey::String(s) => array_index(s),
            PropertyKey::Symbol(_) => None,
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(key: &str) -> Self {
        PropertyKey::String(key.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(key: String) -> Self {
        PropertyKey::String(key)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(symbol: Symbol) -> Self {
        PropertyKey::Symbol(symbol)
    }
}

/// Canonical array index: `0`, or digits without a leading zero, below 2^32 - 1.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|index| *index != u32::MAX)
}

/// An own data property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub value: Value,
    pub enumerable: bool,
}

impl Property {
    /// An enumerable data property.
    pub fn enumerable(value: Value) -> Self {
        Self { value, enumerable: true }
    }

    /// A non-enumerable data property.
    pub fn hidden(value: Value) -> Self {
        Self { value, enumerable: false }
    }
}

/// An object handle; clones share identity.
#[derive(Clone)]
pub struct Object(Rc<ObjectKind>);

/// The shapes of object the converters distinguish.
pub enum ObjectKind {
    /// A plain object with own properties in creation order.
    Ordinary(IndexMap<PropertyKey, Property>),
    /// An array; iterable, with index keys and a hidden `length`.
    Array(Vec<Value>),
    /// A non-array object whose iterator yields the given values.
    Iterable(Vec<Value>),
    /// A `URL` or `URLSearchParams` created by this crate.
    Platform(PlatformObject),
}

impl Object {
    /// Wrap an object shape in a new identity.
    pub fn new(kind: ObjectKind) -> Self {
        Object(Rc::new(kind))
    }

    /// The object's shape.
    pub fn kind(&self) -> &ObjectKind {
        &self.0
    }

    /// Whether two handles refer to the same object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The platform object behind this handle, if any.
    pub fn as_platform(&self) -> Option<&PlatformObject> {
        match self.kind() {
            ObjectKind::Platform(platform) => Some(platform),
            _ => None,
        }
    }

    /// `OrdinaryOwnPropertyKeys`: integer indices ascending, then string keys in
    /// creation order, then symbols in creation order.
    pub fn own_property_keys(&self) -> Vec<PropertyKey> {
        match self.kind() {
            ObjectKind::Ordinary(properties) => {
                let mut indices: Vec<(u32, &PropertyKey)> = properties
                    .keys()
                    .filter_map(|key| key.array_index().map(|index| (index, key)))
                    .collect();
                indices.sort_by_key(|(index, _)| *index);

                let mut keys: Vec<PropertyKey> =
                    indices.into_iter().map(|(_, key)| key.clone()).collect();
                keys.extend(
                    properties
                        .keys()
                        .filter(|key| {
                            matches!(key, PropertyKey::String(_)) && key.array_index().is_none()
                        })
                        .cloned(),
                );
                keys.extend(
                    properties
                        .keys()
                        .filter(|key| matches!(key, PropertyKey::Symbol(_)))
                        .cloned(),
                );
                keys
            }
            ObjectKind::Array(items) => {
                let mut keys: Vec<PropertyKey> = (0..items.len())
                    .map(|index| PropertyKey::String(index.to_string()))
                    .collect();
                keys.push(PropertyKey::from("length"));
                keys
            }
            ObjectKind::Iterable(_) | ObjectKind::Platform(_) => Vec::new(),
        }
    }

    /// The own property stored under `key`.
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<Property> {
        match self.kind() {
            ObjectKind::Ordinary(properties) => properties.get(key).cloned(),
            ObjectKind::Array(items) => {
                if let PropertyKey::String(name) = key {
                    if name == "length" {
                        return Some(Property::hidden(Value::Number(items.len() as f64)));
                    }
                }
                let index = key.array_index()? as usize;
                items.get(index).cloned().map(Property::enumerable)
            }
            ObjectKind::Iterable(_) | ObjectKind::Platform(_) => None,
        }
    }

    /// `[[Get]]` without a prototype chain: the own value or `undefined`.
    pub fn get(&self, key: &PropertyKey) -> Value {
        self.get_own_property(key)
            .map(|property| property.value)
            .unwrap_or(Value::Undefined)
    }

    /// Whether the object has an iterator.
    pub fn is_iterable(&self) -> bool {
        match self.kind() {
            ObjectKind::Array(_) | ObjectKind::Iterable(_) => true,
            ObjectKind::Platform(platform) => platform.search_params().is_some(),
            ObjectKind::Ordinary(_) => false,
        }
    }

    /// Drain the object's iterator into a list, or `None` when it has none.
    pub fn iterate(&self) -> Option<Vec<Value>> {
        match self.kind() {
            ObjectKind::Array(items) | ObjectKind::Iterable(items) => Some(items.clone()),
            ObjectKind::Platform(platform) => platform.search_params().map(|params| {
                params
                    .pairs()
                    .into_iter()
                    .map(|(name, value)| Value::array([Value::from(name), Value::from(value)]))
                    .collect()
            }),
            ObjectKind::Ordinary(_) => None,
        }
    }

    fn to_primitive_string(&self) -> Result<String, UrlError> {
        match self.kind() {
            ObjectKind::Array(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(match item {
                        Value::Undefined | Value::Null => String::new(),
                        other => other.to_string()?,
                    });
                }
                Ok(parts.join(","))
            }
            ObjectKind::Platform(platform) => Ok(platform.to_string()),
            ObjectKind::Ordinary(_) | ObjectKind::Iterable(_) => Ok("[object Object]".to_string()),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ObjectKind::Ordinary(properties) => f.debug_map().entries(properties.iter()).finish(),
            ObjectKind::Array(items) => f.debug_list().entries(items.iter()).finish(),
            ObjectKind::Iterable(items) => f.debug_tuple("Iterable").field(items).finish(),
            ObjectKind::Platform(platform) => fmt::Debug::fmt(platform, f),
        }
    }
}

/// A `URL` or `URLSearchParams` wrapped for the dynamic world.
///
/// Only this crate can build one, and each carries the [`Brand`] of the value it
/// wraps, so a look-alike ordinary object never passes an interface check.
#[derive(Clone)]
pub struct PlatformObject {
    brand: Brand,
    inner: PlatformInner,
}

#[derive(Clone)]
enum PlatformInner {
    Url(Url),
    SearchParams(UrlSearchParams),
}

impl PlatformObject {
    /// The brand stamped at construction.
    pub fn brand(&self) -> Brand {
        self.brand
    }

    /// The wrapped URL.
    pub fn url(&self) -> Option<&Url> {
        match &self.inner {
            PlatformInner::Url(url) => Some(url),
            PlatformInner::SearchParams(_) => None,
        }
    }

    /// The wrapped search params.
    pub fn search_params(&self) -> Option<&UrlSearchParams> {
        match &self.inner {
            PlatformInner::SearchParams(params) => Some(params),
            PlatformInner::Url(_) => None,
        }
    }
}

impl fmt::Display for PlatformObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            PlatformInner::Url(url) => write!(f, "{}", url),
            PlatformInner::SearchParams(params) => write!(f, "{}", params),
        }
    }
}

impl fmt::Debug for PlatformObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ {} }}", self.brand.interface().name(), self)
    }
}

impl From<Url> for Value {
    fn from(url: Url) -> Self {
        let brand = url.brand();
        Value::Object(Object::new(ObjectKind::Platform(PlatformObject {
            brand,
            inner: PlatformInner::Url(url),
        })))
    }
}

impl From<UrlSearchParams> for Value {
    fn from(params: UrlSearchParams) -> Self {
        let brand = params.brand();
        Value::Object(Object::new(ObjectKind::Platform(PlatformObject {
            brand,
            inner: PlatformInner::SearchParams(params),
        })))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}

impl Value {
    /// A plain object with the given enumerable properties, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use wurl::webidl::Value;
    ///
    /// let init = Value::object([("fatal", Value::from(true))]);
    /// assert_eq!(init.to_string().unwrap(), "[object Object]");
    /// ```
    pub fn object<K, I>(entries: I) -> Value
    where
        K: Into<PropertyKey>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let properties = entries
            .into_iter()
            .map(|(key, value)| (key.into(), Property::enumerable(value)))
            .collect();
        Value::Object(Object::new(ObjectKind::Ordinary(properties)))
    }

    /// A plain object with explicit property attributes.
    pub fn object_with_properties<I>(properties: I) -> Value
    where
        I: IntoIterator<Item = (PropertyKey, Property)>,
    {
        Value::Object(Object::new(ObjectKind::Ordinary(properties.into_iter().collect())))
    }

    /// An array of the given items.
    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Value {
        Value::Object(Object::new(ObjectKind::Array(items.into_iter().collect())))
    }

    /// A non-array iterable object yielding the given items.
    pub fn iterable<I: IntoIterator<Item = Value>>(items: I) -> Value {
        Value::Object(Object::new(ObjectKind::Iterable(items.into_iter().collect())))
    }

    /// The `Type()` of the value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::BigInt(_) => "BigInt",
            Value::String(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::Object(_) => "Object",
        }
    }

    /// `undefined` or `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// The object behind this value, if it is one.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// `ToBoolean`.
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => !(*n == 0.0 || n.is_nan()),
            Value::BigInt(n) => *n != 0,
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_) | Value::Object(_) => true,
        }
    }

    /// `ToNumber`. BigInts and symbols are rejected.
    pub fn to_number(&self) -> Result<f64, UrlError> {
        match self {
            Value::Undefined => Ok(f64::NAN),
            Value::Null => Ok(0.0),
            Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => Ok(*n),
            Value::BigInt(_) => Err(UrlError::TypeError(
                "Cannot convert a BigInt value to a number".to_string(),
            )),
            Value::String(s) => Ok(string_to_number(s)),
            Value::Symbol(_) => Err(UrlError::TypeError(
                "Cannot convert a Symbol value to a number".to_string(),
            )),
            Value::Object(object) => Ok(string_to_number(&object.to_primitive_string()?)),
        }
    }

    /// `ToString`. Symbols are rejected.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> Result<String, UrlError> {
        match self {
            Value::Undefined => Ok("undefined".to_string()),
            Value::Null => Ok("null".to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(number_to_string(*n)),
            Value::BigInt(n) => Ok(n.to_string()),
            Value::String(s) => Ok(s.clone()),
            Value::Symbol(_) => Err(UrlError::TypeError(
                "Cannot convert a Symbol value to a string".to_string(),
            )),
            Value::Object(object) => object.to_primitive_string(),
        }
    }
}

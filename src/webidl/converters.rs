//! Converters from dynamic values to typed values.
//!
//! Each converter takes the raw [`Value`] and a [`Context`] describing where the
//! value came from, and either returns the typed value or a
//! [`UrlError::TypeError`] whose message reads
//! `"{prefix}: {context} {what went wrong}"`.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::UrlError;
use crate::webidl::value::{Object, Value};

const MAX_SAFE_INTEGER: f64 = 9007199254740991.0;

/// Where a value being converted came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    prefix: Option<String>,
    context: Option<String>,
}

impl Context {
    /// A context with only an operation prefix, e.g. `Failed to construct 'URL'`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            context: None,
        }
    }

    /// The context for positional argument `index` (1-based) of an operation.
    pub fn argument(prefix: impl Into<String>, index: usize) -> Self {
        Self::new(prefix).with_context(format!("Argument {}", index))
    }

    /// The same prefix with a different context.
    pub fn with_context(&self, context: impl Into<String>) -> Self {
        Self {
            prefix: self.prefix.clone(),
            context: Some(context.into()),
        }
    }

    /// The operation prefix.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The value description, if any.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Build the exception message for `message`.
    pub fn message(&self, message: &str) -> String {
        let prefix = match self.prefix() {
            Some(prefix) if !prefix.is_empty() => format!("{}: ", prefix),
            _ => String::new(),
        };
        let context = match self.context() {
            Some(context) if !context.is_empty() => context,
            _ => "Value",
        };
        format!("{}{} {}", prefix, context, message)
    }

    /// A `TypeError` carrying [`Context::message`].
    pub fn type_error(&self, message: &str) -> UrlError {
        UrlError::TypeError(self.message(message))
    }

    /// A `RangeError` carrying [`Context::message`].
    pub fn range_error(&self, message: &str) -> UrlError {
        UrlError::RangeError(self.message(message))
    }

    fn prefix_only(&self, message: &str) -> String {
        match self.prefix() {
            Some(prefix) if !prefix.is_empty() => format!("{}: {}", prefix, message),
            _ => message.to_string(),
        }
    }
}

/// Fail unless at least `required` arguments were passed.
///
/// # Examples
///
/// ```
/// use wurl::webidl::required_arguments;
///
/// let err = required_arguments(0, 1, "Failed to construct 'URL'").unwrap_err();
/// assert_eq!(err.to_string(), "Failed to construct 'URL': 1 argument required, but only 0 present");
/// ```
pub fn required_arguments(length: usize, required: usize, prefix: &str) -> Result<(), UrlError> {
    if length >= required {
        return Ok(());
    }
    let plural = if required == 1 { "" } else { "s" };
    let message = format!(
        "{} argument{} required, but only {} present",
        required, plural, length
    );
    Err(UrlError::TypeError(Context::new(prefix).prefix_only(&message)))
}

/// `any`: the value itself.
pub fn any(value: &Value) -> Value {
    value.clone()
}

/// `boolean`: truthiness.
pub fn boolean(value: &Value) -> bool {
    value.to_boolean()
}

/// Extended attributes that change integer conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegerOptions {
    /// `[EnforceRange]`: reject non-finite and out-of-range values.
    pub enforce_range: bool,
    /// `[Clamp]`: saturate to the bounds, rounding half to even.
    pub clamp: bool,
}

impl IntegerOptions {
    /// `[EnforceRange]`.
    pub const ENFORCE_RANGE: Self = Self {
        enforce_range: true,
        clamp: false,
    };

    /// `[Clamp]`.
    pub const CLAMP: Self = Self {
        enforce_range: false,
        clamp: true,
    };
}

fn censor_negative_zero(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x
    }
}

fn integer_part(x: f64) -> f64 {
    censor_negative_zero(x.trunc())
}

fn integer_bounds(bits: u32, signed: bool) -> (f64, f64) {
    if bits == 64 {
        let lower = if signed { -MAX_SAFE_INTEGER } else { 0.0 };
        (lower, MAX_SAFE_INTEGER)
    } else if signed {
        let half = 2f64.powi(bits as i32 - 1);
        (-half, half - 1.0)
    } else {
        (0.0, 2f64.powi(bits as i32) - 1.0)
    }
}

/// `x` modulo 2^64 for an integral, finite `x`.
fn wrap_to_u64(x: f64) -> u64 {
    let bits = x.abs().to_bits();
    let biased_exponent = ((bits >> 52) & 0x7FF) as i32;
    if biased_exponent == 0 {
        return 0;
    }
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    let shift = biased_exponent - 1075;
    let magnitude = if shift >= 64 {
        0
    } else if shift >= 0 {
        ((mantissa as u128) << shift) as u64
    } else {
        mantissa >> (-shift).min(63)
    };
    if x < 0.0 {
        magnitude.wrapping_neg()
    } else {
        magnitude
    }
}

fn convert_integer(
    value: &Value,
    ctx: &Context,
    options: IntegerOptions,
    bits: u32,
    signed: bool,
) -> Result<i128, UrlError> {
    let (lower, upper) = integer_bounds(bits, signed);
    let x = censor_negative_zero(value.to_number().map_err(|err| ctx_error(ctx, err))?);

    if options.enforce_range {
        if !x.is_finite() {
            return Err(ctx.type_error("is not a finite number"));
        }
        let x = integer_part(x);
        if x < lower || x > upper {
            return Err(ctx.type_error(&format!(
                "is outside the accepted range of {} to {}, inclusive",
                lower, upper
            )));
        }
        return Ok(x as i128);
    }

    if !x.is_nan() && options.clamp {
        let clamped = x.max(lower).min(upper);
        return Ok(censor_negative_zero(clamped.round_ties_even()) as i128);
    }

    if !x.is_finite() || x == 0.0 {
        return Ok(0);
    }
    let x = integer_part(x);
    if x >= lower && x <= upper {
        return Ok(x as i128);
    }

    let modulus = 1u128 << bits;
    let wrapped = u128::from(wrap_to_u64(x)) % modulus;
    if signed && wrapped >= modulus / 2 {
        Ok(wrapped as i128 - modulus as i128)
    } else {
        Ok(wrapped as i128)
    }
}

/// ToNumber failures keep their own message but gain the operation prefix.
fn ctx_error(ctx: &Context, err: UrlError) -> UrlError {
    match err {
        UrlError::TypeError(message) => UrlError::TypeError(ctx.prefix_only(&message)),
        other => other,
    }
}

/// `byte`.
pub fn byte(value: &Value, ctx: &Context, options: IntegerOptions) -> Result<i8, UrlError> {
    convert_integer(value, ctx, options, 8, true).map(|x| x as i8)
}

/// `octet`.
pub fn octet(value: &Value, ctx: &Context, options: IntegerOptions) -> Result<u8, UrlError> {
    convert_integer(value, ctx, options, 8, false).map(|x| x as u8)
}

/// `short`.
pub fn short(value: &Value, ctx: &Context, options: IntegerOptions) -> Result<i16, UrlError> {
    convert_integer(value, ctx, options, 16, true).map(|x| x as i16)
}

/// `unsigned short`.
pub fn unsigned_short(
    value: &Value,
    ctx: &Context,
    options: IntegerOptions,
) -> Result<u16, UrlError> {
    convert_integer(value, ctx, options, 16, false).map(|x| x as u16)
}

/// `long`.
pub fn long(value: &Value, ctx: &Context, options: IntegerOptions) -> Result<i32, UrlError> {
    convert_integer(value, ctx, options, 32, true).map(|x| x as i32)
}

/// `unsigned long`.
pub fn unsigned_long(value: &Value, ctx: &Context, options: IntegerOptions) -> Result<u32, UrlError> {
    convert_integer(value, ctx, options, 32, false).map(|x| x as u32)
}

/// `long long`. Range checks use ±(2^53 - 1); wrapping is exact modulo 2^64.
pub fn long_long(value: &Value, ctx: &Context, options: IntegerOptions) -> Result<i64, UrlError> {
    convert_integer(value, ctx, options, 64, true).map(|x| x as i64)
}

/// `unsigned long long`.
pub fn unsigned_long_long(
    value: &Value,
    ctx: &Context,
    options: IntegerOptions,
) -> Result<u64, UrlError> {
    convert_integer(value, ctx, options, 64, false).map(|x| x as u64)
}

/// `float`: finite and representable as `f32`.
pub fn float(value: &Value, ctx: &Context) -> Result<f32, UrlError> {
    let x = value.to_number().map_err(|err| ctx_error(ctx, err))?;
    if !x.is_finite() {
        return Err(ctx.type_error("is not a finite floating-point value"));
    }
    let y = x as f32;
    if !y.is_finite() {
        return Err(ctx.type_error(
            "is outside the range of a single-precision floating-point value",
        ));
    }
    Ok(y)
}

/// `unrestricted float`.
pub fn unrestricted_float(value: &Value, ctx: &Context) -> Result<f32, UrlError> {
    value
        .to_number()
        .map(|x| x as f32)
        .map_err(|err| ctx_error(ctx, err))
}

/// `double`: finite.
pub fn double(value: &Value, ctx: &Context) -> Result<f64, UrlError> {
    let x = value.to_number().map_err(|err| ctx_error(ctx, err))?;
    if !x.is_finite() {
        return Err(ctx.type_error("is not a finite floating-point value"));
    }
    Ok(x)
}

/// `unrestricted double`.
pub fn unrestricted_double(value: &Value, ctx: &Context) -> Result<f64, UrlError> {
    value.to_number().map_err(|err| ctx_error(ctx, err))
}

/// Extended attributes that change string conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringOptions {
    /// `[LegacyNullToEmptyString]`.
    pub treat_null_as_empty_string: bool,
}

/// `DOMString`.
pub fn dom_string(value: &Value, ctx: &Context, options: StringOptions) -> Result<String, UrlError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null if options.treat_null_as_empty_string => Ok(String::new()),
        Value::Symbol(_) => Err(ctx.type_error("is a symbol, which cannot be converted to a string")),
        other => other.to_string().map_err(|err| ctx_error(ctx, err)),
    }
}

/// `ByteString`: a `DOMString` whose code points all fit in one byte.
pub fn byte_string(value: &Value, ctx: &Context, options: StringOptions) -> Result<String, UrlError> {
    let s = dom_string(value, ctx, options)?;
    if s.chars().any(|c| u32::from(c) > 0xFF) {
        return Err(ctx.type_error("is not a valid ByteString"));
    }
    Ok(s)
}

/// `USVString`.
///
/// A Rust `String` cannot hold a lone surrogate, so this is the `DOMString`
/// conversion; [`usv_string_from_utf16`] handles UTF-16 input.
pub fn usv_string(value: &Value, ctx: &Context, options: StringOptions) -> Result<String, UrlError> {
    dom_string(value, ctx, options)
}

/// Decode UTF-16 code units, replacing lone surrogates with U+FFFD.
pub fn usv_string_from_utf16(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

/// `object`.
pub fn object(value: &Value, ctx: &Context) -> Result<Object, UrlError> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| ctx.type_error("is not an object"))
}

/// `T?`: `undefined` and `null` become `None`.
pub fn nullable<T, F>(value: &Value, convert: F) -> Result<Option<T>, UrlError>
where
    F: FnOnce(&Value) -> Result<T, UrlError>,
{
    if value.is_nullish() {
        Ok(None)
    } else {
        convert(value).map(Some)
    }
}

/// `sequence<T>`: drain the value's iterator, converting each item.
pub fn sequence<T, F>(value: &Value, ctx: &Context, mut convert: F) -> Result<Vec<T>, UrlError>
where
    F: FnMut(&Value, &Context) -> Result<T, UrlError>,
{
    let items = value
        .as_object()
        .and_then(Object::iterate)
        .ok_or_else(|| ctx.type_error("can not be converted to sequence."))?;

    let base = ctx.context().unwrap_or("Value");
    let mut output = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_ctx = ctx.with_context(format!("{}, index {}", base, index));
        output.push(convert(item, &item_ctx)?);
    }
    Ok(output)
}

/// `record<K, V>`: own enumerable properties in `OrdinaryOwnPropertyKeys` order.
///
/// A key produced twice keeps its first position and its last value.
pub fn record<K, V, FK, FV>(
    value: &Value,
    ctx: &Context,
    mut convert_key: FK,
    mut convert_value: FV,
) -> Result<IndexMap<K, V>, UrlError>
where
    K: Hash + Eq,
    FK: FnMut(&Value, &Context) -> Result<K, UrlError>,
    FV: FnMut(&Value, &Context) -> Result<V, UrlError>,
{
    let object = value
        .as_object()
        .ok_or_else(|| ctx.type_error("can not be converted to dictionary"))?;

    let mut output = IndexMap::new();
    for key in object.own_property_keys() {
        let Some(property) = object.get_own_property(&key) else {
            continue;
        };
        if !property.enumerable {
            continue;
        }
        let typed_key = convert_key(&key.to_value(), ctx)?;
        let typed_value = convert_value(&property.value, ctx)?;
        output.insert(typed_key, typed_value);
    }
    Ok(output)
}

/// The `URLSearchParams` constructor argument after union conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchParamsInit {
    /// `sequence<sequence<USVString>>`
    Sequence(Vec<Vec<String>>),
    /// `record<USVString, USVString>`
    Record(IndexMap<String, String>),
    /// `USVString`
    String(String),
}

/// `(sequence<sequence<USVString>> or record<USVString, USVString> or USVString)`.
///
/// Iterable objects are sequences, other objects are records and everything else
/// is stringified.
pub fn search_params_init(value: &Value, ctx: &Context) -> Result<SearchParamsInit, UrlError> {
    let usv = |v: &Value, c: &Context| usv_string(v, c, StringOptions::default());
    match value.as_object() {
        Some(object) if object.is_iterable() => {
            sequence(value, ctx, |pair, pair_ctx| sequence(pair, pair_ctx, usv))
                .map(SearchParamsInit::Sequence)
        }
        Some(_) => record(value, ctx, usv, usv).map(SearchParamsInit::Record),
        None => usv(value, ctx).map(SearchParamsInit::String),
    }
}

/// One member of a dictionary type.
pub struct DictionaryMember<T> {
    /// Property name read from the source object.
    pub key: &'static str,
    /// Whether a missing member is an error.
    pub required: bool,
    /// Converts the member value into the typed dictionary.
    pub convert: fn(&mut T, &Value, &Context) -> Result<(), UrlError>,
}

/// Convert `value` to a dictionary named `name`.
///
/// `T::default()` supplies the default member values. Members are read in
/// lexicographic key order; a member whose value is `undefined` keeps its default.
pub fn dictionary<T: Default>(
    value: &Value,
    name: &str,
    members: &[DictionaryMember<T>],
    ctx: &Context,
) -> Result<T, UrlError> {
    let source = match value {
        Value::Undefined | Value::Null => None,
        Value::Object(object) => Some(object),
        _ => return Err(ctx.type_error("can not be converted to a dictionary")),
    };

    let mut ordered: Vec<&DictionaryMember<T>> = members.iter().collect();
    ordered.sort_by_key(|member| member.key);

    let mut output = T::default();
    for member in ordered {
        let member_value = source
            .map(|object| object.get(&member.key.into()))
            .unwrap_or(Value::Undefined);

        if member_value != Value::Undefined {
            let member_ctx = match ctx.context() {
                Some(context) => format!("'{}' of '{}' ({})", member.key, name, context),
                None => format!("'{}' of '{}'", member.key, name),
            };
            (member.convert)(&mut output, &member_value, &ctx.with_context(member_ctx))?;
        } else if member.required {
            return Err(ctx.type_error(&format!(
                "can not be converted to '{}' because '{}' is required in '{}'",
                name, member.key, name
            )));
        }
    }
    Ok(output)
}

/// An enumeration: the stringified value must be one of `values`.
pub fn enumeration(
    value: &Value,
    name: &str,
    values: &[&str],
    ctx: &Context,
) -> Result<String, UrlError> {
    let s = match value {
        Value::Symbol(symbol) => symbol.descriptive_string(),
        other => other.to_string().map_err(|err| ctx_error(ctx, err))?,
    };
    if !values.contains(&s.as_str()) {
        return Err(UrlError::TypeError(ctx.prefix_only(&format!(
            "The provided value '{}' is not a valid enum value of type {}",
            s, name
        ))));
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webidl::value::{Property, PropertyKey, Symbol};

    fn ctx() -> Context {
        Context::argument("Failed to execute 'test'", 1)
    }

    fn type_error(result: Result<impl std::fmt::Debug, UrlError>) -> String {
        match result {
            Err(UrlError::TypeError(message)) => message,
            other => panic!("expected a TypeError, got {:?}", other),
        }
    }

    #[test]
    fn test_context_message() {
        assert_eq!(ctx().message("is bad"), "Failed to execute 'test': Argument 1 is bad");
        assert_eq!(Context::new("P").message("is bad"), "P: Value is bad");
        assert_eq!(Context::default().message("is bad"), "Value is bad");
    }

    #[test]
    fn test_required_arguments() {
        assert!(required_arguments(2, 2, "P").is_ok());
        assert_eq!(
            type_error(required_arguments(1, 2, "P")),
            "P: 2 arguments required, but only 1 present"
        );
    }

    #[test]
    fn test_integer_default_wraps() {
        let none = IntegerOptions::default();
        let test_cases = vec![
            (300.0, 44i128),
            (-1.0, 255),
            (255.9, 255),
            (-0.0, 0),
            (f64::NAN, 0),
            (f64::INFINITY, 0),
        ];
        for (input, expected) in test_cases {
            assert_eq!(
                i128::from(octet(&Value::from(input), &ctx(), none).unwrap()),
                expected,
                "octet failed for {}",
                input
            );
        }
        assert_eq!(byte(&Value::from(128.0), &ctx(), none).unwrap(), -128);
        assert_eq!(byte(&Value::from(-129.0), &ctx(), none).unwrap(), 127);
        assert_eq!(long(&Value::from(2147483648.0), &ctx(), none).unwrap(), -2147483648);
        assert_eq!(unsigned_long(&Value::from(-1.0), &ctx(), none).unwrap(), u32::MAX);
        assert_eq!(unsigned_short(&Value::from(65536.0 + 5.0), &ctx(), none).unwrap(), 5);
    }

    #[test]
    fn test_long_long_wraps_exactly() {
        let none = IntegerOptions::default();
        assert_eq!(
            long_long(&Value::from(2f64.powi(63)), &ctx(), none).unwrap(),
            i64::MIN
        );
        assert_eq!(
            unsigned_long_long(&Value::from(2f64.powi(64) + 4096.0), &ctx(), none).unwrap(),
            4096
        );
        assert_eq!(unsigned_long_long(&Value::from(-1.0), &ctx(), none).unwrap(), u64::MAX);
        assert_eq!(
            unsigned_long_long(&Value::from(2f64.powi(60)), &ctx(), none).unwrap(),
            1u64 << 60
        );
        assert_eq!(long_long(&Value::from(1e300), &ctx(), none).unwrap(), 0);
    }

    #[test]
    fn test_integer_clamp_rounds_half_even() {
        let clamp = IntegerOptions::CLAMP;
        let test_cases = vec![
            (0.5, 0i128),
            (1.5, 2),
            (2.5, 2),
            (-0.5, 0),
            (-1.5, -2),
            (1000.0, 127),
            (-1000.0, -128),
            (f64::NAN, 0),
            (f64::INFINITY, 127),
        ];
        for (input, expected) in test_cases {
            assert_eq!(
                i128::from(byte(&Value::from(input), &ctx(), clamp).unwrap()),
                expected,
                "byte clamp failed for {}",
                input
            );
        }
        assert_eq!(
            long_long(&Value::from(1e300), &ctx(), clamp).unwrap(),
            9007199254740991
        );
    }

    #[test]
    fn test_integer_enforce_range() {
        let enforce = IntegerOptions::ENFORCE_RANGE;
        assert_eq!(octet(&Value::from(255.7), &ctx(), enforce).unwrap(), 255);
        assert_eq!(octet(&Value::from(-0.9), &ctx(), enforce).unwrap(), 0);
        assert_eq!(
            type_error(octet(&Value::from(256.0), &ctx(), enforce)),
            "Failed to execute 'test': Argument 1 is outside the accepted range of 0 to 255, inclusive"
        );
        assert_eq!(
            type_error(long(&Value::from(f64::NAN), &ctx(), enforce)),
            "Failed to execute 'test': Argument 1 is not a finite number"
        );
        assert!(unsigned_long_long(&Value::from(2f64.powi(53)), &ctx(), enforce).is_err());
    }

    #[test]
    fn test_integer_from_strings_and_bigint() {
        let none = IntegerOptions::default();
        assert_eq!(unsigned_short(&Value::from(" 0x1F "), &ctx(), none).unwrap(), 31);
        assert_eq!(unsigned_short(&Value::from("abc"), &ctx(), none).unwrap(), 0);
        assert_eq!(
            type_error(long(&Value::BigInt(1), &ctx(), none)),
            "Failed to execute 'test': Cannot convert a BigInt value to a number"
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(double(&Value::from("1.5"), &ctx()).unwrap(), 1.5);
        assert!(double(&Value::from(f64::NAN), &ctx()).is_err());
        assert!(unrestricted_double(&Value::from(f64::NAN), &ctx()).unwrap().is_nan());
        assert_eq!(float(&Value::from(0.1), &ctx()).unwrap(), 0.1f32);
        assert_eq!(
            type_error(float(&Value::from(1e40), &ctx())),
            "Failed to execute 'test': Argument 1 is outside the range of a single-precision floating-point value"
        );
        assert!(unrestricted_float(&Value::from(1e40), &ctx()).unwrap().is_infinite());
        assert!(float(&Value::from(-0.0), &ctx()).unwrap().is_sign_negative());
    }

    #[test]
    fn test_strings() {
        let default = StringOptions::default();
        assert_eq!(dom_string(&Value::Null, &ctx(), default).unwrap(), "null");
        assert_eq!(
            dom_string(
                &Value::Null,
                &ctx(),
                StringOptions { treat_null_as_empty_string: true }
            )
            .unwrap(),
            ""
        );
        assert_eq!(dom_string(&Value::from(8080), &ctx(), default).unwrap(), "8080");
        assert_eq!(
            type_error(dom_string(&Value::from(Symbol::new(None)), &ctx(), default)),
            "Failed to execute 'test': Argument 1 is a symbol, which cannot be converted to a string"
        );
        assert_eq!(byte_string(&Value::from("ÿ"), &ctx(), default).unwrap(), "ÿ");
        assert!(byte_string(&Value::from("Ā"), &ctx(), default).is_err());
        assert_eq!(usv_string_from_utf16(&[0x61, 0xD800, 0x62]), "a\u{FFFD}b");
    }

    #[test]
    fn test_object_and_nullable() {
        assert!(object(&Value::object([("a", Value::Null)]), &ctx()).is_ok());
        assert_eq!(
            type_error(object(&Value::from("x"), &ctx())),
            "Failed to execute 'test': Argument 1 is not an object"
        );
        let convert = |v: &Value| dom_string(v, &ctx(), StringOptions::default());
        assert_eq!(nullable(&Value::Undefined, convert).unwrap(), None);
        assert_eq!(nullable(&Value::from("x"), convert).unwrap(), Some("x".to_string()));
    }

    #[test]
    fn test_sequence() {
        let value = Value::array([Value::from(1), Value::from("two")]);
        let strings = sequence(&value, &ctx(), |v, c| dom_string(v, c, StringOptions::default()));
        assert_eq!(strings.unwrap(), vec!["1".to_string(), "two".to_string()]);

        let bad = Value::array([Value::from("ok"), Value::from(Symbol::new(None))]);
        assert_eq!(
            type_error(sequence(&bad, &ctx(), |v, c| dom_string(v, c, StringOptions::default()))),
            "Failed to execute 'test': Argument 1, index 1 is a symbol, which cannot be converted to a string"
        );

        assert_eq!(
            type_error(sequence(&Value::object([("0", Value::Null)]), &ctx(), |v, _| Ok(v.clone()))),
            "Failed to execute 'test': Argument 1 can not be converted to sequence."
        );
        assert!(sequence(&Value::from("abc"), &ctx(), |v, _| Ok(v.clone())).is_err());
    }

    #[test]
    fn test_record_order_and_enumerability() {
        let value = Value::object_with_properties([
            (PropertyKey::from("b"), Property::enumerable(Value::from("1"))),
            (PropertyKey::from("hidden"), Property::hidden(Value::from("x"))),
            (PropertyKey::from("1"), Property::enumerable(Value::from("2"))),
            (PropertyKey::from("a"), Property::enumerable(Value::from(3))),
        ]);
        let usv = |v: &Value, c: &Context| usv_string(v, c, StringOptions::default());
        let converted = record(&value, &ctx(), usv, usv).unwrap();
        let pairs: Vec<(String, String)> = converted.into_iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "2".to_string()),
                ("b".to_string(), "1".to_string()),
                ("a".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_record_rejects_symbol_keys() {
        let symbol = Symbol::new(Some("k"));
        let value = Value::object([(PropertyKey::from(symbol), Value::from("v"))]);
        let usv = |v: &Value, c: &Context| usv_string(v, c, StringOptions::default());
        assert!(record(&value, &ctx(), usv, usv).is_err());
    }

    #[test]
    fn test_search_params_init_union() {
        let sequence_init = Value::array([Value::array([Value::from("a"), Value::from("1")])]);
        assert_eq!(
            search_params_init(&sequence_init, &ctx()).unwrap(),
            SearchParamsInit::Sequence(vec![vec!["a".to_string(), "1".to_string()]])
        );

        let record_init = Value::object([("a", Value::from("1"))]);
        match search_params_init(&record_init, &ctx()).unwrap() {
            SearchParamsInit::Record(map) => assert_eq!(map.get("a").map(String::as_str), Some("1")),
            other => panic!("expected a record, got {:?}", other),
        }

        assert_eq!(
            search_params_init(&Value::from(12), &ctx()).unwrap(),
            SearchParamsInit::String("12".to_string())
        );
        assert_eq!(
            search_params_init(&Value::Undefined, &ctx()).unwrap(),
            SearchParamsInit::String("undefined".to_string())
        );
    }

    #[derive(Debug, Default, PartialEq)]
    struct Options {
        fatal: bool,
        ignore_bom: bool,
        label: Option<String>,
    }

    fn members(required_label: bool) -> Vec<DictionaryMember<Options>> {
        vec![
            DictionaryMember {
                key: "ignoreBOM",
                required: false,
                convert: |dict, value, _| {
                    dict.ignore_bom = boolean(value);
                    Ok(())
                },
            },
            DictionaryMember {
                key: "label",
                required: required_label,
                convert: |dict, value, ctx| {
                    dict.label = Some(dom_string(value, ctx, StringOptions::default())?);
                    Ok(())
                },
            },
            DictionaryMember {
                key: "fatal",
                required: false,
                convert: |dict, value, _| {
                    dict.fatal = boolean(value);
                    Ok(())
                },
            },
        ]
    }

    #[test]
    fn test_dictionary_defaults_and_truthiness() {
        let options = dictionary(&Value::Undefined, "Options", &members(false), &ctx()).unwrap();
        assert_eq!(options, Options::default());

        let value = Value::object([("fatal", Value::from("yes")), ("ignoreBOM", Value::from(0))]);
        let options = dictionary(&value, "Options", &members(false), &ctx()).unwrap();
        assert!(options.fatal);
        assert!(!options.ignore_bom);
    }

    #[test]
    fn test_dictionary_errors() {
        assert_eq!(
            type_error(dictionary(&Value::from(1), "Options", &members(false), &ctx())),
            "Failed to execute 'test': Argument 1 can not be converted to a dictionary"
        );
        assert_eq!(
            type_error(dictionary(&Value::Null, "Options", &members(true), &ctx())),
            "Failed to execute 'test': Argument 1 can not be converted to 'Options' because 'label' is required in 'Options'"
        );
        let value = Value::object([("label", Value::from(Symbol::new(None)))]);
        assert_eq!(
            type_error(dictionary(&value, "Options", &members(false), &ctx())),
            "Failed to execute 'test': 'label' of 'Options' (Argument 1) is a symbol, which cannot be converted to a string"
        );
    }

    #[test]
    fn test_enumeration() {
        let values = ["utf-8", "utf8"];
        assert_eq!(enumeration(&Value::from("utf8"), "Label", &values, &ctx()).unwrap(), "utf8");
        assert_eq!(
            type_error(enumeration(&Value::from("latin1"), "Label", &values, &ctx())),
            "Failed to execute 'test': The provided value 'latin1' is not a valid enum value of type Label"
        );
    }
}

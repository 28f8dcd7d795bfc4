//! Script-facing entry points taking dynamic [`Value`] arguments.
//!
//! Each function performs the receiver brand check first, then the argument count
//! check, then converts every argument before the typed [`Url`] or
//! [`UrlSearchParams`] method runs. Errors carry the `Failed to ...` prefix of the
//! operation that raised them.

use crate::error::UrlError;
use crate::url::object::Url;
use crate::url::search_params::UrlSearchParams;
use crate::webidl::brand::{this_search_params, this_url};
use crate::webidl::converters::{
    dom_string, required_arguments, search_params_init, usv_string, Context, StringOptions,
};
use crate::webidl::Value;

const CONSTRUCT_URL: &str = "Failed to construct 'URL'";
const CONSTRUCT_SEARCH_PARAMS: &str = "Failed to construct 'URLSearchParams'";

/// The argument at `index`, or `undefined` when missing.
fn argument(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&Value::Undefined)
}

/// Convert the `(url, base)` argument pair shared by the constructor and statics.
fn url_and_base(args: &[Value], prefix: &str) -> Result<(String, Option<String>), UrlError> {
    required_arguments(args.len(), 1, prefix)?;
    let input = dom_string(
        argument(args, 0),
        &Context::argument(prefix, 1),
        StringOptions::default(),
    )?;
    let base = match argument(args, 1) {
        Value::Undefined => None,
        base => Some(dom_string(
            base,
            &Context::argument(prefix, 2),
            StringOptions::default(),
        )?),
    };
    Ok((input, base))
}

/// `new URL(url, base)`.
///
/// # Examples
///
/// ```
/// use wurl::url::bindings::construct_url;
/// use wurl::webidl::Value;
///
/// let url = construct_url(&[Value::from("/a"), Value::from("https://example.com")]).unwrap();
/// assert_eq!(url.to_string().unwrap(), "https://example.com/a");
///
/// let err = construct_url(&[]).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Failed to construct 'URL': 1 argument required, but only 0 present"
/// );
/// ```
pub fn construct_url(args: &[Value]) -> Result<Value, UrlError> {
    let (input, base) = url_and_base(args, CONSTRUCT_URL)?;
    Url::new(&input, base.as_deref()).map(Value::from)
}

/// `URL.parse(url, base)`: the URL, or `null` when parsing fails.
pub fn url_parse(args: &[Value]) -> Result<Value, UrlError> {
    let (input, base) = url_and_base(args, "Failed to execute 'URL.parse'")?;
    Ok(Url::parse(&input, base.as_deref())
        .map(Value::from)
        .unwrap_or(Value::Null))
}

/// `URL.canParse(url, base)`.
pub fn url_can_parse(args: &[Value]) -> Result<Value, UrlError> {
    let (input, base) = url_and_base(args, "Failed to execute 'URL.canParse'")?;
    Ok(Value::Boolean(Url::can_parse(&input, base.as_deref())))
}

/// Read attribute `name` of a `URL` receiver. Unknown names read as `undefined`.
pub fn get_url_attribute(this: &Value, name: &str) -> Result<Value, UrlError> {
    let url = this_url(this)?;
    let value = match name {
        "href" => url.href(),
        "origin" => url.origin(),
        "protocol" => url.protocol(),
        "username" => url.username(),
        "password" => url.password(),
        "host" => url.host(),
        "hostname" => url.hostname(),
        "port" => url.port(),
        "pathname" => url.pathname(),
        "search" => url.search(),
        "hash" => url.hash(),
        "searchParams" => return Ok(Value::from(url.search_params())),
        _ => return Ok(Value::Undefined),
    };
    Ok(Value::String(value))
}

/// Assign attribute `name` of a `URL` receiver from `args[0]`.
pub fn set_url_attribute(this: &Value, name: &str, args: &[Value]) -> Result<(), UrlError> {
    let url = this_url(this)?;
    let prefix = format!("Failed to set '{}' on 'URL'", name);
    required_arguments(args.len(), 1, &prefix)?;
    let value = dom_string(
        argument(args, 0),
        &Context::argument(prefix.as_str(), 1),
        StringOptions::default(),
    )?;

    match name {
        "href" => url.set_href(&value)?,
        "protocol" => url.set_protocol(&value),
        "username" => url.set_username(&value),
        "password" => url.set_password(&value),
        "host" => url.set_host(&value),
        "hostname" => url.set_hostname(&value),
        "port" => url.set_port(&value),
        "pathname" => url.set_pathname(&value),
        "search" => url.set_search(&value),
        "hash" => url.set_hash(&value),
        _ => {
            return Err(UrlError::TypeError(format!(
                "{}: '{}' is not a settable attribute",
                prefix, name
            )))
        }
    }
    Ok(())
}

/// Call method `name` (`toString` or `toJSON`) on a `URL` receiver.
pub fn call_url(this: &Value, name: &str) -> Result<Value, UrlError> {
    let url = this_url(this)?;
    match name {
        "toString" | "toJSON" => Ok(Value::String(url.href())),
        _ => Err(UrlError::TypeError(format!("URL.{} is not a function", name))),
    }
}

/// `new URLSearchParams(init)`.
///
/// `init` may be a sequence of pairs, a record or a string; a missing argument
/// gives an empty list.
pub fn construct_search_params(args: &[Value]) -> Result<Value, UrlError> {
    let params = match argument(args, 0) {
        Value::Undefined => UrlSearchParams::new(),
        init => {
            let init = search_params_init(init, &Context::argument(CONSTRUCT_SEARCH_PARAMS, 1))?;
            UrlSearchParams::from_init(init)?
        }
    };
    Ok(Value::from(params))
}

/// Call method `name` on a `URLSearchParams` receiver.
///
/// Besides the mutating and query methods this also serves `size`, `toString`
/// and snapshot versions of `entries`, `keys` and `values`.
pub fn call_search_params(this: &Value, name: &str, args: &[Value]) -> Result<Value, UrlError> {
    let params = this_search_params(this)?;
    let prefix = format!("Failed to execute '{}' on 'URLSearchParams'", name);
    let usv = |index: usize| {
        usv_string(
            argument(args, index),
            &Context::argument(prefix.as_str(), index + 1),
            StringOptions::default(),
        )
    };
    let optional_usv = |index: usize| match argument(args, index) {
        Value::Undefined => Ok(None),
        _ => usv(index).map(Some),
    };

    match name {
        "append" => {
            required_arguments(args.len(), 2, &prefix)?;
            params.append(&usv(0)?, &usv(1)?);
            Ok(Value::Undefined)
        }
        "delete" => {
            required_arguments(args.len(), 1, &prefix)?;
            let name = usv(0)?;
            params.delete(&name, optional_usv(1)?.as_deref());
            Ok(Value::Undefined)
        }
        "get" => {
            required_arguments(args.len(), 1, &prefix)?;
            Ok(params.get(&usv(0)?).map(Value::String).unwrap_or(Value::Null))
        }
        "getAll" => {
            required_arguments(args.len(), 1, &prefix)?;
            Ok(Value::array(params.get_all(&usv(0)?).into_iter().map(Value::String)))
        }
        "has" => {
            required_arguments(args.len(), 1, &prefix)?;
            let name = usv(0)?;
            Ok(Value::Boolean(params.has(&name, optional_usv(1)?.as_deref())))
        }
        "set" => {
            required_arguments(args.len(), 2, &prefix)?;
            params.set(&usv(0)?, &usv(1)?);
            Ok(Value::Undefined)
        }
        "sort" => {
            params.sort();
            Ok(Value::Undefined)
        }
        "size" => Ok(Value::Number(params.size() as f64)),
        "toString" => Ok(Value::String(params.to_string())),
        "entries" => Ok(Value::iterable(params.entries().map(|(name, value)| {
            Value::array([Value::String(name), Value::String(value)])
        }))),
        "keys" => Ok(Value::iterable(params.keys().map(Value::String))),
        "values" => Ok(Value::iterable(params.values().map(Value::String))),
        _ => Err(UrlError::TypeError(format!(
            "URLSearchParams.{} is not a function",
            name
        ))),
    }
}

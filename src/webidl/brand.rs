//! Unforgeable interface brands.
//!
//! A [`Brand`] can only be minted inside this crate, by the constructors of
//! [`Url`] and [`UrlSearchParams`]. Every dynamic entry point checks the brand of
//! its receiver before touching it.

use crate::error::UrlError;
use crate::url::{Url, UrlSearchParams};
use crate::webidl::converters::Context;
use crate::webidl::value::{PlatformObject, Value};

/// The interfaces a brand can vouch for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Url,
    UrlSearchParams,
}

impl InterfaceKind {
    /// The interface name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            InterfaceKind::Url => "URL",
            InterfaceKind::UrlSearchParams => "URLSearchParams",
        }
    }
}

/// A private marker proving a value came from this crate's own constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brand {
    interface: InterfaceKind,
}

impl Brand {
    pub(crate) const fn stamp(interface: InterfaceKind) -> Self {
        Self { interface }
    }

    /// The interface this brand was stamped for.
    pub fn interface(self) -> InterfaceKind {
        self.interface
    }
}

fn branded(value: &Value, interface: InterfaceKind) -> Option<&PlatformObject> {
    value
        .as_object()
        .and_then(|object| object.as_platform())
        .filter(|platform| platform.brand() == Brand::stamp(interface))
}

/// Check that `this` is a genuine instance of `interface`.
pub fn assert_branded(this: &Value, interface: InterfaceKind) -> Result<&PlatformObject, UrlError> {
    branded(this, interface).ok_or(UrlError::IllegalInvocation)
}

/// The receiver of a `URL` method.
pub fn this_url(this: &Value) -> Result<Url, UrlError> {
    assert_branded(this, InterfaceKind::Url)?
        .url()
        .cloned()
        .ok_or(UrlError::IllegalInvocation)
}

/// The receiver of a `URLSearchParams` method.
pub fn this_search_params(this: &Value) -> Result<UrlSearchParams, UrlError> {
    assert_branded(this, InterfaceKind::UrlSearchParams)?
        .search_params()
        .cloned()
        .ok_or(UrlError::IllegalInvocation)
}

/// Interface converter for `URL` arguments.
pub fn url_interface(value: &Value, ctx: &Context) -> Result<Url, UrlError> {
    branded(value, InterfaceKind::Url)
        .and_then(PlatformObject::url)
        .cloned()
        .ok_or_else(|| ctx.type_error("is not of type URL"))
}

/// Interface converter for `URLSearchParams` arguments.
pub fn search_params_interface(value: &Value, ctx: &Context) -> Result<UrlSearchParams, UrlError> {
    branded(value, InterfaceKind::UrlSearchParams)
        .and_then(PlatformObject::search_params)
        .cloned()
        .ok_or_else(|| ctx.type_error("is not of type URLSearchParams"))
}

//! The `URL` and `URLSearchParams` objects.
//!
//! This module contains the object layer on top of the core algorithms:
//! - [`Url`], a shared handle with component getters and setters
//! - [`UrlSearchParams`], the live query parameter list
//! - The `application/x-www-form-urlencoded` codec
//! - Script-facing bindings that take dynamic [`crate::webidl::Value`] arguments

pub mod bindings;
pub mod form_urlencoded;
pub mod object;
pub mod search_params;
mod setters;

// Re-export main functionality
pub use bindings::{
    call_search_params, call_url, construct_search_params, construct_url, get_url_attribute,
    set_url_attribute, url_can_parse, url_parse,
};
pub use object::Url;
pub use search_params::{Entries, UrlSearchParams};

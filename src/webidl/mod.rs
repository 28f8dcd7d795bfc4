//! The argument coercion layer.
//!
//! This module contains everything between a caller-supplied dynamic value and
//! the typed URL API:
//! - A dynamic [`Value`] model with ECMAScript conversions
//! - Number formatting and parsing
//! - Converters for strings, integers, floats, sequences, records, unions,
//!   dictionaries and enumerations
//! - Brand checks for platform objects

pub mod brand;
pub mod converters;
pub mod number;
pub mod value;

// Re-export main functionality
pub use brand::{assert_branded, Brand, InterfaceKind};
pub use converters::{
    dictionary, enumeration, required_arguments, search_params_init, Context, DictionaryMember,
    IntegerOptions, SearchParamsInit, StringOptions,
};
pub use number::{number_to_string, string_to_number};
pub use value::{Object, ObjectKind, PlatformObject, Property, PropertyKey, Symbol, Value};

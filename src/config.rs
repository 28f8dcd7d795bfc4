//! Parser configuration.

use std::fmt;
use std::rc::Rc;

use crate::core::domain::{DomainToAscii, IdnaDomainToAscii};

/// Host capabilities the parser depends on.
///
/// A [`crate::Url`] keeps the configuration it was created with, so its setters
/// resolve domains with the same transform as its constructor did.
#[derive(Clone)]
pub struct UrlConfig {
    domain_to_ascii: Rc<dyn DomainToAscii>,
}

impl UrlConfig {
    /// Use a custom Unicode-to-ASCII domain transform.
    pub fn with_domain_to_ascii(domain_to_ascii: impl DomainToAscii + 'static) -> Self {
        Self {
            domain_to_ascii: Rc::new(domain_to_ascii),
        }
    }

    /// The configured domain transform.
    pub fn domain_to_ascii(&self) -> &dyn DomainToAscii {
        self.domain_to_ascii.as_ref()
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self::with_domain_to_ascii(IdnaDomainToAscii)
    }
}

impl fmt::Debug for UrlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlConfig").finish_non_exhaustive()
    }
}

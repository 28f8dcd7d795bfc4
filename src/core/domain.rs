//! The pluggable Unicode-to-ASCII domain transform.

use thiserror::Error;

/// Failure reported by a [`DomainToAscii`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("domain to ASCII failed: {0}")]
pub struct DomainError(pub String);

/// Converts a Unicode domain to its ASCII (punycode) form.
///
/// The host parser hands over the percent-decoded domain and expects either an
/// ASCII domain or a failure; forbidden-code-point and empty-result checks are
/// applied by the caller afterwards.
pub trait DomainToAscii {
    /// Transform `domain` to ASCII.
    fn to_ascii(&self, domain: &str) -> Result<String, DomainError>;
}

/// UTS #46 processing via the `idna` crate with the URL Standard's settings
/// (non-transitional, hyphens allowed, no DNS length check).
#[derive(Debug, Default, Clone, Copy)]
pub struct IdnaDomainToAscii;

impl DomainToAscii for IdnaDomainToAscii {
    fn to_ascii(&self, domain: &str) -> Result<String, DomainError> {
        idna::domain_to_ascii_cow(domain.as_bytes(), idna::AsciiDenyList::URL)
            .map(|ascii| ascii.into_owned())
            .map_err(|err| DomainError(format!("{:?}", err)))
    }
}

//! Component setters for [`Url`].
//!
//! Apart from [`Url::set_href`], setters never fail: input the component cannot
//! take leaves the URL exactly as it was. Each setter works on a copy of the record
//! and commits it only when the update succeeds.

use tracing::trace;

use crate::config::UrlConfig;
use crate::core::parser::{basic_url_parse, reparse_with_override, StateOverride};
use crate::core::percent::{utf8_percent_encode, USERINFO};
use crate::error::{ParseError, UrlError};
use crate::types::{UrlPath, UrlRecord};
use crate::url::object::Url;

impl Url {
    /// Replace the whole URL. Unlike the other setters, invalid input is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use wurl::Url;
    ///
    /// let url = Url::new("http://a/?x=1", None).unwrap();
    /// let params = url.search_params();
    /// url.set_href("https://b/?y=2").unwrap();
    /// assert_eq!(params.get("y").as_deref(), Some("2"));
    /// assert!(url.set_href("no scheme").is_err());
    /// assert_eq!(url.href(), "https://b/?y=2");
    /// ```
    pub fn set_href(&self, value: &str) -> Result<(), UrlError> {
        let parsed = basic_url_parse(value, None, &self.0.borrow().config);
        let record = parsed.map_err(|reason| {
            trace!(value = %value, reason = %reason, "href setter rejected input");
            UrlError::InvalidUrl {
                input: value.to_string(),
            }
        })?;
        let mut inner = self.0.borrow_mut();
        inner.record = record;
        inner.sync_search_params();
        Ok(())
    }

    /// Set the scheme; a trailing `:` and anything after it is ignored.
    pub fn set_protocol(&self, value: &str) {
        self.update_record("protocol", value, |record, config| {
            reparse_with_override(
                &format!("{}:", value),
                record,
                StateOverride::SchemeStart,
                config,
            )
        });
    }

    pub fn set_username(&self, value: &str) {
        self.update_record("username", value, |record, _| {
            if record.cannot_have_username_password_port() {
                return Err(ParseError::StateOverrideRejected);
            }
            record.username = utf8_percent_encode(value, &USERINFO);
            Ok(())
        });
    }

    pub fn set_password(&self, value: &str) {
        self.update_record("password", value, |record, _| {
            if record.cannot_have_username_password_port() {
                return Err(ParseError::StateOverrideRejected);
            }
            record.password = utf8_percent_encode(value, &USERINFO);
            Ok(())
        });
    }

    /// Set `host[:port]`.
    pub fn set_host(&self, value: &str) {
        self.update_record("host", value, |record, config| {
            if record.has_opaque_path() {
                return Err(ParseError::StateOverrideRejected);
            }
            reparse_with_override(value, record, StateOverride::Host, config)
        });
    }

    /// Set the host, leaving the port alone.
    pub fn set_hostname(&self, value: &str) {
        self.update_record("hostname", value, |record, config| {
            if record.has_opaque_path() {
                return Err(ParseError::StateOverrideRejected);
            }
            reparse_with_override(value, record, StateOverride::Hostname, config)
        });
    }

    /// Set the port; the empty string removes it.
    pub fn set_port(&self, value: &str) {
        self.update_record("port", value, |record, config| {
            if record.cannot_have_username_password_port() {
                return Err(ParseError::StateOverrideRejected);
            }
            if value.is_empty() {
                record.port = None;
                return Ok(());
            }
            reparse_with_override(value, record, StateOverride::Port, config)
        });
    }

    pub fn set_pathname(&self, value: &str) {
        self.update_record("pathname", value, |record, config| {
            if record.has_opaque_path() {
                return Err(ParseError::StateOverrideRejected);
            }
            record.path = UrlPath::Segments(Vec::new());
            reparse_with_override(value, record, StateOverride::PathStart, config)
        });
    }

    /// Set the query; one leading `?` is ignored and the empty string removes it.
    ///
    /// An attached search params list is rebuilt from the new query.
    pub fn set_search(&self, value: &str) {
        let committed = self.update_record("search", value, |record, config| {
            if value.is_empty() {
                record.query = None;
                record.strip_trailing_spaces_from_opaque_path();
                return Ok(());
            }
            let input = value.strip_prefix('?').unwrap_or(value);
            record.query = Some(String::new());
            reparse_with_override(input, record, StateOverride::Query, config)
        });
        if committed {
            self.0.borrow().sync_search_params();
        }
    }

    /// Set the fragment; one leading `#` is ignored and the empty string removes it.
    pub fn set_hash(&self, value: &str) {
        self.update_record("hash", value, |record, config| {
            if value.is_empty() {
                record.fragment = None;
                record.strip_trailing_spaces_from_opaque_path();
                return Ok(());
            }
            let input = value.strip_prefix('#').unwrap_or(value);
            record.fragment = Some(String::new());
            reparse_with_override(input, record, StateOverride::Fragment, config)
        });
    }

    /// Run `update` on a copy of the record. Returns whether a changed record was committed.
    fn update_record<F>(&self, setter: &'static str, value: &str, update: F) -> bool
    where
        F: FnOnce(&mut UrlRecord, &UrlConfig) -> Result<(), ParseError>,
    {
        let mut inner = self.0.borrow_mut();
        let mut record = inner.record.clone();
        let result = update(&mut record, &inner.config);
        match result {
            Ok(()) if record != inner.record => {
                inner.record = record;
                true
            }
            Ok(()) => false,
            Err(reason) => {
                trace!(setter, value = %value, reason = %reason, "setter left URL unchanged");
                false
            }
        }
    }
}

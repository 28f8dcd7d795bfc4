//! The basic URL parser.
//!
//! A pointer-driven state machine over the code points of the input. Full parses
//! start in the scheme start state with an empty record; component setters start in
//! the state named by a [`StateOverride`] with a copy of an existing record, and the
//! copy only replaces the original when the re-parse succeeds.

use std::mem;

use crate::config::UrlConfig;
use crate::core::host::parse_host;
use crate::core::percent::{
    encode_char_into, EncodeSet, C0_CONTROL, FRAGMENT, PATH, QUERY, SPECIAL_QUERY, USERINFO,
};
use crate::error::ParseError;
use crate::types::{default_port, is_special_scheme, Host, UrlPath, UrlRecord};

/// The state a component re-parse starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateOverride {
    /// `protocol` setter.
    SchemeStart,
    /// `host` setter.
    Host,
    /// `hostname` setter.
    Hostname,
    /// `port` setter.
    Port,
    /// `pathname` setter.
    PathStart,
    /// `search` setter.
    Query,
    /// `hash` setter.
    Fragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SchemeStart,
    Scheme,
    NoScheme,
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    Hostname,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    OpaquePath,
    Query,
    Fragment,
}

impl From<StateOverride> for State {
    fn from(state_override: StateOverride) -> Self {
        match state_override {
            StateOverride::SchemeStart => State::SchemeStart,
            StateOverride::Host => State::Host,
            StateOverride::Hostname => State::Hostname,
            StateOverride::Port => State::Port,
            StateOverride::PathStart => State::PathStart,
            StateOverride::Query => State::Query,
            StateOverride::Fragment => State::Fragment,
        }
    }
}

/// What the machine does after a state has consumed the current code point.
enum Flow {
    Continue,
    Return,
}

/// Parse `input`, optionally relative to `base`, into a new record.
///
/// # Examples
///
/// ```
/// use wurl::{basic_url_parse, Host, UrlConfig};
///
/// let base = basic_url_parse("http://example.com/a/b", None, &UrlConfig::default()).unwrap();
/// let url = basic_url_parse("../c?x#y", Some(&base), &UrlConfig::default()).unwrap();
/// assert_eq!(url.host, Some(Host::Domain("example.com".to_string())));
/// assert_eq!(url.path.segments(), ["c".to_string()]);
/// assert_eq!(url.query.as_deref(), Some("x"));
/// ```
pub fn basic_url_parse(
    input: &str,
    base: Option<&UrlRecord>,
    config: &UrlConfig,
) -> Result<UrlRecord, ParseError> {
    let trimmed = input.trim_matches(|c: char| c <= ' ');
    Parser::new(trimmed, base, UrlRecord::default(), None, config).run()
}

/// Re-parse `input` into one component of `url`, starting in `state_override`.
///
/// On failure `url` is left exactly as it was.
pub fn reparse_with_override(
    input: &str,
    url: &mut UrlRecord,
    state_override: StateOverride,
    config: &UrlConfig,
) -> Result<(), ParseError> {
    let updated = Parser::new(input, None, url.clone(), Some(state_override), config).run()?;
    *url = updated;
    Ok(())
}

/// Two code points: an ASCII letter followed by `:` or `|`.
pub(crate) fn is_windows_drive_letter(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some(':' | '|'), None) if letter.is_ascii_alphabetic()
    )
}

/// A Windows drive letter whose second code point is `:`.
pub(crate) fn is_normalized_windows_drive_letter(s: &str) -> bool {
    is_windows_drive_letter(s) && s.ends_with(':')
}

fn starts_with_windows_drive_letter(rest: &[char]) -> bool {
    if rest.len() < 2 || !rest[0].is_ascii_alphabetic() || !matches!(rest[1], ':' | '|') {
        return false;
    }
    rest.len() == 2 || matches!(rest[2], '/' | '\\' | '?' | '#')
}

fn is_single_dot_segment(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

fn is_double_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        ".." | ".%2e" | "%2e." | "%2e%2e"
    )
}

struct Parser<'a> {
    input: Vec<char>,
    base: Option<&'a UrlRecord>,
    url: UrlRecord,
    state_override: Option<StateOverride>,
    config: &'a UrlConfig,
    state: State,
    buffer: String,
    at_sign_seen: bool,
    inside_brackets: bool,
    password_token_seen: bool,
    pointer: isize,
}

impl<'a> Parser<'a> {
    fn new(
        input: &str,
        base: Option<&'a UrlRecord>,
        url: UrlRecord,
        state_override: Option<StateOverride>,
        config: &'a UrlConfig,
    ) -> Self {
        let input = input
            .chars()
            .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
            .collect();
        Self {
            input,
            base,
            url,
            state_override,
            config,
            state: state_override.map_or(State::SchemeStart, State::from),
            buffer: String::new(),
            at_sign_seen: false,
            inside_brackets: false,
            password_token_seen: false,
            pointer: 0,
        }
    }

    fn run(mut self) -> Result<UrlRecord, ParseError> {
        loop {
            let c = usize::try_from(self.pointer)
                .ok()
                .and_then(|index| self.input.get(index).copied());
            if let Flow::Return = self.step(c)? {
                return Ok(self.url);
            }
            if self.pointer >= self.input.len() as isize {
                return Ok(self.url);
            }
            self.pointer += 1;
        }
    }

    /// The code point after the current one.
    fn peek(&self) -> Option<char> {
        usize::try_from(self.pointer + 1)
            .ok()
            .and_then(|index| self.input.get(index).copied())
    }

    fn rest(&self) -> &[char] {
        let start = usize::try_from(self.pointer).unwrap_or(0).min(self.input.len());
        &self.input[start..]
    }

    fn is_special(&self) -> bool {
        self.url.is_special()
    }

    fn shorten_path(&mut self) {
        let is_file = self.url.scheme == "file";
        let segments = self.url.path.segments();
        if is_file && segments.len() == 1 && is_normalized_windows_drive_letter(&segments[0]) {
            return;
        }
        self.url.path.pop_segment();
    }

    fn step(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        match self.state {
            State::SchemeStart => self.scheme_start(c),
            State::Scheme => self.scheme(c),
            State::NoScheme => self.no_scheme(c),
            State::SpecialRelativeOrAuthority => {
                if c == Some('/') && self.peek() == Some('/') {
                    self.state = State::SpecialAuthorityIgnoreSlashes;
                    self.pointer += 1;
                } else {
                    self.state = State::Relative;
                    self.pointer -= 1;
                }
                Ok(Flow::Continue)
            }
            State::PathOrAuthority => {
                if c == Some('/') {
                    self.state = State::Authority;
                } else {
                    self.state = State::Path;
                    self.pointer -= 1;
                }
                Ok(Flow::Continue)
            }
            State::Relative => self.relative(c),
            State::RelativeSlash => self.relative_slash(c),
            State::SpecialAuthoritySlashes => {
                self.state = State::SpecialAuthorityIgnoreSlashes;
                if c == Some('/') && self.peek() == Some('/') {
                    self.pointer += 1;
                } else {
                    self.pointer -= 1;
                }
                Ok(Flow::Continue)
            }
            State::SpecialAuthorityIgnoreSlashes => {
                if !matches!(c, Some('/' | '\\')) {
                    self.state = State::Authority;
                    self.pointer -= 1;
                }
                Ok(Flow::Continue)
            }
            State::Authority => self.authority(c),
            State::Host | State::Hostname => self.host(c),
            State::Port => self.port(c),
            State::File => self.file(c),
            State::FileSlash => self.file_slash(c),
            State::FileHost => self.file_host(c),
            State::PathStart => self.path_start(c),
            State::Path => self.path(c),
            State::OpaquePath => self.opaque_path(c),
            State::Query => self.query(c),
            State::Fragment => {
                if let Some(c) = c {
                    let fragment = self.url.fragment.get_or_insert_with(String::new);
                    encode_char_into(c, &FRAGMENT, fragment);
                }
                Ok(Flow::Continue)
            }
        }
    }

    fn scheme_start(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.buffer.push(c.to_ascii_lowercase());
                self.state = State::Scheme;
            }
            _ if self.state_override.is_none() => {
                self.state = State::NoScheme;
                self.pointer -= 1;
            }
            _ => return Err(ParseError::InvalidScheme),
        }
        Ok(Flow::Continue)
    }

    fn scheme(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        match c {
            Some(c) if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {
                self.buffer.push(c.to_ascii_lowercase());
            }
            Some(':') => {
                if self.state_override.is_some() {
                    if self.is_special() != is_special_scheme(&self.buffer) {
                        return Err(ParseError::SchemeChangeRejected);
                    }
                    if (self.url.includes_credentials() || self.url.port.is_some())
                        && self.buffer == "file"
                    {
                        return Err(ParseError::SchemeChangeRejected);
                    }
                    if self.url.scheme == "file" && self.url.host == Some(Host::Empty) {
                        return Err(ParseError::SchemeChangeRejected);
                    }
                }

                self.url.scheme = mem::take(&mut self.buffer);

                if self.state_override.is_some() {
                    if self.url.port.is_some() && self.url.port == default_port(&self.url.scheme) {
                        self.url.port = None;
                    }
                    return Ok(Flow::Return);
                }

                let same_scheme_base = self
                    .base
                    .is_some_and(|base| base.scheme == self.url.scheme);
                if self.url.scheme == "file" {
                    self.state = State::File;
                } else if self.is_special() && same_scheme_base {
                    self.state = State::SpecialRelativeOrAuthority;
                } else if self.is_special() {
                    self.state = State::SpecialAuthoritySlashes;
                } else if self.peek() == Some('/') {
                    self.state = State::PathOrAuthority;
                    self.pointer += 1;
                } else {
                    self.url.path = UrlPath::Opaque(String::new());
                    self.state = State::OpaquePath;
                }
            }
            _ if self.state_override.is_none() => {
                // Not a scheme after all: start over from the first code point.
                self.buffer.clear();
                self.state = State::NoScheme;
                self.pointer = -1;
            }
            _ => return Err(ParseError::InvalidScheme),
        }
        Ok(Flow::Continue)
    }

    fn no_scheme(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        let Some(base) = self.base else {
            return Err(ParseError::MissingSchemeNonRelativeUrl);
        };
        if base.has_opaque_path() {
            if c != Some('#') {
                return Err(ParseError::MissingSchemeNonRelativeUrl);
            }
            self.url.scheme = base.scheme.clone();
            self.url.path = base.path.clone();
            self.url.query = base.query.clone();
            self.url.fragment = Some(String::new());
            self.state = State::Fragment;
        } else if base.scheme != "file" {
            self.state = State::Relative;
            self.pointer -= 1;
        } else {
            self.state = State::File;
            self.pointer -= 1;
        }
        Ok(Flow::Continue)
    }

    fn relative(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        let Some(base) = self.base else {
            return Err(ParseError::MissingSchemeNonRelativeUrl);
        };
        self.url.scheme = base.scheme.clone();
        if c == Some('/') || (self.is_special() && c == Some('\\')) {
            self.state = State::RelativeSlash;
            return Ok(Flow::Continue);
        }

        self.url.username = base.username.clone();
        self.url.password = base.password.clone();
        self.url.host = base.host.clone();
        self.url.port = base.port;
        self.url.path = base.path.clone();
        self.url.query = base.query.clone();
        match c {
            Some('?') => {
                self.url.query = Some(String::new());
                self.state = State::Query;
            }
            Some('#') => {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
            Some(_) => {
                self.url.query = None;
                self.shorten_path();
                self.state = State::Path;
                self.pointer -= 1;
            }
            None => {}
        }
        Ok(Flow::Continue)
    }

    fn relative_slash(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        if self.is_special() && matches!(c, Some('/' | '\\')) {
            self.state = State::SpecialAuthorityIgnoreSlashes;
        } else if c == Some('/') {
            self.state = State::Authority;
        } else {
            let Some(base) = self.base else {
                return Err(ParseError::MissingSchemeNonRelativeUrl);
            };
            self.url.username = base.username.clone();
            self.url.password = base.password.clone();
            self.url.host = base.host.clone();
            self.url.port = base.port;
            self.state = State::Path;
            self.pointer -= 1;
        }
        Ok(Flow::Continue)
    }

    fn authority(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        match c {
            Some('@') => {
                if self.at_sign_seen {
                    self.buffer.insert_str(0, "%40");
                }
                self.at_sign_seen = true;
                for code_point in self.buffer.chars() {
                    if code_point == ':' && !self.password_token_seen {
                        self.password_token_seen = true;
                        continue;
                    }
                    let target = if self.password_token_seen {
                        &mut self.url.password
                    } else {
                        &mut self.url.username
                    };
                    encode_char_into(code_point, &USERINFO, target);
                }
                self.buffer.clear();
            }
            None | Some('/' | '?' | '#') => return self.end_authority(),
            Some('\\') if self.is_special() => return self.end_authority(),
            Some(c) => self.buffer.push(c),
        }
        Ok(Flow::Continue)
    }

    /// Rewind to the start of the host once the authority's end is found.
    fn end_authority(&mut self) -> Result<Flow, ParseError> {
        if self.at_sign_seen && self.buffer.is_empty() {
            return Err(ParseError::HostMissing);
        }
        self.pointer -= self.buffer.chars().count() as isize + 1;
        self.buffer.clear();
        self.state = State::Host;
        Ok(Flow::Continue)
    }

    fn host(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        if self.state_override.is_some() && self.url.scheme == "file" {
            self.pointer -= 1;
            self.state = State::FileHost;
            return Ok(Flow::Continue);
        }

        let special = self.is_special();
        match c {
            Some(':') if !self.inside_brackets => {
                if self.buffer.is_empty() {
                    return Err(ParseError::HostMissing);
                }
                if self.state_override == Some(StateOverride::Hostname) {
                    return Err(ParseError::StateOverrideRejected);
                }
                let host = parse_host(&self.buffer, !special, self.config.domain_to_ascii())?;
                self.url.host = Some(host);
                self.buffer.clear();
                self.state = State::Port;
            }
            None | Some('/' | '?' | '#') => return self.end_host(),
            Some('\\') if special => return self.end_host(),
            Some(c) => {
                if c == '[' {
                    self.inside_brackets = true;
                } else if c == ']' {
                    self.inside_brackets = false;
                }
                self.buffer.push(c);
            }
        }
        Ok(Flow::Continue)
    }

    fn end_host(&mut self) -> Result<Flow, ParseError> {
        self.pointer -= 1;
        let special = self.is_special();
        if special && self.buffer.is_empty() {
            return Err(ParseError::EmptyHost);
        }
        if self.state_override.is_some()
            && self.buffer.is_empty()
            && (self.url.includes_credentials() || self.url.port.is_some())
        {
            return Err(ParseError::StateOverrideRejected);
        }
        let host = parse_host(&self.buffer, !special, self.config.domain_to_ascii())?;
        self.url.host = Some(host);
        self.buffer.clear();
        self.state = State::PathStart;
        if self.state_override.is_some() {
            return Ok(Flow::Return);
        }
        Ok(Flow::Continue)
    }

    fn port(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        match c {
            Some(digit) if digit.is_ascii_digit() => {
                self.buffer.push(digit);
                return Ok(Flow::Continue);
            }
            None | Some('/' | '?' | '#') => {}
            Some('\\') if self.is_special() => {}
            _ if self.state_override.is_some() => {}
            _ => return Err(ParseError::InvalidPort),
        }

        if !self.buffer.is_empty() {
            let port = self.buffer.bytes().fold(0u32, |acc, digit| {
                acc.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
            });
            let port = u16::try_from(port).map_err(|_| ParseError::PortOutOfRange)?;
            self.url.port = if default_port(&self.url.scheme) == Some(port) {
                None
            } else {
                Some(port)
            };
            self.buffer.clear();
            if self.state_override.is_some() {
                return Ok(Flow::Return);
            }
        }
        if self.state_override.is_some() {
            return Err(ParseError::StateOverrideRejected);
        }
        self.state = State::PathStart;
        self.pointer -= 1;
        Ok(Flow::Continue)
    }

    fn file(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        self.url.scheme = "file".to_string();
        self.url.host = Some(Host::Empty);

        if matches!(c, Some('/' | '\\')) {
            self.state = State::FileSlash;
            return Ok(Flow::Continue);
        }

        let Some(base) = self.base.filter(|base| base.scheme == "file") else {
            self.state = State::Path;
            self.pointer -= 1;
            return Ok(Flow::Continue);
        };

        self.url.host = base.host.clone();
        self.url.path = base.path.clone();
        self.url.query = base.query.clone();
        match c {
            Some('?') => {
                self.url.query = Some(String::new());
                self.state = State::Query;
            }
            Some('#') => {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
            Some(_) => {
                self.url.query = None;
                if starts_with_windows_drive_letter(self.rest()) {
                    self.url.path = UrlPath::Segments(Vec::new());
                } else {
                    self.shorten_path();
                }
                self.state = State::Path;
                self.pointer -= 1;
            }
            None => {}
        }
        Ok(Flow::Continue)
    }

    fn file_slash(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        if matches!(c, Some('/' | '\\')) {
            self.state = State::FileHost;
            return Ok(Flow::Continue);
        }
        if let Some(base) = self.base.filter(|base| base.scheme == "file") {
            self.url.host = base.host.clone();
            if !starts_with_windows_drive_letter(self.rest()) {
                if let Some(drive) = base
                    .path
                    .segments()
                    .first()
                    .filter(|segment| is_normalized_windows_drive_letter(segment))
                {
                    self.url.path.push_segment(drive.clone());
                }
            }
        }
        self.state = State::Path;
        self.pointer -= 1;
        Ok(Flow::Continue)
    }

    fn file_host(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        match c {
            None | Some('/' | '\\' | '?' | '#') => {
                self.pointer -= 1;
                if self.state_override.is_none() && is_windows_drive_letter(&self.buffer) {
                    // The buffer is kept and becomes the first path segment.
                    self.state = State::Path;
                } else if self.buffer.is_empty() {
                    self.url.host = Some(Host::Empty);
                    if self.state_override.is_some() {
                        return Ok(Flow::Return);
                    }
                    self.state = State::PathStart;
                } else {
                    let mut host =
                        parse_host(&self.buffer, !self.is_special(), self.config.domain_to_ascii())?;
                    if host == Host::Domain("localhost".to_string()) {
                        host = Host::Empty;
                    }
                    self.url.host = Some(host);
                    if self.state_override.is_some() {
                        return Ok(Flow::Return);
                    }
                    self.buffer.clear();
                    self.state = State::PathStart;
                }
            }
            Some(c) => self.buffer.push(c),
        }
        Ok(Flow::Continue)
    }

    fn path_start(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        if self.is_special() {
            self.state = State::Path;
            if !matches!(c, Some('/' | '\\')) {
                self.pointer -= 1;
            }
        } else if self.state_override.is_none() && c == Some('?') {
            self.url.query = Some(String::new());
            self.state = State::Query;
        } else if self.state_override.is_none() && c == Some('#') {
            self.url.fragment = Some(String::new());
            self.state = State::Fragment;
        } else if c.is_some() {
            self.state = State::Path;
            if c != Some('/') {
                self.pointer -= 1;
            }
        } else if self.state_override.is_some() && self.url.host.is_none() {
            self.url.path.push_segment(String::new());
        }
        Ok(Flow::Continue)
    }

    fn path(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        let special = self.is_special();
        let slash = c == Some('/') || (special && c == Some('\\'));
        let terminator = self.state_override.is_none() && matches!(c, Some('?' | '#'));

        if !(c.is_none() || slash || terminator) {
            if let Some(c) = c {
                encode_char_into(c, &PATH, &mut self.buffer);
            }
            return Ok(Flow::Continue);
        }

        if is_double_dot_segment(&self.buffer) {
            self.shorten_path();
            if !slash {
                self.url.path.push_segment(String::new());
            }
        } else if is_single_dot_segment(&self.buffer) {
            if !slash {
                self.url.path.push_segment(String::new());
            }
        } else {
            let mut segment = mem::take(&mut self.buffer);
            if self.url.scheme == "file"
                && self.url.path.segments().is_empty()
                && is_windows_drive_letter(&segment)
            {
                segment.replace_range(1..2, ":");
            }
            self.url.path.push_segment(segment);
        }
        self.buffer.clear();

        match c {
            Some('?') if terminator => {
                self.url.query = Some(String::new());
                self.state = State::Query;
            }
            Some('#') if terminator => {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn opaque_path(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        match c {
            Some('?') => {
                self.url.query = Some(String::new());
                self.state = State::Query;
            }
            Some('#') => {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
            Some(c) => {
                if let UrlPath::Opaque(path) = &mut self.url.path {
                    encode_char_into(c, &C0_CONTROL, path);
                }
            }
            None => {}
        }
        Ok(Flow::Continue)
    }

    fn query(&mut self, c: Option<char>) -> Result<Flow, ParseError> {
        let fragment_start = self.state_override.is_none() && c == Some('#');
        if fragment_start || c.is_none() {
            let set: &EncodeSet = if self.is_special() { &SPECIAL_QUERY } else { &QUERY };
            let query = self.url.query.get_or_insert_with(String::new);
            for code_point in self.buffer.chars() {
                encode_char_into(code_point, set, query);
            }
            self.buffer.clear();
            if fragment_start {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
        } else if let Some(c) = c {
            self.buffer.push(c);
        }
        Ok(Flow::Continue)
    }
}

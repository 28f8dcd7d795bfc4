//! The UTF-8 text codec boundary.
//!
//! The URL code only needs to turn strings into UTF-8 bytes and back, in either a
//! lenient mode (invalid sequences become U+FFFD) or a fatal mode. [`TextEncoder`]
//! and [`TextDecoder`] expose the same capability with the script-facing
//! label and option handling.

use tracing::debug;

use crate::error::UrlError;
use crate::webidl::converters::{
    boolean, dictionary, dom_string, Context, DictionaryMember, StringOptions,
};
use crate::webidl::Value;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Labels that select the UTF-8 decoder.
pub const UTF8_LABELS: [&str; 6] = [
    "unicode-1-1-utf-8",
    "unicode11utf8",
    "unicode20utf8",
    "utf-8",
    "utf8",
    "x-unicode20utf8",
];

/// Encode `input` as UTF-8.
pub fn encode_utf8(input: &str) -> Vec<u8> {
    input.as_bytes().to_vec()
}

/// Decode UTF-8 bytes.
///
/// A leading byte order mark is skipped unless `ignore_bom` is set. In fatal mode an
/// invalid sequence is an error; otherwise each maximal invalid subpart becomes U+FFFD.
///
/// # Examples
///
/// ```
/// use wurl::encoding::decode_utf8;
///
/// assert_eq!(decode_utf8(b"\xEF\xBB\xBFhi", false, false).unwrap(), "hi");
/// assert_eq!(decode_utf8(b"a\xFFb", false, false).unwrap(), "a\u{FFFD}b");
/// assert!(decode_utf8(b"a\xFFb", true, false).is_err());
/// ```
pub fn decode_utf8(bytes: &[u8], fatal: bool, ignore_bom: bool) -> Result<String, UrlError> {
    let bytes = if !ignore_bom && bytes.starts_with(&UTF8_BOM) {
        &bytes[UTF8_BOM.len()..]
    } else {
        bytes
    };

    if fatal {
        return std::str::from_utf8(bytes).map(str::to_string).map_err(|err| {
            debug!(valid_up_to = err.valid_up_to(), "fatal UTF-8 decode failed");
            UrlError::InvalidData
        });
    }
    Ok(decode_utf8_without_bom(bytes))
}

/// Lenient decode that keeps a leading byte order mark as U+FEFF.
pub fn decode_utf8_without_bom(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Progress reported by [`TextEncoder::encode_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeIntoResult {
    /// UTF-16 code units consumed from the source.
    pub read: usize,
    /// Bytes written to the destination.
    pub written: usize,
}

/// A UTF-8 encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextEncoder;

impl TextEncoder {
    pub fn new() -> Self {
        TextEncoder
    }

    /// Always `"utf-8"`.
    pub fn encoding(&self) -> &'static str {
        "utf-8"
    }

    pub fn encode(&self, input: &str) -> Vec<u8> {
        encode_utf8(input)
    }

    /// Encode as many whole code points of `source` as fit into `destination`.
    pub fn encode_into(&self, source: &str, destination: &mut [u8]) -> EncodeIntoResult {
        let mut read = 0;
        let mut written = 0;
        for c in source.chars() {
            let len = c.len_utf8();
            if written + len > destination.len() {
                break;
            }
            c.encode_utf8(&mut destination[written..written + len]);
            written += len;
            read += c.len_utf16();
        }
        EncodeIntoResult { read, written }
    }
}

/// The `TextDecoderOptions` dictionary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TextDecoderOptions {
    pub fatal: bool,
    pub ignore_bom: bool,
}

impl TextDecoderOptions {
    const MEMBERS: [DictionaryMember<TextDecoderOptions>; 2] = [
        DictionaryMember {
            key: "fatal",
            required: false,
            convert: Self::convert_fatal,
        },
        DictionaryMember {
            key: "ignoreBOM",
            required: false,
            convert: Self::convert_ignore_bom,
        },
    ];

    fn convert_fatal(&mut self, value: &Value, _: &Context) -> Result<(), UrlError> {
        self.fatal = boolean(value);
        Ok(())
    }

    fn convert_ignore_bom(&mut self, value: &Value, _: &Context) -> Result<(), UrlError> {
        self.ignore_bom = boolean(value);
        Ok(())
    }

    /// Convert a dynamic options argument.
    pub fn from_value(value: &Value, ctx: &Context) -> Result<Self, UrlError> {
        dictionary(value, "TextDecoderOptions", &Self::MEMBERS, ctx)
    }
}

/// A UTF-8 decoder configured from a label and options.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TextDecoder {
    fatal: bool,
    ignore_bom: bool,
}

impl TextDecoder {
    /// Create a decoder for `label`; only UTF-8 labels are supported.
    pub fn new(label: &str, options: TextDecoderOptions) -> Result<Self, UrlError> {
        let normalized = label
            .trim_matches(|c| matches!(c, '\t' | '\n' | '\u{C}' | '\r' | ' '))
            .to_ascii_lowercase();
        if !UTF8_LABELS.contains(&normalized.as_str()) {
            return Err(UrlError::RangeError(format!(
                "Failed to construct 'TextDecoder': The given encoding '{}' is not supported.",
                label
            )));
        }
        Ok(Self {
            fatal: options.fatal,
            ignore_bom: options.ignore_bom,
        })
    }

    /// The script-facing constructor: `label` defaults to `"utf-8"`.
    pub fn from_values(label: &Value, options: &Value) -> Result<Self, UrlError> {
        let prefix = "Failed to construct 'TextDecoder'";
        let label = match label {
            Value::Undefined => "utf-8".to_string(),
            other => dom_string(other, &Context::argument(prefix, 1), StringOptions::default())?,
        };
        let options = TextDecoderOptions::from_value(options, &Context::argument(prefix, 2))?;
        Self::new(&label, options)
    }

    /// Always `"utf-8"`.
    pub fn encoding(&self) -> &'static str {
        "utf-8"
    }

    pub fn fatal(&self) -> bool {
        self.fatal
    }

    pub fn ignore_bom(&self) -> bool {
        self.ignore_bom
    }

    /// Decode `input`; no input decodes to the empty string.
    pub fn decode(&self, input: Option<&[u8]>) -> Result<String, UrlError> {
        match input {
            None => Ok(String::new()),
            Some(bytes) => decode_utf8(bytes, self.fatal, self.ignore_bom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_utf8() {
        assert_eq!(encode_utf8("aé€😀"), b"a\xC3\xA9\xE2\x82\xAC\xF0\x9F\x98\x80".to_vec());
        assert_eq!(TextEncoder::new().encode(""), Vec::<u8>::new());
    }

    #[test]
    fn test_encode_into_stops_at_whole_code_points() {
        let encoder = TextEncoder::new();
        let mut buffer = [0u8; 5];
        let result = encoder.encode_into("a😀b", &mut buffer);
        assert_eq!(result, EncodeIntoResult { read: 3, written: 5 });
        assert_eq!(&buffer, b"a\xF0\x9F\x98\x80");

        let mut small = [0u8; 3];
        let result = encoder.encode_into("a😀b", &mut small);
        assert_eq!(result, EncodeIntoResult { read: 1, written: 1 });
    }

    #[test]
    fn test_decode_bom_handling() {
        assert_eq!(decode_utf8(b"\xEF\xBB\xBFx", false, true).unwrap(), "\u{FEFF}x");
        assert_eq!(decode_utf8(b"\xEF\xBB", false, false).unwrap(), "\u{FFFD}");
    }

    #[test]
    fn test_decoder_labels() {
        let test_cases = vec!["utf-8", "UTF8", "  unicode-1-1-utf-8\n", "x-unicode20utf8"];
        for label in test_cases {
            assert!(
                TextDecoder::new(label, TextDecoderOptions::default()).is_ok(),
                "label should be accepted: {:?}",
                label
            );
        }

        let err = TextDecoder::new("latin1", TextDecoderOptions::default()).unwrap_err();
        assert!(!err.is_type_error());
        assert_eq!(
            err.to_string(),
            "Failed to construct 'TextDecoder': The given encoding 'latin1' is not supported."
        );
    }

    #[test]
    fn test_decoder_options_from_values() {
        let options = Value::object([("fatal", Value::from("yes"))]);
        let decoder = TextDecoder::from_values(&Value::Undefined, &options).unwrap();
        assert!(decoder.fatal());
        assert!(!decoder.ignore_bom());
        assert_eq!(decoder.decode(Some(b"\xFF")).unwrap_err(), UrlError::InvalidData);
        assert_eq!(decoder.decode(None).unwrap(), "");

        let err = TextDecoder::from_values(&Value::Undefined, &Value::from(true)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to construct 'TextDecoder': Argument 2 can not be converted to a dictionary"
        );
    }
}

//! QR payload decoding
//!
//! Scanned or typed payloads arrive in several shapes:
//!
//! 1. A JSON object literal: `{"t":"visitor","id":42}`
//! 2. A URL (possibly malformed) whose `data` query parameter carries the
//!    JSON, percent-encoded once or twice
//! 3. Something else entirely
//!
//! Decoding tries each shape in order and always resolves to either an
//! [`AccessToken`] or an [`InvalidPayload`] reason. It never panics and has
//! no side effects.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::fallback::first_text;

/// Keys carrying the subject type, highest priority first.
pub const TYPE_KEYS: &[&str] = &["t", "type"];

/// Keys carrying the subject identifier, highest priority first.
pub const ID_KEYS: &[&str] = &["id", "visitor_id", "event_id", "user_id"];

static DATA_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[?&])data=([^&]*)").expect("data parameter pattern is valid")
});

static BARE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"id["':\s]*(\d+)"#).expect("bare id pattern is valid")
});

/// Kind of subject an access token refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectType {
    Visitor,
    OneTime,
    Event,
    Resident,
}

impl SubjectType {
    pub const ALL: [SubjectType; 4] = [
        SubjectType::Visitor,
        SubjectType::OneTime,
        SubjectType::Event,
        SubjectType::Resident,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Visitor => "visitor",
            SubjectType::OneTime => "one-time",
            SubjectType::Event => "event",
            SubjectType::Resident => "resident",
        }
    }

    /// Whether scanning this subject requires a backend lookup
    pub fn needs_lookup(&self) -> bool {
        !matches!(self, SubjectType::Resident)
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectType {
    type Err = InvalidPayload;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visitor" => Ok(SubjectType::Visitor),
            "one-time" => Ok(SubjectType::OneTime),
            "event" => Ok(SubjectType::Event),
            "resident" => Ok(SubjectType::Resident),
            other => Err(InvalidPayload::UnrecognizedType {
                value: other.to_string(),
            }),
        }
    }
}

/// Normalized result of a successful decode
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub subject_type: SubjectType,
    /// Always non-empty
    pub subject_id: String,
}

/// Why a payload could not be turned into an [`AccessToken`]
///
/// The `Display` output is the short reason shown to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidPayload {
    #[error("empty payload")]
    Empty,

    #[error("unparseable payload")]
    Unparseable,

    #[error("missing type or id")]
    MissingField,

    #[error("unrecognized type")]
    UnrecognizedType { value: String },
}

impl InvalidPayload {
    /// Short machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            InvalidPayload::Empty => "empty payload",
            InvalidPayload::Unparseable => "unparseable payload",
            InvalidPayload::MissingField => "missing type or id",
            InvalidPayload::UnrecognizedType { .. } => "unrecognized type",
        }
    }
}

/// Which decoding branch produced a payload object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSource {
    /// The whole input parsed as a JSON object
    Json,
    /// JSON recovered from a `data=` parameter
    UrlData,
    /// Only a numeric `id` could be salvaged; treated as a resident pass
    BareId,
}

/// Parsed payload object, before field normalization
#[derive(Debug, Clone, PartialEq)]
pub struct QrPayload {
    fields: Map<String, Value>,
    source: PayloadSource,
}

impl QrPayload {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn source(&self) -> PayloadSource {
        self.source
    }

    /// First present text value among `keys`
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        first_text(&self.fields, keys)
    }

    /// Normalize the object into an access token
    pub fn token(&self) -> Result<AccessToken, InvalidPayload> {
        let (Some(kind), Some(subject_id)) = (self.text(TYPE_KEYS), self.text(ID_KEYS)) else {
            return Err(InvalidPayload::MissingField);
        };

        Ok(AccessToken {
            subject_type: kind.parse()?,
            subject_id,
        })
    }
}

/// Decode a raw scanned string into an access token
pub fn decode(raw: &str) -> Result<AccessToken, InvalidPayload> {
    parse_payload(raw).and_then(|payload| payload.token())
}

/// Recover the payload object from a raw scanned string
pub fn parse_payload(raw: &str) -> Result<QrPayload, InvalidPayload> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(InvalidPayload::Empty);
    }

    if let Some(fields) = parse_object(input) {
        return Ok(QrPayload {
            fields,
            source: PayloadSource::Json,
        });
    }

    if !input.contains("data=") {
        return Err(InvalidPayload::Unparseable);
    }

    let fragment = DATA_PARAM
        .captures(input)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .filter(|fragment| !fragment.is_empty())
        .ok_or(InvalidPayload::Unparseable)?;

    let decoded = decode_fragment(fragment);
    if let Some(fields) = parse_object(&decoded) {
        return Ok(QrPayload {
            fields,
            source: PayloadSource::UrlData,
        });
    }

    let id = bare_id(&decoded)
        .or_else(|| bare_id(fragment))
        .ok_or(InvalidPayload::Unparseable)?;

    let mut fields = Map::new();
    fields.insert("type".to_string(), json!(SubjectType::Resident.as_str()));
    fields.insert("id".to_string(), json!(id));

    Ok(QrPayload {
        fields,
        source: PayloadSource::BareId,
    })
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(fields)) => Some(fields),
        _ => None,
    }
}

/// Percent-decode a `data` fragment, a second time if a `%` survives.
///
/// A decode that fails keeps the text from the previous step.
fn decode_fragment(fragment: &str) -> String {
    let once = percent_decode(fragment).unwrap_or_else(|| fragment.to_string());
    if once.contains('%') {
        percent_decode(&once).unwrap_or(once)
    } else {
        once
    }
}

fn percent_decode(text: &str) -> Option<String> {
    percent_decode_str(text)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}

fn bare_id(text: &str) -> Option<i64> {
    BARE_ID
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: SubjectType, id: &str) -> AccessToken {
        AccessToken {
            subject_type: kind,
            subject_id: id.to_string(),
        }
    }

    #[test]
    fn test_direct_json() {
        assert_eq!(
            decode(r#"{"t":"visitor","id":42}"#),
            Ok(token(SubjectType::Visitor, "42"))
        );
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(decode(""), Err(InvalidPayload::Empty));
        assert_eq!(decode("   \n"), Err(InvalidPayload::Empty));
    }

    #[test]
    fn test_unrelated_object_is_missing_field() {
        assert_eq!(decode("{}"), Err(InvalidPayload::MissingField));
        assert_eq!(decode(r#"{"foo":"bar"}"#), Err(InvalidPayload::MissingField));
    }

    #[test]
    fn test_type_key_priority() {
        let decoded = decode(r#"{"type":"event","t":"one-time","event_id":"ev-1"}"#);
        assert_eq!(decoded, Ok(token(SubjectType::OneTime, "ev-1")));
    }

    #[test]
    fn test_id_fallback_chain() {
        assert_eq!(
            decode(r#"{"t":"resident","user_id":17}"#),
            Ok(token(SubjectType::Resident, "17"))
        );
        assert_eq!(
            decode(r#"{"t":"visitor","id":"","visitor_id":"v-3"}"#),
            Ok(token(SubjectType::Visitor, "v-3"))
        );
    }

    #[test]
    fn test_unrecognized_type() {
        let err = decode(r#"{"t":"vip","id":1}"#).unwrap_err();
        assert_eq!(err.reason(), "unrecognized type");
        assert_eq!(
            err,
            InvalidPayload::UnrecognizedType {
                value: "vip".to_string()
            }
        );
    }

    #[test]
    fn test_url_embedded_single_encoded() {
        let url = "https://qr.example.com/x?size=200&data=%7B%22t%22%3A%22event%22%2C%22id%22%3A9%7D";
        assert_eq!(decode(url), Ok(token(SubjectType::Event, "9")));
    }

    #[test]
    fn test_url_embedded_double_encoded() {
        let url = "https://qr.example.com/x?data=%257B%2522t%2522%253A%2522visitor%2522%252C%2522id%2522%253A5%257D&size=1";
        assert_eq!(decode(url), Ok(token(SubjectType::Visitor, "5")));
    }

    #[test]
    fn test_malformed_url_still_matches() {
        let text = "qr:/broken?data=%7B%22t%22%3A%22resident%22%2C%22id%22%3A3%7D";
        assert_eq!(decode(text), Ok(token(SubjectType::Resident, "3")));
    }

    #[test]
    fn test_bare_id_salvage() {
        let text = "https://h/x?data=%7B%22id%22%3A88%2C%22broken";
        let payload = parse_payload(text).unwrap();
        assert_eq!(payload.source(), PayloadSource::BareId);
        assert_eq!(payload.token(), Ok(token(SubjectType::Resident, "88")));
    }

    #[test]
    fn test_data_without_anything_usable() {
        assert_eq!(decode("https://h/x?data="), Err(InvalidPayload::Unparseable));
        assert_eq!(decode("https://h/x?data=zzz"), Err(InvalidPayload::Unparseable));
        assert_eq!(decode("hello world"), Err(InvalidPayload::Unparseable));
    }

    #[test]
    fn test_non_object_json_is_unparseable() {
        assert_eq!(decode("42"), Err(InvalidPayload::Unparseable));
        assert_eq!(decode("[1,2]"), Err(InvalidPayload::Unparseable));
    }

    #[test]
    fn test_invalid_percent_sequence_keeps_text() {
        // "%zz" is not a valid escape; the text survives both decode passes
        assert_eq!(decode_fragment("a%zzb"), "a%zzb");
    }

    #[test]
    fn test_subject_type_round_trip() {
        for kind in SubjectType::ALL {
            assert_eq!(kind.as_str().parse::<SubjectType>(), Ok(kind));
        }
        assert_eq!(
            serde_json::to_string(&SubjectType::OneTime).unwrap(),
            "\"one-time\""
        );
    }
}

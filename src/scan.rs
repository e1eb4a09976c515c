//! Scan resolution: from a raw payload to what the guard sees
//!
//! Residents carry everything on the pass itself. Visitors, one-time guests
//! and events are looked up through a [`SubjectLookup`]; scanning a visitor
//! also advances its presence status (inside / left).

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::fallback::{first_flag, first_present, first_text};
use crate::qr::{parse_payload, AccessToken, QrPayload, SubjectType};

/// Reason reported when the lookup finds nothing
pub const NOT_FOUND_REASON: &str = "subject not found";

/// Reason reported when the lookup itself fails
pub const LOOKUP_FAILED_REASON: &str = "lookup failed";

/// Errors raised by a subject lookup backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("lookup backend unavailable: {message}")]
    Unavailable { message: String },

    #[error("malformed lookup response: {message}")]
    MalformedResponse { message: String },

    #[error("status update rejected for {id}: {message}")]
    UpdateRejected { id: String, message: String },
}

/// Subject details returned by the lookup collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubjectDetails {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub resident_name: Option<String>,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    pub number_of_guests: Option<String>,
    pub event_location: Option<String>,
    pub created_at: Option<String>,
    /// RFC 3339 expiry of a one-time pass
    pub expires_at: Option<String>,
}

impl SubjectDetails {
    /// Read a backend subject object, tolerating both naming styles
    pub fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let id = first_text(object, &["id", "visitor_id", "event_id"])?;

        Some(Self {
            id,
            name: first_text(object, &["name", "visitor_name", "event_name"]).unwrap_or_default(),
            status: first_text(object, &["status"]),
            kind: first_text(object, &["type", "visitor_type"]),
            resident_name: first_text(object, &["resident_name"]),
            event_date: first_text(object, &["event_date", "eventDate"]),
            event_time: first_text(object, &["event_time", "eventTime"]),
            number_of_guests: first_text(object, &["number_of_guests", "numberOfGuests"]),
            event_location: first_text(object, &["event_location", "eventLocation"]),
            created_at: first_text(object, &["created_at", "timestamp"]),
            expires_at: first_text(object, &["expires_at", "expiresAt"]),
        })
    }
}

/// Normalized backend reply to a subject lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupReply {
    Found(SubjectDetails),
    NotFound,
}

impl LookupReply {
    /// Normalize `{exito|success, visitor|data}` replies.
    ///
    /// A subject object is honoured even when the success flag is missing.
    pub fn from_value(value: &Value) -> Result<Self, LookupError> {
        let Value::Object(reply) = value else {
            return Err(LookupError::MalformedResponse {
                message: "reply is not an object".to_string(),
            });
        };

        let subject = first_present(reply, &["visitor", "data"]).and_then(Value::as_object);

        match subject.and_then(SubjectDetails::from_object) {
            Some(details) => Ok(LookupReply::Found(details)),
            None if first_flag(reply, &["exito", "success"]) && subject.is_some() => {
                Err(LookupError::MalformedResponse {
                    message: "subject without identifier".to_string(),
                })
            }
            None => Ok(LookupReply::NotFound),
        }
    }

    pub fn into_option(self) -> Option<SubjectDetails> {
        match self {
            LookupReply::Found(details) => Some(details),
            LookupReply::NotFound => None,
        }
    }
}

/// Subject lookup collaborator (normally the REST backend)
pub trait SubjectLookup {
    fn find(
        &self,
        id: &str,
        subject_type: SubjectType,
    ) -> Result<Option<SubjectDetails>, LookupError>;

    fn update_status(&self, id: &str, status: &str) -> Result<(), LookupError>;
}

/// In-memory lookup over a fixed set of subjects
#[derive(Debug, Default)]
pub struct DirectoryLookup {
    subjects: RwLock<HashMap<String, SubjectDetails>>,
}

impl DirectoryLookup {
    pub fn new<I: IntoIterator<Item = SubjectDetails>>(subjects: I) -> Self {
        let subjects = subjects
            .into_iter()
            .map(|details| (details.id.clone(), details))
            .collect();
        Self {
            subjects: RwLock::new(subjects),
        }
    }

    /// Load from a JSON array of subject objects (or a lookup reply list)
    pub fn from_json_str(json: &str) -> Result<Self, LookupError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| LookupError::MalformedResponse {
                message: e.to_string(),
            })?;

        let entries: &[Value] = match &value {
            Value::Array(entries) => entries.as_slice(),
            Value::Object(reply) => first_present(reply, &["visitors", "data"])
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            _ => &[],
        };

        let subjects = entries
            .iter()
            .filter_map(Value::as_object)
            .filter_map(SubjectDetails::from_object);

        Ok(Self::new(subjects))
    }

    pub fn len(&self) -> usize {
        self.subjects.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn status_of(&self, id: &str) -> Option<String> {
        self.subjects
            .read()
            .ok()
            .and_then(|subjects| subjects.get(id).and_then(|d| d.status.clone()))
    }
}

impl SubjectLookup for DirectoryLookup {
    fn find(
        &self,
        id: &str,
        _subject_type: SubjectType,
    ) -> Result<Option<SubjectDetails>, LookupError> {
        let subjects = self.subjects.read().map_err(|e| LookupError::Unavailable {
            message: e.to_string(),
        })?;
        Ok(subjects.get(id).cloned())
    }

    fn update_status(&self, id: &str, status: &str) -> Result<(), LookupError> {
        let mut subjects = self.subjects.write().map_err(|e| LookupError::Unavailable {
            message: e.to_string(),
        })?;
        match subjects.get_mut(id) {
            Some(details) => {
                details.status = Some(status.to_string());
                Ok(())
            }
            None => Err(LookupError::UpdateRejected {
                id: id.to_string(),
                message: "unknown subject".to_string(),
            }),
        }
    }
}

/// Presence of a visitor inside the community
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    Active,
    Inside,
    Left,
    Other(String),
}

impl PresenceStatus {
    /// Parse a stored status; missing or blank means `active`
    pub fn parse(status: Option<&str>) -> Self {
        let normalized = status.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        match normalized.as_str() {
            "" | "active" | "activo" => PresenceStatus::Active,
            "dentro" => PresenceStatus::Inside,
            "salio" | "salió" => PresenceStatus::Left,
            _ => PresenceStatus::Other(normalized),
        }
    }

    /// Status after a successful scan: entering alternates with leaving
    pub fn next_on_scan(&self) -> PresenceStatus {
        match self {
            PresenceStatus::Inside => PresenceStatus::Left,
            PresenceStatus::Active | PresenceStatus::Left | PresenceStatus::Other(_) => {
                PresenceStatus::Inside
            }
        }
    }

    /// Value stored by the backend
    pub fn as_stored(&self) -> &str {
        match self {
            PresenceStatus::Active => "active",
            PresenceStatus::Inside => "dentro",
            PresenceStatus::Left => "salio",
            PresenceStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&status_label(self.as_stored()))
    }
}

/// Display label for a stored status
pub fn status_label(status: &str) -> String {
    match status.trim() {
        "" => "N/A".to_string(),
        "active" | "Activo" | "activo" => "Activo".to_string(),
        "dentro" | "Dentro" => "Dentro".to_string(),
        "salio" | "salió" | "Salió" => "Salió".to_string(),
        other => other.to_string(),
    }
}

/// Whether an expiry timestamp lies in the past.
///
/// Missing or unparseable timestamps never expire.
pub fn is_expired(expires_at: Option<&str>, now: DateTime<Utc>) -> bool {
    expires_at
        .and_then(|text| DateTime::parse_from_rfc3339(text.trim()).ok())
        .map(|expiry| now > expiry.with_timezone(&Utc))
        .unwrap_or(false)
}

/// Resident pass data carried inside the payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResidentPass {
    pub user_id: String,
    pub name: String,
    pub user_name: String,
    pub house_number: Option<String>,
    pub fraccionamiento_id: Option<String>,
    pub timestamp: Option<String>,
}

impl ResidentPass {
    fn from_payload(payload: &QrPayload, token: &AccessToken) -> Self {
        Self {
            user_id: token.subject_id.clone(),
            name: payload.text(&["name", "user_name"]).unwrap_or_default(),
            user_name: payload.text(&["user_name", "name"]).unwrap_or_default(),
            house_number: payload.text(&["house_number"]),
            fraccionamiento_id: payload.text(&["fraccionamiento_id"]),
            timestamp: payload.text(&["timestamp"]),
        }
    }
}

/// What a scan resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanOutcome {
    Resident {
        token: AccessToken,
        pass: ResidentPass,
    },
    Visitor {
        token: AccessToken,
        details: SubjectDetails,
        status: PresenceStatus,
        /// Only one-time passes expire
        expired: bool,
    },
    Event {
        token: AccessToken,
        details: SubjectDetails,
    },
    Invalid {
        reason: String,
    },
}

impl ScanOutcome {
    fn invalid(reason: impl Into<String>) -> Self {
        ScanOutcome::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, ScanOutcome::Invalid { .. })
    }

    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            ScanOutcome::Resident { token, .. }
            | ScanOutcome::Visitor { token, .. }
            | ScanOutcome::Event { token, .. } => Some(token),
            ScanOutcome::Invalid { .. } => None,
        }
    }
}

/// Resolves raw payloads against a lookup collaborator
pub struct ScanResolver<L> {
    lookup: L,
}

impl<L: SubjectLookup> ScanResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn resolve(&self, raw: &str) -> ScanOutcome {
        self.resolve_at(raw, Utc::now())
    }

    /// Resolve with `now` as the reference time for pass expiry
    pub fn resolve_at(&self, raw: &str, now: DateTime<Utc>) -> ScanOutcome {
        let payload = match parse_payload(raw) {
            Ok(payload) => payload,
            Err(invalid) => return ScanOutcome::invalid(invalid.reason()),
        };
        let token = match payload.token() {
            Ok(token) => token,
            Err(invalid) => return ScanOutcome::invalid(invalid.reason()),
        };

        tracing::debug!(
            subject_type = %token.subject_type,
            subject_id = %token.subject_id,
            source = ?payload.source(),
            "decoded scan payload"
        );

        if !token.subject_type.needs_lookup() {
            let pass = ResidentPass::from_payload(&payload, &token);
            return ScanOutcome::Resident { token, pass };
        }

        let details = match self.lookup.find(&token.subject_id, token.subject_type) {
            Ok(Some(details)) => details,
            Ok(None) => return ScanOutcome::invalid(NOT_FOUND_REASON),
            Err(e) => {
                tracing::warn!(subject_id = %token.subject_id, error = %e, "subject lookup failed");
                return ScanOutcome::invalid(LOOKUP_FAILED_REASON);
            }
        };

        if token.subject_type == SubjectType::Event {
            return ScanOutcome::Event { token, details };
        }

        let expired = token.subject_type == SubjectType::OneTime
            && is_expired(details.expires_at.as_deref(), now);
        if expired {
            tracing::warn!(
                subject_id = %token.subject_id,
                expires_at = details.expires_at.as_deref().unwrap_or_default(),
                "one-time pass has expired"
            );
        }

        let current = PresenceStatus::parse(details.status.as_deref());
        let next = current.next_on_scan();
        let status = match self.lookup.update_status(&token.subject_id, next.as_stored()) {
            Ok(()) => next,
            Err(e) => {
                tracing::warn!(
                    subject_id = %token.subject_id,
                    error = %e,
                    "status update failed, keeping current status"
                );
                current
            }
        };

        ScanOutcome::Visitor {
            token,
            details,
            status,
            expired,
        }
    }
}

//! Vault record data model.
//!
//! A [`VaultRecord`] is one stored secret. Its JSON shape is the document
//! interchange format: camelCase field names, `type` for the record kind,
//! and ISO-8601 timestamps with millisecond precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{Result, VaultError};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Opaque record identifier.
///
/// Fresh ids are UUID v7 strings, but any string read from an import is
/// kept as-is so exported files round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Mint a new, globally unique identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Record type
// ---------------------------------------------------------------------------

/// The kind of secret a record holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RecordType {
    #[default]
    Login,
    Card,
    Identity,
    Note,
    SshKey,
}

impl RecordType {
    pub const ALL: [RecordType; 5] = [
        Self::Login,
        Self::Card,
        Self::Identity,
        Self::Note,
        Self::SshKey,
    ];

    /// Canonical string used in both export formats.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Card => "card",
            Self::Identity => "identity",
            Self::Note => "note",
            Self::SshKey => "ssh-key",
        }
    }

    /// Strict parse. Accepts the canonical names plus `ssh` and `ssh_key`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "login" => Some(Self::Login),
            "card" => Some(Self::Card),
            "identity" => Some(Self::Identity),
            "note" => Some(Self::Note),
            "ssh-key" | "ssh_key" | "ssh" => Some(Self::SshKey),
            _ => None,
        }
    }

    /// Parse for imports: anything unrecognized becomes [`RecordType::Login`].
    pub fn parse_lenient(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            if !s.trim().is_empty() {
                tracing::debug!(value = s, "unrecognized record type, defaulting to login");
            }
            Self::Login
        })
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Render a timestamp the way both export formats expect it
/// (`2024-01-01T00:00:00.000Z`).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 timestamp, returning `None` when malformed.
///
/// RFC 3339 with an offset is preferred. A date-time without an offset is
/// read as UTC, and a bare date as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde adapter for ISO-8601 timestamps with millisecond precision.
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One stored secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "type", default)]
    pub record_type: RecordType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for VaultRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("url", &self.url)
            .field("notes", &self.notes.as_ref().map(|_| "<redacted>"))
            .field("record_type", &self.record_type)
            .field("folder", &self.folder)
            .field("favorite", &self.favorite)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl VaultRecord {
    /// Build a record from user-supplied fields with both timestamps at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::EmptyName`] if the name is blank.
    pub fn from_new(fields: NewRecord, id: RecordId, now: DateTime<Utc>) -> Result<Self> {
        let name = validate_name(fields.name)?;
        Ok(Self {
            id,
            name,
            username: fields.username,
            password: fields.password,
            url: non_empty(fields.url),
            notes: non_empty(fields.notes),
            record_type: fields.record_type,
            folder: non_empty(fields.folder),
            favorite: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns `true` if every user-visible field (everything except `id`)
    /// matches `other`.
    pub fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
            && self.username == other.username
            && self.password == other.password
            && self.url == other.url
            && self.notes == other.notes
            && self.record_type == other.record_type
            && self.folder == other.folder
            && self.favorite == other.favorite
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
    }
}

/// Fields supplied when adding a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewRecord {
    pub name: String,
    pub username: String,
    pub password: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub folder: Option<String>,
}

impl NewRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A partial update. `None` leaves a field untouched; for the optional text
/// fields `Some("")` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<RecordType>,
    pub folder: Option<String>,
    pub favorite: Option<bool>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to `record`. Validation happens before any field is
    /// touched, so a rejected patch leaves the record unchanged.
    pub(crate) fn apply(self, record: &mut VaultRecord) -> Result<()> {
        let name = self.name.map(validate_name).transpose()?;

        if let Some(name) = name {
            record.name = name;
        }
        if let Some(username) = self.username {
            record.username = username;
        }
        if let Some(password) = self.password {
            record.password = password;
        }
        if let Some(url) = self.url {
            record.url = non_empty(Some(url));
        }
        if let Some(notes) = self.notes {
            record.notes = non_empty(Some(notes));
        }
        if let Some(record_type) = self.record_type {
            record.record_type = record_type;
        }
        if let Some(folder) = self.folder {
            record.folder = non_empty(Some(folder));
        }
        if let Some(favorite) = self.favorite {
            record.favorite = favorite;
        }
        Ok(())
    }
}

fn validate_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(VaultError::EmptyName);
    }
    Ok(name)
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn record_type_parsing() {
        assert_eq!(RecordType::parse("ssh"), Some(RecordType::SshKey));
        assert_eq!(RecordType::parse(" Card "), Some(RecordType::Card));
        assert_eq!(RecordType::parse("bogus"), None);
        assert_eq!(RecordType::parse_lenient("bogus"), RecordType::Login);
        for t in RecordType::ALL {
            assert_eq!(RecordType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn timestamps_render_with_millis_and_z() {
        assert_eq!(format_timestamp(&ts()), "2024-01-01T00:00:00.000Z");
        assert_eq!(parse_timestamp("2024-01-01T00:00:00.000Z"), Some(ts()));
        assert_eq!(parse_timestamp("2024-01-01T08:00:00+08:00"), Some(ts()));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-01-01T00:00:00"), Some(ts()));
        assert_eq!(parse_timestamp("2024-01-01"), Some(ts()));
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }

    #[test]
    fn from_new_rejects_blank_name() {
        let result = VaultRecord::from_new(NewRecord::named("   "), RecordId::generate(), ts());
        assert!(matches!(result, Err(VaultError::EmptyName)));
    }

    #[test]
    fn from_new_drops_empty_optionals() {
        let fields = NewRecord {
            url: Some(String::new()),
            notes: Some("n".to_string()),
            ..NewRecord::named("Acme")
        };
        let record = VaultRecord::from_new(fields, RecordId::from("a"), ts()).unwrap();
        assert_eq!(record.url, None);
        assert_eq!(record.notes.as_deref(), Some("n"));
        assert!(!record.favorite);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn json_shape() {
        let record = VaultRecord::from_new(
            NewRecord {
                record_type: RecordType::SshKey,
                folder: Some("work".to_string()),
                ..NewRecord::named("Server")
            },
            RecordId::from("id-1"),
            ts(),
        )
        .unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "id-1");
        assert_eq!(json["type"], "ssh-key");
        assert_eq!(json["folder"], "work");
        assert_eq!(json["favorite"], false);
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00.000Z");
        assert!(json.get("url").is_none());

        let back: VaultRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn debug_redacts_secrets() {
        let record = VaultRecord::from_new(
            NewRecord {
                password: "hunter2".to_string(),
                ..NewRecord::named("x")
            },
            RecordId::generate(),
            ts(),
        )
        .unwrap();
        assert!(!format!("{record:?}").contains("hunter2"));
    }

    #[test]
    fn rejected_patch_changes_nothing() {
        let mut record =
            VaultRecord::from_new(NewRecord::named("keep"), RecordId::generate(), ts()).unwrap();
        let before = record.clone();
        let patch = RecordPatch {
            name: Some(" ".to_string()),
            username: Some("changed".to_string()),
            ..RecordPatch::default()
        };
        assert!(patch.apply(&mut record).is_err());
        assert_eq!(record, before);
    }
}

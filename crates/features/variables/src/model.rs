use chrono::{DateTime, Utc};
use sbox_kernel::safe_nanoid;
use sbox_kernel::security::{ResourceGuard, ResourceGuardError};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// Globally unique record identifier (21-character `NanoID`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(String);

impl VariableId {
    #[must_use]
    pub fn generate() -> Self {
        Self(safe_nanoid!())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VariableId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for VariableId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the project that owns a set of variables.
///
/// Only constructible through validation, so every owner id reaching a repository is safe to
/// use as a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for OwnerId {
    type Error = ResourceGuardError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ResourceGuard::owner_id(value).map(|id| Self(id.to_owned()))
    }
}

impl TryFrom<String> for OwnerId {
    type Error = ResourceGuardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ResourceGuard::owner_id(&value)?;
        Ok(Self(value))
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        value.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The persisted identity of a record. Writes are always addressed by both parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableKey {
    pub id: VariableId,
    pub owner_id: OwnerId,
}

/// One stored variable. `value` holds the sealed text, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRecord {
    pub id: VariableId,
    pub owner_id: OwnerId,
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted: bool,
}

impl VariableRecord {
    /// A fresh live record with a new id and the current time.
    #[must_use]
    pub fn new(owner_id: OwnerId, name: impl Into<String>, sealed: String) -> Self {
        Self {
            id: VariableId::generate(),
            owner_id,
            name: name.into(),
            value: sealed,
            created_at: Utc::now(),
            deleted: false,
        }
    }

    #[must_use]
    pub fn key(&self) -> VariableKey {
        VariableKey { id: self.id.clone(), owner_id: self.owner_id.clone() }
    }

    #[must_use]
    pub fn has_key(&self, key: &VariableKey) -> bool {
        self.id == key.id && self.owner_id == key.owner_id
    }

    #[must_use]
    pub const fn is_live(&self) -> bool {
        !self.deleted
    }
}

/// A decrypted variable, as handed to a workload.
pub struct RevealedVariable {
    pub name: String,
    pub value: Zeroizing<String>,
}

impl fmt::Debug for RevealedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealedVariable")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::try_from("proj-1").unwrap()
    }

    #[test]
    fn test_new_record_is_live_with_fresh_id() {
        let a = VariableRecord::new(owner(), "TOKEN", "c2VhbGVk".into());
        let b = VariableRecord::new(owner(), "TOKEN", "c2VhbGVk".into());

        assert!(a.is_live());
        assert_eq!(a.id.as_str().len(), 21);
        assert_ne!(a.id, b.id);
        assert!(a.has_key(&a.key()));
        assert!(!a.has_key(&b.key()));
    }

    #[test]
    fn test_serialized_field_names() {
        let record = VariableRecord::new(owner(), "TOKEN", "c2VhbGVk".into());
        let json = serde_json::to_value(&record).unwrap();
        let object = json.as_object().unwrap();

        let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["createdAt", "deleted", "id", "name", "ownerId", "value"]);
        assert_eq!(object["ownerId"], "proj-1");

        let back: VariableRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_owner_id_is_validated_on_decode() {
        let json = serde_json::json!({
            "id": "x", "ownerId": "../etc", "name": "A", "value": "",
            "createdAt": "2026-01-01T00:00:00Z"
        });
        assert!(serde_json::from_value::<VariableRecord>(json).is_err());
    }

    #[test]
    fn test_revealed_debug_hides_value() {
        let revealed =
            RevealedVariable { name: "TOKEN".into(), value: Zeroizing::new("abc123".into()) };
        let debug = format!("{revealed:?}");
        assert!(debug.contains("TOKEN"));
        assert!(!debug.contains("abc123"));
    }
}

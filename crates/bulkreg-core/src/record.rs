//! Tracking records and the ordered record map.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::DomainStatus;

/// Durable record of one domain's registration attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingRecord {
    /// Domain label, unique across the store.
    pub domain: String,

    /// Address the domain is registered to.
    pub owner: String,

    /// Current status.
    pub status: DomainStatus,

    /// Detail of the last failure. Only set while `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Number of registration attempts made so far.
    #[serde(default)]
    pub attempts: u32,

    /// Hash of the last submitted registration transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,

    /// When the status last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrackingRecord {
    /// Create a record that has not been attempted yet.
    pub fn new(domain: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            owner: owner.into(),
            status: DomainStatus::NotStarted,
            error: None,
            attempts: 0,
            tx_hash: None,
            updated_at: None,
        }
    }

    /// Mark the domain as registered.
    pub fn succeed(&mut self, tx_hash: Option<String>) {
        self.status = DomainStatus::Success;
        self.error = None;
        self.attempts += 1;
        if tx_hash.is_some() {
            self.tx_hash = tx_hash;
        }
        self.updated_at = Some(Utc::now());
    }

    /// Mark the last attempt as failed.
    pub fn fail(&mut self, error: impl Into<String>, tx_hash: Option<String>) {
        self.status = DomainStatus::Failed;
        self.error = Some(error.into());
        self.attempts += 1;
        if tx_hash.is_some() {
            self.tx_hash = tx_hash;
        }
        self.updated_at = Some(Utc::now());
    }
}

/// Insertion-ordered map of domain to tracking record.
///
/// Serialized as a JSON array of `[domain, record]` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Records(IndexMap<String, TrackingRecord>);

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.0.contains_key(domain)
    }

    pub fn get(&self, domain: &str) -> Option<&TrackingRecord> {
        self.0.get(domain)
    }

    pub fn get_mut(&mut self, domain: &str) -> Option<&mut TrackingRecord> {
        self.0.get_mut(domain)
    }

    /// Track a new record. Returns false, leaving the existing record
    /// untouched, if the domain is already tracked.
    pub fn insert(&mut self, record: TrackingRecord) -> bool {
        if self.0.contains_key(&record.domain) {
            return false;
        }
        self.0.insert(record.domain.clone(), record);
        true
    }

    /// Domains in insertion order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TrackingRecord)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Count records with the given status.
    pub fn count(&self, status: DomainStatus) -> usize {
        self.0.values().filter(|r| r.status == status).count()
    }
}

impl FromIterator<TrackingRecord> for Records {
    fn from_iter<I: IntoIterator<Item = TrackingRecord>>(iter: I) -> Self {
        let mut records = Records::new();
        for record in iter {
            records.insert(record);
        }
        records
    }
}

impl Serialize for Records {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for Records {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(String, TrackingRecord)>::deserialize(deserializer)?;
        let mut records = Records::new();
        for (domain, record) in pairs {
            if domain != record.domain {
                return Err(de::Error::custom(format!(
                    "entry '{domain}' holds the record of '{}'",
                    record.domain
                )));
            }
            if !records.insert(record) {
                return Err(de::Error::custom(format!("duplicate entry '{domain}'")));
            }
        }
        Ok(records)
    }
}

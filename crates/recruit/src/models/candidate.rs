//! Candidate models as returned by the Workable API
//!
//! List entries keep the JSON object they were parsed from, so the baseline
//! written to disk holds exactly the fields the API returned (explicit `null`s
//! included). The detail view is a typed projection used for rendering only.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unique identifier for a candidate (Workable candidate ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CandidateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CandidateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A candidate as it appears in a job's candidate list (index view)
///
/// This is the baseline snapshot persisted as `workable-index.json` and used
/// for freshness comparisons on the next run. The list entry is kept exactly
/// as received; the accessors read from it without requiring any field but
/// `id` to be well-formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Candidate {
    id: CandidateId,
    snapshot: Map<String, Value>,
}

impl Candidate {
    /// Create a candidate with just an ID
    pub fn new(id: impl Into<CandidateId>) -> Self {
        let id = id.into();
        let mut snapshot = Map::new();
        snapshot.insert("id".to_string(), Value::String(id.as_str().to_string()));
        Self { id, snapshot }
    }

    pub fn with_email(self, email: impl Into<String>) -> Self {
        self.with_field("email", Value::String(email.into()))
    }

    pub fn with_updated_at(self, updated_at: impl Into<String>) -> Self {
        self.with_field("updated_at", Value::String(updated_at.into()))
    }

    pub fn with_disqualified(self, disqualified: bool) -> Self {
        self.with_field("disqualified", Value::Bool(disqualified))
    }

    fn with_field(mut self, key: &str, value: Value) -> Self {
        self.snapshot.insert(key.to_string(), value);
        self
    }

    pub fn id(&self) -> &CandidateId {
        &self.id
    }

    pub fn email(&self) -> Option<&str> {
        self.snapshot.get("email").and_then(Value::as_str)
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.snapshot.get("updated_at").and_then(Value::as_str)
    }

    /// The list entry as received from the API
    pub fn snapshot(&self) -> &Map<String, Value> {
        &self.snapshot
    }

    /// The raw key a local record is filed under: the email, or the ID when
    /// the email is missing or empty.
    pub fn record_key(&self) -> &str {
        self.email()
            .filter(|email| !email.is_empty())
            .unwrap_or(self.id.as_str())
    }

    pub fn is_disqualified(&self) -> bool {
        self.snapshot.get("disqualified") == Some(&Value::Bool(true))
    }
}

impl TryFrom<Map<String, Value>> for Candidate {
    type Error = String;

    fn try_from(snapshot: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match snapshot.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err("candidate entry has no id".to_string()),
        };
        Ok(Self {
            id: CandidateId(id),
            snapshot,
        })
    }
}

impl From<Candidate> for Map<String, Value> {
    fn from(candidate: Candidate) -> Self {
        candidate.snapshot
    }
}

/// Typed view of a full candidate record from `GET /candidates/{id}`
///
/// Only used for rendering. The detail snapshot itself is stored as the
/// untouched JSON object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub job: Option<JobRef>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub sourced: Option<bool>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Skills arrive either as plain strings or as `{ "name": ... }` objects
    #[serde(default)]
    pub skills: Option<Vec<Value>>,
    #[serde(default)]
    pub tags: Option<Vec<Value>>,
    #[serde(default)]
    pub experience_entries: Option<Vec<ExperienceEntry>>,
    #[serde(default)]
    pub education_entries: Option<Vec<EducationEntry>>,
    #[serde(default)]
    pub social_profiles: Option<Vec<SocialProfile>>,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

impl CandidateDetail {
    /// Cover letter text, if one is present and non-empty
    pub fn cover_letter(&self) -> Option<&str> {
        self.cover_letter.as_deref().filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// The job a candidate applied to, as embedded in the candidate record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRef {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub shortcode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialProfile {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

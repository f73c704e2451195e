//! Job and recruitment stage models

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A job posting from `GET /jobs`
///
/// Keeps the received JSON object so `job-index.json` holds every field the
/// API sent. Only `shortcode` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Job {
    shortcode: String,
    snapshot: Map<String, Value>,
}

impl Job {
    pub fn new(shortcode: impl Into<String>, title: impl Into<String>) -> Self {
        let shortcode = shortcode.into();
        let mut snapshot = Map::new();
        snapshot.insert("shortcode".to_string(), Value::String(shortcode.clone()));
        snapshot.insert("title".to_string(), Value::String(title.into()));
        Self { shortcode, snapshot }
    }

    pub fn shortcode(&self) -> &str {
        &self.shortcode
    }

    /// Job title, empty when the API sent none
    pub fn title(&self) -> &str {
        self.snapshot
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

impl TryFrom<Map<String, Value>> for Job {
    type Error = String;

    fn try_from(snapshot: Map<String, Value>) -> Result<Self, Self::Error> {
        let shortcode = snapshot
            .get("shortcode")
            .and_then(Value::as_str)
            .ok_or_else(|| "job entry has no shortcode".to_string())?
            .to_string();
        Ok(Self { shortcode, snapshot })
    }
}

impl From<Job> for Map<String, Value> {
    fn from(job: Job) -> Self {
        job.snapshot
    }
}

/// One step of a job's recruitment pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct Stage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: i64,
}

/// Typed view of `GET /jobs/{shortcode}/stages`, used for rendering.
/// `stages.json` stores the response as received.
#[derive(Debug, Clone, Deserialize)]
pub struct StagesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub stages: Vec<Stage>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl StagesResponse {
    /// Stages ordered by pipeline position
    pub fn sorted(&self) -> Vec<&Stage> {
        let mut stages: Vec<&Stage> = self.stages.iter().collect();
        stages.sort_by_key(|stage| stage.position);
        stages
    }
}

//! Job record types and the job file codec.
//!
//! A job is a saved, ready-to-run workspace snapshot plus an output-naming
//! preference. One job is persisted as one pretty-printed JSON document; the
//! file stem is the job's identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// JobId
// ---------------------------------------------------------------------------

/// Stable job identifier, derived from the sanitized file stem.
///
/// Unique within the pending store; ordering is lexicographic on the stem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(stem: impl Into<String>) -> Self {
        Self(stem.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Workspace configuration
// ---------------------------------------------------------------------------

/// A target media entry (video or image the swap runs against).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: String,
    pub path: String,
}

/// A source face entry (image supplying the replacement face).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRef {
    pub id: String,
    pub path: String,
}

/// A merged face embedding saved with the workspace.
///
/// Embeddings carry their data inline in the document, so unlike media and
/// face entries they need no on-disk resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRef {
    pub id: String,
    pub name: String,
}

/// The editor state needed to reproduce a ready-to-record session.
///
/// Only the fields the scheduling core must inspect are typed; everything
/// else the editor saves (markers, per-face parameters, widget state, ...)
/// flows through `extra` untouched so the document round-trips losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub target_media: Vec<MediaRef>,

    #[serde(default)]
    pub source_faces: Vec<FaceRef>,

    #[serde(default)]
    pub embeddings: Vec<EmbeddingRef>,

    /// Destination directory for the pipeline's output artifact.
    #[serde(default)]
    pub output_folder: String,

    /// Remaining editor state, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// JobRecord
// ---------------------------------------------------------------------------

/// A persisted job: display name, output-naming choice, and the full
/// workspace snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// User-chosen label for the job.
    pub display_name: String,

    /// When true, the output file base name is `display_name` instead of
    /// the pipeline's default naming rule.
    pub use_name_for_output: bool,

    /// Explicit output base name chosen at save time. Takes precedence over
    /// `use_name_for_output` when set and non-empty.
    #[serde(default)]
    pub output_file_name: Option<String>,

    /// Creation time (UTC). Informational only.
    pub created_at: DateTime<Utc>,

    /// Full workspace snapshot.
    pub workspace: WorkspaceConfig,
}

impl JobRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        display_name: impl Into<String>,
        use_name_for_output: bool,
        workspace: WorkspaceConfig,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            use_name_for_output,
            output_file_name: None,
            created_at: Utc::now(),
            workspace,
        }
    }

    /// Set an explicit output base name for this job.
    pub fn with_output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = Some(name.into());
        self
    }

    /// Serialize to the on-disk job file format (pretty JSON).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a job file document.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

/// Listing item for a pending job, cheap enough to build for every file in
/// the pending directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_workspace() -> WorkspaceConfig {
        let mut extra = serde_json::Map::new();
        extra.insert(
            "markers".to_string(),
            serde_json::json!({ "120": { "parameters": {} } }),
        );
        extra.insert("swap_faces_enabled".to_string(), serde_json::json!(true));
        WorkspaceConfig {
            target_media: vec![MediaRef {
                id: "m1".into(),
                path: "/media/clip.mp4".into(),
            }],
            source_faces: vec![FaceRef {
                id: "f1".into(),
                path: "/faces/face.png".into(),
            }],
            embeddings: vec![],
            output_folder: "/out".into(),
            extra,
        }
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = JobRecord::new("wedding_cut", true, sample_workspace())
            .with_output_file_name("final_cut");
        let json = record.to_json().expect("serialize");
        let parsed = JobRecord::from_json(&json).expect("parse");
        assert_eq!(parsed, record);
    }

    #[test]
    fn unknown_editor_state_is_preserved() {
        let record = JobRecord::new("clip", false, sample_workspace());
        let json = record.to_json().expect("serialize");
        let parsed = JobRecord::from_json(&json).expect("parse");
        assert_eq!(
            parsed.workspace.extra.get("swap_faces_enabled"),
            Some(&serde_json::json!(true))
        );
        assert!(parsed.workspace.extra.contains_key("markers"));
    }

    #[test]
    fn missing_optional_sections_default_to_empty() {
        let json = r#"{
            "display_name": "bare",
            "use_name_for_output": false,
            "created_at": "2026-01-15T10:00:00Z",
            "workspace": {}
        }"#;
        let parsed = JobRecord::from_json(json).expect("parse");
        assert!(parsed.workspace.target_media.is_empty());
        assert!(parsed.workspace.source_faces.is_empty());
        assert!(parsed.workspace.embeddings.is_empty());
        assert!(parsed.workspace.output_folder.is_empty());
    }

    #[test]
    fn corrupt_document_fails_to_parse() {
        assert!(JobRecord::from_json("{ not json").is_err());
        // Valid JSON but wrong shape.
        assert!(JobRecord::from_json(r#"{"display_name": 42}"#).is_err());
    }

    #[test]
    fn job_id_display_matches_stem() {
        let id = JobId::new("wedding_cut_1");
        assert_eq!(id.to_string(), "wedding_cut_1");
        assert_eq!(id.as_str(), "wedding_cut_1");
    }
}

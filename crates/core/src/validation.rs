//! Runnability validation for a loaded workspace snapshot.
//!
//! A job that fails these checks is never handed to the pipeline; the
//! scheduler reports it as skipped and moves on to the next one.

use std::path::Path;

use crate::error::CoreError;
use crate::job::WorkspaceConfig;

/// Validate that a workspace snapshot can actually be run.
///
/// Requirements:
/// - at least one target media entry whose path resolves on disk;
/// - at least one source: a face image that resolves on disk, or any saved
///   embedding (embeddings carry their data inline);
/// - a non-empty output folder.
pub fn validate_runnable(workspace: &WorkspaceConfig) -> Result<(), CoreError> {
    if workspace.target_media.is_empty() {
        return Err(CoreError::Validation(
            "Workspace references no target media".to_string(),
        ));
    }

    let resolvable_target = workspace
        .target_media
        .iter()
        .find(|m| Path::new(&m.path).exists());
    if resolvable_target.is_none() {
        return Err(CoreError::Validation(format!(
            "No target media path resolves on disk (first: \"{}\")",
            workspace.target_media[0].path
        )));
    }

    let has_face = workspace
        .source_faces
        .iter()
        .any(|f| Path::new(&f.path).exists());
    if !has_face && workspace.embeddings.is_empty() {
        return Err(CoreError::Validation(
            "Workspace has no resolvable source face and no saved embedding".to_string(),
        ));
    }

    if workspace.output_folder.trim().is_empty() {
        return Err(CoreError::Validation(
            "Workspace has no output folder set".to_string(),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{EmbeddingRef, FaceRef, MediaRef};
    use assert_matches::assert_matches;

    /// Workspace whose media/face files exist inside `dir`.
    fn workspace_in(dir: &std::path::Path) -> WorkspaceConfig {
        let media = dir.join("clip.mp4");
        let face = dir.join("face.png");
        std::fs::write(&media, b"video").expect("write media");
        std::fs::write(&face, b"image").expect("write face");

        WorkspaceConfig {
            target_media: vec![MediaRef {
                id: "m1".into(),
                path: media.to_string_lossy().into_owned(),
            }],
            source_faces: vec![FaceRef {
                id: "f1".into(),
                path: face.to_string_lossy().into_owned(),
            }],
            embeddings: vec![],
            output_folder: dir.to_string_lossy().into_owned(),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn complete_workspace_is_runnable() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(validate_runnable(&workspace_in(dir.path())).is_ok());
    }

    #[test]
    fn no_target_media_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ws = workspace_in(dir.path());
        ws.target_media.clear();
        assert_matches!(validate_runnable(&ws), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unresolvable_target_media_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ws = workspace_in(dir.path());
        ws.target_media[0].path = "/does/not/exist.mp4".into();
        let err = validate_runnable(&ws).unwrap_err();
        assert!(err.to_string().contains("target media"));
    }

    #[test]
    fn missing_face_file_rejected_without_embeddings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ws = workspace_in(dir.path());
        ws.source_faces[0].path = "/gone/face.png".into();
        assert_matches!(validate_runnable(&ws), Err(CoreError::Validation(_)));
    }

    #[test]
    fn embedding_counts_as_source() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ws = workspace_in(dir.path());
        ws.source_faces.clear();
        ws.embeddings.push(EmbeddingRef {
            id: "e1".into(),
            name: "merged".into(),
        });
        assert!(validate_runnable(&ws).is_ok());
    }

    #[test]
    fn empty_output_folder_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ws = workspace_in(dir.path());
        ws.output_folder = "   ".into();
        let err = validate_runnable(&ws).unwrap_err();
        assert!(err.to_string().contains("output folder"));
    }
}

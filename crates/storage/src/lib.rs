//! Annotation set persistence
//!
//! Saves and loads annotation sets as versioned JSON documents under the
//! application data directory. The GUI shell decides when to save; this
//! crate only provides the storage primitive.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use scenemark_core::Annotation;
use serde::{Deserialize, Serialize};

const ANNOTATION_SET_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unsupported annotation set schema version {0}")]
    UnsupportedVersion(u32),
}

/// Filesystem root for persisted annotation sets
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnnotationSetEnvelope {
    version: u32,
    annotations: Vec<Annotation>,
}

impl Storage {
    /// Storage rooted at the platform's local data directory
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("dev", "Scenemark", "Scenemark")
            .ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.data_local_dir().to_path_buf() })
    }

    /// Storage rooted at an explicit directory (tests, portable installs)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document a named annotation set is stored in
    pub fn annotation_set_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.annotations.json"))
    }

    /// Save an annotation set under `name`
    ///
    /// The document is written atomically (temp file + rename) so a crash
    /// mid-write never leaves a truncated set behind. Returns the path of
    /// the saved document.
    pub fn save_annotation_set(
        &self,
        name: &str,
        annotations: &[Annotation],
    ) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.root)?;

        let envelope = AnnotationSetEnvelope {
            version: ANNOTATION_SET_SCHEMA_VERSION,
            annotations: annotations.to_vec(),
        };
        let bytes = serde_json::to_vec_pretty(&envelope)?;

        let path = self.annotation_set_path(name);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        log::debug!(
            "saved annotation set '{}' ({} annotations) to {}",
            name,
            annotations.len(),
            path.display()
        );
        Ok(path)
    }

    /// Load the annotation set stored under `name`
    ///
    /// Returns `Ok(None)` if no document exists for the name.
    pub fn load_annotation_set(&self, name: &str) -> Result<Option<Vec<Annotation>>, StorageError> {
        let path = self.annotation_set_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let envelope: AnnotationSetEnvelope = serde_json::from_slice(&bytes)?;
        if envelope.version > ANNOTATION_SET_SCHEMA_VERSION {
            log::warn!(
                "annotation set '{}' has schema version {}, newer than supported {}",
                name,
                envelope.version,
                ANNOTATION_SET_SCHEMA_VERSION
            );
            return Err(StorageError::UnsupportedVersion(envelope.version));
        }

        log::debug!(
            "loaded annotation set '{}' ({} annotations)",
            name,
            envelope.annotations.len()
        );
        Ok(Some(envelope.annotations))
    }

    /// Check whether a document exists for `name`
    pub fn annotation_set_exists(&self, name: &str) -> bool {
        self.annotation_set_path(name).exists()
    }

    /// Delete the document stored under `name`, if any
    pub fn delete_annotation_set(&self, name: &str) -> Result<(), StorageError> {
        let path = self.annotation_set_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::task::{Project, Todo};

/// Durable storage for the two collections. Each collection lives in its
/// own JSON document holding the full serialized array; every save is a
/// full overwrite through a tempfile rename.
#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
    pub todos_path: PathBuf,
    pub projects_path: PathBuf,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let todos_path = data_dir.join("todos.json");
        let projects_path = data_dir.join("projects.json");

        info!(
            data_dir = %data_dir.display(),
            todos = %todos_path.display(),
            projects = %projects_path.display(),
            "opened datastore"
        );

        Ok(Self {
            data_dir,
            todos_path,
            projects_path,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn load_todos(&self) -> anyhow::Result<Vec<Todo>> {
        load_collection(&self.todos_path)
    }

    #[tracing::instrument(skip(self))]
    pub fn load_projects(&self) -> anyhow::Result<Vec<Project>> {
        load_collection(&self.projects_path)
    }

    #[tracing::instrument(skip(self, todos))]
    pub fn save_todos(&self, todos: &[Todo]) -> anyhow::Result<()> {
        save_collection_atomic(&self.todos_path, todos).context("failed to save todos.json")
    }

    #[tracing::instrument(skip(self, projects))]
    pub fn save_projects(&self, projects: &[Project]) -> anyhow::Result<()> {
        save_collection_atomic(&self.projects_path, projects)
            .context("failed to save projects.json")
    }
}

/// A missing file and an unreadable one are not the same thing: absence is
/// the normal first-run state and yields an empty collection, as does a
/// file that no longer parses. Other I/O errors propagate.
fn load_collection<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    debug!(file = %path.display(), "loading collection");

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(file = %path.display(), "collection file absent, starting empty");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed reading {}", path.display()));
        }
    };

    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            debug!(file = %path.display(), count = items.len(), "loaded collection");
            Ok(items)
        }
        Err(err) => {
            warn!(
                file = %path.display(),
                error = %err,
                "collection file unparsable, starting empty"
            );
            Ok(Vec::new())
        }
    }
}

fn save_collection_atomic<T: Serialize>(path: &Path, items: &[T]) -> anyhow::Result<()> {
    debug!(file = %path.display(), count = items.len(), "saving collection atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut temp, items)?;
    writeln!(temp)?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}

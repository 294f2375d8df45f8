use super::{DocumentStore, apply_delete, apply_insert, apply_replace, owned_by};
use crate::error::AppError;
use crate::model::{OwnerId, Task};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASKBOARD_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    tasks: Vec<Task>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::unexpected("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("taskboard").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::unexpected("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskboard")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    let stored: StoredTasks = serde_json::from_str(&content)
        .map_err(|err| AppError::unexpected(format!("{}: {}", path.display(), err)))?;

    if stored.schema_version != SCHEMA_VERSION {
        return Err(AppError::unexpected("schema_version mismatch"));
    }

    Ok(stored.tasks)
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let stored = StoredTasks {
        schema_version: SCHEMA_VERSION,
        tasks: tasks.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)?;
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    Ok(())
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        // Fail at startup rather than on the first request.
        load_tasks(&path)?;
        tracing::debug!(path = %path.display(), "opened task store");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    fn modify<T>(
        &self,
        change: impl FnOnce(&mut Vec<Task>) -> Result<(T, bool), AppError>,
    ) -> Result<T, AppError> {
        let _guard = self.lock.lock();
        let mut tasks = load_tasks(&self.path)?;
        let (outcome, dirty) = change(&mut tasks)?;
        if dirty {
            save_tasks(&self.path, &tasks)?;
        }
        Ok(outcome)
    }
}

impl DocumentStore for JsonFileStore {
    fn insert(&self, task: &Task) -> Result<(), AppError> {
        self.modify(|tasks| apply_insert(tasks, task).map(|()| ((), true)))
    }

    fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Task>, AppError> {
        let _guard = self.lock.lock();
        let mut tasks = load_tasks(&self.path)?;
        tasks.retain(|task| &task.user_id == owner);
        Ok(tasks)
    }

    fn find_one(&self, id: &str, owner: &OwnerId) -> Result<Option<Task>, AppError> {
        let _guard = self.lock.lock();
        Ok(load_tasks(&self.path)?
            .into_iter()
            .find(|task| owned_by(task, id, owner)))
    }

    fn replace_one(&self, task: &Task) -> Result<bool, AppError> {
        self.modify(|tasks| {
            let replaced = apply_replace(tasks, task);
            Ok((replaced, replaced))
        })
    }

    fn delete_one(&self, id: &str, owner: &OwnerId) -> Result<Option<Task>, AppError> {
        self.modify(|tasks| {
            let removed = apply_delete(tasks, id, owner);
            let dirty = removed.is_some();
            Ok((removed, dirty))
        })
    }
}

use crate::error::AppError;
use crate::model::{NewTask, OwnerId, Task, TaskPatch, normalize_description, normalize_title};
use crate::storage::{DocumentStore, MemoryStore};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

const TASK_NOT_FOUND: &str = "Task not found";

#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn DocumentStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn for_owner(&self, owner: OwnerId) -> OwnerTasks<'_> {
        OwnerTasks {
            store: self.store.as_ref(),
            owner,
        }
    }
}

pub struct OwnerTasks<'a> {
    store: &'a dyn DocumentStore,
    owner: OwnerId,
}

impl OwnerTasks<'_> {
    pub fn create(&self, request: NewTask) -> Result<Task, AppError> {
        let title = normalize_title(request.title.as_deref().unwrap_or_default())?;
        let description = normalize_description(request.description.as_deref())?;
        let now = OffsetDateTime::now_utc();

        let task = Task {
            id: Uuid::new_v4().simple().to_string(),
            title,
            description,
            completed: false,
            user_id: self.owner.clone(),
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&task)?;
        tracing::debug!(task_id = %task.id, owner = %self.owner, "created task");

        Ok(task)
    }

    /// Newest first. Tasks sharing a creation instant keep newest-inserted first.
    pub fn list(&self) -> Result<Vec<Task>, AppError> {
        let mut tasks = self.store.find_by_owner(&self.owner)?;
        tasks.reverse();
        tasks.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(tasks)
    }

    pub fn get(&self, id: &str) -> Result<Task, AppError> {
        let trimmed_id = require_id(id)?;
        self.store
            .find_one(trimmed_id, &self.owner)?
            .ok_or_else(|| AppError::not_found(TASK_NOT_FOUND))
    }

    /// Applies only the fields present in `patch`.
    ///
    /// An empty title is ignored, while an empty or null description clears
    /// the stored one.
    pub fn update(&self, id: &str, patch: TaskPatch) -> Result<Task, AppError> {
        let trimmed_id = require_id(id)?;
        let mut task = self
            .store
            .find_one(trimmed_id, &self.owner)?
            .ok_or_else(|| AppError::not_found(TASK_NOT_FOUND))?;

        if let Some(title) = patch.title.as_deref()
            && !title.is_empty()
        {
            task.title = normalize_title(title)?;
        }

        if let Some(description) = patch.description {
            task.description = normalize_description(description.as_deref())?;
        }

        if let Some(completed) = patch.completed {
            task.completed = completed;
        }

        task.updated_at = next_update_stamp(task.updated_at);

        // The task may have been deleted since it was read.
        if !self.store.replace_one(&task)? {
            return Err(AppError::not_found(TASK_NOT_FOUND));
        }
        tracing::debug!(task_id = %task.id, owner = %self.owner, "updated task");

        Ok(task)
    }

    pub fn delete(&self, id: &str) -> Result<Task, AppError> {
        let trimmed_id = require_id(id)?;
        let removed = self
            .store
            .delete_one(trimmed_id, &self.owner)?
            .ok_or_else(|| AppError::not_found(TASK_NOT_FOUND))?;
        tracing::debug!(task_id = %removed.id, owner = %self.owner, "deleted task");

        Ok(removed)
    }
}

fn require_id(id: &str) -> Result<&str, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::validation("id is required"));
    }
    Ok(trimmed_id)
}

/// `updated_at` must advance on every write, even when the clock has not.
fn next_update_stamp(previous: OffsetDateTime) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    if now > previous {
        now
    } else {
        previous + Duration::nanoseconds(1)
    }
}

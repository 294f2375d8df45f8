use crate::error::AppError;
use crate::model::{OwnerId, Task};

pub mod json_store;
pub mod memory;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;

pub trait DocumentStore: Send + Sync {
    fn insert(&self, task: &Task) -> Result<(), AppError>;

    fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Task>, AppError>;

    fn find_one(&self, id: &str, owner: &OwnerId) -> Result<Option<Task>, AppError>;

    /// Replaces the document matching both `task.id` and `task.user_id`.
    /// Returns `false` when no such document exists.
    fn replace_one(&self, task: &Task) -> Result<bool, AppError>;

    fn delete_one(&self, id: &str, owner: &OwnerId) -> Result<Option<Task>, AppError>;
}

fn owned_by(task: &Task, id: &str, owner: &OwnerId) -> bool {
    task.id == id && &task.user_id == owner
}

fn apply_insert(tasks: &mut Vec<Task>, task: &Task) -> Result<(), AppError> {
    if tasks.iter().any(|existing| existing.id == task.id) {
        return Err(AppError::unexpected(format!(
            "duplicate task id {}",
            task.id
        )));
    }
    tasks.push(task.clone());
    Ok(())
}

fn apply_replace(tasks: &mut [Task], task: &Task) -> bool {
    match tasks
        .iter_mut()
        .find(|existing| owned_by(existing, &task.id, &task.user_id))
    {
        Some(existing) => {
            *existing = task.clone();
            true
        }
        None => false,
    }
}

fn apply_delete(tasks: &mut Vec<Task>, id: &str, owner: &OwnerId) -> Option<Task> {
    let index = tasks.iter().position(|task| owned_by(task, id, owner))?;
    Some(tasks.remove(index))
}

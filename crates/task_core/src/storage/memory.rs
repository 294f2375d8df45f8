use super::{DocumentStore, apply_delete, apply_insert, apply_replace, owned_by};
use crate::error::AppError;
use crate::model::{OwnerId, Task};
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&self, task: &Task) -> Result<(), AppError> {
        apply_insert(&mut self.tasks.write(), task)
    }

    fn find_by_owner(&self, owner: &OwnerId) -> Result<Vec<Task>, AppError> {
        Ok(self
            .tasks
            .read()
            .iter()
            .filter(|task| &task.user_id == owner)
            .cloned()
            .collect())
    }

    fn find_one(&self, id: &str, owner: &OwnerId) -> Result<Option<Task>, AppError> {
        Ok(self
            .tasks
            .read()
            .iter()
            .find(|task| owned_by(task, id, owner))
            .cloned())
    }

    fn replace_one(&self, task: &Task) -> Result<bool, AppError> {
        Ok(apply_replace(&mut self.tasks.write(), task))
    }

    fn delete_one(&self, id: &str, owner: &OwnerId) -> Result<Option<Task>, AppError> {
        Ok(apply_delete(&mut self.tasks.write(), id, owner))
    }
}

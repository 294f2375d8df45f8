use std::sync::Arc;

use task_core::TaskRepository;

use crate::identity::{HeaderIdentity, IdentityResolver};

#[derive(Clone)]
pub struct AppState {
    pub repository: TaskRepository,
    pub identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    pub fn new(repository: TaskRepository, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            repository,
            identity,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            TaskRepository::in_memory(),
            Arc::new(HeaderIdentity::default()),
        )
    }
}

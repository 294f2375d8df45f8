pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod storage;

pub use error::AppError;
pub use model::{NewTask, OwnerId, StatusFilter, Task, TaskPatch};
pub use repository::{OwnerTasks, TaskRepository};

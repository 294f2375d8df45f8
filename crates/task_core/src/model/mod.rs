mod task;

pub use task::{
    MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, NewTask, OwnerId, StatusFilter, Task, TaskPatch,
};
pub(crate) use task::{normalize_description, normalize_title};

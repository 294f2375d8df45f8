use task_core::{AppError, StatusFilter, Task, TaskPatch};

use super::{FormView, ListView};
use crate::api::{ClientError, TaskApi};

/// Page container holding the authoritative client-side task list.
pub struct Dashboard<A> {
    api: A,
    tasks: Vec<Task>,
    mounted: bool,
    filter: StatusFilter,
    last_error: Option<String>,
}

impl<A: TaskApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            mounted: false,
            filter: StatusFilter::All,
            last_error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        !self.mounted
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn view(&self) -> ListView<'_> {
        ListView::new(&self.tasks, self.filter)
    }

    /// `{code} - {message}` of the most recent failed action, cleared by the
    /// next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Loads the list on first use; a failed load leaves the page unmounted
    /// so the next call retries.
    pub fn mount(&mut self) -> Result<(), ClientError> {
        if self.mounted {
            return Ok(());
        }
        let tasks = self.record(self.api.list())?;
        self.tasks = tasks;
        self.mounted = true;
        Ok(())
    }

    pub fn create(&mut self, form: &mut FormView) -> Result<Task, ClientError> {
        let result = form
            .submit()
            .map_err(ClientError::from)
            .and_then(|request| self.api.create(&request));
        let task = self.record(result)?;
        self.tasks.insert(0, task.clone());
        form.clear();
        Ok(task)
    }

    pub fn update(&mut self, id: &str, patch: &TaskPatch) -> Result<Task, ClientError> {
        let task = self.record(self.api.update(id.trim(), patch))?;
        if let Some(slot) = self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            *slot = task.clone();
        }
        Ok(task)
    }

    pub fn delete(&mut self, id: &str) -> Result<String, ClientError> {
        // The server trims ids, so the local match must too.
        let id = id.trim();
        let message = self.record(self.api.delete(id))?;
        self.tasks.retain(|task| task.id != id);
        Ok(message)
    }

    /// Finds a task by id, or by its 1-based row number in the current view.
    pub fn resolve(&self, reference: &str) -> Result<&Task, ClientError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(AppError::validation("task id is required").into());
        }
        if let Some(task) = self.tasks.iter().find(|task| task.id == reference) {
            return Ok(task);
        }
        reference
            .parse::<usize>()
            .ok()
            .and_then(|number| self.view().row(number))
            .ok_or_else(|| AppError::not_found("Task not found").into())
    }

    fn record<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(err) => {
                tracing::debug!(code = err.code(), "task action failed: {err}");
                self.last_error = Some(format!("{} - {}", err.code(), err));
            }
        }
        result
    }
}

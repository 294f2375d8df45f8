use task_core::{AppError, NewTask};

#[derive(Debug, Clone, Default)]
pub struct FormView {
    title: String,
    description: String,
}

impl FormView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn submit(&self) -> Result<NewTask, AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("title is required"));
        }
        let description = Some(self.description.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(NewTask::new(title, description))
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::FormView;
    use task_core::NewTask;

    #[test]
    fn blank_title_is_rejected() {
        let mut form = FormView::new();
        form.set_title("   ");
        let err = form.submit().unwrap_err();
        assert_eq!(err.code(), "validation_error");
        assert_eq!(err.message(), "title is required");
    }

    #[test]
    fn submit_trims_and_drops_empty_description() {
        let mut form = FormView::new();
        form.set_title("  Buy milk ");
        form.set_description("  ");
        assert_eq!(form.submit().unwrap(), NewTask::new("Buy milk", None));

        form.set_description("two liters");
        assert_eq!(
            form.submit().unwrap(),
            NewTask::new("Buy milk", Some("two liters".to_string()))
        );
    }

    #[test]
    fn clear_resets_fields() {
        let mut form = FormView::new();
        form.set_title("Buy milk");
        form.set_description("two liters");
        form.clear();
        assert_eq!(form.title(), "");
        assert_eq!(form.description(), "");
    }
}

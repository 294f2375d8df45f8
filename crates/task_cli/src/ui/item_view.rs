use task_core::config::Palette;
use task_core::{Task, TaskPatch};

use super::created_label;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Draft {
    title: String,
    description: String,
}

#[derive(Debug, Clone)]
pub struct ItemView {
    task: Task,
    draft: Option<Draft>,
}

impl ItemView {
    pub fn new(task: Task) -> Self {
        Self { task, draft: None }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn toggle(&self) -> TaskPatch {
        TaskPatch::completed(!self.task.completed)
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn begin_edit(&mut self) {
        self.draft = Some(self.fresh_draft());
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.title = title.to_string();
        }
    }

    pub fn set_description(&mut self, description: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.description = description.to_string();
        }
    }

    /// Leaves edit mode and returns the draft as a patch. An empty
    /// description in the draft clears the stored one.
    pub fn save(&mut self) -> Option<TaskPatch> {
        let draft = self.draft.take()?;
        Some(TaskPatch {
            title: Some(draft.title),
            description: Some(Some(draft.description)),
            completed: None,
        })
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    pub fn draft_title(&self) -> Option<&str> {
        self.draft.as_ref().map(|draft| draft.title.as_str())
    }

    pub fn draft_description(&self) -> Option<&str> {
        self.draft.as_ref().map(|draft| draft.description.as_str())
    }

    pub fn render(&self, palette: &Palette) -> String {
        let checkbox = if self.task.completed { "[x]" } else { "[ ]" };
        let mut lines = vec![format!("{checkbox} {}", self.task.title)];
        if let Some(description) = self.task.description.as_deref() {
            lines.push(format!("    {description}"));
        }
        lines.push(format!("    Created: {}", created_label(&self.task)));

        let text = lines.join("\n");
        if self.task.completed {
            palette.mutedize(&text)
        } else {
            text
        }
    }

    fn fresh_draft(&self) -> Draft {
        Draft {
            title: self.task.title.clone(),
            description: self.task.description.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ItemView;
    use task_core::config::palette_for_theme;
    use task_core::{OwnerId, Task, TaskPatch};
    use time::OffsetDateTime;

    fn sample(completed: bool) -> Task {
        let now = OffsetDateTime::now_utc();
        Task {
            id: "t1".to_string(),
            title: "Buy milk".to_string(),
            description: Some("two liters".to_string()),
            completed,
            user_id: OwnerId::parse("alice").unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn toggle_flips_completion() {
        assert_eq!(ItemView::new(sample(false)).toggle(), TaskPatch::completed(true));
        assert_eq!(ItemView::new(sample(true)).toggle(), TaskPatch::completed(false));
    }

    #[test]
    fn save_returns_draft_and_leaves_edit_mode() {
        let mut view = ItemView::new(sample(false));
        view.begin_edit();
        view.set_title("Buy oat milk");
        view.set_description("");

        let patch = view.save().unwrap();
        assert_eq!(patch.title.as_deref(), Some("Buy oat milk"));
        assert_eq!(patch.description, Some(Some(String::new())));
        assert_eq!(patch.completed, None);
        assert!(!view.is_editing());
        assert!(view.save().is_none());
    }

    #[test]
    fn cancel_discards_draft() {
        let mut view = ItemView::new(sample(false));
        view.begin_edit();
        view.set_title("something else");
        view.cancel();

        assert!(!view.is_editing());
        view.begin_edit();
        assert_eq!(view.draft_title(), Some("Buy milk"));
        assert_eq!(view.draft_description(), Some("two liters"));
    }

    #[test]
    fn setters_outside_edit_mode_are_ignored() {
        let mut view = ItemView::new(sample(false));
        view.set_title("ignored");
        assert!(view.draft_title().is_none());
        assert_eq!(view.task().title, "Buy milk");
    }

    #[test]
    fn render_shows_checkbox_and_mutes_completed() {
        let palette = palette_for_theme(Some("noir"));
        let open = ItemView::new(sample(false)).render(&palette);
        let done = ItemView::new(sample(true)).render(&palette);

        assert!(open.starts_with("[ ] Buy milk"));
        assert!(open.contains("two liters"));
        assert!(open.contains("Created: "));
        assert!(done.starts_with(palette.muted));
        assert!(done.contains("[x] Buy milk"));
    }
}

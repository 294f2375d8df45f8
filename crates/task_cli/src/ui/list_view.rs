use tabled::builder::Builder;
use tabled::settings::Style;
use task_core::config::Palette;
use task_core::{StatusFilter, Task};

use super::created_label;

pub const EMPTY_MESSAGE: &str = "No tasks found. Create your first task!";

/// One row per visible task. Row numbers are 1-based positions in the
/// filtered view and are what `<task>` arguments refer to.
pub struct ListView<'a> {
    tasks: &'a [Task],
    filter: StatusFilter,
}

impl<'a> ListView<'a> {
    pub fn new(tasks: &'a [Task], filter: StatusFilter) -> Self {
        Self { tasks, filter }
    }

    pub fn visible(&self) -> Vec<&'a Task> {
        self.tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .collect()
    }

    pub fn row(&self, number: usize) -> Option<&'a Task> {
        number
            .checked_sub(1)
            .and_then(|index| self.visible().get(index).copied())
    }

    pub fn render(&self, palette: &Palette) -> String {
        let visible = self.visible();
        if visible.is_empty() {
            return palette.mutedize(EMPTY_MESSAGE);
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "status", "title", "description", "created"]);
        for (index, task) in visible.iter().enumerate() {
            builder.push_record([
                (index + 1).to_string(),
                status_label(task).to_string(),
                single_line(&task.title),
                task.description.as_deref().map(single_line).unwrap_or_default(),
                created_label(task),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::psql());
        let rendered = table.to_string();

        // Colour whole lines after layout so escape codes never skew widths.
        let mut lines = rendered.lines();
        let mut out = String::new();
        if let Some(header) = lines.next() {
            out.push_str(&palette.accentize(header));
        }
        if let Some(rule) = lines.next() {
            out.push('\n');
            out.push_str(rule);
        }
        for (line, task) in lines.zip(visible.iter()) {
            out.push('\n');
            if task.completed {
                out.push_str(&palette.mutedize(line));
            } else {
                out.push_str(line);
            }
        }
        out
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn status_label(task: &Task) -> &'static str {
    if task.completed { "done" } else { "active" }
}

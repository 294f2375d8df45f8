mod form_view;
mod item_view;
mod list_view;
mod page;

pub use form_view::FormView;
pub use item_view::ItemView;
pub use list_view::{EMPTY_MESSAGE, ListView};
pub use page::Dashboard;

use task_core::Task;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub(crate) fn created_label(task: &Task) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    format_day(task.created_at.to_offset(offset))
}

fn format_day(at: OffsetDateTime) -> String {
    at.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| at.date().to_string())
}

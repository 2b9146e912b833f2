use std::path::Path;

use crate::error::DataError;
use crate::model::{Task, TaskStatus};

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in progress",
        TaskStatus::Completed => "completed",
        TaskStatus::Cancelled => "cancelled",
    }
}

/// Dates go out as `YYYY-MM-DD`; a date that does not parse is written as stored.
fn export_date(raw: &str) -> String {
    crate::layout::dates::resolve(raw)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Export tasks to a semicolon-delimited CSV file matching the import format.
/// Returns the number of tasks written.
pub fn export_tasks_csv(tasks: &[Task], path: &Path) -> Result<usize, DataError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)?;

    wtr.write_record([
        "Task Name", "Start Date", "End Date", "Vegetable", "Variety", "Progress", "Status", "Priority",
        "Assignee",
    ])?;

    for task in tasks {
        let progress = task.progress_percent().to_string();
        let (start, end) = (export_date(&task.start), export_date(&task.end));
        wtr.write_record([
            task.name.as_str(),
            start.as_str(),
            end.as_str(),
            task.vegetable.name.as_str(),
            task.vegetable.variety.as_str(),
            progress.as_str(),
            status_label(task.status),
            task.priority.label(),
            task.assigned_user.as_ref().map(|a| a.name.as_str()).unwrap_or(""),
        ])?;
    }

    wtr.flush().map_err(|e| DataError::io(path, e))?;
    tracing::info!(path = %path.display(), count = tasks.len(), "tasks exported");
    Ok(tasks.len())
}

use std::path::Path;

use crate::error::DataError;
use crate::layout::dates;
use crate::model::{Assignee, Task, TaskPriority, TaskStatus, Vegetable, WorkReport, WorkType};

/// Rows accepted from a CSV file and how many were rejected.
#[derive(Debug)]
pub struct Imported<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Map a status string to a status and default progress.
fn parse_status(status: &str) -> (TaskStatus, u8) {
    match status.trim().to_lowercase().as_str() {
        "finished" | "done" | "complete" | "completed" | "完了" => (TaskStatus::Completed, 100),
        "in progress" | "in-progress" | "in_progress" | "active" | "started" | "進行中" => {
            (TaskStatus::InProgress, 50)
        }
        "cancelled" | "canceled" | "中止" => (TaskStatus::Cancelled, 0),
        _ => (TaskStatus::Pending, 0),
    }
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs && semicolons > 0 {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskColumn {
    Name,
    Start,
    End,
    Vegetable,
    Variety,
    Progress,
    Status,
    Priority,
    Assignee,
}

fn task_column(normalized: &str) -> Option<TaskColumn> {
    match normalized {
        "name" | "task" | "taskname" | "title" | "作業名" | "タスク" => Some(TaskColumn::Name),
        "start" | "startdate" | "from" | "begin" | "開始日" => Some(TaskColumn::Start),
        "end" | "enddate" | "to" | "finish" | "due" | "duedate" | "終了日" => Some(TaskColumn::End),
        "vegetable" | "crop" | "vegetablename" | "野菜" => Some(TaskColumn::Vegetable),
        "variety" | "cultivar" | "品種" => Some(TaskColumn::Variety),
        "progress" | "percent" | "done%" | "進捗" => Some(TaskColumn::Progress),
        "status" | "state" | "状態" => Some(TaskColumn::Status),
        "priority" | "pri" | "優先度" => Some(TaskColumn::Priority),
        "assignee" | "assignedto" | "owner" | "担当者" => Some(TaskColumn::Assignee),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportColumn {
    Date,
    WorkType,
    Vegetable,
    Notes,
    Harvest,
    Revenue,
}

fn report_column(normalized: &str) -> Option<ReportColumn> {
    match normalized {
        "date" | "workdate" | "作業日" => Some(ReportColumn::Date),
        "type" | "worktype" | "work" | "作業" | "作業種別" => Some(ReportColumn::WorkType),
        "vegetable" | "crop" | "野菜" => Some(ReportColumn::Vegetable),
        "notes" | "note" | "worknotes" | "comment" | "メモ" => Some(ReportColumn::Notes),
        "harvest" | "harvestamount" | "amount" | "収穫量" => Some(ReportColumn::Harvest),
        "revenue" | "expectedrevenue" | "見込み売上" => Some(ReportColumn::Revenue),
        _ => None,
    }
}

fn reader_for(content: &str) -> csv::Reader<&[u8]> {
    let first_line = content.lines().next().unwrap_or("");
    csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(first_line))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes())
}

fn map_headers<C: Copy + PartialEq>(
    reader: &mut csv::Reader<&[u8]>,
    to_col: fn(&str) -> Option<C>,
    required: &[C],
    need: &'static str,
) -> Result<Vec<Option<C>>, DataError> {
    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<C>> = headers.iter().map(|h| to_col(&normalize_header(h))).collect();
    if required.iter().any(|r| !col_map.contains(&Some(*r))) {
        return Err(DataError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
            need,
        });
    }
    Ok(col_map)
}

fn field<C: PartialEq + Copy>(record: &csv::StringRecord, col_map: &[Option<C>], col: C) -> Option<String> {
    col_map
        .iter()
        .position(|c| *c == Some(col))
        .and_then(|i| record.get(i))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn find_vegetable<'a>(vegetables: &'a [Vegetable], name: &str) -> Option<&'a Vegetable> {
    let wanted = name.trim().to_lowercase();
    vegetables.iter().find(|v| v.name.to_lowercase() == wanted)
}

fn read_file(path: &Path) -> Result<String, DataError> {
    std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))
}

/// Import tasks from a CSV file. Unknown vegetables are added to `vegetables`.
pub fn import_tasks_csv(path: &Path, vegetables: &mut Vec<Vegetable>) -> Result<Imported<Task>, DataError> {
    parse_tasks_csv(&read_file(path)?, vegetables)
}

/// Import work reports from a CSV file. Rows naming an unknown vegetable are skipped.
pub fn import_reports_csv(path: &Path, vegetables: &[Vegetable]) -> Result<Imported<WorkReport>, DataError> {
    parse_reports_csv(&read_file(path)?, vegetables)
}

pub fn parse_tasks_csv(content: &str, vegetables: &mut Vec<Vegetable>) -> Result<Imported<Task>, DataError> {
    use TaskColumn as C;

    let mut reader = reader_for(content);
    let col_map = map_headers(
        &mut reader,
        task_column,
        &[C::Name, C::Start, C::End, C::Vegetable],
        "task name, start date, end date, vegetable",
    )?;

    let mut tasks = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };
        let get = |col| field(&record, &col_map, col);

        let (Some(name), Some(veg_name)) = (get(C::Name), get(C::Vegetable)) else {
            skipped += 1;
            continue;
        };

        let start = get(C::Start).unwrap_or_default();
        let end = get(C::End).unwrap_or_default();
        let (start, end) = match (dates::resolve(&start), dates::resolve(&end)) {
            (Ok(s), Ok(e)) => (s, e),
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(line, %err, "skipping task row");
                skipped += 1;
                continue;
            }
        };

        let vegetable = match find_vegetable(vegetables, &veg_name) {
            Some(v) => v.to_ref(),
            None => {
                let v = Vegetable::new(veg_name, get(C::Variety).unwrap_or_default());
                let r = v.to_ref();
                tracing::info!(name = %v.name, "new vegetable from CSV");
                vegetables.push(v);
                r
            }
        };

        let (status, default_progress) = get(C::Status).as_deref().map(parse_status).unwrap_or((TaskStatus::Pending, 0));
        let progress = get(C::Progress)
            .and_then(|p| p.trim_end_matches('%').trim().parse::<f32>().ok())
            .map(|p| p.clamp(0.0, 100.0).round() as u8)
            .unwrap_or(default_progress);

        let mut task = Task::new(name, vegetable, start.min(end), end.max(start));
        task.status = status;
        task.progress = progress;
        task.priority = get(C::Priority)
            .as_deref()
            .and_then(TaskPriority::parse)
            .unwrap_or_default();
        task.assigned_user = get(C::Assignee).map(|name| Assignee {
            id: uuid::Uuid::new_v4(),
            name,
        });
        tasks.push(task);
    }

    if tasks.is_empty() {
        return Err(DataError::Empty { skipped });
    }
    Ok(Imported { records: tasks, skipped })
}

pub fn parse_reports_csv(content: &str, vegetables: &[Vegetable]) -> Result<Imported<WorkReport>, DataError> {
    use ReportColumn as C;

    let mut reader = reader_for(content);
    let col_map = map_headers(
        &mut reader,
        report_column,
        &[C::Date, C::Vegetable],
        "work date, vegetable",
    )?;

    let mut reports = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let Ok(record) = result else {
            skipped += 1;
            continue;
        };
        let get = |col| field(&record, &col_map, col);

        let date = match dates::resolve(&get(C::Date).unwrap_or_default()) {
            Ok(d) => d,
            Err(err) => {
                tracing::warn!(line, %err, "skipping work report row");
                skipped += 1;
                continue;
            }
        };
        let Some(vegetable) = get(C::Vegetable).and_then(|n| find_vegetable(vegetables, &n)) else {
            tracing::warn!(line, "skipping work report for unknown vegetable");
            skipped += 1;
            continue;
        };

        let work_type = get(C::WorkType).as_deref().map(WorkType::parse).unwrap_or_default();
        let mut report = WorkReport::new(vegetable.id, work_type, date);
        report.work_notes = get(C::Notes);
        report.harvest_amount = get(C::Harvest).and_then(|s| s.parse().ok());
        report.expected_revenue = get(C::Revenue).and_then(|s| s.replace(',', "").parse().ok());
        reports.push(report);
    }

    if reports.is_empty() {
        return Err(DataError::Empty { skipped });
    }
    Ok(Imported { records: reports, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_with_semicolons_and_new_vegetable() {
        let mut vegetables = vec![Vegetable::new("トマト", "桃太郎")];
        let csv = "Task Name;Start Date;End Date;Vegetable;Status;Priority;Assignee\n\
                   定植;2025-04-01;2025-04-03;トマト;done;high;Sato\n\
                   播種;2025/03/01;2025/03/02;にんじん;;;\n\
                   broken;tomorrow;2025-04-03;トマト;;;\n";

        let imported = parse_tasks_csv(csv, &mut vegetables).unwrap();

        assert_eq!(imported.records.len(), 2);
        assert_eq!(imported.skipped, 1);
        let first = &imported.records[0];
        assert_eq!(first.status, TaskStatus::Completed);
        assert_eq!(first.progress, 100);
        assert_eq!(first.priority, TaskPriority::High);
        assert_eq!(first.assigned_user.as_ref().map(|a| a.name.as_str()), Some("Sato"));
        assert_eq!(first.vegetable.id, vegetables[0].id);

        let second = &imported.records[1];
        assert_eq!(second.start, "2025-03-01");
        assert_eq!(vegetables.len(), 2);
        assert_eq!(second.vegetable.id, vegetables[1].id);
    }

    #[test]
    fn explicit_progress_overrides_status_default() {
        let mut vegetables = Vec::new();
        let csv = "name,start,end,vegetable,progress,status\nx,2025-01-01,2025-01-02,なす,35%,in progress\n";
        let imported = parse_tasks_csv(csv, &mut vegetables).unwrap();
        assert_eq!(imported.records[0].progress, 35);
        assert_eq!(imported.records[0].status, TaskStatus::InProgress);
    }

    #[test]
    fn missing_required_columns() {
        let err = parse_tasks_csv("name,start\nx,2025-01-01\n", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumns { .. }));
    }

    #[test]
    fn reports_resolve_vegetable_by_name() {
        let vegetables = vec![Vegetable::new("トマト", "")];
        let csv = "date,type,vegetable,notes,harvest,revenue\n\
                   2025-07-01,harvesting,トマト,first pick,12.5,\"6,000\"\n\
                   2025-07-02,watering,きゅうり,,,\n";
        let imported = parse_reports_csv(csv, &vegetables).unwrap();
        assert_eq!(imported.records.len(), 1);
        assert_eq!(imported.skipped, 1);
        let r = &imported.records[0];
        assert_eq!(r.work_type, WorkType::Harvesting);
        assert_eq!(r.vegetable_id, vegetables[0].id);
        assert_eq!(r.harvest_amount, Some(12.5));
        assert_eq!(r.expected_revenue, Some(6000.0));
        assert_eq!(r.work_notes.as_deref(), Some("first pick"));
    }

    #[test]
    fn all_rows_rejected_is_empty_error() {
        let err = parse_reports_csv("date,vegetable\nbad,トマト\n", &[]).unwrap_err();
        assert!(matches!(err, DataError::Empty { skipped: 1 }));
    }
}

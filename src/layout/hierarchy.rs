//! Vegetable grouping, expand/collapse state and row flattening.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::error::LayoutError;
use crate::model::{Task, TaskPriority, VegetableRef, WorkReport};

/// Active filter selections. `None` means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub vegetable: Option<Uuid>,
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.vegetable.map_or(true, |id| task.vegetable.id == id)
            && self.priority.map_or(true, |p| task.priority == p)
    }

    pub fn admits_vegetable(&self, vegetable_id: Uuid) -> bool {
        self.vegetable.map_or(true, |id| id == vegetable_id)
    }

    pub fn is_active(&self) -> bool {
        self.vegetable.is_some() || self.priority.is_some()
    }
}

/// Which vegetable groups currently show their task rows.
///
/// Seeded once with every known vegetable; afterwards only user toggles
/// change it, so it survives re-filtering.
#[derive(Debug, Clone, Default)]
pub struct ExpandState {
    expanded: HashSet<Uuid>,
    seeded: bool,
}

impl ExpandState {
    /// Expand everything on first data load. Later calls are no-ops.
    pub fn seed(&mut self, vegetable_ids: impl IntoIterator<Item = Uuid>) {
        if self.seeded {
            return;
        }
        self.expanded.extend(vegetable_ids);
        self.seeded = true;
    }

    pub fn is_expanded(&self, vegetable_id: Uuid) -> bool {
        self.expanded.contains(&vegetable_id)
    }

    pub fn toggle(&mut self, vegetable_id: Uuid) {
        if !self.expanded.remove(&vegetable_id) {
            self.expanded.insert(vegetable_id);
        }
    }

    pub fn expand_all(&mut self, vegetable_ids: impl IntoIterator<Item = Uuid>) {
        self.expanded.extend(vegetable_ids);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Forget everything, e.g. when a different farm is opened.
    pub fn reset(&mut self) {
        self.expanded.clear();
        self.seeded = false;
    }
}

/// A task whose dates resolved cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    pub task: Task,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ScheduledTask {
    pub fn resolve(task: &Task) -> Result<Self, LayoutError> {
        Ok(Self {
            start: task.start_date()?,
            end: task.end_date()?,
            task: task.clone(),
        })
    }

    /// Days from `day` to the nearest day of this task; 0 when inside.
    pub fn distance_to(&self, day: NaiveDate) -> i64 {
        if day < self.start {
            (self.start - day).num_days()
        } else if day > self.end {
            (day - self.end).num_days()
        } else {
            0
        }
    }
}

/// A work report whose date resolved cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedReport {
    pub report: WorkReport,
    pub date: NaiveDate,
}

impl DatedReport {
    pub fn resolve(report: &WorkReport) -> Result<Self, LayoutError> {
        Ok(Self {
            date: report.date()?,
            report: report.clone(),
        })
    }
}

/// Aggregates shown on a vegetable header row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupStats {
    pub task_count: usize,
    /// Rounded mean of member task progress; 0 without tasks.
    pub mean_progress: u8,
    pub report_count: usize,
    pub harvest_total: f64,
    pub revenue_total: f64,
}

impl GroupStats {
    fn compute(tasks: &[ScheduledTask], reports: &[DatedReport]) -> Self {
        let mean_progress = if tasks.is_empty() {
            0
        } else {
            let sum: u32 = tasks.iter().map(|t| t.task.progress_percent() as u32).sum();
            (sum as f64 / tasks.len() as f64).round() as u8
        };
        Self {
            task_count: tasks.len(),
            mean_progress,
            report_count: reports.len(),
            harvest_total: reports.iter().filter_map(|r| r.report.harvest_amount).sum(),
            revenue_total: reports.iter().filter_map(|r| r.report.expected_revenue).sum(),
        }
    }
}

/// One vegetable with the tasks and reports that survived filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct VegetableGroup {
    pub vegetable: VegetableRef,
    pub tasks: Vec<ScheduledTask>,
    pub reports: Vec<DatedReport>,
    pub expanded: bool,
    pub stats: GroupStats,
}

/// Output of [`build_groups`].
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub groups: Vec<VegetableGroup>,
    /// Reports that matched the filter but whose vegetable has no visible task.
    pub unresolved: Vec<LayoutError>,
}

/// Groups `tasks` by vegetable, attaches `reports` to existing groups and
/// orders the groups by vegetable name.
///
/// `tasks` must already be filtered; groups are only ever created from tasks.
pub fn build_groups(
    tasks: Vec<ScheduledTask>,
    reports: &[DatedReport],
    filter: &TaskFilter,
    expand: &ExpandState,
) -> Grouping {
    let mut groups: Vec<VegetableGroup> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for task in tasks {
        let veg_id = task.task.vegetable.id;
        let slot = *index.entry(veg_id).or_insert_with(|| {
            groups.push(VegetableGroup {
                vegetable: task.task.vegetable.clone(),
                tasks: Vec::new(),
                reports: Vec::new(),
                expanded: expand.is_expanded(veg_id),
                stats: GroupStats::default(),
            });
            groups.len() - 1
        });
        groups[slot].tasks.push(task);
    }

    let mut unresolved = Vec::new();
    for report in reports {
        let veg_id = report.report.vegetable_id;
        if !filter.admits_vegetable(veg_id) {
            continue;
        }
        match index.get(&veg_id) {
            Some(&slot) => groups[slot].reports.push(report.clone()),
            None => unresolved.push(LayoutError::UnresolvedReportPlacement {
                report_id: report.report.id,
                vegetable_id: veg_id,
            }),
        }
    }

    for group in &mut groups {
        group.stats = GroupStats::compute(&group.tasks, &group.reports);
    }

    groups.sort_by(|a, b| compare_names(&a.vegetable.name, &b.vegetable.name));

    Grouping { groups, unresolved }
}

/// A flattened render unit.
#[derive(Debug, Clone, PartialEq)]
pub enum HierarchicalRow {
    Vegetable {
        vegetable: VegetableRef,
        expanded: bool,
        stats: GroupStats,
    },
    Task(ScheduledTask),
}

impl HierarchicalRow {
    pub fn vegetable_id(&self) -> Uuid {
        match self {
            HierarchicalRow::Vegetable { vegetable, .. } => vegetable.id,
            HierarchicalRow::Task(t) => t.task.vegetable.id,
        }
    }

    pub fn task_id(&self) -> Option<Uuid> {
        match self {
            HierarchicalRow::Task(t) => Some(t.task.id),
            HierarchicalRow::Vegetable { .. } => None,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, HierarchicalRow::Vegetable { .. })
    }
}

/// One header per group, followed by its tasks when expanded.
pub fn flatten_rows(groups: &[VegetableGroup]) -> Vec<HierarchicalRow> {
    let mut rows = Vec::new();
    for group in groups {
        rows.push(HierarchicalRow::Vegetable {
            vegetable: group.vegetable.clone(),
            expanded: group.expanded,
            stats: group.stats,
        });
        if group.expanded {
            rows.extend(group.tasks.iter().cloned().map(HierarchicalRow::Task));
        }
    }
    rows
}

/// Orders vegetable names the way a Japanese collation would for the common
/// cases: katakana sorts with its hiragana equivalent (half-width forms
/// included), the long-vowel mark sorts as the vowel it lengthens, full-width
/// ASCII with half-width, Latin before kana before kanji.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> String {
    // NFKC widens half-width katakana (joining ﾞ/ﾟ onto the base kana),
    // narrows full-width ASCII and turns the ideographic space into ' '.
    let mut key = String::with_capacity(name.len());
    for c in name.nfkc() {
        let c = match c {
            // Katakana ァ..ヶ folds onto hiragana ぁ..ゖ
            '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            'ー' => key.chars().last().and_then(kana_vowel).unwrap_or(c),
            _ => c,
        };
        key.extend(c.to_lowercase());
    }
    key
}

/// The vowel a hiragana syllable ends in, for expanding ー.
fn kana_vowel(c: char) -> Option<char> {
    const ROWS: [(&str, char); 5] = [
        ("あぁかがさざただなはばぱまやゃらわゎ", 'あ'),
        ("いぃきぎしじちぢにひびぴみりゐ", 'い'),
        ("うぅくぐすずつっづぬふぶぷむゆゅるゔ", 'う'),
        ("えぇけげせぜてでねへべぺめれゑ", 'え'),
        ("おぉこごそぞとどのほぼぽもよょろを", 'お'),
    ];
    ROWS.iter().find(|(row, _)| row.contains(c)).map(|&(_, vowel)| vowel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Vegetable, WorkType};
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scheduled(veg: &Vegetable, name: &str, progress: u8) -> ScheduledTask {
        let mut task = Task::new(name, veg.to_ref(), ymd(2025, 1, 3), ymd(2025, 1, 5));
        task.progress = progress;
        ScheduledTask::resolve(&task).unwrap()
    }

    fn dated(veg: &Vegetable, day: u32) -> DatedReport {
        DatedReport::resolve(&WorkReport::new(veg.id, WorkType::Watering, ymd(2025, 1, day))).unwrap()
    }

    fn all_expanded(vegs: &[&Vegetable]) -> ExpandState {
        let mut expand = ExpandState::default();
        expand.seed(vegs.iter().map(|v| v.id));
        expand
    }

    #[test]
    fn filter_is_a_conjunction() {
        let tomato = Vegetable::new("トマト", "");
        let mut task = Task::new("x", tomato.to_ref(), ymd(2025, 1, 1), ymd(2025, 1, 2));
        task.priority = TaskPriority::High;

        assert!(TaskFilter::default().matches(&task));
        let by_veg = TaskFilter { vegetable: Some(tomato.id), priority: None };
        assert!(by_veg.matches(&task));
        let wrong_priority = TaskFilter { vegetable: Some(tomato.id), priority: Some(TaskPriority::Low) };
        assert!(!wrong_priority.matches(&task));
        let other_veg = TaskFilter { vegetable: Some(Uuid::new_v4()), priority: None };
        assert!(!other_veg.matches(&task));
    }

    #[test]
    fn mean_progress_is_rounded_mean() {
        let tomato = Vegetable::new("トマト", "");
        let tasks = vec![scheduled(&tomato, "a", 40), scheduled(&tomato, "b", 60)];
        let grouping = build_groups(tasks, &[], &TaskFilter::default(), &all_expanded(&[&tomato]));
        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.groups[0].stats.mean_progress, 50);
        assert_eq!(grouping.groups[0].stats.task_count, 2);

        let tasks = vec![scheduled(&tomato, "a", 33), scheduled(&tomato, "b", 34)];
        let grouping = build_groups(tasks, &[], &TaskFilter::default(), &all_expanded(&[&tomato]));
        assert_eq!(grouping.groups[0].stats.mean_progress, 34);
    }

    #[test]
    fn reports_attach_only_to_existing_groups() {
        let tomato = Vegetable::new("トマト", "");
        let carrot = Vegetable::new("にんじん", "");
        let mut harvest = WorkReport::new(tomato.id, WorkType::Harvesting, ymd(2025, 1, 4));
        harvest.harvest_amount = Some(12.5);
        harvest.expected_revenue = Some(5000.0);
        let reports = vec![
            DatedReport::resolve(&harvest).unwrap(),
            dated(&carrot, 2),
        ];
        let grouping = build_groups(
            vec![scheduled(&tomato, "a", 10)],
            &reports,
            &TaskFilter::default(),
            &all_expanded(&[&tomato, &carrot]),
        );

        assert_eq!(grouping.groups.len(), 1);
        let stats = grouping.groups[0].stats;
        assert_eq!(stats.report_count, 1);
        assert_eq!(stats.harvest_total, 12.5);
        assert_eq!(stats.revenue_total, 5000.0);
        assert_eq!(
            grouping.unresolved,
            vec![LayoutError::UnresolvedReportPlacement {
                report_id: reports[1].report.id,
                vegetable_id: carrot.id,
            }]
        );
    }

    #[test]
    fn reports_outside_vegetable_filter_are_not_unresolved() {
        let tomato = Vegetable::new("トマト", "");
        let carrot = Vegetable::new("にんじん", "");
        let filter = TaskFilter { vegetable: Some(tomato.id), priority: None };
        let grouping = build_groups(
            vec![scheduled(&tomato, "a", 10)],
            &[dated(&carrot, 2)],
            &filter,
            &all_expanded(&[&tomato, &carrot]),
        );
        assert!(grouping.unresolved.is_empty());
    }

    #[test]
    fn groups_sort_by_kana_aware_name() {
        let tomato = Vegetable::new("トマト", "");
        let eggplant = Vegetable::new("なす", "");
        let cucumber = Vegetable::new("きゅうり", "");
        let onion = Vegetable::new("玉ねぎ", "");
        let tasks = vec![
            scheduled(&onion, "a", 0),
            scheduled(&tomato, "b", 0),
            scheduled(&eggplant, "c", 0),
            scheduled(&cucumber, "d", 0),
        ];
        let grouping = build_groups(tasks, &[], &TaskFilter::default(), &ExpandState::default());
        let names: Vec<&str> = grouping.groups.iter().map(|g| g.vegetable.name.as_str()).collect();
        assert_eq!(names, vec!["きゅうり", "トマト", "なす", "玉ねぎ"]);
    }

    #[test]
    fn long_vowel_mark_sorts_as_its_vowel() {
        // ゴーヤ reads ごおや, which comes before ごぼう
        assert_eq!(compare_names("ゴーヤ", "ごぼう"), Ordering::Less);
        assert_eq!(compare_names("ごぼう", "ゴーヤ"), Ordering::Greater);
        assert_eq!(compare_names("ピーマン", "ぴいまん"), Ordering::Greater);
        assert_eq!(collation_key("ピーマン"), "ぴいまん");
    }

    #[test]
    fn half_width_katakana_sorts_with_full_width() {
        assert_eq!(collation_key("ｶﾌﾞ"), "かぶ");
        assert_eq!(compare_names("ｶﾌﾞ", "キャベツ"), Ordering::Less);

        let cabbage = Vegetable::new("キャベツ", "");
        let turnip = Vegetable::new("ｶﾌﾞ", "");
        let bitter_melon = Vegetable::new("ゴーヤ", "");
        let burdock = Vegetable::new("ごぼう", "");
        let tasks = vec![
            scheduled(&cabbage, "a", 0),
            scheduled(&burdock, "b", 0),
            scheduled(&turnip, "c", 0),
            scheduled(&bitter_melon, "d", 0),
        ];
        let grouping = build_groups(tasks, &[], &TaskFilter::default(), &ExpandState::default());
        let names: Vec<&str> = grouping.groups.iter().map(|g| g.vegetable.name.as_str()).collect();
        assert_eq!(names, vec!["ｶﾌﾞ", "キャベツ", "ゴーヤ", "ごぼう"]);
    }

    #[test]
    fn collapsing_one_group_removes_only_its_tasks() {
        let tomato = Vegetable::new("トマト", "");
        let eggplant = Vegetable::new("なす", "");
        let tasks = || {
            vec![
                scheduled(&tomato, "t1", 0),
                scheduled(&eggplant, "e1", 0),
                scheduled(&tomato, "t2", 0),
            ]
        };
        let mut expand = all_expanded(&[&tomato, &eggplant]);
        let before = flatten_rows(&build_groups(tasks(), &[], &TaskFilter::default(), &expand).groups);
        assert_eq!(before.len(), 5);

        expand.toggle(tomato.id);
        let after = flatten_rows(&build_groups(tasks(), &[], &TaskFilter::default(), &expand).groups);

        let without_tomato_tasks: Vec<HierarchicalRow> = before
            .iter()
            .filter(|r| r.is_header() || r.vegetable_id() != tomato.id)
            .map(|r| match r {
                HierarchicalRow::Vegetable { vegetable, stats, .. } if vegetable.id == tomato.id => {
                    HierarchicalRow::Vegetable {
                        vegetable: vegetable.clone(),
                        expanded: false,
                        stats: *stats,
                    }
                }
                other => other.clone(),
            })
            .collect();
        assert_eq!(after, without_tomato_tasks);
    }

    #[test]
    fn task_rows_keep_insertion_order() {
        let tomato = Vegetable::new("トマト", "");
        let rows = flatten_rows(
            &build_groups(
                vec![scheduled(&tomato, "second", 0), scheduled(&tomato, "first", 0)],
                &[],
                &TaskFilter::default(),
                &all_expanded(&[&tomato]),
            )
            .groups,
        );
        let names: Vec<String> = rows
            .iter()
            .filter_map(|r| match r {
                HierarchicalRow::Task(t) => Some(t.task.name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn seed_happens_once() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut expand = ExpandState::default();
        expand.seed([a]);
        expand.toggle(a);
        expand.seed([a, b]);
        assert!(!expand.is_expanded(a));
        assert!(!expand.is_expanded(b));
        expand.reset();
        expand.seed([b]);
        assert!(expand.is_expanded(b));
    }

    #[test]
    fn distance_to_task_span() {
        let tomato = Vegetable::new("トマト", "");
        let t = scheduled(&tomato, "a", 0); // 3rd..5th
        assert_eq!(t.distance_to(ymd(2025, 1, 1)), 2);
        assert_eq!(t.distance_to(ymd(2025, 1, 4)), 0);
        assert_eq!(t.distance_to(ymd(2025, 1, 9)), 4);
    }
}

pub mod farm;
pub mod task;
pub mod vegetable;
pub mod work_report;

pub use farm::FarmData;
pub use task::{Assignee, Task, TaskPriority, TaskStatus, VegetableRef};
pub use vegetable::Vegetable;
pub use work_report::{WorkReport, WorkType};

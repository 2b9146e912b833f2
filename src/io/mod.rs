pub mod csv_export;
pub mod csv_import;
pub mod source;

pub use source::{FarmDataSource, JsonFileSource};

pub mod diff;
pub mod flatten;
pub mod reconcile;
pub mod report;
pub mod transpose;

pub use crate::domain::model::{Collection, DiffEntry, Record, Report, Value};
pub use crate::domain::ports::{ConfigProvider, RecordLoader};
pub use crate::utils::error::Result;

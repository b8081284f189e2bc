pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FsLoader, MemoryLoader};
pub use config::{NamespaceRoots, Settings, TomlConfig};
pub use crate::core::reconcile::{CompareOptions, Reconciler};
pub use domain::model::{Collection, DiffEntry, DuplicatePolicy, Namespace, Record, Report, Value};
pub use utils::error::{ReconcileError, Result};

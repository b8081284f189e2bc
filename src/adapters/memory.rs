use crate::domain::model::{Namespace, Record};
use crate::domain::ports::RecordLoader;
use crate::utils::error::{ReconcileError, Result};
use std::collections::HashMap;

/// In-memory loader, mainly for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    index: HashMap<Namespace, Vec<String>>,
    records: HashMap<(Namespace, String), Record>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dataset and lists it in the namespace index.
    pub fn with_dataset(mut self, namespace: Namespace, name: &str, record: Record) -> Self {
        self.index.entry(namespace).or_default().push(name.to_string());
        self.records.insert((namespace, name.to_string()), record);
        self
    }

    /// Adds a record that is loadable by name but not listed in the index,
    /// the way sub-datasets are.
    pub fn with_record(mut self, namespace: Namespace, name: &str, record: Record) -> Self {
        self.records.insert((namespace, name.to_string()), record);
        self
    }
}

impl RecordLoader for MemoryLoader {
    fn dataset_names(&self, namespace: Namespace) -> Result<Vec<String>> {
        Ok(self.index.get(&namespace).cloned().unwrap_or_default())
    }

    fn load_record(&self, namespace: Namespace, name: &str) -> Result<Record> {
        self.records
            .get(&(namespace, name.to_string()))
            .cloned()
            .ok_or_else(|| {
                ReconcileError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no {} record named '{}'", namespace, name),
                ))
            })
    }
}

use crate::domain::model::{DuplicatePolicy, Namespace, Record};
use crate::utils::error::Result;
use std::path::Path;

/// Source of dataset manifests for a namespace.
pub trait RecordLoader {
    /// Top-level dataset names of the namespace, in index order.
    fn dataset_names(&self, namespace: Namespace) -> Result<Vec<String>>;

    fn load_record(&self, namespace: Namespace, name: &str) -> Result<Record>;
}

impl<L: RecordLoader + ?Sized> RecordLoader for &L {
    fn dataset_names(&self, namespace: Namespace) -> Result<Vec<String>> {
        (**self).dataset_names(namespace)
    }

    fn load_record(&self, namespace: Namespace, name: &str) -> Result<Record> {
        (**self).load_record(namespace, name)
    }
}

pub trait ConfigProvider {
    fn namespace_root(&self, namespace: Namespace) -> &Path;
    fn manifest_file(&self) -> &str;
    fn noisy_fields(&self) -> &[String];
    fn names_only(&self) -> bool;
    fn duplicate_policy(&self) -> DuplicatePolicy;
}
